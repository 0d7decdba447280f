//! The stats pipeline: read, filter, aggregate, rank, render.

use crate::analysis::aggregator::{aggregate, AggregateSnapshot, HubMetrics};
use crate::analysis::rank::{resolve_rank, RankInfo};
use crate::analysis::season_filter::filter_by_season;
use crate::config::HubConfig;
use crate::display::renderer::render;
use crate::display::sink::RenderSink;
use crate::error::AppError;
use crate::store::{load_matches, selected_season_id, KeyValueStore};
use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

/// Result of one pipeline run. Never stored; recomputed on every refresh.
#[derive(Debug, Clone, Serialize)]
pub struct HubView {
    pub season: Option<String>,
    pub metrics: HubMetrics,
    #[serde(skip)]
    pub snapshot: AggregateSnapshot,
    /// Absent when the filtered match set is empty.
    pub rank: Option<RankInfo>,
    pub computed_at: DateTime<Utc>,
}

impl HubView {
    pub fn to_json(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AppError::JsonError(format!("Failed to serialize stats: {}", e)))
    }
}

pub struct StatsHub<S> {
    config: HubConfig,
    store: S,
}

impl<S: KeyValueStore> StatsHub<S> {
    pub fn new(config: HubConfig, store: S) -> Self {
        StatsHub { config, store }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn season_in_effect(&self) -> Option<String> {
        selected_season_id(&self.store, &self.config.keys)
    }

    pub fn compute(&self) -> HubView {
        let all = load_matches(&self.store, &self.config.keys);
        let season = self.season_in_effect();
        let matches = filter_by_season(all, season.as_deref(), &self.config.fields);

        let snapshot = aggregate(&matches, &self.config.fields);
        let rank = if snapshot.is_empty() {
            None
        } else {
            Some(resolve_rank(
                &snapshot,
                &self.config.rank_table,
                self.config.start_rp,
            ))
        };

        debug!(
            "Computed stats for {} matches (season {:?})",
            snapshot.total, season
        );

        HubView {
            season,
            metrics: snapshot.metrics(),
            snapshot,
            rank,
            computed_at: Utc::now(),
        }
    }

    pub fn compute_and_render<R: RenderSink + ?Sized>(&self, sink: &mut R) -> HubView {
        let view = self.compute();
        render(sink, &self.config.targets, &view.metrics, view.rank.as_ref());
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::sink::MemorySink;
    use crate::store::memory::MemoryStore;

    const TWO_MATCHES: &str = r#"[
        {"place":1,"kills":10,"assists":4,"deaths":2,"mvp":true,"seasonId":"S1","rp":100},
        {"place":5,"kills":3,"assists":1,"deaths":3,"mvp":false,"seasonId":"S1","rp":50},
        {"place":1,"kills":20,"assists":0,"deaths":0,"mvp":true,"seasonId":"S2","rp":900}
    ]"#;

    fn hub(store: MemoryStore) -> StatsHub<MemoryStore> {
        StatsHub::new(HubConfig::default(), store)
    }

    #[test]
    fn selected_season_scenario() {
        let keys = HubConfig::default().keys;
        let store = MemoryStore::new()
            .with(&keys.matches, TWO_MATCHES)
            .with(&keys.selected_season, "S1");
        let mut sink = MemorySink::new();

        let view = hub(store).compute_and_render(&mut sink);

        assert_eq!(view.season.as_deref(), Some("S1"));
        assert_eq!(sink.text("mWinRate"), Some("50"));
        assert_eq!(sink.text("mTotal"), Some("2"));
        assert_eq!(sink.text("mKDA"), Some("3.1"));
        assert_eq!(sink.text("mAvgKills"), Some("6.5"));
        assert_eq!(sink.text("mMVP"), Some("50"));
        assert_eq!(sink.text("uiRankName"), Some("OUTCAST"));
        assert_eq!(sink.text("uiRR"), Some("150"));
        assert_eq!(sink.text("uiNextRR"), Some("300"));
        assert_eq!(sink.width("uiProgFill"), Some("50%"));
        assert_eq!(sink.attribute("data-rank"), Some("outcast"));
    }

    #[test]
    fn active_season_applies_when_nothing_selected() {
        let keys = HubConfig::default().keys;
        let store = MemoryStore::new()
            .with(&keys.matches, TWO_MATCHES)
            .with(&keys.active_season, "S2");

        let view = hub(store).compute();

        assert_eq!(view.metrics.total, 1);
        assert_eq!(view.metrics.kda, "20.0");
        assert_eq!(view.rank.map(|r| r.tier_name), Some("HARBINGER".to_string()));
    }

    #[test]
    fn no_season_counts_every_match() {
        let keys = HubConfig::default().keys;
        let store = MemoryStore::new().with(&keys.matches, TWO_MATCHES);

        let view = hub(store).compute();

        assert_eq!(view.season, None);
        assert_eq!(view.metrics.total, 3);
        assert_eq!(view.metrics.win_rate, 67);
    }

    #[test]
    fn empty_season_leaves_rank_display_alone() {
        let keys = HubConfig::default().keys;
        let store = MemoryStore::new()
            .with(&keys.matches, TWO_MATCHES)
            .with(&keys.selected_season, "S7");
        let mut sink = MemorySink::new();

        let view = hub(store).compute_and_render(&mut sink);

        assert!(view.rank.is_none());
        assert_eq!(sink.text("mWinRate"), Some("0"));
        assert_eq!(sink.text("mTotal"), Some("0"));
        assert_eq!(sink.text("mKDA"), Some("0.0"));
        assert_eq!(sink.text("mAvgKills"), Some("0.0"));
        assert_eq!(sink.text("mMVP"), Some("0"));
        assert_eq!(sink.text("uiRankName"), None);
    }

    #[test]
    fn start_rp_shifts_the_rank() {
        let keys = HubConfig::default().keys;
        let config = HubConfig {
            start_rp: 200.0,
            ..HubConfig::default()
        };
        let store = MemoryStore::new()
            .with(&keys.matches, TWO_MATCHES)
            .with(&keys.selected_season, "S1");

        let view = StatsHub::new(config, store).compute();
        let rank = view.rank.unwrap();

        assert_eq!(rank.tier_name, "THRALL");
        assert_eq!(rank.rp_display(), "350");
    }

    #[test]
    fn view_serializes_to_json() {
        let keys = HubConfig::default().keys;
        let store = MemoryStore::new()
            .with(&keys.matches, TWO_MATCHES)
            .with(&keys.selected_season, "S1");

        let json = hub(store).compute().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metrics"]["kda"], "3.1");
        assert_eq!(value["rank"]["rank_id"], "outcast");
        assert_eq!(value["season"], "S1");
    }
}
