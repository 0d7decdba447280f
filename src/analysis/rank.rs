use super::aggregator::AggregateSnapshot;
use super::sanitize::round_half_up;
use crate::error::AppError;
use serde::Serialize;

const DEFAULT_TIERS: [(&str, &str, u32); 10] = [
    ("OUTCAST", "#ffb86b", 0),
    ("THRALL", "#22d3ee", 300),
    ("MARAUDER", "#38bdf8", 600),
    ("HARBINGER", "#a78bfa", 900),
    ("REAPER", "#fb7185", 1200),
    ("ARCHON", "#fbbf24", 1500),
    ("OVERLORD", "#2dd4bf", 1800),
    ("MONARCH", "#60a5fa", 2100),
    ("SERAPH", "#e5e7eb", 2400),
    ("EIDOLON", "#ff3b3b", 2700),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankTier {
    pub name: String,
    pub color: String,
    pub min: u32,
}

impl RankTier {
    pub fn new(name: &str, color: &str, min: u32) -> Self {
        RankTier {
            name: name.to_string(),
            color: color.to_string(),
            min,
        }
    }

    /// Lowercase id used for theming, e.g. `outcast`.
    pub fn rank_id(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Where a rank-point total lands in the tier table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankInfo {
    pub tier_index: usize,
    pub tier_name: String,
    pub color: String,
    pub rank_id: String,
    pub current_rp: f64,
    /// Minimum of the next tier, or the current tier's own minimum at the top.
    pub next_threshold: u32,
    /// Progress toward the next tier in `[0, 1]`; 1 at the top tier.
    pub progress: f64,
}

impl RankInfo {
    pub fn rp_display(&self) -> String {
        format!("{}", round_half_up(self.current_rp) as i64)
    }

    pub fn progress_pct(&self) -> u32 {
        round_half_up(self.progress * 100.0) as u32
    }

    pub fn progress_width(&self) -> String {
        format!("{}%", self.progress_pct())
    }
}

/// Tiers sorted by strictly ascending minimum rank points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl RankTable {
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, AppError> {
        if tiers.is_empty() {
            return Err(AppError::RankTableError("at least one tier is required".to_string()));
        }
        if let Some(pair) = tiers.windows(2).find(|w| w[1].min <= w[0].min) {
            return Err(AppError::RankTableError(format!(
                "{} ({}) must have a higher minimum than {} ({})",
                pair[1].name, pair[1].min, pair[0].name, pair[0].min
            )));
        }
        Ok(RankTable { tiers })
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn tier_by_id(&self, rank_id: &str) -> Option<&RankTier> {
        self.tiers.iter().find(|t| t.rank_id() == rank_id)
    }

    /// Index of the highest tier whose minimum is at or below `rp`; the first
    /// tier when none qualifies.
    pub fn tier_index_for(&self, rp: f64) -> usize {
        let mut index = 0;
        for (i, tier) in self.tiers.iter().enumerate() {
            if rp >= tier.min as f64 {
                index = i;
            }
        }
        index
    }

    pub fn resolve(&self, current_rp: f64) -> RankInfo {
        let index = self.tier_index_for(current_rp);
        let current = &self.tiers[index];
        let next = self.tiers.get(index + 1);

        let progress = match next {
            Some(next) => {
                let span = (next.min as f64 - current.min as f64).max(1.0);
                ((current_rp - current.min as f64) / span).clamp(0.0, 1.0)
            }
            None => 1.0,
        };

        RankInfo {
            tier_index: index,
            tier_name: current.name.clone(),
            color: current.color.clone(),
            rank_id: current.rank_id(),
            current_rp,
            next_threshold: next.map(|t| t.min).unwrap_or(current.min),
            progress,
        }
    }
}

impl Default for RankTable {
    fn default() -> Self {
        RankTable {
            tiers: DEFAULT_TIERS
                .iter()
                .map(|(name, color, min)| RankTier::new(name, color, *min))
                .collect(),
        }
    }
}

/// Total rank points for a snapshot: `start_rp` plus the summed deltas,
/// floored at 0 and reset to 0 when not finite.
pub fn current_rp(snapshot: &AggregateSnapshot, start_rp: f64) -> f64 {
    let rp = start_rp + snapshot.sum_rp;
    if !rp.is_finite() || rp < 0.0 {
        0.0
    } else {
        rp
    }
}

pub fn resolve_rank(snapshot: &AggregateSnapshot, table: &RankTable, start_rp: f64) -> RankInfo {
    table.resolve(current_rp(snapshot, start_rp))
}
