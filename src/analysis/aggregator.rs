use super::sanitize::{clamp_field, fmt1, is_truthy, round_half_up, safe_num, to_number};
use crate::config::FieldMap;
use crate::store::models::MatchRecord;
use serde::Serialize;

const PLACE_RANGE: (f64, f64) = (1.0, 25.0);
const STAT_RANGE: (f64, f64) = (0.0, 999.0);

/// Running sums over one filtered set of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateSnapshot {
    pub total: usize,
    pub wins: usize,
    pub sum_kills: f64,
    pub sum_assists: f64,
    pub sum_deaths: f64,
    pub mvp_count: usize,
    pub sum_rp: f64, // unclamped, invalid deltas count as 0
}

/// The five headline numbers, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubMetrics {
    pub win_rate: u32,
    pub total: usize,
    pub kda: String,
    pub avg_kills: String,
    pub mvp_pct: u32,
}

impl HubMetrics {
    pub fn empty() -> Self {
        HubMetrics {
            win_rate: 0,
            total: 0,
            kda: "0.0".to_string(),
            avg_kills: "0.0".to_string(),
            mvp_pct: 0,
        }
    }
}

impl AggregateSnapshot {
    pub fn new() -> Self {
        AggregateSnapshot::default()
    }

    pub fn add_match(&mut self, record: &MatchRecord, fields: &FieldMap) {
        let place = clamp_field(record.field(&fields.place), PLACE_RANGE.0, PLACE_RANGE.1);
        let kills = clamp_field(record.field(&fields.kills), STAT_RANGE.0, STAT_RANGE.1);
        let assists = clamp_field(record.field(&fields.assists), STAT_RANGE.0, STAT_RANGE.1);
        let deaths = clamp_field(record.field(&fields.deaths), STAT_RANGE.0, STAT_RANGE.1);

        self.total += 1;
        if place == 1.0 {
            self.wins += 1;
        }
        self.sum_kills += kills;
        self.sum_assists += assists;
        self.sum_deaths += deaths;
        if is_truthy(record.field(&fields.mvp)) {
            self.mvp_count += 1;
        }
        self.sum_rp += safe_num(to_number(record.field(&fields.rp)), 0.0);
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn win_rate(&self) -> u32 {
        self.percent_of_total(self.wins)
    }

    pub fn mvp_pct(&self) -> u32 {
        self.percent_of_total(self.mvp_count)
    }

    /// Kills plus half the assists over deaths, with the denominator floored at 1.
    pub fn kda(&self) -> f64 {
        (self.sum_kills + 0.5 * self.sum_assists) / self.sum_deaths.max(1.0)
    }

    pub fn avg_kills(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.sum_kills / self.total as f64
        }
    }

    pub fn metrics(&self) -> HubMetrics {
        if self.is_empty() {
            return HubMetrics::empty();
        }

        HubMetrics {
            win_rate: self.win_rate(),
            total: self.total,
            kda: fmt1(self.kda()),
            avg_kills: fmt1(self.avg_kills()),
            mvp_pct: self.mvp_pct(),
        }
    }

    fn percent_of_total(&self, count: usize) -> u32 {
        if self.total == 0 {
            0
        } else {
            round_half_up(count as f64 / self.total as f64 * 100.0) as u32
        }
    }
}

pub fn aggregate(matches: &[MatchRecord], fields: &FieldMap) -> AggregateSnapshot {
    let mut snapshot = AggregateSnapshot::new();
    for record in matches {
        snapshot.add_match(record, fields);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<MatchRecord> {
        values.into_iter().map(MatchRecord::from_value).collect()
    }

    #[test]
    fn empty_set_reports_zeroes_with_decimal_ratios() {
        let metrics = aggregate(&[], &FieldMap::default()).metrics();
        assert_eq!(metrics, HubMetrics::empty());
        assert_eq!(metrics.kda, "0.0");
        assert_eq!(metrics.avg_kills, "0.0");
    }

    #[test]
    fn zero_deaths_do_not_inflate_kda() {
        let snapshot = aggregate(
            &records(vec![json!({"place": 3, "kills": 10, "deaths": 0})]),
            &FieldMap::default(),
        );
        assert_eq!(snapshot.kda(), 10.0);
        assert_eq!(snapshot.metrics().kda, "10.0");
    }

    #[test]
    fn wins_are_first_place_after_clamping() {
        let snapshot = aggregate(
            &records(vec![
                json!({"place": 1}),
                json!({"place": -3}),
                json!({}),
                json!({"place": 2}),
            ]),
            &FieldMap::default(),
        );
        // -3 clamps up to 1 and a missing place defaults to 1.
        assert_eq!(snapshot.wins, 3);
        assert_eq!(snapshot.win_rate(), 75);
    }

    #[test]
    fn stats_are_clamped_and_defaulted() {
        let snapshot = aggregate(
            &records(vec![
                json!({"kills": 5000, "assists": -2, "deaths": "x"}),
                json!(null),
                json!({"kills": "7", "assists": 3, "deaths": 2}),
            ]),
            &FieldMap::default(),
        );
        assert_eq!(snapshot.total, 3);
        assert_eq!(snapshot.sum_kills, 1006.0);
        assert_eq!(snapshot.sum_assists, 3.0);
        assert_eq!(snapshot.sum_deaths, 2.0);
    }

    #[test]
    fn mvp_and_rp_use_coercion() {
        let snapshot = aggregate(
            &records(vec![
                json!({"mvp": true, "rp": 40}),
                json!({"mvp": 0, "rp": "-15"}),
                json!({"mvp": "yes", "rp": "bogus"}),
                json!({"mvp": null}),
            ]),
            &FieldMap::default(),
        );
        assert_eq!(snapshot.mvp_count, 2);
        assert_eq!(snapshot.mvp_pct(), 50);
        assert_eq!(snapshot.sum_rp, 25.0);
    }

    #[test]
    fn win_rate_stays_within_percent_bounds() {
        for total in 1..=12usize {
            for wins in 0..=total {
                let mut values = Vec::new();
                for i in 0..total {
                    let place = if i < wins { 1 } else { 4 };
                    values.push(json!({ "place": place }));
                }
                let rate = aggregate(&records(values), &FieldMap::default()).win_rate();
                assert!(rate <= 100, "{}/{} gave {}", wins, total, rate);
            }
        }
    }

    #[test]
    fn custom_field_names_are_honoured() {
        let fields = FieldMap {
            kills: "k".to_string(),
            ..FieldMap::default()
        };
        let snapshot = aggregate(&records(vec![json!({"k": 9, "kills": 1})]), &fields);
        assert_eq!(snapshot.sum_kills, 9.0);
    }
}
