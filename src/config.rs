use crate::analysis::rank::RankTable;
use crate::error::AppError;
use std::env;
use std::path::PathBuf;

/// Names of the three tracked keys in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub matches: String,
    pub active_season: String,
    pub selected_season: String,
}

impl StorageKeys {
    pub fn all(&self) -> [&str; 3] {
        [
            self.matches.as_str(),
            self.active_season.as_str(),
            self.selected_season.as_str(),
        ]
    }

    pub fn tracks(&self, key: &str) -> bool {
        self.all().contains(&key)
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        StorageKeys {
            matches: "bf6_ranked_matches_v1".to_string(),
            active_season: "bf6_active_season_v1".to_string(),
            selected_season: "bf6_selected_season_v1".to_string(),
        }
    }
}

/// Field names used to read values out of a stored match object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    pub place: String,
    pub kills: String,
    pub assists: String,
    pub deaths: String,
    pub mvp: String,
    pub season_id: String,
    pub rp: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        FieldMap {
            place: "place".to_string(),
            kills: "kills".to_string(),
            assists: "assists".to_string(),
            deaths: "deaths".to_string(),
            mvp: "mvp".to_string(),
            season_id: "seasonId".to_string(),
            rp: "rp".to_string(),
        }
    }
}

/// Ids of the display targets the renderer writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTargets {
    pub win_rate: String,
    pub total: String,
    pub kda: String,
    pub avg_kills: String,
    pub mvp: String,
    pub rank_name: String,
    pub current_rp: String,
    pub next_rp: String,
    pub progress_fill: String,
    pub theme_attribute: String,
}

impl DisplayTargets {
    pub fn metric_ids(&self) -> [&str; 5] {
        [
            self.win_rate.as_str(),
            self.total.as_str(),
            self.kda.as_str(),
            self.avg_kills.as_str(),
            self.mvp.as_str(),
        ]
    }

    pub fn rank_ids(&self) -> [&str; 3] {
        [
            self.rank_name.as_str(),
            self.current_rp.as_str(),
            self.next_rp.as_str(),
        ]
    }
}

impl Default for DisplayTargets {
    fn default() -> Self {
        DisplayTargets {
            win_rate: "mWinRate".to_string(),
            total: "mTotal".to_string(),
            kda: "mKDA".to_string(),
            avg_kills: "mAvgKills".to_string(),
            mvp: "mMVP".to_string(),
            rank_name: "uiRankName".to_string(),
            current_rp: "uiRR".to_string(),
            next_rp: "uiNextRR".to_string(),
            progress_fill: "uiProgFill".to_string(),
            theme_attribute: "data-rank".to_string(),
        }
    }
}

/// Everything the stats pipeline needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub data_dir: PathBuf,
    pub keys: StorageKeys,
    pub fields: FieldMap,
    pub targets: DisplayTargets,
    pub rank_table: RankTable,
    pub start_rp: f64,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            data_dir: default_data_dir(),
            keys: StorageKeys::default(),
            fields: FieldMap::default(),
            targets: DisplayTargets::default(),
            rank_table: RankTable::default(),
            start_rp: 0.0,
        }
    }
}

impl HubConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        HubConfig::from_lookup(|var| env::var(var).ok())
    }

    /// Apply `HUB_*` overrides read through `lookup` on top of the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = HubConfig::default();

        if let Some(dir) = lookup("HUB_STATS_DIR") {
            config.data_dir = PathBuf::from(non_empty("HUB_STATS_DIR", dir)?);
        }
        if let Some(key) = lookup("HUB_MATCHES_KEY") {
            config.keys.matches = non_empty("HUB_MATCHES_KEY", key)?;
        }
        if let Some(key) = lookup("HUB_ACTIVE_SEASON_KEY") {
            config.keys.active_season = non_empty("HUB_ACTIVE_SEASON_KEY", key)?;
        }
        if let Some(key) = lookup("HUB_SELECTED_SEASON_KEY") {
            config.keys.selected_season = non_empty("HUB_SELECTED_SEASON_KEY", key)?;
        }
        if let Some(raw) = lookup("HUB_START_RP") {
            config.start_rp = parse_start_rp(&raw)?;
        }

        Ok(config)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".hub_stats")
}

fn non_empty(var: &str, value: String) -> Result<String, AppError> {
    if value.trim().is_empty() {
        Err(AppError::ConfigError(format!("{} must not be empty", var)))
    } else {
        Ok(value)
    }
}

fn parse_start_rp(raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            AppError::ConfigError(format!(
                "HUB_START_RP must be a finite number, got {:?}",
                raw
            ))
        })
}
