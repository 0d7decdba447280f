use super::sanitize::to_id_string;
use crate::config::FieldMap;
use crate::store::models::MatchRecord;

/// Keep the matches belonging to `season`, comparing ids as strings so a
/// numeric `2` matches `"2"`. With no season in effect the input is returned
/// as is.
pub fn filter_by_season(
    all: Vec<MatchRecord>,
    season: Option<&str>,
    fields: &FieldMap,
) -> Vec<MatchRecord> {
    let Some(season) = season else {
        return all;
    };

    all.into_iter()
        .filter(|m| to_id_string(m.field(&fields.season_id)) == season)
        .collect()
}
