//! Read-only access to the key-value store holding match history and the
//! season selectors.
//!
//! Reads never fail: a missing key is `None`, and a match list that is not
//! valid JSON (or not an array) reads as empty.

pub mod file;
pub mod memory;
pub mod models;

use crate::config::StorageKeys;
use log::debug;
use models::MatchRecord;
use serde_json::Value;

/// A string-valued key-value store, e.g. a directory of files or browser
/// local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

pub fn load_matches<S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
) -> Vec<MatchRecord> {
    let raw = match store.get(&keys.matches) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Vec::new(),
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items.into_iter().map(MatchRecord::from_value).collect(),
        Ok(other) => {
            debug!(
                "{} holds a JSON {} instead of a list, treating as empty",
                keys.matches,
                json_kind(&other)
            );
            Vec::new()
        }
        Err(e) => {
            debug!("Failed to parse {}: {}, treating as empty", keys.matches, e);
            Vec::new()
        }
    }
}

pub fn active_season_id<S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
) -> Option<String> {
    store.get(&keys.active_season).filter(|v| !v.is_empty())
}

/// The season being viewed, falling back to the active season.
pub fn selected_season_id<S: KeyValueStore + ?Sized>(
    store: &S,
    keys: &StorageKeys,
) -> Option<String> {
    store
        .get(&keys.selected_season)
        .filter(|v| !v.is_empty())
        .or_else(|| active_season_id(store, keys))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
