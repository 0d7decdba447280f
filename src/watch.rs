//! Polls the tracked keys and turns on-disk edits into storage-change signals.

use crate::config::StorageKeys;
use crate::refresh::{RefreshTrigger, Signal};
use crate::store::KeyValueStore;
use std::thread;
use std::time::Duration;

/// Remembers the last value seen for each tracked key.
#[derive(Debug, Clone)]
pub struct StoreWatcher {
    last_seen: Vec<(String, Option<String>)>,
}

impl StoreWatcher {
    /// Start from the store's current contents so the first poll reports only
    /// later edits.
    pub fn new<S: KeyValueStore + ?Sized>(keys: &StorageKeys, store: &S) -> Self {
        StoreWatcher {
            last_seen: keys
                .all()
                .iter()
                .map(|key| (key.to_string(), store.get(key)))
                .collect(),
        }
    }

    pub fn poll<S: KeyValueStore + ?Sized>(&mut self, store: &S) -> Vec<Signal> {
        let mut signals = Vec::new();
        for (key, last) in self.last_seen.iter_mut() {
            let current = store.get(key);
            if current != *last {
                *last = current;
                signals.push(Signal::StorageChanged {
                    key: Some(key.clone()),
                });
            }
        }
        signals
    }
}

/// Poll `store` every `interval`, feeding changes into `trigger`. Stops after
/// `max_polls` polls, or never when it is `None`. Returns how many refreshes ran.
pub fn watch<S: KeyValueStore + ?Sized>(
    store: &S,
    watcher: &mut StoreWatcher,
    trigger: &mut RefreshTrigger<'_>,
    interval: Duration,
    max_polls: Option<u64>,
) -> u64 {
    let mut polls = 0;
    let mut refreshes = 0;

    while max_polls.map_or(true, |max| polls < max) {
        thread::sleep(interval);
        polls += 1;

        // Several keys changing in one interval only needs one refresh.
        let signals = watcher.poll(store);
        if let Some(signal) = signals.first() {
            if trigger.handle(signal) {
                refreshes += 1;
            }
        }
    }

    refreshes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[test]
    fn reports_each_changed_key_once() {
        let keys = StorageKeys::default();
        let mut store = MemoryStore::new().with(&keys.active_season, "S1");
        let mut watcher = StoreWatcher::new(&keys, &store);

        assert!(watcher.poll(&store).is_empty());

        store.insert(&keys.matches, "[]");
        store.remove(&keys.active_season);
        let signals = watcher.poll(&store);
        assert_eq!(
            signals,
            vec![
                Signal::StorageChanged {
                    key: Some(keys.matches.clone())
                },
                Signal::StorageChanged {
                    key: Some(keys.active_season.clone())
                },
            ]
        );

        assert!(watcher.poll(&store).is_empty());
    }

    #[test]
    fn unchanged_store_never_refreshes() {
        let keys = StorageKeys::default();
        let store = MemoryStore::new().with(&keys.matches, "[]");
        let mut watcher = StoreWatcher::new(&keys, &store);
        let mut trigger = RefreshTrigger::new(&keys);
        trigger.boot(crate::refresh::ReadyState::Complete);

        let refreshes = watch(&store, &mut watcher, &mut trigger, Duration::ZERO, Some(3));
        assert_eq!(refreshes, 0);
    }
}
