//! Decides when the stats pipeline re-runs.
//!
//! The trigger starts `Uninitialized` and becomes `Idle` once the host
//! document is ready. From `Idle`, a change to one of the tracked store keys
//! or the document becoming visible again re-runs every subscribed callback.
//! `refresh_now` runs them unconditionally.

use crate::config::StorageKeys;
use log::{debug, info};

pub type SubscriptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    DocumentReady,
    /// Another context changed the store. `None` means the whole store was
    /// cleared, which carries no key.
    StorageChanged { key: Option<String> },
    VisibilityChanged { visible: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Uninitialized,
    Idle,
}

pub struct RefreshTrigger<'a> {
    tracked_keys: Vec<String>,
    state: TriggerState,
    subscribers: Vec<(SubscriptionId, Box<dyn FnMut() + 'a>)>,
    next_id: SubscriptionId,
}

impl<'a> RefreshTrigger<'a> {
    pub fn new(keys: &StorageKeys) -> Self {
        RefreshTrigger {
            tracked_keys: keys.all().iter().map(|k| k.to_string()).collect(),
            state: TriggerState::Uninitialized,
            subscribers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn subscribe(&mut self, callback: impl FnMut() + 'a) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Drop every subscription and go back to `Uninitialized`.
    pub fn teardown(&mut self) {
        self.subscribers.clear();
        self.state = TriggerState::Uninitialized;
    }

    /// Start listening. Runs the pipeline right away unless the document is
    /// still loading, in which case `Signal::DocumentReady` finishes the boot.
    /// Returns whether the pipeline ran.
    pub fn boot(&mut self, ready_state: ReadyState) -> bool {
        if self.state == TriggerState::Idle || ready_state == ReadyState::Loading {
            return false;
        }
        self.become_idle();
        true
    }

    /// Feed an environment signal in. Returns whether the pipeline ran.
    pub fn handle(&mut self, signal: &Signal) -> bool {
        match (self.state, signal) {
            (TriggerState::Uninitialized, Signal::DocumentReady) => {
                self.become_idle();
                true
            }
            (TriggerState::Uninitialized, _) | (TriggerState::Idle, Signal::DocumentReady) => false,
            (TriggerState::Idle, Signal::StorageChanged { key }) => match key.as_deref() {
                Some(key) if !key.is_empty() && self.tracked_keys.iter().any(|k| k == key) => {
                    info!("Store key {} changed, refreshing", key);
                    self.run_subscribers();
                    true
                }
                _ => {
                    debug!("Ignoring storage change for {:?}", key);
                    false
                }
            },
            (TriggerState::Idle, Signal::VisibilityChanged { visible }) => {
                if *visible {
                    info!("Visible again, refreshing");
                    self.run_subscribers();
                }
                *visible
            }
        }
    }

    /// Run the pipeline now, whatever the state.
    pub fn refresh_now(&mut self) {
        self.run_subscribers();
    }

    fn become_idle(&mut self) {
        self.state = TriggerState::Idle;
        self.run_subscribers();
    }

    fn run_subscribers(&mut self) {
        for (_, callback) in self.subscribers.iter_mut() {
            callback();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn changed(key: &str) -> Signal {
        Signal::StorageChanged {
            key: Some(key.to_string()),
        }
    }

    #[test]
    fn boots_immediately_when_document_is_interactive() {
        let runs = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        trigger.subscribe(|| runs.set(runs.get() + 1));

        assert!(trigger.boot(ReadyState::Interactive));
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert_eq!(runs.get(), 1);

        // A second boot or a late ready signal does not re-run.
        assert!(!trigger.boot(ReadyState::Complete));
        assert!(!trigger.handle(&Signal::DocumentReady));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn loading_document_waits_for_ready_signal() {
        let runs = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        trigger.subscribe(|| runs.set(runs.get() + 1));

        assert!(!trigger.boot(ReadyState::Loading));
        assert_eq!(trigger.state(), TriggerState::Uninitialized);
        assert!(!trigger.handle(&changed("bf6_ranked_matches_v1")));
        assert!(!trigger.handle(&Signal::VisibilityChanged { visible: true }));
        assert_eq!(runs.get(), 0);

        assert!(trigger.handle(&Signal::DocumentReady));
        assert_eq!(trigger.state(), TriggerState::Idle);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn only_tracked_keys_trigger_a_refresh() {
        let runs = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        trigger.subscribe(|| runs.set(runs.get() + 1));
        trigger.boot(ReadyState::Complete);

        assert!(trigger.handle(&changed("bf6_ranked_matches_v1")));
        assert!(trigger.handle(&changed("bf6_active_season_v1")));
        assert!(trigger.handle(&changed("bf6_selected_season_v1")));
        assert!(!trigger.handle(&changed("bf6_settings_v1")));
        assert!(!trigger.handle(&changed("")));
        assert!(!trigger.handle(&Signal::StorageChanged { key: None }));
        assert_eq!(runs.get(), 4);
    }

    #[test]
    fn becoming_visible_refreshes_but_hiding_does_not() {
        let runs = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        trigger.subscribe(|| runs.set(runs.get() + 1));
        trigger.boot(ReadyState::Complete);

        assert!(!trigger.handle(&Signal::VisibilityChanged { visible: false }));
        assert!(trigger.handle(&Signal::VisibilityChanged { visible: true }));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn manual_refresh_works_before_boot() {
        let runs = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        trigger.subscribe(|| runs.set(runs.get() + 1));

        trigger.refresh_now();
        assert_eq!(trigger.state(), TriggerState::Uninitialized);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn unsubscribe_and_teardown_stop_callbacks() {
        let first = Cell::new(0);
        let second = Cell::new(0);
        let mut trigger = RefreshTrigger::new(&StorageKeys::default());
        let id = trigger.subscribe(|| first.set(first.get() + 1));
        trigger.subscribe(|| second.set(second.get() + 1));
        trigger.boot(ReadyState::Complete);

        assert!(trigger.unsubscribe(id));
        assert!(!trigger.unsubscribe(id));
        trigger.refresh_now();
        assert_eq!((first.get(), second.get()), (1, 2));

        trigger.teardown();
        assert_eq!(trigger.state(), TriggerState::Uninitialized);
        trigger.refresh_now();
        assert_eq!(second.get(), 2);
    }
}
