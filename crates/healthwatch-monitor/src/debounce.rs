//! Notification debouncer.
//!
//! Decides which observations turn into notifications. Recovery (`FINE`) is
//! reported on its first occurrence. A negative value is reported once, on
//! its second consecutive occurrence, so a single bad sample never alerts and
//! sustained badness does not repeat.

#[cfg(test)]
#[path = "debounce_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::alert_manager::AlertManager;
use crate::alerts::Notification;
use crate::state::{Observation, StateKey, StateValue};

/// Consecutive occurrences a negative value needs before it is reported.
pub const NEGATIVE_FIRE_COUNT: u32 = 2;
/// Consecutive occurrences a positive value needs before it is reported.
pub const POSITIVE_FIRE_COUNT: u32 = 1;

/// Debounce track for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceState {
    /// Last observed value.
    pub last_value: StateValue,
    /// Consecutive observations of `last_value`.
    pub count: u32,
}

/// Per-key debounce states.
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<StateKey, DebounceState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation and return whether it should be reported.
    pub fn record(&mut self, key: &StateKey, value: StateValue) -> bool {
        let state = self.states.entry(key.clone()).or_insert(DebounceState {
            last_value: value,
            count: 0,
        });

        if state.last_value == value {
            state.count = state.count.saturating_add(1);
        } else {
            state.last_value = value;
            state.count = 1;
        }

        let threshold = if value.is_negative() {
            NEGATIVE_FIRE_COUNT
        } else {
            POSITIVE_FIRE_COUNT
        };
        state.count == threshold
    }

    /// Current state of a key.
    pub fn get(&self, key: &StateKey) -> Option<DebounceState> {
        self.states.get(key).copied()
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Debouncer owning the state store and the notification sink.
pub struct Debouncer {
    store: Mutex<StateStore>,
    alerts: Arc<AlertManager>,
}

impl Debouncer {
    pub fn new(alerts: Arc<AlertManager>) -> Self {
        Self {
            store: Mutex::new(StateStore::new()),
            alerts,
        }
    }

    /// Record an observation and deliver a notification if it fires.
    ///
    /// Delivery failures are logged by the alert manager and do not roll back
    /// the recorded state.
    pub async fn observe(&self, observation: &Observation) -> bool {
        let key = observation.key();
        let fire = self.store.lock().record(&key, observation.value);

        if !fire {
            debug!(key = %key, value = %observation.value, "Notification suppressed");
            return false;
        }

        let notification = Notification::from_observation(observation);
        self.alerts.send(&notification).await;
        true
    }

    /// Current state of a key.
    pub fn state(&self, key: &StateKey) -> Option<DebounceState> {
        self.store.lock().get(key)
    }

    /// Number of tracked keys.
    pub fn tracked_keys(&self) -> usize {
        self.store.lock().len()
    }
}
