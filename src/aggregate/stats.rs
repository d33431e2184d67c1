//! Per-run statistics.
//!
//! Tracks how the snapshot's stakes were classified and why lookups failed,
//! for the summary logged at the end of a run.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use crate::stake::StakeState;

/// Counters for one pipeline run.
///
/// Every `StakeState` is present from construction so the summary always
/// lists all states.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Records in the snapshot
    pub total_nodes: usize,
    /// Records kept by the filter policy
    pub selected_nodes: usize,
    states: HashMap<StakeState, usize>,
    lookup_failures: HashMap<String, usize>,
}

impl RunStats {
    pub fn new() -> Self {
        let mut states = HashMap::new();
        for state in StakeState::iter() {
            states.insert(state, 0);
        }

        RunStats {
            total_nodes: 0,
            selected_nodes: 0,
            states,
            lookup_failures: HashMap::new(),
        }
    }

    pub fn record_state(&mut self, state: StakeState) {
        *self.states.entry(state).or_insert(0) += 1;
    }

    pub fn record_lookup_failure(&mut self, error: &str) {
        *self.lookup_failures.entry(error.to_string()).or_insert(0) += 1;
    }

    pub fn state_count(&self, state: StakeState) -> usize {
        self.states.get(&state).copied().unwrap_or(0)
    }

    pub fn lookup_failure_count(&self, error: &str) -> usize {
        self.lookup_failures.get(error).copied().unwrap_or(0)
    }

    pub fn total_lookup_failures(&self) -> usize {
        self.lookup_failures.values().sum()
    }

    /// Logs the run summary: totals at info level, per-state and per-error
    /// breakdowns at debug level.
    pub fn log_summary(&self) {
        log::info!(
            "Selected {} of {} nodes ({} lookup failures)",
            self.selected_nodes,
            self.total_nodes,
            self.total_lookup_failures()
        );

        for state in StakeState::iter() {
            let count = self.state_count(state);
            if count > 0 {
                log::debug!("  {}: {}", state, count);
            }
        }

        let mut failures: Vec<_> = self.lookup_failures.iter().collect();
        failures.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        for (error, count) in failures {
            log::debug!("  lookup error '{}': {}", error, count);
        }
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}
