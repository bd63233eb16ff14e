//! Dispatcher configuration.

use serde::{Deserialize, Serialize};

/// Toggles applied to a freshly built hook manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HooksConfig {
    /// Record every `filter`/`trigger` call in the debug call log.
    #[serde(default)]
    pub debug: bool,
    /// Silently skip stored callbacks that no longer resolve to a target.
    /// When disabled, such a callback fails the dispatch call.
    #[serde(default = "default_true")]
    pub ignore_nonexistent_callbacks: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            debug: false,
            ignore_nonexistent_callbacks: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}
