//! Bulk registration helpers.
//!
//! These only desugar into [`HookRegistry::add_filter`] /
//! [`HookRegistry::add_event`]; they carry no extra semantics.

use tracing::debug;

use crate::callback::Callback;
use crate::registry::{HookRegistry, SYSTEM_PRIORITY};

/// One registration request.
#[derive(Debug, Clone)]
pub struct HookSpec {
    /// Tag to register under.
    pub tag: String,
    /// Callback to register.
    pub callback: Callback,
    /// Priority (lower = runs earlier).
    pub priority: i32,
}

impl HookSpec {
    /// Creates a request at the default priority.
    pub fn new(tag: impl Into<String>, callback: impl Into<Callback>) -> Self {
        Self {
            tag: tag.into(),
            callback: callback.into(),
            priority: SYSTEM_PRIORITY,
        }
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl HookRegistry {
    /// Registers every spec as a filter. Returns how many were accepted;
    /// malformed callbacks are skipped.
    pub fn add_filters(&self, specs: impl IntoIterator<Item = HookSpec>) -> usize {
        self.add_all(specs, true)
    }

    /// Registers every spec as an event. Returns how many were accepted;
    /// malformed callbacks are skipped.
    pub fn add_events(&self, specs: impl IntoIterator<Item = HookSpec>) -> usize {
        self.add_all(specs, false)
    }

    fn add_all(&self, specs: impl IntoIterator<Item = HookSpec>, is_filter: bool) -> usize {
        let mut requested = 0;
        let mut accepted = 0;
        for spec in specs {
            requested += 1;
            if self.add(&spec.tag, spec.callback, spec.priority, is_filter) {
                accepted += 1;
            }
        }

        debug!(requested, accepted, is_filter, "Bulk hook registration");
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_filters() {
        let registry = HookRegistry::new();
        let accepted = registry.add_filters([
            HookSpec::new("app.pre", "boot"),
            HookSpec::new("app.pre2", "Loader::run"),
            HookSpec::new("app.pre3", "warm").with_priority(95),
            HookSpec::new("app.pre4", ""),
        ]);

        assert_eq!(accepted, 3);
        assert_eq!(registry.find_filter("app.pre", "boot"), Some(SYSTEM_PRIORITY));
        assert_eq!(
            registry.find_filter("app.pre2", Callback::static_method("Loader", "run")),
            Some(SYSTEM_PRIORITY)
        );
        assert_eq!(registry.find_filter("app.pre3", "warm"), Some(95));
        assert!(!registry.has_filter("app.pre4"));
    }

    #[test]
    fn test_bulk_events_are_not_filters() {
        let registry = HookRegistry::new();
        registry.add_events(vec![HookSpec::new("saved", "notify")]);

        let groups = registry.sorted_groups("saved").unwrap();
        assert!(!groups[0].entries[0].record.is_filter);
    }
}
