//! Hook dispatcher — runs a tag's callbacks in priority order.
//!
//! Two entry points share one apply routine:
//! - `filter`: filter records receive the running value as their first
//!   argument and their return value replaces it; event records are invoked
//!   for side effects only. The final value is returned.
//! - `trigger`: every record is invoked for side effects only; nothing is
//!   returned.
//!
//! A callback returning the stop signal ends the dispatch: no further
//! callback runs, in this priority group or any later one, and the
//! accumulator becomes the signal's value.

use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tracing::{debug, trace, warn};

use hookline_core::config::hooks::HooksConfig;
use hookline_core::error::HookError;
use hookline_core::result::HookResult;

use crate::debug::{CallLog, DebugCall, DispatchKind};
use crate::registry::{HookRegistry, PriorityGroup};
use crate::signal::CallbackError;
use crate::symbols::SymbolTable;

/// Dispatches tags to their registered callbacks.
#[derive(Debug)]
pub struct HookDispatcher {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Named functions and static methods.
    symbols: Arc<SymbolTable>,
    /// Whether calls are recorded in the call log.
    debug: AtomicBool,
    /// Whether unresolvable callbacks are skipped (true) or fatal (false).
    ignore_nonexistent_callbacks: AtomicBool,
    /// Recorded calls while debugging.
    call_log: CallLog,
}

impl HookDispatcher {
    /// Creates a new hook dispatcher with debugging off and unresolvable
    /// callbacks skipped.
    pub fn new(registry: Arc<HookRegistry>, symbols: Arc<SymbolTable>) -> Self {
        Self::with_config(registry, symbols, &HooksConfig::default())
    }

    /// Creates a hook dispatcher with toggles taken from configuration.
    pub fn with_config(
        registry: Arc<HookRegistry>,
        symbols: Arc<SymbolTable>,
        config: &HooksConfig,
    ) -> Self {
        Self {
            registry,
            symbols,
            debug: AtomicBool::new(config.debug),
            ignore_nonexistent_callbacks: AtomicBool::new(config.ignore_nonexistent_callbacks),
            call_log: CallLog::new(),
        }
    }

    /// Runs the filters of `tag` over `value` and returns the result.
    ///
    /// An unregistered tag returns `value` unchanged without invoking
    /// anything.
    #[track_caller]
    pub fn filter(&self, tag: &str, value: Value) -> HookResult<Value> {
        self.filter_with(tag, value, &[])
    }

    /// Like [`filter`](Self::filter), passing `extra` after the running value
    /// to every callback.
    #[track_caller]
    pub fn filter_with(&self, tag: &str, value: Value, extra: &[Value]) -> HookResult<Value> {
        let groups = self.registry.sorted_groups(tag);
        self.record_call(DispatchKind::Filter, tag, groups.is_some(), Location::caller());

        let Some(groups) = groups else {
            return Ok(value);
        };

        let mut args = Vec::with_capacity(extra.len() + 1);
        args.push(value);
        args.extend_from_slice(extra);

        let accumulator = self.apply(tag, &groups, args, true)?;
        Ok(accumulator.unwrap_or_default())
    }

    /// Notifies every callback of `tag`. Return values are ignored.
    #[track_caller]
    pub fn trigger(&self, tag: &str, args: &[Value]) -> HookResult<()> {
        let groups = self.registry.sorted_groups(tag);
        self.record_call(DispatchKind::Trigger, tag, groups.is_some(), Location::caller());

        let Some(groups) = groups else {
            return Ok(());
        };

        self.apply(tag, &groups, args.to_vec(), false)?;
        Ok(())
    }

    fn apply(
        &self,
        tag: &str,
        groups: &[PriorityGroup],
        mut args: Vec<Value>,
        filter_mode: bool,
    ) -> HookResult<Option<Value>> {
        debug!(
            tag = %tag,
            handler_count = groups.iter().map(|g| g.entries.len()).sum::<usize>(),
            filter_mode = filter_mode,
            "Dispatching hook"
        );

        'groups: for group in groups {
            for entry in &group.entries {
                let Some(invocable) = self.symbols.resolve(&entry.record.callback) else {
                    if self.ignore_nonexistent_callbacks() {
                        trace!(
                            tag = %tag,
                            priority = group.priority,
                            callback = %entry.id,
                            "Skipping callback without a target"
                        );
                        continue;
                    }
                    return Err(HookError::missing_callback(tag, entry.id.as_str()));
                };

                match invocable.invoke(&args) {
                    Ok(value) => {
                        if filter_mode && entry.record.is_filter {
                            if let Some(accumulator) = args.first_mut() {
                                *accumulator = value;
                            }
                        }
                    }
                    Err(CallbackError::Stop(signal)) => {
                        debug!(
                            tag = %tag,
                            priority = group.priority,
                            callback = %entry.id,
                            "Callback stopped hook processing"
                        );
                        let value = signal.into_value();
                        match args.first_mut() {
                            Some(accumulator) => *accumulator = value,
                            None => args.push(value),
                        }
                        break 'groups;
                    }
                    Err(CallbackError::Failed(err)) => {
                        warn!(
                            tag = %tag,
                            priority = group.priority,
                            callback = %entry.id,
                            error = %err,
                            "Hook callback failed"
                        );
                        return Err(HookError::Callback(err));
                    }
                }
            }
        }

        Ok(args.into_iter().next())
    }

    fn record_call(&self, kind: DispatchKind, tag: &str, found: bool, location: &Location<'_>) {
        if self.debug_enabled() {
            self.call_log
                .record(DebugCall::new(kind, tag, found, location));
        }
    }

    /// Enables or disables the debug call log.
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Returns whether calls are being recorded.
    pub fn debug_enabled(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Sets whether unresolvable callbacks are skipped (`true`) or fail the
    /// dispatch (`false`).
    pub fn set_ignore_nonexistent_callbacks(&self, ignore: bool) {
        self.ignore_nonexistent_callbacks
            .store(ignore, Ordering::Relaxed);
    }

    /// Returns whether unresolvable callbacks are skipped.
    pub fn ignore_nonexistent_callbacks(&self) -> bool {
        self.ignore_nonexistent_callbacks.load(Ordering::Relaxed)
    }

    /// Returns a copy of the recorded calls, oldest first.
    pub fn debug_calls(&self) -> Vec<DebugCall> {
        self.call_log.calls()
    }

    /// Discards the recorded calls.
    pub fn clear_debug_calls(&self) {
        self.call_log.clear();
    }

    /// Returns a reference to the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Returns a reference to the symbol table.
    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::callback::Callback;
    use crate::registry::SYSTEM_PRIORITY;

    fn dispatcher() -> HookDispatcher {
        HookDispatcher::new(Arc::new(HookRegistry::new()), Arc::new(SymbolTable::new()))
    }

    #[test]
    fn test_unregistered_filter_returns_input() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.filter("missing", json!(7)).unwrap(), json!(7));
        assert!(dispatcher.trigger("missing", &[]).is_ok());
    }

    #[test]
    fn test_extra_arguments_are_passed_through() {
        let dispatcher = dispatcher();
        dispatcher.registry().add_filter(
            "price",
            Callback::closure(|args| {
                let base = args[0].as_i64().unwrap_or(0);
                let tax = args[1].as_i64().unwrap_or(0);
                Ok(json!(base + tax))
            }),
            SYSTEM_PRIORITY,
        );

        let result = dispatcher
            .filter_with("price", json!(100), &[json!(20)])
            .unwrap();
        assert_eq!(result, json!(120));
    }

    #[test]
    fn test_stop_in_trigger_without_arguments() {
        let dispatcher = dispatcher();
        dispatcher.registry().add_event(
            "boot",
            Callback::closure(|_| crate::signal::stop(json!("halt"))),
            SYSTEM_PRIORITY,
        );

        assert!(dispatcher.trigger("boot", &[]).is_ok());
    }

    #[test]
    fn test_config_toggles() {
        let config = HooksConfig {
            debug: true,
            ignore_nonexistent_callbacks: false,
        };
        let dispatcher = HookDispatcher::with_config(
            Arc::new(HookRegistry::new()),
            Arc::new(SymbolTable::new()),
            &config,
        );
        assert!(dispatcher.debug_enabled());
        assert!(!dispatcher.ignore_nonexistent_callbacks());

        dispatcher.set_debug(false);
        dispatcher.set_ignore_nonexistent_callbacks(true);
        assert!(!dispatcher.debug_enabled());
        assert!(dispatcher.ignore_nonexistent_callbacks());
    }

    #[test]
    fn test_debug_records_call_site() {
        let dispatcher = dispatcher();
        dispatcher.set_debug(true);
        dispatcher.registry().add_filter("title", Callback::closure(|a| Ok(a[0].clone())), 1);

        let line = line!() + 1;
        dispatcher.filter("title", json!("x")).unwrap();
        dispatcher.trigger("nobody", &[]).unwrap();

        let calls = dispatcher.debug_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].kind, DispatchKind::Filter);
        assert!(calls[0].found);
        assert_eq!(calls[0].line, line);
        assert!(calls[0].file.ends_with("dispatcher.rs"));
        assert_eq!(calls[1].kind, DispatchKind::Trigger);
        assert!(!calls[1].found);

        dispatcher.clear_debug_calls();
        dispatcher.set_debug(false);
        dispatcher.filter("title", json!("x")).unwrap();
        assert!(dispatcher.debug_calls().is_empty());
    }
}
