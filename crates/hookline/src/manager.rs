//! Hook manager — wires the registry, symbol table and dispatcher together.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use hookline_core::config::hooks::HooksConfig;
use hookline_core::result::HookResult;

use crate::bulk::HookSpec;
use crate::callback::Callback;
use crate::debug::DebugCall;
use crate::dispatcher::HookDispatcher;
use crate::registry::{HookRegistry, RegistrySnapshot};
use crate::signal::CallbackResult;
use crate::symbols::SymbolTable;

/// Single entry point to the hook system.
///
/// Cheap to share behind an `Arc`; every method takes `&self`.
#[derive(Debug)]
pub struct HookManager {
    /// Hook registry.
    registry: Arc<HookRegistry>,
    /// Named functions and static methods.
    symbols: Arc<SymbolTable>,
    /// Hook dispatcher.
    dispatcher: Arc<HookDispatcher>,
}

impl HookManager {
    /// Creates a manager with default toggles.
    pub fn new() -> Self {
        Self::from_config(&HooksConfig::default())
    }

    /// Creates a manager with toggles taken from configuration.
    pub fn from_config(config: &HooksConfig) -> Self {
        let registry = Arc::new(HookRegistry::new());
        let symbols = Arc::new(SymbolTable::new());
        let dispatcher = Arc::new(HookDispatcher::with_config(
            registry.clone(),
            symbols.clone(),
            config,
        ));

        info!(
            debug = config.debug,
            ignore_nonexistent_callbacks = config.ignore_nonexistent_callbacks,
            "Hook manager initialized"
        );

        Self {
            registry,
            symbols,
            dispatcher,
        }
    }

    // ── Symbols ──

    /// Defines a named function callbacks can refer to by name.
    pub fn define_function<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> CallbackResult + Send + Sync + 'static,
    {
        self.symbols.define_function(name, f);
    }

    /// Defines a static method callbacks can refer to as `Class::method`.
    pub fn define_static<F>(&self, class: &str, method: &str, f: F)
    where
        F: Fn(&[Value]) -> CallbackResult + Send + Sync + 'static,
    {
        self.symbols.define_static(class, method, f);
    }

    // ── Registration ──

    /// See [`HookRegistry::add_filter`].
    pub fn add_filter(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.registry.add_filter(tag, callback, priority)
    }

    /// See [`HookRegistry::add_event`].
    pub fn add_event(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.registry.add_event(tag, callback, priority)
    }

    /// See [`HookRegistry::add_filters`].
    pub fn add_filters(&self, specs: impl IntoIterator<Item = HookSpec>) -> usize {
        self.registry.add_filters(specs)
    }

    /// See [`HookRegistry::add_events`].
    pub fn add_events(&self, specs: impl IntoIterator<Item = HookSpec>) -> usize {
        self.registry.add_events(specs)
    }

    /// See [`HookRegistry::remove_filter`].
    pub fn remove_filter(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.registry.remove_filter(tag, callback, priority)
    }

    /// See [`HookRegistry::remove_event`].
    pub fn remove_event(&self, tag: &str, callback: impl Into<Callback>, priority: i32) -> bool {
        self.registry.remove_event(tag, callback, priority)
    }

    /// See [`HookRegistry::remove_all_filters`].
    pub fn remove_all_filters(&self, tag: &str, priority: Option<i32>) -> bool {
        self.registry.remove_all_filters(tag, priority)
    }

    /// See [`HookRegistry::remove_all_events`].
    pub fn remove_all_events(&self, tag: &str, priority: Option<i32>) -> bool {
        self.registry.remove_all_events(tag, priority)
    }

    /// See [`HookRegistry::has_filter`].
    pub fn has_filter(&self, tag: &str) -> bool {
        self.registry.has_filter(tag)
    }

    /// See [`HookRegistry::has_event`].
    pub fn has_event(&self, tag: &str) -> bool {
        self.registry.has_event(tag)
    }

    /// See [`HookRegistry::find_filter`].
    pub fn find_filter(&self, tag: &str, callback: impl Into<Callback>) -> Option<i32> {
        self.registry.find_filter(tag, callback)
    }

    /// See [`HookRegistry::find_event`].
    pub fn find_event(&self, tag: &str, callback: impl Into<Callback>) -> Option<i32> {
        self.registry.find_event(tag, callback)
    }

    /// Removes every registration. Symbols and the call log are kept.
    pub fn clear(&self) {
        self.registry.clear();
    }

    /// See [`HookRegistry::snapshot`].
    pub fn snapshot(&self) -> RegistrySnapshot {
        self.registry.snapshot()
    }

    // ── Dispatch ──

    /// See [`HookDispatcher::filter`].
    #[track_caller]
    pub fn filter(&self, tag: &str, value: Value) -> HookResult<Value> {
        self.dispatcher.filter(tag, value)
    }

    /// See [`HookDispatcher::filter_with`].
    #[track_caller]
    pub fn filter_with(&self, tag: &str, value: Value, extra: &[Value]) -> HookResult<Value> {
        self.dispatcher.filter_with(tag, value, extra)
    }

    /// See [`HookDispatcher::trigger`].
    #[track_caller]
    pub fn trigger(&self, tag: &str, args: &[Value]) -> HookResult<()> {
        self.dispatcher.trigger(tag, args)
    }

    // ── Toggles ──

    /// Enables or disables the debug call log.
    pub fn set_debug(&self, enabled: bool) {
        self.dispatcher.set_debug(enabled);
    }

    /// Returns whether calls are being recorded.
    pub fn debug_enabled(&self) -> bool {
        self.dispatcher.debug_enabled()
    }

    /// Sets the policy for callbacks that no longer resolve to a target.
    pub fn set_ignore_nonexistent_callbacks(&self, ignore: bool) {
        self.dispatcher.set_ignore_nonexistent_callbacks(ignore);
    }

    /// Returns whether unresolvable callbacks are skipped.
    pub fn ignore_nonexistent_callbacks(&self) -> bool {
        self.dispatcher.ignore_nonexistent_callbacks()
    }

    /// Returns a copy of the debug call log.
    pub fn debug_calls(&self) -> Vec<DebugCall> {
        self.dispatcher.debug_calls()
    }

    // ── Accessors ──

    /// Returns a reference to the hook registry.
    pub fn registry(&self) -> &Arc<HookRegistry> {
        &self.registry
    }

    /// Returns a reference to the symbol table.
    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }

    /// Returns a reference to the hook dispatcher.
    pub fn dispatcher(&self) -> &Arc<HookDispatcher> {
        &self.dispatcher
    }
}

impl Default for HookManager {
    fn default() -> Self {
        Self::new()
    }
}
