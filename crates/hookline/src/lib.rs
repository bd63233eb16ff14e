//! # hookline
//!
//! In-process hooks registry. Provides:
//!
//! - Registration of callbacks against named tags, ordered by priority and
//!   deduplicated by callback identity
//! - Filter dispatch (each callback transforms a running value) and event
//!   dispatch (callbacks are notified only)
//! - A stop signal that ends a dispatch early with a replacement value
//! - An optional debug call log plus plain-text renderers

pub mod bulk;
pub mod callback;
pub mod debug;
pub mod dispatcher;
pub mod identity;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod render;
pub mod signal;
pub mod symbols;

pub use bulk::HookSpec;
pub use callback::{Callback, HookTarget};
pub use dispatcher::HookDispatcher;
pub use identity::CallbackId;
pub use manager::HookManager;
pub use registry::{HIGHEST_PRIORITY, HookRegistry, LOWEST_PRIORITY, SYSTEM_PRIORITY};
pub use signal::{CallbackError, CallbackResult, StopProcessing, stop};
pub use symbols::SymbolTable;

pub use hookline_core::{HookError, HookResult};
