//! Prelude for convenient imports.

pub use serde_json::{Value, json};

pub use hookline_core::{HookError, HookResult};

pub use crate::bulk::HookSpec;
pub use crate::callback::{Callback, HookTarget};
pub use crate::manager::HookManager;
pub use crate::registry::{HIGHEST_PRIORITY, LOWEST_PRIORITY, SYSTEM_PRIORITY};
pub use crate::signal::{CallbackError, CallbackResult, StopProcessing, stop};
