//! Convenience result type alias for hookline.

use crate::error::HookError;

/// A specialized `Result` type for registry and dispatch operations.
pub type HookResult<T> = Result<T, HookError>;
