//! Identity resolver: deterministic ids for callback representations.
//!
//! | Representation | Id |
//! |----------------|----|
//! | `Function("name")` | `name` |
//! | `Static { class, method }` | `Class::method` |
//! | `Method { target, method }` | `<instance token>-><method>` |
//! | `Closure(f)` | `<instance token>` |
//!
//! The instance token is the address of the shared allocation, so it is
//! stable for as long as the instance is alive (the registry keeps it alive)
//! and shared by every clone of the same `Arc`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::callback::Callback;

/// Separator between class and method in static callback names.
pub const STATIC_SEPARATOR: &str = "::";

/// Deterministic identity of a callback representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackId(String);

impl CallbackId {
    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rewrites a `"Class::method"` function name into its static pair form.
///
/// Names that do not split into exactly two halves are left untouched so that
/// [`resolve`] rejects them. Idempotent.
pub fn normalize(callback: Callback) -> Callback {
    match callback {
        Callback::Function(name) if name.contains(STATIC_SEPARATOR) => {
            let mut parts = name.split(STATIC_SEPARATOR);
            match (parts.next(), parts.next(), parts.next()) {
                (Some(class), Some(method), None) => Callback::Static {
                    class: class.to_string(),
                    method: method.to_string(),
                },
                _ => Callback::Function(name),
            }
        }
        other => other,
    }
}

/// Computes the id of a (normalized) callback.
///
/// Returns `None` for malformed representations: empty names, or a function
/// name that still contains `::` after normalization.
pub fn resolve(callback: &Callback) -> Option<CallbackId> {
    let id = match callback {
        Callback::Function(name) => {
            if name.is_empty() || name.contains(STATIC_SEPARATOR) {
                return None;
            }
            name.clone()
        }
        Callback::Static { class, method } => {
            if class.is_empty() || method.is_empty() {
                return None;
            }
            format!("{class}{STATIC_SEPARATOR}{method}")
        }
        Callback::Method { target, method } => {
            if method.is_empty() {
                return None;
            }
            format!("{}->{}", object_token(target), method)
        }
        Callback::Closure(f) => object_token(f),
    };

    Some(CallbackId(id))
}

/// Normalizes then resolves in one step, as every registry path does.
pub fn normalize_and_resolve(callback: Callback) -> (Callback, Option<CallbackId>) {
    let callback = normalize(callback);
    let id = resolve(&callback);
    (callback, id)
}

/// Per-instance identity token.
fn object_token<T: ?Sized>(instance: &Arc<T>) -> String {
    format!("{:016x}", Arc::as_ptr(instance) as *const () as usize)
}
