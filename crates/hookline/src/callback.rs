//! Callback representations.
//!
//! A callback is stored as a *representation*, not a bare function pointer:
//! named functions and static methods are looked up in the
//! [`SymbolTable`](crate::symbols::SymbolTable) at dispatch time, bound
//! methods go through the [`HookTarget`] trait, and closures are invoked
//! directly. Each variant has its own identity rule (see
//! [`identity`](crate::identity)).

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::signal::CallbackResult;

/// Signature shared by every invocable callback body.
pub type HookFn = dyn Fn(&[Value]) -> CallbackResult + Send + Sync;

/// An object whose methods can be registered as callbacks.
///
/// The instance identity (not its type) is part of the callback id, so two
/// instances of the same type registering the same method are distinct
/// registrations.
pub trait HookTarget: Send + Sync {
    /// Type name used when listing registrations.
    fn class_name(&self) -> &str;

    /// Returns whether `method` can currently be invoked on this target.
    fn has_method(&self, method: &str) -> bool;

    /// Invokes `method` with the current argument list.
    fn call_method(&self, method: &str, args: &[Value]) -> CallbackResult;
}

/// The closed set of callback representations.
#[derive(Clone)]
pub enum Callback {
    /// A function looked up by name in the symbol table.
    ///
    /// A name of the form `"Class::method"` is normalized into
    /// [`Callback::Static`] before use.
    Function(String),
    /// A method bound to a specific instance.
    Method {
        /// The instance.
        target: Arc<dyn HookTarget>,
        /// Method name.
        method: String,
    },
    /// A static method looked up by class and method name.
    Static {
        /// Class name.
        class: String,
        /// Method name.
        method: String,
    },
    /// An anonymous closure, identified by its allocation.
    Closure(Arc<HookFn>),
}

impl Callback {
    /// A named function reference.
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// An instance + method pair.
    pub fn method(target: Arc<dyn HookTarget>, method: impl Into<String>) -> Self {
        Self::Method {
            target,
            method: method.into(),
        }
    }

    /// A class-name + method-name pair.
    pub fn static_method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Static {
            class: class.into(),
            method: method.into(),
        }
    }

    /// An anonymous closure.
    ///
    /// Every call allocates a new identity; clone the returned `Callback` to
    /// refer to the same closure again (e.g. for removal).
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> CallbackResult + Send + Sync + 'static,
    {
        Self::Closure(Arc::new(f))
    }

    /// Human-readable label used by listings.
    pub fn label(&self) -> String {
        match self {
            Self::Function(name) => name.clone(),
            Self::Method { target, method } => format!("{}->{}", target.class_name(), method),
            Self::Static { class, method } => format!("{class}::{method}"),
            Self::Closure(_) => "CLOSURE".to_string(),
        }
    }
}

impl From<&str> for Callback {
    fn from(name: &str) -> Self {
        Self::Function(name.to_string())
    }
}

impl From<String> for Callback {
    fn from(name: String) -> Self {
        Self::Function(name)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(name) => f.debug_tuple("Function").field(name).finish(),
            Self::Method { target, method } => f
                .debug_struct("Method")
                .field("target", &target.class_name())
                .field("method", method)
                .finish(),
            Self::Static { class, method } => f
                .debug_struct("Static")
                .field("class", class)
                .field("method", method)
                .finish(),
            Self::Closure(_) => f.debug_tuple("Closure").field(&"<closure>").finish(),
        }
    }
}

/// A resolved, directly invocable callback target.
#[derive(Clone)]
pub enum Invocable {
    /// A function body (named function, static method or closure).
    Function(Arc<HookFn>),
    /// A method on a live instance.
    Method(Arc<dyn HookTarget>, String),
}

impl Invocable {
    /// Invokes the target with the current argument list.
    pub fn invoke(&self, args: &[Value]) -> CallbackResult {
        match self {
            Self::Function(f) => f(args),
            Self::Method(target, method) => target.call_method(method, args),
        }
    }
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Invocable::Function(<fn>)"),
            Self::Method(target, method) => {
                write!(f, "Invocable::Method({}->{})", target.class_name(), method)
            }
        }
    }
}
