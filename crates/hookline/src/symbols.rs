//! Symbol table — named functions and static methods callbacks refer to.
//!
//! Registrations store names, not function bodies. The dispatcher resolves
//! names here on every invocation, so undefining a symbol after registration
//! turns the stored callback into a missing target.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use crate::callback::{Callback, HookFn, Invocable};
use crate::identity::STATIC_SEPARATOR;
use crate::signal::CallbackResult;

/// Named callables available to `Function` and `Static` callbacks.
#[derive(Default)]
pub struct SymbolTable {
    /// Function name → body.
    functions: DashMap<String, Arc<HookFn>>,
    /// `Class::method` → body.
    statics: DashMap<String, Arc<HookFn>>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or redefines) a named function.
    pub fn define_function<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> CallbackResult + Send + Sync + 'static,
    {
        let name = name.into();
        debug!(function = %name, "Function defined");
        self.functions.insert(name, Arc::new(f));
    }

    /// Removes a named function. Returns whether it existed.
    pub fn remove_function(&self, name: &str) -> bool {
        self.functions.remove(name).is_some()
    }

    /// Returns whether a named function is defined.
    pub fn function_exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Defines (or redefines) a static method.
    pub fn define_static<F>(&self, class: &str, method: &str, f: F)
    where
        F: Fn(&[Value]) -> CallbackResult + Send + Sync + 'static,
    {
        let key = static_key(class, method);
        debug!(method = %key, "Static method defined");
        self.statics.insert(key, Arc::new(f));
    }

    /// Removes a static method. Returns whether it existed.
    pub fn remove_static(&self, class: &str, method: &str) -> bool {
        self.statics.remove(&static_key(class, method)).is_some()
    }

    /// Returns whether a static method is defined.
    pub fn static_exists(&self, class: &str, method: &str) -> bool {
        self.statics.contains_key(&static_key(class, method))
    }

    /// Resolves a stored callback to an invocable target.
    ///
    /// Returns `None` when the target no longer exists.
    pub fn resolve(&self, callback: &Callback) -> Option<Invocable> {
        match callback {
            Callback::Function(name) => self
                .functions
                .get(name)
                .map(|f| Invocable::Function(f.value().clone())),
            Callback::Static { class, method } => self
                .statics
                .get(&static_key(class, method))
                .map(|f| Invocable::Function(f.value().clone())),
            Callback::Method { target, method } => target
                .has_method(method)
                .then(|| Invocable::Method(target.clone(), method.clone())),
            Callback::Closure(f) => Some(Invocable::Function(f.clone())),
        }
    }

    /// Removes every defined symbol.
    pub fn clear(&self) {
        self.functions.clear();
        self.statics.clear();
    }
}

impl std::fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolTable")
            .field("functions", &self.functions.len())
            .field("statics", &self.statics.len())
            .finish()
    }
}

fn static_key(class: &str, method: &str) -> String {
    format!("{class}{STATIC_SEPARATOR}{method}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_function_lifecycle() {
        let symbols = SymbolTable::new();
        symbols.define_function("double", |args| Ok(json!(args[0].as_i64().unwrap_or(0) * 2)));

        assert!(symbols.function_exists("double"));
        let invocable = symbols.resolve(&Callback::function("double")).unwrap();
        assert_eq!(invocable.invoke(&[json!(21)]).unwrap(), json!(42));

        assert!(symbols.remove_function("double"));
        assert!(!symbols.remove_function("double"));
        assert!(symbols.resolve(&Callback::function("double")).is_none());
    }

    #[test]
    fn test_static_lookup() {
        let symbols = SymbolTable::new();
        symbols.define_static("Text", "shout", |args| {
            Ok(json!(args[0].as_str().unwrap_or_default().to_uppercase()))
        });

        assert!(symbols.static_exists("Text", "shout"));
        let invocable = symbols
            .resolve(&Callback::static_method("Text", "shout"))
            .unwrap();
        assert_eq!(invocable.invoke(&[json!("hi")]).unwrap(), json!("HI"));
        assert!(
            symbols
                .resolve(&Callback::static_method("Text", "whisper"))
                .is_none()
        );
    }

    #[test]
    fn test_closures_always_resolve() {
        let symbols = SymbolTable::new();
        assert!(
            symbols
                .resolve(&Callback::closure(|_| Ok(json!(null))))
                .is_some()
        );
    }

    #[test]
    fn test_clear() {
        let symbols = SymbolTable::new();
        symbols.define_function("f", |_| Ok(json!(null)));
        symbols.define_static("C", "m", |_| Ok(json!(null)));
        symbols.clear();
        assert!(!symbols.function_exists("f"));
        assert!(!symbols.static_exists("C", "m"));
    }
}
