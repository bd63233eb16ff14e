//! Callback outcomes: the stop-processing signal and callback failures.
//!
//! A callback returns `Ok(value)` to continue the chain. Returning
//! `Err(CallbackError::Stop(..))` halts every remaining callback of the
//! current dispatch and replaces the accumulator with the carried value.
//! The signal is consumed by the dispatcher and never reaches the caller of
//! `filter`/`trigger`.

use serde_json::Value;

/// Signal raised by a callback to stop processing the remaining callbacks.
#[derive(Debug, Clone, PartialEq)]
pub struct StopProcessing {
    /// Replacement value for the accumulator.
    value: Value,
}

impl StopProcessing {
    /// Creates a stop signal carrying the replacement value.
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    /// Returns the replacement value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the signal, returning the replacement value.
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Error side of a callback invocation.
#[derive(Debug)]
pub enum CallbackError {
    /// Stop processing; the accumulator becomes the carried value.
    Stop(StopProcessing),
    /// The callback itself failed. Propagated unchanged to the dispatch caller.
    Failed(anyhow::Error),
}

impl CallbackError {
    /// Wraps any error as a callback failure.
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        Self::Failed(err.into())
    }
}

impl From<StopProcessing> for CallbackError {
    fn from(signal: StopProcessing) -> Self {
        Self::Stop(signal)
    }
}

impl From<anyhow::Error> for CallbackError {
    fn from(err: anyhow::Error) -> Self {
        Self::Failed(err)
    }
}

impl From<serde_json::Error> for CallbackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Failed(err.into())
    }
}

/// Result of a single callback invocation.
pub type CallbackResult = Result<Value, CallbackError>;

/// Shorthand for raising the stop signal from a callback.
///
/// ```rust,ignore
/// registry.add_filter("price", Callback::closure(|args| {
///     if args[0].is_null() {
///         return stop(json!(0));
///     }
///     Ok(args[0].clone())
/// }), SYSTEM_PRIORITY);
/// ```
pub fn stop(value: Value) -> CallbackResult {
    Err(StopProcessing::new(value).into())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stop_carries_value() {
        match stop(json!("halt")) {
            Err(CallbackError::Stop(signal)) => assert_eq!(signal.into_value(), json!("halt")),
            other => panic!("expected stop signal, got {other:?}"),
        }
    }

    #[test]
    fn test_serde_error_converts_to_failure() {
        fn parse(args: &[Value]) -> CallbackResult {
            let n: u32 = serde_json::from_value(args[0].clone())?;
            Ok(json!(n + 1))
        }

        assert!(matches!(parse(&[json!("x")]), Err(CallbackError::Failed(_))));
        assert_eq!(parse(&[json!(1)]).unwrap(), json!(2));
    }
}
