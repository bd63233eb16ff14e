//! Debug call log — an append-only record of `filter`/`trigger` calls.

use std::fmt;
use std::panic::Location;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dispatch entry point that produced a [`DebugCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchKind {
    /// `filter` / `filter_with`.
    Filter,
    /// `trigger`.
    Trigger,
}

impl DispatchKind {
    /// Returns the entry point name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded dispatch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugCall {
    /// Entry point used.
    pub kind: DispatchKind,
    /// Tag dispatched.
    pub tag: String,
    /// Whether the tag had any registrations at the time of the call.
    pub found: bool,
    /// Source file of the call site.
    pub file: String,
    /// Line of the call site.
    pub line: u32,
    /// Column of the call site.
    pub column: u32,
    /// When the call happened.
    pub timestamp: DateTime<Utc>,
}

impl DebugCall {
    /// Creates a record for a call made at `location`.
    pub fn new(kind: DispatchKind, tag: &str, found: bool, location: &Location<'_>) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
            found,
            file: location.file().to_string(),
            line: location.line(),
            column: location.column(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only list of [`DebugCall`]s.
#[derive(Debug, Default)]
pub struct CallLog {
    calls: Mutex<Vec<DebugCall>>,
}

impl CallLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call. A poisoned log drops the record instead of failing.
    pub fn record(&self, call: DebugCall) {
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(_) => warn!(tag = %call.tag, "Debug call log unavailable, call not recorded"),
        }
    }

    /// Returns a copy of the recorded calls, oldest first.
    pub fn calls(&self) -> Vec<DebugCall> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Returns whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards every recorded call, recovering a poisoned log.
    pub fn clear(&self) {
        match self.calls.lock() {
            Ok(mut calls) => calls.clear(),
            Err(poisoned) => {
                poisoned.into_inner().clear();
                self.calls.clear_poison();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_record_and_clear() {
        let log = CallLog::new();
        log.record(DebugCall::new(
            DispatchKind::Filter,
            "title",
            true,
            Location::caller(),
        ));
        log.record(DebugCall::new(
            DispatchKind::Trigger,
            "saved",
            false,
            Location::caller(),
        ));

        let calls = log.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].tag, "title");
        assert_eq!(calls[1].kind, DispatchKind::Trigger);
        assert!(!calls[1].found);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn test_poisoned_log_does_not_panic() {
        let log = Arc::new(CallLog::new());
        let poison = log.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poison.calls.lock().unwrap();
            panic!("poison the log");
        })
        .join();

        log.record(DebugCall::new(
            DispatchKind::Filter,
            "title",
            true,
            Location::caller(),
        ));
        assert!(log.calls().is_empty());

        log.clear();
        log.record(DebugCall::new(
            DispatchKind::Filter,
            "title",
            true,
            Location::caller(),
        ));
        assert_eq!(log.len(), 1);
    }
}
