//! Error types surfaced by hookline dispatch and configuration.
//!
//! Registration never fails with an error: a malformed callback is reported
//! as `false` by the registry. The only conditions that reach a dispatch
//! caller are a missing callback target (when skipping is disabled) and a
//! failure raised by a callback body.

use thiserror::Error;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A stored callback no longer resolves to an invocable target.
    MissingCallback,
    /// A callback body returned an error.
    Callback,
    /// A configuration error occurred.
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCallback => write!(f, "MISSING_CALLBACK"),
            Self::Callback => write!(f, "CALLBACK"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// Errors returned by `filter`/`trigger` and by configuration loading.
#[derive(Debug, Error)]
pub enum HookError {
    /// A registered callback could not be resolved at dispatch time and the
    /// skip policy is disabled.
    #[error("Callback '{callback}' registered on '{tag}' does not resolve to an invocable target")]
    MissingCallback {
        /// Tag being dispatched.
        tag: String,
        /// Identifier of the unresolved callback.
        callback: String,
    },

    /// A callback body failed. The callback's own error is carried unchanged.
    #[error(transparent)]
    Callback(anyhow::Error),

    /// Configuration could not be built or deserialized.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl HookError {
    /// Creates a missing-callback error.
    pub fn missing_callback(tag: impl Into<String>, callback: impl Into<String>) -> Self {
        Self::MissingCallback {
            tag: tag.into(),
            callback: callback.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCallback { .. } => ErrorKind::MissingCallback,
            Self::Callback(_) => ErrorKind::Callback,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }
}

impl From<config::ConfigError> for HookError {
    fn from(err: config::ConfigError) -> Self {
        Self::configuration(err.to_string())
    }
}
