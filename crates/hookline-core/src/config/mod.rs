//! Configuration schemas.
//!
//! Configuration is deserialized via the `config` crate from an optional
//! TOML file overlaid with `HOOKLINE__*` environment variables. Every field
//! has a serde default, so an empty source yields a usable configuration.

pub mod hooks;
pub mod logging;

use serde::{Deserialize, Serialize};

use self::hooks::HooksConfig;
use self::logging::LoggingConfig;

use crate::error::HookError;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HooklineConfig {
    /// Dispatcher toggles.
    #[serde(default)]
    pub hooks: HooksConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HooklineConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional. Environment variables prefixed with `HOOKLINE`
    /// and separated by `__` (e.g. `HOOKLINE__HOOKS__DEBUG=true`) override it.
    pub fn load(path: &str) -> Result<Self, HookError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("HOOKLINE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| HookError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| HookError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = HooklineConfig::default();
        assert!(!config.hooks.debug);
        assert!(config.hooks.ignore_nonexistent_callbacks);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = HooklineConfig::load("/nonexistent/hookline-config").unwrap();
        assert!(config.hooks.ignore_nonexistent_callbacks);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[hooks]\ndebug = true\nignore_nonexistent_callbacks = false\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = HooklineConfig::load(file.path().to_str().unwrap()).unwrap();
        assert!(config.hooks.debug);
        assert!(!config.hooks.ignore_nonexistent_callbacks);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_rejects_bad_types() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[hooks]\ndebug = \"sometimes\"").unwrap();

        let err = HooklineConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, HookError::Configuration(_)));
    }
}
