// RUNTIME PREFERENCES (presentation and capture behavior)

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::Path;

/// Runtime mode controlling construction-time presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuntimeMode {
    Development,
    Production,
    Test,
    Other(String),
}

impl RuntimeMode {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => RuntimeMode::Development,
            "production" | "prod" => RuntimeMode::Production,
            "test" => RuntimeMode::Test,
            _ => RuntimeMode::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuntimeMode::Development => "development",
            RuntimeMode::Production => "production",
            RuntimeMode::Test => "test",
            RuntimeMode::Other(value) => value,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, RuntimeMode::Development)
    }
}

impl Default for RuntimeMode {
    fn default() -> Self {
        env::var(env_vars::MODE)
            .map(|value| RuntimeMode::parse(&value))
            .unwrap_or(RuntimeMode::Development)
    }
}

impl From<String> for RuntimeMode {
    fn from(value: String) -> Self {
        RuntimeMode::parse(&value)
    }
}

impl From<RuntimeMode> for String {
    fn from(mode: RuntimeMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrataConfig {
    /// Runtime mode; development turns on pretty stacks by default
    pub mode: RuntimeMode,

    /// Whether stacks are rendered through the pretty presenter at construction
    pub pretty_stacks: bool,

    /// Whether resolved backtrace frames are captured for the origin
    pub capture_backtrace: bool,

    /// Whether every constructed error is echoed to the diagnostic sink
    pub echo_on_construct: bool,

    /// Whether the diagnostic sink writes JSON lines
    pub structured_output: bool,
}

impl Default for ErrataConfig {
    fn default() -> Self {
        Self::resolve(RuntimeMode::default(), |name| env::var(name).ok())
    }
}

impl ErrataConfig {
    /// Mode defaults overridden by flags found through `lookup`
    ///
    /// Pretty stacks and backtrace capture default on only in development.
    fn resolve(mode: RuntimeMode, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str, default: bool| {
            lookup(name)
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(default)
        };
        let development = mode.is_development();

        Self {
            pretty_stacks: flag(env_vars::PRETTY_STACKS, development),
            capture_backtrace: flag(env_vars::CAPTURE_BACKTRACE, development),
            echo_on_construct: flag(env_vars::ECHO_ON_CONSTRUCT, false),
            structured_output: flag(env_vars::STRUCTURED_OUTPUT, false),
            mode,
        }
    }

    /// Fixed configuration independent of the environment
    pub fn for_mode(mode: RuntimeMode) -> Self {
        Self {
            pretty_stacks: mode.is_development(),
            capture_backtrace: false,
            echo_on_construct: false,
            structured_output: false,
            mode,
        }
    }

    /// Quiet configuration for tests: plain stacks, no backtrace, no echo
    pub fn quiet() -> Self {
        Self::for_mode(RuntimeMode::Test)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Environment defaults, overridden by the file named in `ERRATA_CONFIG_FILE`
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var(env_vars::CONFIG_FILE) {
            Ok(path) if !path.trim().is_empty() => Self::load_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    pub const MODE: &str = "ERRATA_ENV";
    pub const PRETTY_STACKS: &str = "ERRATA_PRETTY_STACKS";
    pub const CAPTURE_BACKTRACE: &str = "ERRATA_CAPTURE_BACKTRACE";
    pub const ECHO_ON_CONSTRUCT: &str = "ERRATA_ECHO_ON_CONSTRUCT";
    pub const STRUCTURED_OUTPUT: &str = "ERRATA_STRUCTURED_OUTPUT";
    pub const CONFIG_FILE: &str = "ERRATA_CONFIG_FILE";
}
