//! Configuration module for errata
//!
//! Process-wide configuration is resolved once from the environment on first
//! use. Registries and composers also accept an explicit [`ErrataConfig`] so
//! callers and tests control presentation deterministically.

pub mod runtime;

pub use runtime::{env_vars, ConfigError, ErrataConfig, RuntimeMode};

use std::sync::OnceLock;

static GLOBAL_CONFIG: OnceLock<ErrataConfig> = OnceLock::new();

/// Process-wide configuration, resolved on first call
///
/// A broken config file is reported through `log` and the environment
/// defaults are used instead.
pub fn global() -> &'static ErrataConfig {
    GLOBAL_CONFIG.get_or_init(|| {
        let config = ErrataConfig::from_env().unwrap_or_else(|e| {
            log::warn!("Falling back to environment defaults: {}", e);
            ErrataConfig::default()
        });
        log::debug!(
            "Resolved errata configuration (mode: {}, pretty: {})",
            config.mode,
            config.pretty_stacks
        );
        config
    })
}

/// Install the process-wide configuration before first use
pub fn init_global(config: ErrataConfig) -> Result<(), String> {
    GLOBAL_CONFIG
        .set(config)
        .map_err(|_| "Global configuration already initialized".to_string())
}
