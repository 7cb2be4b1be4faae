//! Configuration module for Strata
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (STRATA_*)
//! 3. Config file (`--config-file`, `STRATA_CONFIG`, `./strata.toml`,
//!    `~/.config/strata/config.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    load_resolved, load_with_warnings, resolve_config_path, with_env_overrides, ConfigError,
    ConfigWarning, CONFIG_FILE_NAME, ENV_CONFIG, ENV_LOG_LEVEL, ENV_STORE_BACKEND,
    ENV_STORE_ROOT,
};
pub use types::{
    Config, InstanceConfig, LogConfig, StoreBackend, StoreConfig, DEFAULT_STORE_ROOT,
};
