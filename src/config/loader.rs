//! Configuration loading
//!
//! Lookup order for the config file:
//! 1. `--config-file`
//! 2. `STRATA_CONFIG`
//! 3. `./strata.toml`
//! 4. `<user config dir>/strata/config.toml`
//!
//! Environment overrides are applied on top of whichever file (or the
//! defaults) was loaded.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Config, StoreBackend};

pub const CONFIG_FILE_NAME: &str = "strata.toml";
pub const ENV_CONFIG: &str = "STRATA_CONFIG";
pub const ENV_STORE_BACKEND: &str = "STRATA_STORE_BACKEND";
pub const ENV_STORE_ROOT: &str = "STRATA_STORE_ROOT";
pub const ENV_LOG_LEVEL: &str = "STRATA_LOG_LEVEL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}\n  → Fix: check the file against the documented [store], [log] and [instances] sections")]
    Parse { path: PathBuf, message: String },
}

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{suggestion}'?)")?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> Result<(Config, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// The config file to use, or `None` to run on defaults.
///
/// An explicitly requested file is returned even if it does not exist, so the
/// caller reports the missing file instead of silently using defaults.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env: impl Fn(&str) -> Option<String>,
    cwd: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env(ENV_CONFIG).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let local = cwd.join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("strata").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load the resolved config file (or defaults) and apply environment overrides.
pub fn load_resolved(
    explicit: Option<&Path>,
) -> Result<(Config, Option<PathBuf>, Vec<ConfigWarning>), ConfigError> {
    let env = |key: &str| std::env::var(key).ok();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let (config, path, warnings) = match resolve_config_path(explicit, env, &cwd) {
        Some(path) => {
            let (config, warnings) = load_with_warnings(&path)?;
            (config, Some(path), warnings)
        }
        None => (Config::default(), None, Vec::new()),
    };

    Ok((with_env_overrides(config, env), path, warnings))
}

/// Apply environment variable overrides (STRATA_* prefix)
pub fn with_env_overrides(mut config: Config, env: impl Fn(&str) -> Option<String>) -> Config {
    // STRATA_STORE_BACKEND
    if let Some(backend) = env(ENV_STORE_BACKEND).as_deref().and_then(StoreBackend::parse) {
        config.store.backend = backend;
    }

    // STRATA_STORE_ROOT
    if let Some(root) = env(ENV_STORE_ROOT).filter(|r| !r.is_empty()) {
        config.store.root = PathBuf::from(root);
    }

    // STRATA_LOG_LEVEL
    if let Some(level) = env(ENV_LOG_LEVEL).filter(|l| !l.is_empty()) {
        config.log.level = Some(level);
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "store",
        "backend",
        "root",
        "log",
        "level",
        "instances",
        "working_directory",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = usize::from(ac != bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
