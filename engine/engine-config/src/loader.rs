//! Configuration loading logic.
//!
//! Handles loading config from files and applying environment variable overrides.
//! Loading never fails: unreadable or invalid files fall back to defaults.

use crate::CentralConfig;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "UTTT_CONFIG";

/// Standard locations to search for config.toml
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config.toml",    // Current directory
    "../config.toml", // Parent directory (when running from a crate directory)
];

/// Load the central configuration from config.toml.
///
/// Searches for config.toml in the following order:
/// 1. Path specified by the UTTT_CONFIG environment variable
/// 2. Current directory (config.toml)
/// 3. Parent directory (../config.toml)
///
/// After loading, environment variable overrides are applied.
pub fn load_config() -> CentralConfig {
    // Check for explicit config path
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        let path = PathBuf::from(&path);
        if path.exists() {
            info!("Loading config from {}: {}", CONFIG_ENV_VAR, path.display());
            return load_from_path(&path);
        }
        warn!(
            "{}={} not found, searching defaults",
            CONFIG_ENV_VAR,
            path.display()
        );
    }

    // Search default locations
    for path_str in CONFIG_SEARCH_PATHS {
        let path = Path::new(path_str);
        if path.exists() {
            info!("Loading config from {}", path.display());
            return load_from_path(path);
        }
    }

    // Fall back to defaults
    debug!("No config.toml found, using built-in defaults");
    apply_env_overrides(CentralConfig::default())
}

/// Load configuration from a specific path.
pub fn load_from_path(path: &Path) -> CentralConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => apply_env_overrides(config),
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                apply_env_overrides(CentralConfig::default())
            }
        },
        Err(e) => {
            warn!("Failed to read {}: {}, using defaults", path.display(), e);
            apply_env_overrides(CentralConfig::default())
        }
    }
}

/// Macro to reduce env override boilerplate
macro_rules! env_override {
    // String field
    ($config:expr, $section:ident . $field:ident, $key:expr) => {
        if let Ok(v) = std::env::var($key) {
            $config.$section.$field = v;
        }
    };
    // Parseable field (u32, u64, f64, etc.)
    ($config:expr, $section:ident . $field:ident, $key:expr, parse) => {
        if let Ok(raw) = std::env::var($key) {
            match raw.parse() {
                Ok(v) => $config.$section.$field = v,
                Err(_) => warn!("Ignoring {}={}: not a valid value", $key, raw),
            }
        }
    };
}

/// Apply environment variable overrides to a configuration.
///
/// Environment variables follow the pattern: UTTT_<SECTION>_<KEY>
pub fn apply_env_overrides(mut config: CentralConfig) -> CentralConfig {
    // Common
    env_override!(config, common.log_level, "UTTT_COMMON_LOG_LEVEL");
    env_override!(config, common.seed, "UTTT_COMMON_SEED", parse);

    // MCTS
    env_override!(config, mcts.iterations, "UTTT_MCTS_ITERATIONS", parse);
    env_override!(
        config,
        mcts.exploration_constant,
        "UTTT_MCTS_EXPLORATION_CONSTANT",
        parse
    );
    env_override!(config, mcts.variant, "UTTT_MCTS_VARIANT");
    env_override!(config, mcts.trees, "UTTT_MCTS_TREES", parse);
    env_override!(
        config,
        mcts.time_limit_ms,
        "UTTT_MCTS_TIME_LIMIT_MS",
        parse
    );

    // Play
    env_override!(config, play.games, "UTTT_PLAY_GAMES", parse);
    env_override!(config, play.x_variant, "UTTT_PLAY_X_VARIANT");
    env_override!(config, play.o_variant, "UTTT_PLAY_O_VARIANT");
    env_override!(config, play.log_interval, "UTTT_PLAY_LOG_INTERVAL", parse);

    config
}
