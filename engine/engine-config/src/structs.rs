//! Configuration struct definitions.
//!
//! All config structs with serde deserialization support and default values.

use crate::defaults;
use serde::Deserialize;

// ============================================================================
// Serde default functions (required for #[serde(default = "...")])
// These call the accessor functions from defaults module
// ============================================================================

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_seed() -> u64 {
    defaults::seed()
}
fn d_iterations() -> u32 {
    defaults::iterations()
}
fn d_exploration_constant() -> f64 {
    defaults::exploration_constant()
}
fn d_variant() -> String {
    defaults::variant().into()
}
fn d_trees() -> usize {
    defaults::trees()
}
fn d_time_limit_ms() -> u64 {
    defaults::time_limit_ms()
}
fn d_games() -> u32 {
    defaults::games()
}
fn d_x_variant() -> String {
    defaults::x_variant().into()
}
fn d_o_variant() -> String {
    defaults::o_variant().into()
}
fn d_log_interval() -> u32 {
    defaults::log_interval()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub mcts: MctsConfig,
    #[serde(default)]
    pub play: PlayConfig,
}

/// Settings shared by every command
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CommonConfig {
    #[serde(default = "d_log_level")]
    pub log_level: String,
    /// Base RNG seed, 0 = derive from entropy
    #[serde(default = "d_seed")]
    pub seed: u64,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level().into(),
            seed: defaults::seed(),
        }
    }
}

/// Search settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MctsConfig {
    #[serde(default = "d_iterations")]
    pub iterations: u32,
    #[serde(default = "d_exploration_constant")]
    pub exploration_constant: f64,
    /// "baseline" or "modified"
    #[serde(default = "d_variant")]
    pub variant: String,
    #[serde(default = "d_trees")]
    pub trees: usize,
    /// 0 = use the iteration budget
    #[serde(default = "d_time_limit_ms")]
    pub time_limit_ms: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: defaults::iterations(),
            exploration_constant: defaults::exploration_constant(),
            variant: defaults::variant().into(),
            trees: defaults::trees(),
            time_limit_ms: defaults::time_limit_ms(),
        }
    }
}

/// Head-to-head match settings
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlayConfig {
    #[serde(default = "d_games")]
    pub games: u32,
    #[serde(default = "d_x_variant")]
    pub x_variant: String,
    #[serde(default = "d_o_variant")]
    pub o_variant: String,
    #[serde(default = "d_log_interval")]
    pub log_interval: u32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            x_variant: defaults::x_variant().into(),
            o_variant: defaults::o_variant().into(),
            log_interval: defaults::log_interval(),
        }
    }
}
