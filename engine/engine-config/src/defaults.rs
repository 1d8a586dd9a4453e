//! Default configuration values loaded from config.defaults.toml.
//!
//! This module loads defaults from the shared TOML file at compile time, so
//! the documented defaults file and the binary can never disagree.

use once_cell::sync::Lazy;
use serde::Deserialize;

/// The embedded defaults TOML file (loaded at compile time)
const DEFAULTS_TOML: &str = include_str!("../../../config.defaults.toml");

/// Parsed defaults structure (parsed once at first use)
static DEFAULTS: Lazy<DefaultsConfig> = Lazy::new(|| {
    toml::from_str(DEFAULTS_TOML).expect("config.defaults.toml should be valid TOML")
});

// ============================================================================
// Internal structs for parsing config.defaults.toml
// ============================================================================

#[derive(Debug, Deserialize)]
struct DefaultsConfig {
    common: CommonDefaults,
    mcts: MctsDefaults,
    play: PlayDefaults,
}

#[derive(Debug, Deserialize)]
struct CommonDefaults {
    log_level: String,
    seed: u64,
}

#[derive(Debug, Deserialize)]
struct MctsDefaults {
    iterations: u32,
    exploration_constant: f64,
    variant: String,
    trees: usize,
    time_limit_ms: u64,
}

#[derive(Debug, Deserialize)]
struct PlayDefaults {
    games: u32,
    x_variant: String,
    o_variant: String,
    log_interval: u32,
}

// ============================================================================
// Public accessor functions
// ============================================================================

// Common
pub fn log_level() -> &'static str {
    &DEFAULTS.common.log_level
}
pub fn seed() -> u64 {
    DEFAULTS.common.seed
}

// MCTS
pub fn iterations() -> u32 {
    DEFAULTS.mcts.iterations
}
pub fn exploration_constant() -> f64 {
    DEFAULTS.mcts.exploration_constant
}
pub fn variant() -> &'static str {
    &DEFAULTS.mcts.variant
}
pub fn trees() -> usize {
    DEFAULTS.mcts.trees
}
pub fn time_limit_ms() -> u64 {
    DEFAULTS.mcts.time_limit_ms
}

// Play
pub fn games() -> u32 {
    DEFAULTS.play.games
}
pub fn x_variant() -> &'static str {
    &DEFAULTS.play.x_variant
}
pub fn o_variant() -> &'static str {
    &DEFAULTS.play.o_variant
}
pub fn log_interval() -> u32 {
    DEFAULTS.play.log_interval
}
