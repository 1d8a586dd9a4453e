//! Command-line configuration for the player binary
//!
//! Defaults come from the central config (config.toml with UTTT_* environment
//! overrides). CLI arguments take highest priority.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use engine_config::{load_config, CentralConfig};
use mcts::{MctsConfig, Variant};
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

// Default value functions that read from central config
fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

fn default_seed() -> u64 {
    CENTRAL_CONFIG.common.seed
}

fn default_iterations() -> u32 {
    CENTRAL_CONFIG.mcts.iterations
}

fn default_exploration() -> f64 {
    CENTRAL_CONFIG.mcts.exploration_constant
}

fn default_variant() -> String {
    CENTRAL_CONFIG.mcts.variant.clone()
}

fn default_trees() -> usize {
    CENTRAL_CONFIG.mcts.trees
}

fn default_time_limit_ms() -> u64 {
    CENTRAL_CONFIG.mcts.time_limit_ms
}

fn default_games() -> u32 {
    CENTRAL_CONFIG.play.games
}

fn default_x_variant() -> String {
    CENTRAL_CONFIG.play.x_variant.clone()
}

fn default_o_variant() -> String {
    CENTRAL_CONFIG.play.o_variant.clone()
}

fn default_log_interval() -> u32 {
    CENTRAL_CONFIG.play.log_interval
}

#[derive(Parser, Debug, Clone)]
#[command(name = "player")]
#[command(about = "Ultimate Tic-Tac-Toe MCTS player")]
#[command(
    long_about = "Ask the search engine for a move in a given position, or play
engine-vs-engine matches between the baseline and modified search variants.

Configuration is loaded from config.toml with UTTT_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value_t = default_log_level())]
    pub log_level: String,

    /// Base RNG seed (0 = random)
    #[arg(long, global = true, default_value_t = default_seed())]
    pub seed: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Recommend a move for the position reached by a move list
    Think {
        /// Moves played so far as `board:cell`, separated by spaces or commas
        #[arg(long, default_value = "")]
        moves: String,

        /// Search variant (baseline or modified)
        #[arg(long, default_value_t = default_variant())]
        variant: String,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Play a match between two search variants
    Play {
        /// Number of games to play
        #[arg(long, default_value_t = default_games())]
        games: u32,

        /// Variant playing X (moves first)
        #[arg(long = "x", default_value_t = default_x_variant())]
        x_variant: String,

        /// Variant playing O
        #[arg(long = "o", default_value_t = default_o_variant())]
        o_variant: String,

        /// Log progress every N games (0 to disable)
        #[arg(long, default_value_t = default_log_interval())]
        log_interval: u32,

        /// Write a JSON stats snapshot here when the match ends
        #[arg(long)]
        stats_path: Option<PathBuf>,

        #[command(flatten)]
        search: SearchArgs,
    },
}

/// Search budget shared by every command
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Iterations per move
    #[arg(long, default_value_t = default_iterations())]
    pub iterations: u32,

    /// UCB exploration constant
    #[arg(long, default_value_t = default_exploration())]
    pub exploration: f64,

    /// Independent root-parallel trees per move
    #[arg(long, default_value_t = default_trees())]
    pub trees: usize,

    /// Wall-clock budget per move in milliseconds (0 = use iterations)
    #[arg(long, default_value_t = default_time_limit_ms())]
    pub time_limit_ms: u64,
}

impl SearchArgs {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 && self.time_limit_ms == 0 {
            return Err(anyhow!(
                "iterations must be greater than 0 when no time limit is set"
            ));
        }

        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(anyhow!(
                "exploration must be a non-negative number, got {}",
                self.exploration
            ));
        }

        if self.trees == 0 {
            return Err(anyhow!("trees must be greater than 0"));
        }

        Ok(())
    }

    /// Runtime search config for one side.
    pub fn mcts_config(&self, variant: Variant) -> MctsConfig {
        let mut config = MctsConfig::default()
            .with_iterations(self.iterations)
            .with_exploration(self.exploration)
            .with_variant(variant)
            .with_trees(self.trees);
        if self.time_limit_ms > 0 {
            config = config.with_time_limit(Duration::from_millis(self.time_limit_ms));
        }
        config
    }
}

/// Parse a variant name with a CLI-friendly error.
pub fn parse_variant(name: &str) -> Result<Variant> {
    name.parse::<Variant>()
        .with_context(|| format!("invalid variant '{}'", name))
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        match &self.command {
            Command::Think {
                variant, search, ..
            } => {
                parse_variant(variant)?;
                search.validate()
            }
            Command::Play {
                games,
                x_variant,
                o_variant,
                search,
                ..
            } => {
                if *games == 0 {
                    return Err(anyhow!("games must be greater than 0"));
                }
                parse_variant(x_variant)?;
                parse_variant(o_variant)?;
                search.validate()
            }
        }
    }
}
