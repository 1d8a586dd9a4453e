//! Match statistics tracking and persistence.
//!
//! Tracks results and search performance over a match between two variants.
//! Snapshots are written as JSON (write-then-rename) for later comparison.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use mcts::Variant;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Aggregated match statistics.
#[derive(Debug)]
pub struct MatchStats {
    x_variant: Variant,
    o_variant: Variant,
    games_completed: u32,
    x_wins: u32,
    o_wins: u32,
    draws: u32,
    /// Sum of game lengths for average calculation
    total_plies: u64,
    /// Searches performed by each side
    searches: [u64; 2],
    /// Total search wall-clock time per side (microseconds)
    search_time_us: [u64; 2],
    /// Total simulations per side
    simulations: [u64; 2],
    start_time: Instant,
}

/// Serializable stats for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct MatchStatsSnapshot {
    pub x_variant: String,
    pub o_variant: String,
    pub games_completed: u32,
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
    pub x_win_rate: f64,
    pub o_win_rate: f64,
    pub avg_game_length: f64,
    pub x_avg_search_ms: f64,
    pub o_avg_search_ms: f64,
    pub x_avg_simulations: f64,
    pub o_avg_simulations: f64,
    pub runtime_seconds: f64,
    pub timestamp: u64,
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

impl MatchStats {
    pub fn new(x_variant: Variant, o_variant: Variant) -> Self {
        Self {
            x_variant,
            o_variant,
            games_completed: 0,
            x_wins: 0,
            o_wins: 0,
            draws: 0,
            total_plies: 0,
            searches: [0; 2],
            search_time_us: [0; 2],
            simulations: [0; 2],
            start_time: Instant::now(),
        }
    }

    /// Record a finished game by its winner indicator (1 = X, 2 = O, else draw).
    pub fn record_game(&mut self, winner: u8, plies: u32) {
        self.games_completed += 1;
        self.total_plies += plies as u64;
        match winner {
            1 => self.x_wins += 1,
            2 => self.o_wins += 1,
            _ => self.draws += 1,
        }
    }

    /// Record one search by `player` (1 = X, 2 = O).
    pub fn record_search(&mut self, player: u8, simulations: u32, elapsed_us: u64) {
        let side = usize::from(player == 2);
        self.searches[side] += 1;
        self.search_time_us[side] += elapsed_us;
        self.simulations[side] += simulations as u64;
    }

    pub fn games_completed(&self) -> u32 {
        self.games_completed
    }

    /// Get a snapshot of current stats.
    pub fn snapshot(&self) -> MatchStatsSnapshot {
        let games = self.games_completed as f64;
        let avg_ms = |side: usize| {
            ratio(
                self.search_time_us[side] as f64 / 1000.0,
                self.searches[side] as f64,
            )
        };
        let avg_sims =
            |side: usize| ratio(self.simulations[side] as f64, self.searches[side] as f64);

        MatchStatsSnapshot {
            x_variant: self.x_variant.to_string(),
            o_variant: self.o_variant.to_string(),
            games_completed: self.games_completed,
            x_wins: self.x_wins,
            o_wins: self.o_wins,
            draws: self.draws,
            x_win_rate: ratio(self.x_wins as f64, games),
            o_win_rate: ratio(self.o_wins as f64, games),
            avg_game_length: ratio(self.total_plies as f64, games),
            x_avg_search_ms: avg_ms(0),
            o_avg_search_ms: avg_ms(1),
            x_avg_simulations: avg_sims(0),
            o_avg_simulations: avg_sims(1),
            runtime_seconds: self.start_time.elapsed().as_secs_f64(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    /// Log a one-line summary.
    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            games = s.games_completed,
            x = %s.x_variant,
            o = %s.o_variant,
            x_wins = s.x_wins,
            o_wins = s.o_wins,
            draws = s.draws,
            x_win_rate = format!("{:.1}%", s.x_win_rate * 100.0),
            avg_plies = format!("{:.1}", s.avg_game_length),
            "Match progress"
        );
    }

    /// Write stats to a JSON file (atomic write-then-rename).
    pub fn write_stats(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.snapshot())
            .context("Failed to serialize match stats")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        // Write to temp file then rename (atomic on most filesystems)
        let mut temp_path = PathBuf::from(path);
        temp_path.set_extension("json.tmp");
        {
            let mut file = fs::File::create(&temp_path)
                .with_context(|| format!("Failed to create {}", temp_path.display()))?;
            file.write_all(json.as_bytes())
                .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        }

        if let Err(e) = fs::rename(&temp_path, path) {
            // Try to clean up temp file
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| format!("Failed to rename stats to {}", path.display()));
        }

        debug!("Wrote match stats to {}", path.display());
        Ok(())
    }
}
