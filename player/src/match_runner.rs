//! Engine-vs-engine games
//!
//! Plays complete games between two agents in one process and aggregates the
//! results into [`MatchStats`].

use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use engine_core::Game;
use games_ultimate_tictactoe::{Action, State, UltimateTicTacToe};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::agent::MctsAgent;
use crate::stats::MatchStats;

/// A finished game
#[derive(Debug, Clone)]
pub struct GameRecord {
    /// 1 = X won, 2 = O won, 3 = draw
    pub winner: u8,
    pub moves: Vec<Action>,
}

/// How a match is run
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub games: u32,
    /// Log progress every N games (0 to disable)
    pub log_interval: u32,
    pub show_progress: bool,
}

/// Play one game from the initial position, X moving first.
pub fn play_game(
    game: &UltimateTicTacToe,
    x: &mut MctsAgent,
    o: &mut MctsAgent,
    stats: &mut MatchStats,
) -> Result<GameRecord> {
    let mut state = State::new();
    let mut moves = Vec::with_capacity(81);

    while !game.is_terminal(&state) {
        let player = state.current_player();
        let agent = if player == 1 { &mut *x } else { &mut *o };

        let search_start = Instant::now();
        let chosen = agent.select_move(game, &state)?;
        stats.record_search(
            player,
            chosen.result.simulations,
            search_start.elapsed().as_micros() as u64,
        );

        let action = chosen
            .action
            .ok_or_else(|| anyhow!("engine returned no move for a live position"))?;
        state = game
            .apply(&state, action)
            .with_context(|| format!("engine chose illegal move {}", action))?;
        moves.push(action);
    }

    stats.record_game(state.winner(), moves.len() as u32);
    debug!(
        winner = state.winner(),
        plies = moves.len(),
        "Game finished"
    );

    Ok(GameRecord {
        winner: state.winner(),
        moves,
    })
}

/// Play `settings.games` games between `x` and `o`.
pub fn run_match(
    x: &mut MctsAgent,
    o: &mut MctsAgent,
    settings: &MatchSettings,
) -> Result<MatchStats> {
    let game = UltimateTicTacToe::new();
    let mut stats = MatchStats::new(x.variant(), o.variant());

    let progress = if settings.show_progress {
        let pb = ProgressBar::new(settings.games as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
                .progress_chars("#>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    info!(
        games = settings.games,
        x = %x.variant(),
        o = %o.variant(),
        "Starting match"
    );

    for game_index in 1..=settings.games {
        let record = play_game(&game, x, o, &mut stats)
            .with_context(|| format!("game {} failed", game_index))?;
        progress.inc(1);
        debug!(game = game_index, winner = record.winner, "Game recorded");

        if settings.log_interval > 0 && game_index % settings.log_interval == 0 {
            // Suspend progress bar while logging to avoid visual glitches
            progress.suspend(|| stats.log_summary());
        }
    }

    progress.finish_with_message("done");
    Ok(stats)
}
