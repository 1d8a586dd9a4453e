//! Player - command-line front end for the Ultimate Tic-Tac-Toe search engine
//!
//! Two modes:
//! 1. `think`: replay a move list and print the engine's recommended move
//! 2. `play`: run engine-vs-engine matches between search variants

use anyhow::{Context, Result};
use clap::Parser;
use engine_core::Game;
use games_ultimate_tictactoe::{parse_moves, State, UltimateTicTacToe};
use tracing::info;

mod agent;
mod config;
mod match_runner;
mod stats;

use crate::agent::MctsAgent;
use crate::config::{parse_variant, Cli, Command, SearchArgs};
use crate::match_runner::{run_match, MatchSettings};

/// Number of root children listed by `think`
const TOP_CHILDREN: usize = 5;

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

fn think(seed: u64, moves: &str, variant: &str, search: &SearchArgs) -> Result<()> {
    let actions = parse_moves(moves).with_context(|| format!("invalid move list '{}'", moves))?;
    let state = State::from_moves(&actions).context("move list is not a legal game")?;
    let game = UltimateTicTacToe::new();

    let mut agent = MctsAgent::new(search.mcts_config(parse_variant(variant)?), seed, 0);
    let config = agent.config();
    info!(
        moves = actions.len(),
        variant = %config.variant,
        iterations = config.iterations,
        trees = config.trees,
        "Thinking"
    );

    let chosen = agent.select_move(&game, &state)?;

    let Some(action) = chosen.action else {
        println!("game over (winner indicator {})", state.winner());
        return Ok(());
    };

    let player = game.current_player(&state);
    println!("best move for player {}: {}", player, action);
    println!(
        "simulations: {}  root value: {:.3}",
        chosen.result.simulations, chosen.result.value
    );

    let shares = chosen.result.visit_distribution();
    let mut rows: Vec<_> = chosen.result.children.iter().zip(shares).collect();
    rows.sort_by(|a, b| b.0.visits.cmp(&a.0.visits));
    for (child, (_, share)) in rows.into_iter().take(TOP_CHILDREN) {
        println!(
            "  {}  visits {:>6} ({:>5.1}%)  mean {:+.3}",
            child.action,
            child.visits,
            share * 100.0,
            child.mean_reward
        );
    }

    Ok(())
}

fn play(
    seed: u64,
    games: u32,
    x_variant: &str,
    o_variant: &str,
    log_interval: u32,
    stats_path: Option<&std::path::Path>,
    search: &SearchArgs,
) -> Result<()> {
    let mut x = MctsAgent::new(search.mcts_config(parse_variant(x_variant)?), seed, 0);
    let mut o = MctsAgent::new(search.mcts_config(parse_variant(o_variant)?), seed, 1);

    let settings = MatchSettings {
        games,
        log_interval,
        show_progress: true,
    };
    let stats = run_match(&mut x, &mut o, &settings)?;
    stats.log_summary();

    let s = stats.snapshot();
    println!(
        "{} (X) vs {} (O) over {} games",
        s.x_variant, s.o_variant, s.games_completed
    );
    println!(
        "  X wins {} ({:.1}%)  O wins {} ({:.1}%)  draws {}",
        s.x_wins,
        s.x_win_rate * 100.0,
        s.o_wins,
        s.o_win_rate * 100.0,
        s.draws
    );
    println!(
        "  avg length {:.1} plies  avg search X {:.1} ms / O {:.1} ms",
        s.avg_game_length, s.x_avg_search_ms, s.o_avg_search_ms
    );

    if let Some(path) = stats_path {
        stats.write_stats(path)?;
        info!(path = %path.display(), "Stats written");
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    init_tracing(&cli.log_level)?;
    info!(log_level = %cli.log_level, seed = cli.seed, "Tracing initialized");

    match &cli.command {
        Command::Think {
            moves,
            variant,
            search,
        } => think(cli.seed, moves, variant, search),
        Command::Play {
            games,
            x_variant,
            o_variant,
            log_interval,
            stats_path,
            search,
        } => play(
            cli.seed,
            *games,
            x_variant,
            o_variant,
            *log_interval,
            stats_path.as_deref(),
            search,
        ),
    }
}
