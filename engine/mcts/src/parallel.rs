//! Root-parallel search.
//!
//! Several independent trees are searched from the same root on the rayon
//! pool, each with its own RNG stream, and their root statistics are summed
//! by action. Combination happens in tree order, so the recommendation does
//! not depend on thread scheduling.

use engine_core::LineGame;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::MctsConfig;
use crate::search::{run_mcts, ChildStats, SearchError, SearchResult, SearchStats};

/// RNG for tree `index` of a root-parallel search.
pub fn tree_rng(base_seed: u64, index: usize) -> ChaCha20Rng {
    let mut rng = ChaCha20Rng::seed_from_u64(base_seed);
    rng.set_stream(index as u64);
    rng
}

/// Run `config.trees` independent searches and merge their root statistics.
///
/// With a single tree this is equivalent to [`run_mcts`] using
/// `tree_rng(config.seed, 0)`.
pub fn search_root_parallel<G: LineGame>(
    game: &G,
    state: &G::State,
    config: &MctsConfig,
) -> Result<SearchResult<G::Action>, SearchError> {
    let trees = config.trees.max(1);

    let results: Vec<Result<SearchResult<G::Action>, SearchError>> = (0..trees)
        .into_par_iter()
        .map(|index| {
            let mut rng = tree_rng(config.seed, index);
            run_mcts(game, state.clone(), config, &mut rng)
        })
        .collect();

    let results = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    let combined = combine(results);

    debug!(
        trees,
        action = ?combined.action,
        simulations = combined.simulations,
        "Root-parallel search complete"
    );

    Ok(combined)
}

/// Merge per-tree results. Children keep first-seen order across trees.
fn combine<A: Copy + PartialEq>(results: Vec<SearchResult<A>>) -> SearchResult<A> {
    let mut merged: Vec<(A, u32, f64)> = Vec::new();
    let mut stats = SearchStats::default();
    let mut simulations = 0;
    let mut reward_total = 0.0;
    let mut trivial = None;

    for result in results {
        if result.simulations == 0 {
            // Terminal or single-move roots are identical in every tree
            trivial.get_or_insert(result.action);
            continue;
        }
        simulations += result.simulations;
        reward_total += result.value * result.simulations as f64;
        stats.merge(&result.stats);

        for child in &result.children {
            let reward_sum = child.mean_reward * child.visits as f64;
            match merged.iter_mut().find(|(action, _, _)| *action == child.action) {
                Some(entry) => {
                    entry.1 += child.visits;
                    entry.2 += reward_sum;
                }
                None => merged.push((child.action, child.visits, reward_sum)),
            }
        }
    }

    let children: Vec<ChildStats<A>> = merged
        .into_iter()
        .map(|(action, visits, reward_sum)| ChildStats {
            action,
            visits,
            mean_reward: if visits > 0 {
                reward_sum / visits as f64
            } else {
                0.0
            },
        })
        .collect();

    let mut best: Option<&ChildStats<A>> = None;
    for child in &children {
        let better = match best {
            None => true,
            Some(b) => {
                child.visits > b.visits
                    || (child.visits == b.visits && child.mean_reward > b.mean_reward)
            }
        };
        if better {
            best = Some(child);
        }
    }

    let action = match best {
        Some(child) => Some(child.action),
        None => trivial.flatten(),
    };

    SearchResult {
        action,
        value: if simulations > 0 {
            reward_total / simulations as f64
        } else {
            0.0
        },
        children,
        simulations,
        stats,
    }
}
