//! MCTS search implementation.
//!
//! Implements the core MCTS loop:
//! 1. Selection: Traverse tree using UCB until a node with untried actions
//! 2. Expansion: Add one child for a random untried action
//! 3. Rollout: Play the child's state to the end with the rollout policy
//! 4. Backpropagation: Add the outcome to every node on the path

use std::time::{Duration, Instant};

use engine_core::{Game, GameError, LineGame, PlayerId};
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::{MctsConfig, Variant};
use crate::node::NodeId;
use crate::rollout::{HeuristicRollout, RandomRollout, RolloutPolicy};
use crate::selection::{MinimaxUcb1, SelectionPolicy, Ucb1};
use crate::tree::MctsTree;

/// Errors that can occur during MCTS search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("Search budget must be positive, got {0}")]
    InvalidBudget(u32),

    #[error("Illegal action during search: {0}")]
    IllegalAction(String),

    #[error("Adapter returned no legal moves for a non-terminal state")]
    EmptyLegalMoves,

    #[error("Game error: {0}")]
    Game(GameError),
}

impl From<GameError> for SearchError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::IllegalAction { action } => SearchError::IllegalAction(action),
            other => SearchError::Game(other),
        }
    }
}

/// Visit statistics for one root child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u32,
    /// Mean reward from the root player's view
    pub mean_reward: f64,
}

/// Timing and volume counters for one search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStats {
    /// Completed iterations
    pub iterations: u32,
    /// Total time spent in selection and expansion (microseconds)
    pub selection_time_us: u64,
    /// Total time spent in rollouts (microseconds)
    pub rollout_time_us: u64,
    /// Total time spent in backpropagation (microseconds)
    pub backprop_time_us: u64,
    /// Moves played across all rollouts
    pub rollout_plies: u64,
    /// Iterations whose expanded leaf was already terminal
    pub terminal_hits: u32,
    /// Nodes in the tree when the search finished
    pub tree_nodes: usize,
}

impl SearchStats {
    /// Fold another tree's counters into this one.
    pub fn merge(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.selection_time_us += other.selection_time_us;
        self.rollout_time_us += other.rollout_time_us;
        self.backprop_time_us += other.backprop_time_us;
        self.rollout_plies += other.rollout_plies;
        self.terminal_hits += other.terminal_hits;
        self.tree_nodes += other.tree_nodes;
    }

    /// Average rollout length in plies.
    pub fn avg_rollout_plies(&self) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            self.rollout_plies as f64 / self.iterations as f64
        }
    }
}

/// Result of an MCTS search.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Best action to take. None when the root state is already terminal.
    pub action: Option<A>,

    /// Per-child statistics at the root, in expansion order
    pub children: Vec<ChildStats<A>>,

    /// Mean reward at the root, from the root player's view
    pub value: f64,

    /// Number of simulations performed (root visit count)
    pub simulations: u32,

    pub stats: SearchStats,
}

impl<A: Copy> SearchResult<A> {
    /// A result that needed no iterations.
    fn trivial(action: Option<A>) -> Self {
        Self {
            action,
            children: Vec::new(),
            value: 0.0,
            simulations: 0,
            stats: SearchStats::default(),
        }
    }

    /// Visit share of each root child.
    pub fn visit_distribution(&self) -> Vec<(A, f32)> {
        let total: u32 = self.children.iter().map(|c| c.visits).sum();
        self.children
            .iter()
            .map(|c| {
                let share = if total > 0 {
                    c.visits as f32 / total as f32
                } else {
                    0.0
                };
                (c.action, share)
            })
            .collect()
    }
}

/// MCTS search state.
///
/// Generic over the game, the child selection rule and the playout policy so
/// both variants share one driver.
pub struct MctsSearch<'a, G, S, R>
where
    G: Game,
    S: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    tree: MctsTree<G>,
    game: &'a G,
    selection: S,
    rollout: R,
    config: MctsConfig,
    /// Player to move at the root; all rewards are from this player's view
    reference: PlayerId,
    stats: SearchStats,
}

impl<'a, G, S, R> MctsSearch<'a, G, S, R>
where
    G: Game,
    S: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    /// Create a new MCTS search from the given game state.
    pub fn new(
        game: &'a G,
        selection: S,
        rollout: R,
        config: MctsConfig,
        state: G::State,
    ) -> Result<Self, SearchError> {
        let reference = game.current_player(&state);
        let tree = MctsTree::new(game, state)?;

        Ok(Self {
            tree,
            game,
            selection,
            rollout,
            config,
            reference,
            stats: SearchStats::default(),
        })
    }

    /// Run the configured number of iterations.
    pub fn run(&mut self, rng: &mut ChaCha20Rng) -> Result<SearchResult<G::Action>, SearchError> {
        if self.config.iterations == 0 {
            return Err(SearchError::InvalidBudget(0));
        }
        if let Some(result) = self.trivial_result() {
            return Ok(result);
        }

        for _ in 0..self.config.iterations {
            self.simulate(rng)?;
        }

        self.finish()
    }

    /// Run iterations until `limit` has elapsed. At least one iteration runs.
    pub fn run_for(
        &mut self,
        limit: Duration,
        rng: &mut ChaCha20Rng,
    ) -> Result<SearchResult<G::Action>, SearchError> {
        if limit.is_zero() {
            return Err(SearchError::InvalidBudget(0));
        }
        if let Some(result) = self.trivial_result() {
            return Ok(result);
        }

        let start = Instant::now();
        loop {
            self.simulate(rng)?;
            if start.elapsed() >= limit {
                break;
            }
        }

        self.finish()
    }

    /// Shortcut for a terminal root or a root with exactly one legal action.
    fn trivial_result(&self) -> Option<SearchResult<G::Action>> {
        let root = self.tree.get(self.tree.root());
        if root.is_terminal {
            return Some(SearchResult::trivial(None));
        }
        match root.untried.as_slice() {
            [only] if root.children.is_empty() => Some(SearchResult::trivial(Some(*only))),
            _ => None,
        }
    }

    /// Run a single simulation (select/expand -> rollout -> backpropagate).
    fn simulate(&mut self, rng: &mut ChaCha20Rng) -> Result<(), SearchError> {
        let select_start = Instant::now();
        let (leaf_id, depth) = self.select_and_expand(rng)?;
        self.stats.selection_time_us += select_start.elapsed().as_micros() as u64;

        let rollout_start = Instant::now();
        let leaf = self.tree.get(leaf_id);
        if leaf.is_terminal {
            self.stats.terminal_hits += 1;
        }
        let playout = self
            .rollout
            .simulate(self.game, &leaf.state, self.reference, rng)?;
        self.stats.rollout_time_us += rollout_start.elapsed().as_micros() as u64;
        self.stats.rollout_plies += playout.plies as u64;

        let reward = playout.outcome.reward();
        let backprop_start = Instant::now();
        self.tree.backpropagate(leaf_id, reward);
        self.stats.backprop_time_us += backprop_start.elapsed().as_micros() as u64;
        self.stats.iterations += 1;

        trace!(
            leaf = leaf_id.0,
            depth,
            plies = playout.plies,
            reward,
            "MCTS simulation complete"
        );

        Ok(())
    }

    /// Walk down by UCB and expand one random untried action.
    ///
    /// Returns the new leaf (or the terminal node reached) and its depth.
    fn select_and_expand(&mut self, rng: &mut ChaCha20Rng) -> Result<(NodeId, u32), SearchError> {
        let mut current = self.tree.root();
        let mut depth = 0;

        loop {
            let node = self.tree.get(current);

            if !node.is_fully_expanded() {
                let action = node.untried[rng.gen_range(0..node.untried.len())];
                let child = self.tree.expand(self.game, current, action)?;
                return Ok((child, depth + 1));
            }

            match self.tree.select_child(
                current,
                &self.selection,
                self.reference,
                self.config.exploration_constant,
            ) {
                Some(child_id) => {
                    current = child_id;
                    depth += 1;
                }
                // Fully expanded without children: terminal
                None => return Ok((current, depth)),
            }
        }
    }

    fn finish(&mut self) -> Result<SearchResult<G::Action>, SearchError> {
        self.stats.tree_nodes = self.tree.len();

        let action = self
            .tree
            .best_action()
            .ok_or(SearchError::EmptyLegalMoves)?;
        let root = self.tree.get(self.tree.root());
        let children = root
            .children
            .iter()
            .map(|&(action, id)| {
                let child = self.tree.get(id);
                ChildStats {
                    action,
                    visits: child.visit_count,
                    mean_reward: child.mean_reward(),
                }
            })
            .collect();

        debug!(
            action = ?action,
            simulations = root.visit_count,
            value = root.mean_reward(),
            nodes = self.stats.tree_nodes,
            max_depth = self.tree.stats().max_depth,
            avg_plies = self.stats.avg_rollout_plies(),
            "MCTS search complete"
        );

        Ok(SearchResult {
            action: Some(action),
            children,
            value: root.mean_reward(),
            simulations: root.visit_count,
            stats: self.stats.clone(),
        })
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &MctsTree<G> {
        &self.tree
    }

    /// Player whose perspective all rewards use.
    pub fn reference(&self) -> PlayerId {
        self.reference
    }
}

/// Convenience function to run a single search with the configured variant.
///
/// Uses the wall-clock budget when `config.time_limit` is set, otherwise the
/// iteration budget.
pub fn run_mcts<G: LineGame>(
    game: &G,
    state: G::State,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Action>, SearchError> {
    match config.variant {
        Variant::Baseline => {
            let search = MctsSearch::new(game, Ucb1, RandomRollout, config.clone(), state)?;
            drive(search, config, rng)
        }
        Variant::Modified => {
            let search =
                MctsSearch::new(game, MinimaxUcb1, HeuristicRollout, config.clone(), state)?;
            drive(search, config, rng)
        }
    }
}

fn drive<G, S, R>(
    mut search: MctsSearch<'_, G, S, R>,
    config: &MctsConfig,
    rng: &mut ChaCha20Rng,
) -> Result<SearchResult<G::Action>, SearchError>
where
    G: Game,
    S: SelectionPolicy,
    R: RolloutPolicy<G>,
{
    match config.time_limit {
        Some(limit) => search.run_for(limit, rng),
        None => search.run(rng),
    }
}

/// Search `state` for `iterations` iterations and return the recommended move.
pub fn search<G: LineGame>(
    game: &G,
    state: G::State,
    iterations: u32,
    variant: Variant,
    rng: &mut ChaCha20Rng,
) -> Result<Option<G::Action>, SearchError> {
    let config = MctsConfig::default()
        .with_iterations(iterations)
        .with_variant(variant);
    run_mcts(game, state, &config, rng).map(|result| result.action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::Outcome;
    use games_ultimate_tictactoe::{Action, State, UltimateTicTacToe};
    use rand::SeedableRng;

    fn opening() -> State {
        State::from_moves(&[Action::new(4, 0), Action::new(0, 4)]).unwrap()
    }

    /// X owns boards 0 and 1, O owns 5 and 8. X to move in board 2 with two
    /// options: 2:2 wins the game, 2:5 lets O win board 2 and the game.
    fn game_winning_move() -> State {
        let x_won = [1u8, 1, 1, 2, 2, 0, 0, 0, 0];
        let o_won = [2u8, 2, 2, 1, 1, 0, 0, 0, 0];
        let mut cells = [[0u8; 9]; 9];
        cells[0] = x_won;
        cells[1] = x_won;
        cells[5] = o_won;
        cells[8] = o_won;
        cells[2] = [1, 1, 0, 2, 2, 0, 2, 1, 2];
        State::from_cells(cells, 1, Some(2)).unwrap()
    }

    #[test]
    fn test_basic_search_returns_legal_action() {
        let game = UltimateTicTacToe::new();
        let state = opening();
        let mut rng = ChaCha20Rng::seed_from_u64(42);

        for variant in [Variant::Baseline, Variant::Modified] {
            let config = MctsConfig::for_testing().with_variant(variant);
            let result = run_mcts(&game, state, &config, &mut rng).unwrap();

            let action = result.action.unwrap();
            assert!(game.legal_actions(&state).contains(&action));
            assert_eq!(result.simulations, config.iterations);
            assert_eq!(result.stats.iterations, config.iterations);
        }
    }

    #[test]
    fn test_budget_conservation() {
        let game = UltimateTicTacToe::new();
        let config = MctsConfig::for_testing().with_iterations(137);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let mut search =
            MctsSearch::new(&game, Ucb1, RandomRollout, config, State::new()).unwrap();
        let result = search.run(&mut rng).unwrap();

        let tree = search.tree();
        assert_eq!(tree.get(tree.root()).visit_count, 137);
        assert_eq!(result.children.iter().map(|c| c.visits).sum::<u32>(), 137);
    }

    #[test]
    fn test_outcome_bounds_and_visit_counts() {
        let game = UltimateTicTacToe::new();
        let config = MctsConfig::for_testing().with_iterations(300);
        let mut rng = ChaCha20Rng::seed_from_u64(5);

        let mut search =
            MctsSearch::new(&game, MinimaxUcb1, HeuristicRollout, config, opening()).unwrap();
        search.run(&mut rng).unwrap();

        let tree = search.tree();
        for node in tree.arena() {
            assert!(node.reward_sum.abs() <= node.visit_count as f64 + 1e-9);
            let child_visits: u32 = node
                .children
                .iter()
                .map(|(_, id)| tree.get(*id).visit_count)
                .sum();
            // The node's own expansion iteration is the one not passed to a child
            if node.parent.is_some() && !node.is_terminal {
                assert_eq!(node.visit_count, child_visits + 1);
            }
        }
    }

    #[test]
    fn test_determinism_for_fixed_seed() {
        let game = UltimateTicTacToe::new();
        let run = |variant| {
            let config = MctsConfig::for_testing().with_variant(variant);
            let mut rng = ChaCha20Rng::seed_from_u64(2024);
            run_mcts(&game, opening(), &config, &mut rng).unwrap()
        };

        for variant in [Variant::Baseline, Variant::Modified] {
            let a = run(variant);
            let b = run(variant);
            assert_eq!(a.action, b.action);
            assert_eq!(a.children, b.children);
        }
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let game = UltimateTicTacToe::new();
        let mut rng = ChaCha20Rng::seed_from_u64(0);

        let err = search(&game, State::new(), 0, Variant::Modified, &mut rng).unwrap_err();
        assert_eq!(err, SearchError::InvalidBudget(0));

        let mut search = MctsSearch::new(
            &game,
            Ucb1,
            RandomRollout,
            MctsConfig::default(),
            State::new(),
        )
        .unwrap();
        assert_eq!(
            search.run_for(Duration::ZERO, &mut rng).unwrap_err(),
            SearchError::InvalidBudget(0)
        );
    }

    #[test]
    fn test_single_legal_action_shortcut() {
        let game = UltimateTicTacToe::new();
        let mut cells = [[0u8; 9]; 9];
        // Board 4 has one empty cell and no line
        cells[4] = [1, 2, 1, 1, 2, 2, 2, 1, 0];
        let state = State::from_cells(cells, 1, Some(4)).unwrap();
        assert_eq!(game.legal_actions(&state), vec![Action::new(4, 8)]);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let config = MctsConfig::for_testing();
        let mut search = MctsSearch::new(&game, Ucb1, RandomRollout, config, state).unwrap();
        let result = search.run(&mut rng).unwrap();

        assert_eq!(result.action, Some(Action::new(4, 8)));
        assert_eq!(result.simulations, 0);
        assert_eq!(search.tree().get(search.tree().root()).visit_count, 0);
    }

    #[test]
    fn test_terminal_root_has_no_action() {
        let game = UltimateTicTacToe::new();
        let won = [2u8, 2, 2, 1, 1, 0, 1, 0, 0];
        let mut cells = [[0u8; 9]; 9];
        cells[2] = won;
        cells[4] = won;
        cells[6] = won;
        let state = State::from_cells(cells, 1, None).unwrap();
        assert!(game.is_terminal(&state));

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let action = search(&game, state, 50, Variant::Baseline, &mut rng).unwrap();
        assert_eq!(action, None);
    }

    #[test]
    fn test_game_winning_move_is_chosen() {
        let game = UltimateTicTacToe::new();
        let state = game_winning_move();
        assert_eq!(
            game.legal_actions(&state),
            vec![Action::new(2, 2), Action::new(2, 5)]
        );

        for variant in [Variant::Baseline, Variant::Modified] {
            let mut rng = ChaCha20Rng::seed_from_u64(42);
            let action = search(&game, state, 300, variant, &mut rng).unwrap();
            assert_eq!(action, Some(Action::new(2, 2)), "{} variant", variant);
        }
    }

    #[test]
    fn test_winning_child_has_positive_value() {
        let game = UltimateTicTacToe::new();
        let config = MctsConfig::for_testing().with_iterations(300);
        let mut rng = ChaCha20Rng::seed_from_u64(8);

        let mut search = MctsSearch::new(
            &game,
            MinimaxUcb1,
            HeuristicRollout,
            config,
            game_winning_move(),
        )
        .unwrap();
        let result = search.run(&mut rng).unwrap();

        let winning = result
            .children
            .iter()
            .find(|c| c.action == Action::new(2, 2))
            .expect("winning move should be expanded");
        assert_eq!(winning.mean_reward, 1.0);
        assert!(result.value > 0.0);
        assert_eq!(search.reference(), PlayerId::ONE);
        assert!(result.stats.terminal_hits > 0);
    }

    #[test]
    fn test_run_for_respects_deadline() {
        let game = UltimateTicTacToe::new();
        let config = MctsConfig::for_testing().with_time_limit(Duration::from_millis(30));
        let mut rng = ChaCha20Rng::seed_from_u64(3);

        let start = Instant::now();
        let result = run_mcts(&game, State::new(), &config, &mut rng).unwrap();

        assert!(result.simulations >= 1);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(result.action.is_some());
    }

    #[test]
    fn test_visit_distribution_matches_child_visits() {
        let game = UltimateTicTacToe::new();
        let config = MctsConfig::for_testing().with_iterations(120);
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let result = run_mcts(&game, opening(), &config, &mut rng).unwrap();

        let distribution = result.visit_distribution();
        assert_eq!(distribution.len(), result.children.len());
        for ((action, share), child) in distribution.iter().zip(&result.children) {
            assert_eq!(*action, child.action);
            assert!((*share - child.visits as f32 / 120.0).abs() < 1e-6);
        }
        let total: f32 = distribution.iter().map(|(_, share)| share).sum();
        assert!((total - 1.0).abs() < 1e-4);

        assert!(SearchResult::<Action>::trivial(None).visit_distribution().is_empty());
    }

    /// Counts down to zero, where it is stuck: no legal moves yet never over.
    #[derive(Debug)]
    struct DeadEnd;

    impl Game for DeadEnd {
        type State = u8;
        type Action = u8;

        fn legal_actions(&self, state: &u8) -> Vec<u8> {
            if *state == 0 {
                Vec::new()
            } else {
                vec![0, 1]
            }
        }

        fn apply(&self, state: &u8, action: u8) -> Result<u8, GameError> {
            if *state == 0 || action > 1 {
                return Err(GameError::illegal(&action));
            }
            Ok(state - 1)
        }

        fn is_terminal(&self, _state: &u8) -> bool {
            false
        }

        fn outcome(&self, _state: &u8, _player: PlayerId) -> Result<Outcome, GameError> {
            Err(GameError::NotTerminal)
        }

        fn current_player(&self, state: &u8) -> PlayerId {
            if state % 2 == 0 {
                PlayerId::ONE
            } else {
                PlayerId::TWO
            }
        }
    }

    impl LineGame for DeadEnd {
        fn completes_line(&self, _state: &u8, _action: u8, _player: PlayerId) -> bool {
            false
        }
    }

    #[test]
    fn test_empty_legal_moves_at_root() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for variant in [Variant::Baseline, Variant::Modified] {
            assert_eq!(
                search(&DeadEnd, 0, 10, variant, &mut rng),
                Err(SearchError::EmptyLegalMoves)
            );
        }
    }

    #[test]
    fn test_empty_legal_moves_below_root() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        for variant in [Variant::Baseline, Variant::Modified] {
            assert_eq!(
                search(&DeadEnd, 1, 10, variant, &mut rng),
                Err(SearchError::EmptyLegalMoves)
            );
        }
    }

    #[test]
    fn test_empty_legal_moves_in_rollout() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(
            RandomRollout.simulate(&DeadEnd, &0, PlayerId::ONE, &mut rng),
            Err(SearchError::EmptyLegalMoves)
        );
        assert_eq!(
            HeuristicRollout.simulate(&DeadEnd, &2, PlayerId::ONE, &mut rng),
            Err(SearchError::EmptyLegalMoves)
        );
    }

    #[test]
    fn test_illegal_action_from_adapter_maps() {
        let err: SearchError = GameError::illegal(&Action::new(9, 9)).into();
        assert!(matches!(err, SearchError::IllegalAction(_)));

        let err: SearchError = GameError::NotTerminal.into();
        assert_eq!(err, SearchError::Game(GameError::NotTerminal));
    }
}
