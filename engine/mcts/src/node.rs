//! MCTS tree node representation.
//!
//! Each node represents a game state reached by taking an action from the parent.
//! Nodes store visit statistics used for UCB selection and the final recommendation.

use engine_core::{Game, PlayerId};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }
}

/// A node in the MCTS tree.
#[derive(Debug)]
pub struct MctsNode<G: Game> {
    /// Parent node index (NONE for root)
    pub parent: NodeId,

    /// Action that led to this node from parent (None for root)
    pub action: Option<G::Action>,

    /// Game state at this node
    pub state: G::State,

    /// Player to act in `state`
    pub to_move: PlayerId,

    /// Whether this is a terminal state (game over)
    pub is_terminal: bool,

    /// Number of simulations that passed through this node
    pub visit_count: u32,

    /// Sum of simulation rewards, always from the reference player's view.
    /// Mean = reward_sum / visit_count
    pub reward_sum: f64,

    /// Legal actions not yet expanded, in adapter order
    pub untried: Vec<G::Action>,

    /// Children: Vec of (action, NodeId) pairs in expansion order.
    pub children: Vec<(G::Action, NodeId)>,
}

impl<G: Game> MctsNode<G> {
    /// Create a new root node.
    pub fn new_root(
        state: G::State,
        to_move: PlayerId,
        legal_actions: Vec<G::Action>,
        is_terminal: bool,
    ) -> Self {
        Self::new_child(NodeId::NONE, None, state, to_move, legal_actions, is_terminal)
    }

    /// Create a new child node.
    pub fn new_child(
        parent: NodeId,
        action: Option<G::Action>,
        state: G::State,
        to_move: PlayerId,
        legal_actions: Vec<G::Action>,
        is_terminal: bool,
    ) -> Self {
        Self {
            parent,
            action,
            state,
            to_move,
            is_terminal,
            visit_count: 0,
            reward_sum: 0.0,
            untried: legal_actions,
            children: Vec::new(),
        }
    }

    /// Mean reward from the reference player's view.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_reward(&self) -> f64 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.reward_sum / self.visit_count as f64
        }
    }

    /// UCB score of this node as a child of a parent with `ln(N_parent)` = `parent_visits_ln`.
    ///
    /// UCB = exploitation + c * sqrt(ln(N_parent) / N)
    ///
    /// `exploitation` comes from the selection policy, which decides whose
    /// point of view the mean reward is read from. Unvisited nodes score
    /// +infinity so they are always tried first.
    #[inline]
    pub fn ucb_score(&self, exploitation: f64, parent_visits_ln: f64, c: f64) -> f64 {
        if self.visit_count == 0 {
            return f64::INFINITY;
        }
        exploitation + c * (parent_visits_ln / self.visit_count as f64).sqrt()
    }

    /// Every legal action has a child.
    #[inline]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried.is_empty()
    }

    /// No children in the current tree.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Child reached by `action`, if expanded.
    pub fn child(&self, action: G::Action) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use games_ultimate_tictactoe::{Action, State, UltimateTicTacToe};

    type Node = MctsNode<UltimateTicTacToe>;

    fn root() -> Node {
        let state = State::new();
        Node::new_root(state, PlayerId::ONE, state.legal_moves(), false)
    }

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = root();

        assert!(node.parent.is_none());
        assert!(node.action.is_none());
        assert_eq!(node.visit_count, 0);
        assert_eq!(node.reward_sum, 0.0);
        assert_eq!(node.untried.len(), 81);
        assert!(node.is_leaf());
        assert!(!node.is_fully_expanded());
    }

    #[test]
    fn test_mean_reward() {
        let mut node = root();

        // Unvisited
        assert_eq!(node.mean_reward(), 0.0);

        // After visits
        node.visit_count = 4;
        node.reward_sum = 2.0;
        assert!((node.mean_reward() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_score_unvisited_is_infinite() {
        let node = root();
        assert!(node.ucb_score(0.0, 10f64.ln(), 2f64.sqrt()).is_infinite());
    }

    #[test]
    fn test_ucb_score() {
        let mut node = root();
        node.visit_count = 10;
        node.reward_sum = 5.0;

        let parent_visits_ln = 100f64.ln();
        let c = 2f64.sqrt();

        // UCB = 0.5 + sqrt(2) * sqrt(ln(100) / 10) ≈ 0.5 + 0.9597
        let ucb = node.ucb_score(node.mean_reward(), parent_visits_ln, c);
        assert!((ucb - 1.4597).abs() < 1e-3);
    }

    #[test]
    fn test_child_lookup() {
        let mut node = root();
        node.children.push((Action::new(4, 4), NodeId(1)));

        assert!(!node.is_leaf());
        assert_eq!(node.child(Action::new(4, 4)), Some(NodeId(1)));
        assert_eq!(node.child(Action::new(0, 0)), None);
    }
}
