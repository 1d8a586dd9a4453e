//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. A tree lives for exactly one search.

use engine_core::{Game, PlayerId};

use crate::node::{MctsNode, NodeId};
use crate::search::SearchError;
use crate::selection::SelectionPolicy;

/// MCTS tree with arena-based node storage.
#[derive(Debug)]
pub struct MctsTree<G: Game> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<G>>,

    /// Root node index (always 0 after initialization)
    root: NodeId,
}

impl<G: Game> MctsTree<G> {
    /// Create a new tree rooted at `root_state`.
    ///
    /// Fails with `EmptyLegalMoves` if the adapter reports a live state
    /// without legal actions.
    pub fn new(game: &G, root_state: G::State) -> Result<Self, SearchError> {
        let root_node = Self::make_node(game, NodeId::NONE, None, root_state)?;
        Ok(Self {
            nodes: vec![root_node],
            root: NodeId(0),
        })
    }

    fn make_node(
        game: &G,
        parent: NodeId,
        action: Option<G::Action>,
        state: G::State,
    ) -> Result<MctsNode<G>, SearchError> {
        let is_terminal = game.is_terminal(&state);
        let legal = if is_terminal {
            Vec::new()
        } else {
            game.legal_actions(&state)
        };
        if !is_terminal && legal.is_empty() {
            return Err(SearchError::EmptyLegalMoves);
        }
        let to_move = game.current_player(&state);
        Ok(MctsNode::new_child(
            parent,
            action,
            state,
            to_move,
            legal,
            is_terminal,
        ))
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<G> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<G> {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node and return its ID.
    fn allocate(&mut self, node: MctsNode<G>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the arena slice for read access.
    #[inline]
    pub fn arena(&self) -> &[MctsNode<G>] {
        &self.nodes
    }

    /// Expand `parent_id` along one of its untried actions.
    ///
    /// The action is removed from the parent's untried list and the new
    /// child is registered under it. Only the parent's untried list changes.
    pub fn expand(
        &mut self,
        game: &G,
        parent_id: NodeId,
        action: G::Action,
    ) -> Result<NodeId, SearchError> {
        let parent = self.get(parent_id);
        let position = parent
            .untried
            .iter()
            .position(|a| *a == action)
            .ok_or_else(|| {
                SearchError::IllegalAction(format!("{:?} is not an untried action", action))
            })?;
        let child_state = game.apply(&parent.state, action)?;
        let child = Self::make_node(game, parent_id, Some(action), child_state)?;
        let child_id = self.allocate(child);

        let parent = self.get_mut(parent_id);
        parent.untried.remove(position);
        parent.children.push((action, child_id));

        Ok(child_id)
    }

    /// Select the child of `node_id` with the highest UCB score.
    ///
    /// Unvisited children are returned immediately. On equal scores the
    /// first child in expansion order wins.
    pub fn select_child<P: SelectionPolicy + ?Sized>(
        &self,
        node_id: NodeId,
        policy: &P,
        reference: PlayerId,
        c: f64,
    ) -> Option<NodeId> {
        let node = self.get(node_id);
        // Pre-compute ln once instead of per child
        let parent_visits_ln = (node.visit_count.max(1) as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &(_, child_id) in &node.children {
            let child = self.get(child_id);
            if child.visit_count == 0 {
                return Some(child_id);
            }
            let exploitation = policy.exploitation(child.mean_reward(), node.to_move, reference);
            let score = child.ucb_score(exploitation, parent_visits_ln, c);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((child_id, score));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Backpropagate a reward from a leaf to the root.
    ///
    /// The reward is already from the reference player's view, so it is
    /// added unchanged at every level.
    pub fn backpropagate(&mut self, leaf_id: NodeId, reward: f64) {
        let mut current_id = leaf_id;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.visit_count += 1;
            node.reward_sum += reward;
            current_id = node.parent;
        }
    }

    /// Best action at the root.
    ///
    /// Most visits wins; ties go to the higher mean reward, then to the
    /// child expanded first. Returns None if the root has no children.
    pub fn best_action(&self) -> Option<G::Action> {
        let root = self.get(self.root);
        let mut best: Option<(G::Action, u32, f64)> = None;

        for &(action, child_id) in &root.children {
            let child = self.get(child_id);
            let (visits, mean) = (child.visit_count, child.mean_reward());
            let better = match best {
                None => true,
                Some((_, best_visits, best_mean)) => {
                    visits > best_visits || (visits == best_visits && mean > best_mean)
                }
            };
            if better {
                best = Some((action, visits, mean));
            }
        }

        best.map(|(action, _, _)| action)
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_reward(),
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.is_leaf() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f64,
    pub max_depth: u32,
}
