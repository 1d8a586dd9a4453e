//! MCTS configuration parameters.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Which selection/rollout pairing a search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    /// Single-perspective UCB1 with uniformly random playouts.
    Baseline,
    /// Min-max UCB1 with win/block heuristic playouts.
    #[default]
    Modified,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Baseline => "baseline",
            Variant::Modified => "modified",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown search variant '{0}' (expected 'baseline' or 'modified')")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baseline" | "random" => Ok(Variant::Baseline),
            "modified" | "heuristic" => Ok(Variant::Modified),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// Number of select/expand/rollout/backpropagate iterations per search.
    pub iterations: u32,

    /// Exploration constant `c` in the UCB formula.
    /// √2 is the textbook value for rewards in [-1, 1].
    pub exploration_constant: f64,

    /// Selection and rollout pairing.
    pub variant: Variant,

    /// Wall-clock budget. When set, searches run until the deadline instead of
    /// for a fixed iteration count.
    pub time_limit: Option<Duration>,

    /// Number of independent trees for root-parallel search (1 = single tree).
    pub trees: usize,

    /// Base seed for root-parallel search. Tree `i` uses stream `i` of this seed.
    pub seed: u64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            exploration_constant: std::f64::consts::SQRT_2,
            variant: Variant::Modified,
            time_limit: None,
            trees: 1,
            seed: 0,
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 200,
            ..Self::default()
        }
    }

    /// Builder pattern: set iteration budget.
    pub fn with_iterations(mut self, n: u32) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Builder pattern: set search variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Builder pattern: set wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Builder pattern: set root-parallel tree count.
    pub fn with_trees(mut self, trees: usize) -> Self {
        self.trees = trees;
        self
    }

    /// Builder pattern: set base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.iterations, 1000);
        assert!((config.exploration_constant - 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(config.variant, Variant::Modified);
        assert!(config.time_limit.is_none());
        assert_eq!(config.trees, 1);
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_iterations(100)
            .with_exploration(0.5)
            .with_variant(Variant::Baseline)
            .with_time_limit(Duration::from_millis(20))
            .with_trees(4)
            .with_seed(9);

        assert_eq!(config.iterations, 100);
        assert!((config.exploration_constant - 0.5).abs() < 1e-12);
        assert_eq!(config.variant, Variant::Baseline);
        assert_eq!(config.time_limit, Some(Duration::from_millis(20)));
        assert_eq!(config.trees, 4);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("baseline".parse::<Variant>().unwrap(), Variant::Baseline);
        assert_eq!(" Modified ".parse::<Variant>().unwrap(), Variant::Modified);
        assert_eq!("heuristic".parse::<Variant>().unwrap(), Variant::Modified);
        assert!("greedy".parse::<Variant>().is_err());
        assert_eq!(Variant::Baseline.to_string(), "baseline");
    }
}
