//! Restart-based layout search
//!
//! Regenerates the whole graph over and over, keeping whichever instance has
//! the fewest edge crossings. Stops when the trial budget runs out or the
//! crossing count falls to a fraction of where it started. This is a
//! randomized best-of-N search: nothing guarantees a global optimum.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::crossings::count_crossings;
use crate::generator::RandomGraphGenerator;
use crate::graph::Graph;

/// Default number of regenerated candidates per search
pub const DEFAULT_MAX_TRIALS: usize = 300;

/// Default stopping target, relative to the starting crossing count
pub const DEFAULT_TARGET_RATIO: f64 = 0.7;

/// Configuration for the layout search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Maximum number of candidates generated per search
    pub max_trials: usize,
    /// Stop once crossings drop to `ratio × initial` (truncated); `None` spends the whole budget
    pub target_ratio: Option<f64>,
    /// Stop at the first candidate that beats the starting graph
    pub stop_on_first_improvement: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            target_ratio: Some(DEFAULT_TARGET_RATIO),
            stop_on_first_improvement: false,
        }
    }
}

/// Outcome of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptimizeReport {
    pub initial_crossings: usize,
    pub best_crossings: usize,
    /// Candidates generated
    pub trials: usize,
    /// Candidates that beat the best so far
    pub improvements: usize,
}

impl OptimizeReport {
    /// Whether the committed graph differs from the one the search started with
    pub fn replaced(&self) -> bool {
        self.improvements > 0
    }
}

/// Best-of-N search over freshly generated graphs
#[derive(Debug, Clone, Default)]
pub struct LayoutOptimizer {
    config: OptimizerConfig,
}

impl LayoutOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Crossing count at which the search stops early
    pub fn target_for(&self, initial_crossings: usize) -> usize {
        self.config
            .target_ratio
            .map(|ratio| (initial_crossings as f64 * ratio) as usize)
            .unwrap_or(0)
    }

    /// Search for a graph with fewer crossings and commit the best one into `graph`.
    ///
    /// The committed graph never has more crossings than the starting one. When
    /// a candidate wins, every node, edge and bit of physics state in `graph`
    /// is replaced.
    pub fn optimize<R: Rng>(
        &self,
        graph: &mut Graph,
        generator: &mut RandomGraphGenerator<R>,
    ) -> OptimizeReport {
        let initial_crossings = count_crossings(graph);
        let target = self.target_for(initial_crossings);

        let mut best_crossings = initial_crossings;
        let mut best: Option<Graph> = None;
        let mut trials = 0;
        let mut improvements = 0;

        while best_crossings > target && trials < self.config.max_trials {
            trials += 1;
            let candidate = generator.generate();
            let crossings = count_crossings(&candidate);
            if crossings < best_crossings {
                debug!(trial = trials, crossings, previous = best_crossings, "accepted candidate");
                best_crossings = crossings;
                best = Some(candidate);
                improvements += 1;
                if self.config.stop_on_first_improvement {
                    break;
                }
            }
        }

        if let Some(best) = best {
            *graph = best;
        }

        info!(
            initial_crossings,
            best_crossings, trials, improvements, "layout search finished"
        );

        OptimizeReport {
            initial_crossings,
            best_crossings,
            trials,
            improvements,
        }
    }
}
