//! Random graph generation
//!
//! Positions are drawn uniformly from `[-1, 1)²`; edges are drawn as uniform
//! unordered pairs of distinct nodes, repeats rejected, until the requested
//! count is reached. Connectivity is not guaranteed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::graph::{Adjacency, EDGES, Graph, NODES};
use crate::vector::Vec2;

/// Node and edge counts of generated graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphShape {
    pub nodes: usize,
    pub edges: usize,
}

impl Default for GraphShape {
    fn default() -> Self {
        Self {
            nodes: NODES,
            edges: EDGES,
        }
    }
}

impl GraphShape {
    /// Check that `edges` distinct pairs exist among `nodes` nodes
    pub fn validate(&self) -> EngineResult<()> {
        let max_edges = Adjacency::max_edges(self.nodes);
        if self.edges > max_edges {
            return Err(EngineError::InvalidShape {
                nodes: self.nodes,
                edges: self.edges,
                max_edges,
            });
        }
        Ok(())
    }
}

/// Produces fresh random graphs from an owned random source
#[derive(Debug, Clone)]
pub struct RandomGraphGenerator<R = ChaCha8Rng> {
    shape: GraphShape,
    rng: R,
}

impl RandomGraphGenerator<ChaCha8Rng> {
    /// Reproducible generator for the given seed
    pub fn seeded(shape: GraphShape, seed: u64) -> EngineResult<Self> {
        Self::with_rng(shape, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Generator seeded from operating system entropy
    pub fn from_entropy(shape: GraphShape) -> EngineResult<Self> {
        Self::with_rng(shape, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> RandomGraphGenerator<R> {
    /// Generator drawing from an injected random source
    pub fn with_rng(shape: GraphShape, rng: R) -> EngineResult<Self> {
        shape.validate()?;
        Ok(Self { shape, rng })
    }

    pub fn shape(&self) -> GraphShape {
        self.shape
    }

    /// Draw a complete new graph: positions first, then edges
    pub fn generate(&mut self) -> Graph {
        let positions = self.random_positions();
        let adjacency = self.random_adjacency();
        Graph::from_parts(positions, adjacency)
    }

    fn random_positions(&mut self) -> Vec<Vec2> {
        (0..self.shape.nodes)
            .map(|_| {
                let x = self.rng.gen_range(-1.0..1.0);
                let y = self.rng.gen_range(-1.0..1.0);
                Vec2::new(x, y)
            })
            .collect()
    }

    fn random_adjacency(&mut self) -> Adjacency {
        let nodes = self.shape.nodes;
        let mut adjacency = Adjacency::new(nodes);
        while adjacency.edge_count() < self.shape.edges {
            let a = self.rng.gen_range(0..nodes);
            let b = self.rng.gen_range(0..nodes);
            // repeats and self pairs come back Ok(false) and are drawn again
            if let Err(err) = adjacency.insert(a, b) {
                warn!(%err, "generated edge rejected");
            }
        }
        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_shape_matches_constants() {
        let shape = GraphShape::default();
        assert_eq!(shape.nodes, 50);
        assert_eq!(shape.edges, 61);
    }

    #[test]
    fn generates_exact_edge_count_without_self_pairs() {
        let mut generator = RandomGraphGenerator::seeded(GraphShape::default(), 7).unwrap();
        let graph = generator.generate();

        assert_eq!(graph.node_count(), NODES);
        assert_eq!(graph.edge_count(), EDGES);

        let edges = graph.edges();
        assert_eq!(edges.len(), EDGES);
        let unique: HashSet<(usize, usize)> = edges.iter().map(|e| (e.source, e.target)).collect();
        assert_eq!(unique.len(), EDGES, "duplicate pairs generated");
        assert!(edges.iter().all(|e| e.source < e.target));
    }

    #[test]
    fn positions_stay_in_unit_square() {
        let mut generator = RandomGraphGenerator::seeded(GraphShape::default(), 3).unwrap();
        let graph = generator.generate();
        for p in graph.positions() {
            assert!((-1.0..1.0).contains(&p.x), "x = {}", p.x);
            assert!((-1.0..1.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn same_seed_same_graph() {
        let a = RandomGraphGenerator::seeded(GraphShape::default(), 42)
            .unwrap()
            .generate();
        let b = RandomGraphGenerator::seeded(GraphShape::default(), 42)
            .unwrap()
            .generate();
        assert_eq!(a, b);
    }

    #[test]
    fn successive_graphs_differ() {
        let mut generator = RandomGraphGenerator::seeded(GraphShape::default(), 42).unwrap();
        let first = generator.generate();
        let second = generator.generate();
        assert_ne!(first.positions(), second.positions());
    }

    #[test]
    fn complete_graph_is_reachable() {
        let shape = GraphShape { nodes: 5, edges: 10 };
        let graph = RandomGraphGenerator::seeded(shape, 1).unwrap().generate();
        assert_eq!(graph.edge_count(), 10);
    }

    #[test]
    fn impossible_shape_is_rejected() {
        let shape = GraphShape { nodes: 4, edges: 7 };
        let err = RandomGraphGenerator::seeded(shape, 1).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidShape {
                nodes: 4,
                edges: 7,
                max_edges: 6
            }
        ));
    }
}
