//! Graph data model
//!
//! A fixed set of nodes addressed by index plus an undirected, loop-free
//! adjacency relation stored as a packed upper-triangular matrix. Edges are
//! not stored as objects: edge `i` is the `i`-th set entry of the matrix in
//! row-major order, which gives crossing counting and render buffers the same
//! stable ordering.

use crate::error::{EngineError, EngineResult};
use crate::hyperbolic::{disk_project, to_hyperboloid};
use crate::vector::{Vec2, Vec3};

/// Number of nodes in a generated graph
pub const NODES: usize = 50;

/// Number of edges in a generated graph
pub const EDGES: usize = 61;

/// A node with its Euclidean position and the state derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    position: Vec2,
    hyperboloid: Vec3,
    disk: Vec2,
    /// Velocity carried between simulation ticks
    pub velocity: Vec2,
    /// Force accumulated during the current tick
    pub force: Vec2,
}

impl GraphNode {
    /// Create a node at rest at `position`
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            hyperboloid: to_hyperboloid(position),
            disk: disk_project(position, 1.0),
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
        }
    }

    /// Euclidean position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Position lifted onto the hyperboloid
    pub fn hyperboloid_point(&self) -> Vec3 {
        self.hyperboloid
    }

    /// Unscaled disk projection of the position
    pub fn disk_point(&self) -> Vec2 {
        self.disk
    }

    /// Move the node, recomputing the derived coordinates
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.hyperboloid = to_hyperboloid(position);
        self.disk = disk_project(position, 1.0);
    }

    /// Forget velocity and accumulated force
    pub fn reset_motion(&mut self) {
        self.velocity = Vec2::ZERO;
        self.force = Vec2::ZERO;
    }
}

/// An edge as a pair of node indices, `source < target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef {
    pub source: usize,
    pub target: usize,
}

/// Symmetric boolean relation over node pairs, upper triangle only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    nodes: usize,
    cells: Vec<bool>,
    edge_count: usize,
}

impl Adjacency {
    /// Empty relation over `nodes` nodes
    pub fn new(nodes: usize) -> Self {
        Self {
            nodes,
            cells: vec![false; Self::max_edges(nodes)],
            edge_count: 0,
        }
    }

    /// Number of distinct unordered pairs of `nodes` nodes
    pub fn max_edges(nodes: usize) -> usize {
        nodes * nodes.saturating_sub(1) / 2
    }

    pub fn node_count(&self) -> usize {
        self.nodes
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    // Row-major offset of (row, col), row < col
    fn cell(&self, a: usize, b: usize) -> Option<usize> {
        if a == b || a >= self.nodes || b >= self.nodes {
            return None;
        }
        let (row, col) = if a < b { (a, b) } else { (b, a) };
        Some(row * self.nodes - row * (row + 1) / 2 + (col - row - 1))
    }

    /// Whether `a` and `b` are adjacent; self pairs never are
    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.cell(a, b).is_some_and(|i| self.cells[i])
    }

    /// Set the pair `{a, b}`.
    ///
    /// Returns `Ok(true)` if the pair was new, `Ok(false)` for repeats and
    /// self pairs, which are never stored.
    pub fn insert(&mut self, a: usize, b: usize) -> EngineResult<bool> {
        for index in [a, b] {
            if index >= self.nodes {
                return Err(EngineError::NodeIndexOutOfRange {
                    index,
                    len: self.nodes,
                });
            }
        }
        let Some(cell) = self.cell(a, b) else {
            return Ok(false);
        };
        if self.cells[cell] {
            return Ok(false);
        }
        self.cells[cell] = true;
        self.edge_count += 1;
        Ok(true)
    }

    /// All set pairs in row-major upper-triangular order
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        (0..self.nodes).flat_map(move |source| {
            ((source + 1)..self.nodes)
                .filter(move |&target| self.contains(source, target))
                .map(move |target| EdgeRef { source, target })
        })
    }
}

/// Nodes plus adjacency
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    adjacency: Adjacency,
}

impl Graph {
    /// Build a graph from node positions and an adjacency relation of the same size
    pub fn new(positions: Vec<Vec2>, adjacency: Adjacency) -> EngineResult<Self> {
        if adjacency.node_count() != positions.len() {
            return Err(EngineError::SizeMismatch {
                positions: positions.len(),
                nodes: adjacency.node_count(),
            });
        }
        Ok(Self::from_parts(positions, adjacency))
    }

    // Callers guarantee the sizes agree
    pub(crate) fn from_parts(positions: Vec<Vec2>, adjacency: Adjacency) -> Self {
        debug_assert_eq!(positions.len(), adjacency.node_count());
        Self {
            nodes: positions.into_iter().map(GraphNode::new).collect(),
            adjacency,
        }
    }

    /// Build a graph from positions and an explicit edge list
    pub fn from_edges(positions: Vec<Vec2>, edges: &[(usize, usize)]) -> EngineResult<Self> {
        let mut adjacency = Adjacency::new(positions.len());
        for &(a, b) in edges {
            adjacency.insert(a, b)?;
        }
        Self::new(positions, adjacency)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [GraphNode] {
        &mut self.nodes
    }

    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Checked node access
    pub fn node(&self, index: usize) -> EngineResult<&GraphNode> {
        self.nodes
            .get(index)
            .ok_or(EngineError::NodeIndexOutOfRange {
                index,
                len: self.nodes.len(),
            })
    }

    /// Checked mutable node access
    pub fn node_mut(&mut self, index: usize) -> EngineResult<&mut GraphNode> {
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(EngineError::NodeIndexOutOfRange { index, len })
    }

    /// Move node `index`, keeping its derived coordinates in sync
    pub fn set_position(&mut self, index: usize, position: Vec2) -> EngineResult<()> {
        self.node_mut(index)?.set_position(position);
        Ok(())
    }

    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.adjacency.contains(a, b)
    }

    /// The `index`-th edge in row-major order, or `None` when the scan runs out
    pub fn edge_at(&self, index: usize) -> Option<EdgeRef> {
        self.adjacency.edges().nth(index)
    }

    /// Checked variant of [`Graph::edge_at`]
    pub fn edge(&self, index: usize) -> EngineResult<EdgeRef> {
        self.edge_at(index).ok_or(EngineError::EdgeIndexOutOfRange {
            index,
            len: self.edge_count(),
        })
    }

    /// All edges, same order as [`Graph::edge_at`]
    pub fn edges(&self) -> Vec<EdgeRef> {
        self.adjacency.edges().collect()
    }

    /// Euclidean positions of all nodes
    pub fn positions(&self) -> Vec<Vec2> {
        self.nodes.iter().map(GraphNode::position).collect()
    }

    /// Zero every node's velocity and force
    pub fn reset_motion(&mut self) {
        self.nodes.iter_mut().for_each(GraphNode::reset_motion);
    }
}
