//! Render-side view of the graph
//!
//! The engine never draws. After every mutation it hands a [`RenderSnapshot`]
//! of disk-projected coordinates to whatever [`RenderBackend`] the host wired
//! in.

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::hyperbolic::disk_project;
use crate::vector::Vec2;

/// Default magnification of the disk projection
pub const DEFAULT_DISK_SCALE: f64 = 1.0;

/// Default Euclidean radius of a node marker
pub const DEFAULT_NODE_RADIUS: f64 = 0.03;

/// Default number of vertices per node marker
pub const DEFAULT_CIRCLE_RESOLUTION: usize = 16;

/// Rendering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub disk_scale: f64,
    pub node_radius: f64,
    pub circle_resolution: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            disk_scale: DEFAULT_DISK_SCALE,
            node_radius: DEFAULT_NODE_RADIUS,
            circle_resolution: DEFAULT_CIRCLE_RESOLUTION,
        }
    }
}

/// Disk coordinates of every node, edge and node outline, in graph order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// One point per node, node index order
    pub nodes: Vec<Vec2>,
    /// One segment per edge, row-major edge order
    pub edges: Vec<[Vec2; 2]>,
    /// `circle_resolution` outline vertices per node, node index order
    pub outlines: Vec<Vec2>,
}

impl RenderSnapshot {
    pub fn capture(graph: &Graph, config: &RenderConfig) -> Self {
        Self {
            nodes: node_disk_coordinates(graph, config.disk_scale),
            edges: edge_disk_coordinates(graph, config.disk_scale),
            outlines: outline_vertices(graph, config),
        }
    }
}

/// Disk coordinates of every node
pub fn node_disk_coordinates(graph: &Graph, scale: f64) -> Vec<Vec2> {
    graph
        .nodes()
        .iter()
        .map(|node| node.disk_point() * scale)
        .collect()
}

/// Disk coordinates of both endpoints of every edge
pub fn edge_disk_coordinates(graph: &Graph, scale: f64) -> Vec<[Vec2; 2]> {
    let nodes = graph.nodes();
    graph
        .edges()
        .into_iter()
        .map(|edge| {
            [
                nodes[edge.source].disk_point() * scale,
                nodes[edge.target].disk_point() * scale,
            ]
        })
        .collect()
}

/// Vertices of a small Euclidean circle around `center`, each disk-projected.
///
/// The circle is drawn in the plane before projection, so markers shrink and
/// flatten towards the rim of the disk.
pub fn node_outline(center: Vec2, radius: f64, resolution: usize, scale: f64) -> Vec<Vec2> {
    (0..resolution)
        .map(|j| {
            let angle = j as f64 / resolution as f64 * std::f64::consts::TAU;
            let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
            disk_project(p, scale)
        })
        .collect()
}

/// Outline vertices for all nodes, back to back (`resolution` per node)
pub fn outline_vertices(graph: &Graph, config: &RenderConfig) -> Vec<Vec2> {
    graph
        .nodes()
        .iter()
        .flat_map(|node| {
            node_outline(
                node.position(),
                config.node_radius,
                config.circle_resolution,
                config.disk_scale,
            )
        })
        .collect()
}

/// Consumer of snapshots, implemented by the host's renderer
pub trait RenderBackend {
    /// Called after every change to the graph
    fn redraw(&mut self, snapshot: &RenderSnapshot);
}

/// Backend that keeps the last snapshot and counts frames; used by headless hosts
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub frames: usize,
    pub last: Option<RenderSnapshot>,
}

impl RenderBackend for RecordingBackend {
    fn redraw(&mut self, snapshot: &RenderSnapshot) {
        self.frames += 1;
        self.last = Some(snapshot.clone());
    }
}
