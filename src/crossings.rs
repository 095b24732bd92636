//! Edge crossing count, the layout quality metric
//!
//! Segments are taken between the Euclidean node positions. The test is the
//! classic determinant line-line intersection followed by a bounding-box check
//! on both segments. Parallel and collinear pairs (`d == 0`) are never counted,
//! even when they overlap.
//!
//! Counting is O(E²): about 1830 segment tests for 61 edges.

use crate::graph::Graph;
use crate::vector::Vec2;

/// Whether segment `a1-a2` meets segment `b1-b2`
pub fn segments_intersect(a1: Vec2, a2: Vec2, b1: Vec2, b2: Vec2) -> bool {
    let d = (a1.x - a2.x) * (b1.y - b2.y) - (a1.y - a2.y) * (b1.x - b2.x);
    if d == 0.0 {
        return false;
    }

    let pre = a1.x * a2.y - a1.y * a2.x;
    let post = b1.x * b2.y - b1.y * b2.x;
    let x = (pre * (b1.x - b2.x) - (a1.x - a2.x) * post) / d;
    let y = (pre * (b1.y - b2.y) - (a1.y - a2.y) * post) / d;

    within(x, a1.x, a2.x) && within(x, b1.x, b2.x) && within(y, a1.y, a2.y) && within(y, b1.y, b2.y)
}

fn within(value: f64, end_a: f64, end_b: f64) -> bool {
    value >= end_a.min(end_b) && value <= end_a.max(end_b)
}

/// Number of crossing edge pairs in the current layout.
///
/// Pairs of edges that share a node meet at that node by construction and are
/// not counted.
pub fn count_crossings(graph: &Graph) -> usize {
    let edges = graph.edges();
    let nodes = graph.nodes();
    let mut crossings = 0;

    for (i, e) in edges.iter().enumerate() {
        for f in &edges[i + 1..] {
            if e.source == f.source
                || e.source == f.target
                || e.target == f.source
                || e.target == f.target
            {
                continue;
            }
            if segments_intersect(
                nodes[e.source].position(),
                nodes[e.target].position(),
                nodes[f.source].position(),
                nodes[f.target].position(),
            ) {
                crossings += 1;
            }
        }
    }

    crossings
}
