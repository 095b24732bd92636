//! Hyperbolic panning driven by pointer drags
//!
//! A drag step from `start` to `target` (normalized device coordinates) becomes
//! an isometry of the hyperbolic plane applied to every node: two point
//! reflections through mirrors placed on the geodesic from `start` to
//! `target`. Reflecting through `m1` and then `m2` translates along that
//! geodesic by twice the `m1`-`m2` distance, so with the default mirrors at
//! 1/10 and 6/10 of the way the point under the pointer lands exactly on
//! `target`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{EngineError, EngineResult};
use crate::graph::Graph;
use crate::hyperbolic::{
    from_hyperboloid, hyperbolic_distance, reflect_through, to_hyperboloid, translate_towards,
};
use crate::vector::Vec2;

/// Per-step offset used by `DragTarget::FixedOffset`
pub const DEFAULT_FIXED_OFFSET: Vec2 = Vec2::new(0.004, 0.0);

/// Drag steps shorter than this hyperbolic distance are ignored
pub const DEFAULT_MIN_DRAG_DISTANCE: f64 = 1e-3;

/// Where each drag step translates to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragTarget {
    /// From the previous pointer position to the current one
    #[default]
    PointerDelta,
    /// From the origin to `fixed_offset` on every step, wherever the pointer is
    FixedOffset,
}

/// Tunables of the drag controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub target: DragTarget,
    pub fixed_offset: Vec2,
    /// Position of the first mirror as a fraction of the step's geodesic
    pub first_mirror: f64,
    /// Position of the second mirror as a fraction of the step's geodesic
    pub second_mirror: f64,
    pub min_distance: f64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            target: DragTarget::PointerDelta,
            fixed_offset: DEFAULT_FIXED_OFFSET,
            first_mirror: 0.1,
            second_mirror: 0.6,
            min_distance: DEFAULT_MIN_DRAG_DISTANCE,
        }
    }
}

impl DragConfig {
    pub fn validate(&self) -> EngineResult<()> {
        for (name, fraction) in [
            ("first_mirror", self.first_mirror),
            ("second_mirror", self.second_mirror),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(EngineError::Config(format!(
                    "drag.{name} must lie in (0, 1], got {fraction}"
                )));
            }
        }
        if self.min_distance.is_nan() || self.min_distance < 0.0 {
            return Err(EngineError::Config(format!(
                "drag.min_distance must not be negative, got {}",
                self.min_distance
            )));
        }
        Ok(())
    }
}

/// What a pointer move did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// First move after a press: the anchor was recorded, nothing moved
    Anchored,
    /// The step was too short to define a direction
    Skipped { distance: f64 },
    /// Every node was translated by `distance`
    Moved { distance: f64 },
}

impl DragOutcome {
    /// Whether the graph changed and needs a redraw
    pub fn moved(&self) -> bool {
        matches!(self, DragOutcome::Moved { .. })
    }
}

/// Turns pointer motion into hyperbolic translations of the whole graph
#[derive(Debug, Clone, Default)]
pub struct HyperbolicDragController {
    config: DragConfig,
    anchor: Option<Vec2>,
}

impl HyperbolicDragController {
    pub fn new(config: DragConfig) -> Self {
        Self {
            config,
            anchor: None,
        }
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    /// Current anchor, if a drag is in progress
    pub fn anchor(&self) -> Option<Vec2> {
        self.anchor
    }

    /// Pointer pressed: the next move starts a new drag
    pub fn press(&mut self) {
        self.anchor = None;
    }

    /// Pointer moved to `pointer` (normalized device coordinates)
    pub fn pointer_move(&mut self, graph: &mut Graph, pointer: Vec2) -> DragOutcome {
        let Some(anchor) = self.anchor else {
            self.anchor = Some(pointer);
            return DragOutcome::Anchored;
        };

        let (start, target) = match self.config.target {
            DragTarget::PointerDelta => (anchor, pointer),
            DragTarget::FixedOffset => (Vec2::ZERO, self.config.fixed_offset),
        };

        match self.translate(graph, start, target) {
            Ok(distance) => {
                self.anchor = Some(pointer);
                DragOutcome::Moved { distance }
            }
            Err(EngineError::DegenerateGeometry { distance }) => {
                debug!(distance, "drag step too short, skipped");
                DragOutcome::Skipped { distance }
            }
            Err(err) => {
                warn!(%err, "drag step failed, skipped");
                DragOutcome::Skipped { distance: 0.0 }
            }
        }
    }

    /// Apply the isometry carrying `start` to `target` to every node.
    ///
    /// Returns the hyperbolic length of the step. Steps no longer than
    /// `min_distance` fail with [`EngineError::DegenerateGeometry`] and leave
    /// the graph untouched.
    pub fn translate(&self, graph: &mut Graph, start: Vec2, target: Vec2) -> EngineResult<f64> {
        let p = to_hyperboloid(start);
        let q = to_hyperboloid(target);
        let distance = hyperbolic_distance(p, q);
        if distance <= self.config.min_distance {
            return Err(EngineError::DegenerateGeometry { distance });
        }

        let m1 = translate_towards(p, q, distance * self.config.first_mirror)?;
        let m2 = translate_towards(p, q, distance * self.config.second_mirror)?;
        trace!(
            pq = distance,
            m1m2 = hyperbolic_distance(m1, m2),
            "drag step"
        );

        for node in graph.nodes_mut() {
            let image = reflect_through(reflect_through(node.hyperboloid_point(), m1), m2);
            node.set_position(from_hyperboloid(image));
        }
        Ok(distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Graph {
        Graph::from_edges(
            vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(0.3, 0.1),
                Vec2::new(-0.4, 0.5),
                Vec2::new(0.2, -0.6),
            ],
            &[(0, 1), (1, 2), (2, 3)],
        )
        .unwrap()
    }

    fn distances(graph: &Graph) -> Vec<f64> {
        let nodes = graph.nodes();
        let mut out = Vec::new();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                out.push(hyperbolic_distance(
                    a.hyperboloid_point(),
                    b.hyperboloid_point(),
                ));
            }
        }
        out
    }

    #[test]
    fn first_move_only_anchors() {
        let mut graph = graph();
        let before = graph.clone();
        let mut drag = HyperbolicDragController::default();

        let outcome = drag.pointer_move(&mut graph, Vec2::new(0.1, 0.1));

        assert_eq!(outcome, DragOutcome::Anchored);
        assert_eq!(drag.anchor(), Some(Vec2::new(0.1, 0.1)));
        assert_eq!(graph, before);
    }

    #[test]
    fn press_clears_the_anchor() {
        let mut graph = graph();
        let mut drag = HyperbolicDragController::default();
        drag.pointer_move(&mut graph, Vec2::new(0.1, 0.1));
        drag.press();
        assert_eq!(drag.anchor(), None);
    }

    #[test]
    fn node_under_pointer_follows_it() {
        let mut graph = graph();
        let mut drag = HyperbolicDragController::default();

        // node 1 sits at (0.3, 0.1)
        drag.pointer_move(&mut graph, Vec2::new(0.3, 0.1));
        let outcome = drag.pointer_move(&mut graph, Vec2::new(0.1, -0.2));

        assert!(outcome.moved());
        let moved = graph.nodes()[1].position();
        assert!((moved - Vec2::new(0.1, -0.2)).length() < 1e-9, "{moved:?}");
        assert_eq!(drag.anchor(), Some(Vec2::new(0.1, -0.2)));
    }

    #[test]
    fn translation_preserves_hyperbolic_distances() {
        let mut graph = graph();
        let before = distances(&graph);
        let drag = HyperbolicDragController::default();

        drag.translate(&mut graph, Vec2::new(-0.2, 0.3), Vec2::new(0.4, 0.0))
            .unwrap();

        for (a, b) in before.iter().zip(distances(&graph)) {
            assert!((a - b).abs() < 1e-9, "{a} vs {b}");
        }
    }

    #[test]
    fn derived_points_are_refreshed() {
        let mut graph = graph();
        let drag = HyperbolicDragController::default();
        drag.translate(&mut graph, Vec2::ZERO, Vec2::new(0.5, 0.5))
            .unwrap();

        for node in graph.nodes() {
            assert_eq!(node.hyperboloid_point(), to_hyperboloid(node.position()));
            assert_eq!(
                node.disk_point(),
                crate::hyperbolic::disk_project(node.position(), 1.0)
            );
        }
    }

    #[test]
    fn tiny_steps_are_skipped_and_keep_the_anchor() {
        let mut graph = graph();
        let before = graph.clone();
        let mut drag = HyperbolicDragController::default();

        drag.pointer_move(&mut graph, Vec2::new(0.2, 0.2));
        let outcome = drag.pointer_move(&mut graph, Vec2::new(0.2 + 1e-5, 0.2));

        assert!(matches!(outcome, DragOutcome::Skipped { .. }));
        assert_eq!(graph, before);
        assert_eq!(drag.anchor(), Some(Vec2::new(0.2, 0.2)));
    }

    #[test]
    fn steps_below_geodesic_resolution_are_skipped_without_threshold() {
        let mut graph = graph();
        let before = graph.clone();
        let mut drag = HyperbolicDragController::new(DragConfig {
            min_distance: 0.0,
            ..Default::default()
        });

        drag.pointer_move(&mut graph, Vec2::new(0.1, 0.1));
        let outcome = drag.pointer_move(&mut graph, Vec2::new(0.1 + 1e-8, 0.1));

        assert!(matches!(outcome, DragOutcome::Skipped { .. }), "{outcome:?}");
        assert_eq!(graph, before);
        assert_eq!(drag.anchor(), Some(Vec2::new(0.1, 0.1)));
    }

    #[test]
    fn fixed_offset_ignores_the_pointer() {
        let mut graph = graph();
        let mut drag = HyperbolicDragController::new(DragConfig {
            target: DragTarget::FixedOffset,
            fixed_offset: Vec2::new(0.05, 0.0),
            ..Default::default()
        });

        drag.pointer_move(&mut graph, Vec2::new(0.9, 0.9));
        let outcome = drag.pointer_move(&mut graph, Vec2::new(-0.9, 0.3));

        assert!(outcome.moved());
        // node 0 started at the origin
        let origin_image = graph.nodes()[0].position();
        assert!((origin_image - Vec2::new(0.05, 0.0)).length() < 1e-9);
    }

    #[test]
    fn default_offset_is_above_the_skip_threshold() {
        let mut graph = graph();
        let mut drag = HyperbolicDragController::new(DragConfig {
            target: DragTarget::FixedOffset,
            ..Default::default()
        });
        drag.pointer_move(&mut graph, Vec2::ZERO);
        assert!(drag.pointer_move(&mut graph, Vec2::ZERO).moved());
    }

    #[test]
    fn mirror_fractions_are_validated() {
        let config = DragConfig {
            second_mirror: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
        assert!(DragConfig::default().validate().is_ok());
    }
}
