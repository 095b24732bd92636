//! Force simulation for graph layout
//!
//! Every tick computes a force for each node from the positions as they were
//! before the tick, integrates it with an explicit Euler step and only then
//! commits all new positions at once. No node ever sees a neighbour's
//! half-updated position.
//!
//! Forces on a node `p`:
//!
//! - **Spring** (adjacent `q`): pushes `p` away from `q` when closer than
//!   `preferred_distance - tolerance`, pulls it towards `q` when farther than
//!   `preferred_distance + tolerance`, nothing inside the band
//! - **Repulsion** (non-adjacent `q`): along `p - q`, scaled by `1 / distance`
//! - **Centering**: a weak pull towards the origin, applied
//!   `centering_iterations` times
//! - **Drag**: `-velocity × friction`
//!
//! Integration scales as `v += F / dt`, `x += v × dt`.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{EngineError, EngineResult};
use crate::graph::Graph;
use crate::vector::Vec2;

/// Default spring rest length
pub const DEFAULT_PREFERRED_DISTANCE: f64 = 0.4;

/// Default half-width of the band around the rest length with no spring force
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Default scale applied to spring and repulsion forces
pub const DEFAULT_DAMPING: f64 = 0.0001;

/// Default linear drag coefficient
pub const DEFAULT_FRICTION: f64 = 0.01;

/// Default integration step
pub const DEFAULT_DT: f64 = 0.000008;

/// Default strength of the pull towards the origin
pub const DEFAULT_CENTERING_STRENGTH: f64 = 0.001;

/// Default number of times the centering pull is applied per tick
pub const DEFAULT_CENTERING_ITERATIONS: u32 = 5;

/// Default floor for the repulsion denominator (avoids dividing by zero)
pub const DEFAULT_DISTANCE_MIN: f64 = 1e-6;

/// A workable `auto_stop_energy` for the default tuning
pub const SUGGESTED_AUTO_STOP_ENERGY: f64 = 0.03;

/// What happens to a node's velocity between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityMode {
    /// Start every tick from rest; bounded and stable
    #[default]
    Reset,
    /// Carry velocity into the next tick; needs `friction / dt < 2` to stay bounded
    Accumulate,
}

/// Tunables of the force simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub preferred_distance: f64,
    pub tolerance: f64,
    pub damping: f64,
    pub friction: f64,
    pub dt: f64,
    pub centering_strength: f64,
    pub centering_iterations: u32,
    pub distance_min: f64,
    pub velocity_mode: VelocityMode,
    /// Stop the simulation once a tick's summed speed drops below this
    pub auto_stop_energy: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            preferred_distance: DEFAULT_PREFERRED_DISTANCE,
            tolerance: DEFAULT_TOLERANCE,
            damping: DEFAULT_DAMPING,
            friction: DEFAULT_FRICTION,
            dt: DEFAULT_DT,
            centering_strength: DEFAULT_CENTERING_STRENGTH,
            centering_iterations: DEFAULT_CENTERING_ITERATIONS,
            distance_min: DEFAULT_DISTANCE_MIN,
            velocity_mode: VelocityMode::Reset,
            auto_stop_energy: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> EngineResult<()> {
        if self.dt.is_nan() || self.dt <= 0.0 {
            return Err(EngineError::Config(format!(
                "simulation.dt must be positive, got {}",
                self.dt
            )));
        }
        if self.tolerance < 0.0 {
            return Err(EngineError::Config(format!(
                "simulation.tolerance must not be negative, got {}",
                self.tolerance
            )));
        }
        if self.distance_min.is_nan() || self.distance_min <= 0.0 {
            return Err(EngineError::Config(format!(
                "simulation.distance_min must be positive, got {}",
                self.distance_min
            )));
        }
        if self.velocity_mode == VelocityMode::Accumulate && self.friction / self.dt >= 2.0 {
            return Err(EngineError::Config(format!(
                "accumulating velocity needs friction / dt < 2, got {} / {}",
                self.friction, self.dt
            )));
        }
        Ok(())
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TickReport {
    /// Sum of the node speeds after integration
    pub energy: f64,
    /// Largest single-node displacement
    pub max_step: f64,
}

/// Explicit-Euler force simulation over a [`Graph`]
#[derive(Debug, Clone, Default)]
pub struct ForceSimulator {
    config: SimulationConfig,
}

impl ForceSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Whether a tick with this report should switch the simulation off
    pub fn should_stop(&self, report: &TickReport) -> bool {
        self.config
            .auto_stop_energy
            .is_some_and(|threshold| report.energy < threshold)
    }

    /// Advance every node by one step
    pub fn tick(&self, graph: &mut Graph) -> TickReport {
        let positions = graph.positions();
        let mut next = Vec::with_capacity(positions.len());
        let mut report = TickReport::default();

        for (index, &position) in positions.iter().enumerate() {
            let mut force = self.pair_forces(graph, &positions, index);
            for _ in 0..self.config.centering_iterations {
                force += (Vec2::ZERO - position) * self.config.centering_strength;
            }

            let node = &mut graph.nodes_mut()[index];
            let mut velocity = match self.config.velocity_mode {
                VelocityMode::Reset => Vec2::ZERO,
                VelocityMode::Accumulate => node.velocity,
            };
            force -= velocity * self.config.friction;
            velocity += force / self.config.dt;
            let step = velocity * self.config.dt;

            node.force = force;
            node.velocity = velocity;
            next.push(position + step);

            report.energy += velocity.length();
            report.max_step = report.max_step.max(step.length());
        }

        for (node, position) in graph.nodes_mut().iter_mut().zip(next) {
            node.set_position(position);
        }

        trace!(energy = report.energy, max_step = report.max_step, "tick");
        report
    }

    /// Run up to `max_ticks` ticks, stopping early when the auto-stop rule fires.
    ///
    /// Returns the number of ticks run and the last report.
    pub fn run(&self, graph: &mut Graph, max_ticks: usize) -> (usize, TickReport) {
        let mut last = TickReport::default();
        for tick in 0..max_ticks {
            last = self.tick(graph);
            if self.should_stop(&last) {
                return (tick + 1, last);
            }
        }
        (max_ticks, last)
    }

    fn pair_forces(&self, graph: &Graph, positions: &[Vec2], index: usize) -> Vec2 {
        let p = positions[index];
        let mut force = Vec2::ZERO;

        for (other, &q) in positions.iter().enumerate() {
            if other == index {
                continue;
            }
            let distance = p.distance(q);
            if graph.is_adjacent(index, other) {
                if distance < self.config.preferred_distance - self.config.tolerance {
                    force += (p - q) * self.config.damping;
                } else if distance > self.config.preferred_distance + self.config.tolerance {
                    force += (q - p) * self.config.damping;
                }
            } else {
                force += (p - q) * self.config.damping / distance.max(self.config.distance_min);
            }
        }

        force
    }
}
