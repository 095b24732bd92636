//! The layout engine and its host-facing entry points
//!
//! [`SimulationEngine`] owns the graph, the random source and every
//! controller. The host calls exactly one entry point at a time (tick,
//! pointer press, pointer move, command) and each runs to completion before the
//! next; nothing here is shared across threads.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::crossings::count_crossings;
use crate::drag::{DragOutcome, HyperbolicDragController};
use crate::error::{EngineError, EngineResult};
use crate::generator::RandomGraphGenerator;
use crate::graph::Graph;
use crate::optimizer::{LayoutOptimizer, OptimizeReport};
use crate::render::{self, RenderBackend, RenderConfig, RenderSnapshot};
use crate::simulation::{ForceSimulator, TickReport};
use crate::vector::Vec2;

/// Host window size, for mapping pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    pub fn validate(&self) -> EngineResult<()> {
        if self.width.is_nan() || self.height.is_nan() || self.width <= 0.0 || self.height <= 0.0 {
            return Err(EngineError::Config(format!(
                "viewport must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Pixel coordinates (origin top-left, y down) to normalized device
    /// coordinates (origin at the centre, y up, `[-1, 1]` across the window)
    pub fn to_normalized(&self, px: f64, py: f64) -> Vec2 {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        Vec2::new((px - half_width) / half_width, (half_height - py) / half_height)
    }
}

/// Discrete user commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Run the restart-based layout search
    OptimizeLayout,
    /// Switch the force simulation on or off
    ToggleSimulation,
    /// Search, then toggle the simulation
    OptimizeAndToggle,
}

/// Signals a host feeds into the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Tick,
    /// Pointer press at pixel coordinates
    PointerPress { x: f64, y: f64 },
    /// Pointer motion at pixel coordinates
    PointerMove { x: f64, y: f64 },
    Command(Command),
}

/// Graph plus every controller that mutates it
#[derive(Debug)]
pub struct SimulationEngine<R = ChaCha8Rng> {
    graph: Graph,
    generator: RandomGraphGenerator<R>,
    optimizer: LayoutOptimizer,
    simulator: ForceSimulator,
    drag: HyperbolicDragController,
    viewport: Viewport,
    render: RenderConfig,
    running: bool,
    last_tick: Option<TickReport>,
}

impl SimulationEngine<ChaCha8Rng> {
    /// Engine seeded from `config.seed`, or from OS entropy when unset
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let generator = match config.seed {
            Some(seed) => RandomGraphGenerator::seeded(config.shape, seed)?,
            None => RandomGraphGenerator::from_entropy(config.shape)?,
        };
        Self::with_generator(config, generator)
    }
}

impl<R: Rng> SimulationEngine<R> {
    /// Engine drawing its graphs from `generator`; the first graph is generated here
    pub fn with_generator(
        config: &EngineConfig,
        mut generator: RandomGraphGenerator<R>,
    ) -> EngineResult<Self> {
        config.validate()?;
        let graph = generator.generate();
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "generated initial graph"
        );
        Ok(Self {
            graph,
            generator,
            optimizer: LayoutOptimizer::new(config.optimizer.clone()),
            simulator: ForceSimulator::new(config.simulation.clone()),
            drag: HyperbolicDragController::new(config.drag.clone()),
            viewport: config.viewport,
            render: config.render.clone(),
            running: false,
            last_tick: None,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        if self.running != running {
            info!(running, "simulation toggled");
        }
        self.running = running;
    }

    /// Report of the most recent simulation tick
    pub fn last_tick(&self) -> Option<TickReport> {
        self.last_tick
    }

    pub fn crossings(&self) -> usize {
        count_crossings(&self.graph)
    }

    /// Idle callback: one simulation step if the simulation is on.
    ///
    /// The running flag is read once, before any work.
    pub fn on_tick(&mut self) -> Option<TickReport> {
        if !self.running {
            return None;
        }
        let report = self.simulator.tick(&mut self.graph);
        self.last_tick = Some(report);
        if self.simulator.should_stop(&report) {
            debug!(energy = report.energy, "energy below threshold");
            self.set_running(false);
        }
        Some(report)
    }

    /// Pointer pressed at pixel coordinates: a new drag begins
    pub fn on_pointer_press(&mut self, x: f64, y: f64) {
        debug!(pointer = ?self.viewport.to_normalized(x, y), "drag started");
        self.drag.press();
    }

    /// Pointer moved to pixel coordinates
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> DragOutcome {
        let pointer = self.viewport.to_normalized(x, y);
        self.drag.pointer_move(&mut self.graph, pointer)
    }

    /// Run the layout search; physics state starts from rest afterwards
    pub fn optimize(&mut self) -> OptimizeReport {
        let report = self.optimizer.optimize(&mut self.graph, &mut self.generator);
        self.graph.reset_motion();
        self.last_tick = None;
        report
    }

    /// Apply a user command; returns the search report when one ran
    pub fn on_command(&mut self, command: Command) -> Option<OptimizeReport> {
        match command {
            Command::OptimizeLayout => Some(self.optimize()),
            Command::ToggleSimulation => {
                self.set_running(!self.running);
                None
            }
            Command::OptimizeAndToggle => {
                let report = self.optimize();
                self.set_running(!self.running);
                Some(report)
            }
        }
    }

    /// Route a host event; returns whether the graph changed
    pub fn handle(&mut self, event: HostEvent) -> bool {
        match event {
            HostEvent::Tick => self.on_tick().is_some(),
            HostEvent::PointerPress { x, y } => {
                self.on_pointer_press(x, y);
                false
            }
            HostEvent::PointerMove { x, y } => self.on_pointer_move(x, y).moved(),
            HostEvent::Command(command) => self.on_command(command).is_some(),
        }
    }

    /// Route a host event and redraw through `backend` if anything changed
    pub fn dispatch(&mut self, event: HostEvent, backend: &mut impl RenderBackend) -> bool {
        let changed = self.handle(event);
        if changed {
            backend.redraw(&self.snapshot());
        }
        changed
    }

    /// Disk coordinates of every node, node index order
    pub fn node_disk_coordinates(&self) -> Vec<Vec2> {
        render::node_disk_coordinates(&self.graph, self.render.disk_scale)
    }

    /// Disk coordinates of every edge, row-major edge order
    pub fn edge_disk_coordinates(&self) -> Vec<[Vec2; 2]> {
        render::edge_disk_coordinates(&self.graph, self.render.disk_scale)
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.graph, &self.render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;

    fn engine(seed: u64) -> SimulationEngine {
        let config = EngineConfig {
            seed: Some(seed),
            ..Default::default()
        };
        SimulationEngine::from_config(&config).unwrap()
    }

    #[test]
    fn viewport_maps_centre_and_corners() {
        let viewport = Viewport::default();
        assert_eq!(viewport.to_normalized(300.0, 300.0), Vec2::ZERO);
        assert_eq!(viewport.to_normalized(600.0, 0.0), Vec2::new(1.0, 1.0));
        assert_eq!(viewport.to_normalized(0.0, 600.0), Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn ticks_do_nothing_while_stopped() {
        let mut engine = engine(1);
        let before = engine.graph().clone();

        assert!(engine.on_tick().is_none());
        assert!(engine.on_tick().is_none());
        assert_eq!(engine.graph(), &before);
    }

    #[test]
    fn toggled_simulation_moves_nodes() {
        let mut engine = engine(2);
        let before = engine.graph().positions();

        engine.on_command(Command::ToggleSimulation);
        assert!(engine.is_running());
        assert!(engine.handle(HostEvent::Tick));
        assert_ne!(engine.graph().positions(), before);
        assert!(engine.last_tick().is_some());
    }

    #[test]
    fn optimize_and_toggle_starts_the_simulation() {
        let mut engine = engine(3);
        let before = engine.crossings();

        let report = engine.on_command(Command::OptimizeAndToggle).unwrap();

        assert!(engine.is_running());
        assert_eq!(report.initial_crossings, before);
        assert!(engine.crossings() <= before);
    }

    #[test]
    fn auto_stop_switches_the_simulation_off() {
        let mut config = EngineConfig {
            seed: Some(4),
            ..Default::default()
        };
        // any tick has less energy than this
        config.simulation.auto_stop_energy = Some(f64::INFINITY);
        let mut engine = SimulationEngine::from_config(&config).unwrap();

        engine.set_running(true);
        assert!(engine.on_tick().is_some());
        assert!(!engine.is_running());
    }

    #[test]
    fn dispatch_redraws_only_on_change() {
        let mut engine = engine(5);
        let mut backend = RecordingBackend::default();

        engine.dispatch(HostEvent::Tick, &mut backend);
        engine.dispatch(HostEvent::PointerPress { x: 300.0, y: 300.0 }, &mut backend);
        engine.dispatch(HostEvent::PointerMove { x: 300.0, y: 300.0 }, &mut backend);
        assert_eq!(backend.frames, 0);

        engine.dispatch(HostEvent::PointerMove { x: 360.0, y: 280.0 }, &mut backend);
        assert_eq!(backend.frames, 1);
        assert_eq!(backend.last.as_ref(), Some(&engine.snapshot()));
    }

    #[test]
    fn coordinates_follow_graph_order() {
        let engine = engine(6);
        assert_eq!(engine.node_disk_coordinates().len(), 50);
        assert_eq!(engine.edge_disk_coordinates().len(), 61);
        assert_eq!(
            engine.snapshot().outlines.len(),
            50 * crate::render::DEFAULT_CIRCLE_RESOLUTION
        );

        let first = engine.graph().edge(0).unwrap();
        let nodes = engine.graph().nodes();
        assert_eq!(
            engine.edge_disk_coordinates()[0],
            [nodes[first.source].disk_point(), nodes[first.target].disk_point()]
        );
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.viewport.width = 0.0;
        assert!(SimulationEngine::from_config(&config).is_err());
    }
}
