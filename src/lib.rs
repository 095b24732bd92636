//! hyperlayout - force-directed graph layout in the hyperbolic plane.
//!
//! Nodes live in the Euclidean plane, are lifted onto the hyperboloid model
//! for hyperbolic geometry, and are shown through a Poincaré-style disk
//! projection. The engine combines a random graph generator, a restart-based
//! search for layouts with few edge crossings, an explicit-Euler force
//! simulation and hyperbolic panning driven by pointer drags.
//!
//! ```
//! use hyperlayout::config::EngineConfig;
//! use hyperlayout::engine::{Command, SimulationEngine};
//!
//! let config = EngineConfig { seed: Some(42), ..Default::default() };
//! let mut engine = SimulationEngine::from_config(&config)?;
//! engine.on_command(Command::OptimizeAndToggle);
//! engine.on_tick();
//! assert_eq!(engine.snapshot().edges.len(), 61);
//! # Ok::<(), hyperlayout::error::EngineError>(())
//! ```

pub mod config;
pub mod crossings;
pub mod drag;
pub mod engine;
pub mod error;
pub mod generator;
pub mod graph;
pub mod hyperbolic;
pub mod optimizer;
pub mod render;
pub mod script;
pub mod simulation;
pub mod vector;

pub use engine::{Command, HostEvent, SimulationEngine};
pub use error::{EngineError, EngineResult};
pub use graph::Graph;
pub use vector::{Vec2, Vec3};
