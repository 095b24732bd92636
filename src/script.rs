//! Recorded host sessions
//!
//! A script is a list of host events stored as YAML or JSON. Replaying one
//! drives a [`SimulationEngine`] exactly as an interactive host would, which
//! lets the CLI and the tests reproduce a drag or a key press without a window.

use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::load_document;
use crate::engine::{Command, HostEvent, SimulationEngine};
use crate::error::EngineResult;
use crate::render::RenderBackend;

/// One scripted host action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// One idle callback
    Tick,
    /// `count` idle callbacks in a row
    TickN { count: usize },
    /// Pointer press at pixel coordinates
    Press { x: f64, y: f64 },
    /// Pointer motion to pixel coordinates
    Move { x: f64, y: f64 },
    Command { command: Command },
}

impl ScriptEvent {
    fn host_events(self) -> impl Iterator<Item = HostEvent> {
        let (event, count) = match self {
            ScriptEvent::Tick => (HostEvent::Tick, 1),
            ScriptEvent::TickN { count } => (HostEvent::Tick, count),
            ScriptEvent::Press { x, y } => (HostEvent::PointerPress { x, y }, 1),
            ScriptEvent::Move { x, y } => (HostEvent::PointerMove { x, y }, 1),
            ScriptEvent::Command { command } => (HostEvent::Command(command), 1),
        };
        std::iter::repeat_n(event, count)
    }
}

/// A recorded session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Script {
    pub events: Vec<ScriptEvent>,
}

/// Counts gathered while replaying a script
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReplaySummary {
    /// Host events delivered to the engine
    pub events: usize,
    /// Events that changed the graph
    pub redraws: usize,
}

impl Script {
    /// Every host event in delivery order, with tick runs expanded
    pub fn host_events(&self) -> impl Iterator<Item = HostEvent> + '_ {
        self.events.iter().flat_map(|event| event.host_events())
    }

    /// Feed every event to `engine`, redrawing through `backend` on change
    pub fn replay<R: Rng>(
        &self,
        engine: &mut SimulationEngine<R>,
        backend: &mut impl RenderBackend,
    ) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        for event in self.host_events() {
            summary.events += 1;
            if engine.dispatch(event, backend) {
                summary.redraws += 1;
            }
        }
        info!(
            events = summary.events,
            redraws = summary.redraws,
            "script replayed"
        );
        summary
    }
}

/// Load a script from a YAML or JSON file
pub fn load_script(path: &Path) -> EngineResult<Script> {
    load_document(path)
}
