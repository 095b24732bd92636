//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur while building, mutating or configuring a layout
#[derive(Error, Debug)]
pub enum EngineError {
    /// A node index outside `0..len`
    #[error("node index {index} out of range ({len} nodes)")]
    NodeIndexOutOfRange { index: usize, len: usize },

    /// An edge index outside `0..len`
    #[error("edge index {index} out of range ({len} edges)")]
    EdgeIndexOutOfRange { index: usize, len: usize },

    /// Hyperbolic distance or translation requested between (nearly) coincident points
    #[error("degenerate geometry: hyperbolic distance {distance:e} is too small")]
    DegenerateGeometry { distance: f64 },

    /// The requested edge count cannot be realized with this many nodes
    #[error("cannot place {edges} edges on {nodes} nodes (at most {max_edges})")]
    InvalidShape {
        nodes: usize,
        edges: usize,
        max_edges: usize,
    },

    /// Node positions and adjacency relation disagree on the node count
    #[error("{positions} positions given for an adjacency over {nodes} nodes")]
    SizeMismatch { positions: usize, nodes: usize },

    /// A configuration value is invalid
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The file format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML document could not be parsed or produced
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON document could not be parsed or produced
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
