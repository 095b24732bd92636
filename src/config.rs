//! Engine configuration and document loading
//!
//! Every section has a default, so an empty document (or no document at all)
//! gives the stock behavior. Files are read as YAML or JSON depending on their
//! extension.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::drag::DragConfig;
use crate::engine::Viewport;
use crate::error::{EngineError, EngineResult};
use crate::generator::GraphShape;
use crate::optimizer::OptimizerConfig;
use crate::render::RenderConfig;
use crate::simulation::SimulationConfig;

/// Serialization formats accepted for config and script documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick a format from the path's extension
    pub fn from_path(path: &Path) -> EngineResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| EngineError::UnsupportedFormat(path.display().to_string()))?;

        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "json" => Ok(DocumentFormat::Json),
            _ => Err(EngineError::UnsupportedFormat(ext.to_string())),
        }
    }

    pub fn parse<T: DeserializeOwned>(self, text: &str) -> EngineResult<T> {
        Ok(match self {
            DocumentFormat::Yaml => serde_yaml::from_str(text)?,
            DocumentFormat::Json => serde_json::from_str(text)?,
        })
    }
}

/// Read and parse a YAML or JSON document
pub fn load_document<T: DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let format = DocumentFormat::from_path(path)?;
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "loading document");
    format.parse(&text)
}

/// All engine settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for graph generation; unset draws from OS entropy
    pub seed: Option<u64>,
    pub shape: GraphShape,
    pub simulation: SimulationConfig,
    pub optimizer: OptimizerConfig,
    pub drag: DragConfig,
    pub render: RenderConfig,
    pub viewport: Viewport,
}

impl EngineConfig {
    /// Check every section
    pub fn validate(&self) -> EngineResult<()> {
        self.shape.validate()?;
        self.simulation.validate()?;
        self.drag.validate()?;
        self.viewport.validate()?;
        if self.render.disk_scale.is_nan() || self.render.disk_scale <= 0.0 {
            return Err(EngineError::Config(format!(
                "render.disk_scale must be positive, got {}",
                self.render.disk_scale
            )));
        }
        Ok(())
    }

    pub fn to_yaml(&self) -> EngineResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Load and validate an engine configuration file
pub fn load_config(path: &Path) -> EngineResult<EngineConfig> {
    let config: EngineConfig = load_document(path)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragTarget;
    use crate::simulation::VelocityMode;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a.yaml")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a.YML")).unwrap(),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("a.json")).unwrap(),
            DocumentFormat::Json
        );
        assert!(matches!(
            DocumentFormat::from_path(&PathBuf::from("a.toml")),
            Err(EngineError::UnsupportedFormat(ext)) if ext == "toml"
        ));
        assert!(matches!(
            DocumentFormat::from_path(&PathBuf::from("config")),
            Err(EngineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn empty_document_gives_defaults() {
        let config: EngineConfig = DocumentFormat::Yaml.parse("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: EngineConfig = DocumentFormat::Yaml
            .parse(
                "seed: 7\nsimulation:\n  velocity_mode: accumulate\ndrag:\n  target: fixed_offset\n",
            )
            .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.simulation.velocity_mode, VelocityMode::Accumulate);
        assert_eq!(config.simulation.dt, SimulationConfig::default().dt);
        assert_eq!(config.drag.target, DragTarget::FixedOffset);
        assert_eq!(config.shape, GraphShape::default());
    }

    #[test]
    fn yaml_output_reads_back() {
        let config = EngineConfig {
            seed: Some(42),
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("seed: 42"));
        let back: EngineConfig = DocumentFormat::Yaml.parse(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn load_config_reads_json_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"seed": 3, "optimizer": {"max_trials": 10}}"#).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.optimizer.max_trials, 10);
    }

    #[test]
    fn load_config_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.yaml");
        fs::write(&path, "shape:\n  nodes: 3\n  edges: 4\n").unwrap();

        assert!(matches!(
            load_config(&path),
            Err(EngineError::InvalidShape {
                nodes: 3,
                edges: 4,
                max_edges: 3
            })
        ));
    }

    #[test]
    fn unstable_velocity_mode_is_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.yaml");
        fs::write(&path, "simulation:\n  velocity_mode: accumulate\n").unwrap();

        assert!(matches!(load_config(&path), Err(EngineError::Config(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.yaml");
        assert!(matches!(load_config(&path), Err(EngineError::Io(_))));
    }
}
