/// Application configuration, loaded from an optional JSON file. Missing
/// fields fall back to defaults.
use painter3d_core::{ConfigError, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How far one key press moves or turns the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Distance along the look direction per press.
    pub move_step: f32,
    /// Radians of yaw or pitch per press.
    pub turn_step: f32,
    /// Distance along world y per press.
    pub climb_step: f32,
    /// Height of a terminal cell relative to its width.
    pub cell_aspect: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_step: 0.2,
            turn_step: 0.05,
            climb_step: 0.1,
            cell_aspect: 2.0,
        }
    }
}

/// Root configuration for the terminal viewer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub controls: ControlsConfig,
    /// Uniform scale applied to a loaded mesh.
    pub mesh_scale: Option<f32>,
}

impl AppConfig {
    /// Parses config from JSON and validates it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.pipeline.validate()?;
        if !(cfg.controls.cell_aspect > 0.0) {
            return Err(ConfigError::Invalid {
                field: "cell_aspect",
                reason: format!("{} must be positive", cfg.controls.cell_aspect),
            });
        }
        Ok(cfg)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg = Self::from_json_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_partial_config() {
        let cfg = AppConfig::from_json_str(
            r#"{ "pipeline": { "fov_degrees": 70 }, "controls": { "move_step": 1.5 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.pipeline.fov_degrees, 70.0);
        assert_eq!(cfg.pipeline.far, 1000.0);
        assert_eq!(cfg.controls.move_step, 1.5);
        assert_eq!(cfg.controls.cell_aspect, 2.0);
        assert_eq!(cfg.mesh_scale, None);
    }

    #[test]
    fn test_invalid_pipeline_is_rejected() {
        assert!(AppConfig::from_json_str(r#"{ "pipeline": { "near": 0 } }"#).is_err());
        assert!(AppConfig::from_json_str(r#"{ "controls": { "cell_aspect": 0 } }"#).is_err());
    }
}
