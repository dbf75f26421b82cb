/// Pipeline configuration, parsed from JSON. Every field has a default so
/// partial documents work.
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::vector::Vec3;

/// Projection and lighting parameters for a [`crate::Pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Vertical field of view, strictly between 0 and 180 degrees.
    pub fov_degrees: f32,
    /// Near plane distance; geometry closer than this is clipped away.
    pub near: f32,
    pub far: f32,
    /// Direction towards the light, in world space. Normalized on use.
    pub light_direction: [f32; 3],
    /// Intensity floor so faces turned from the light never go black.
    pub min_intensity: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.01,
            far: 1000.0,
            light_direction: [0.0, 1.0, -1.0],
            min_intensity: 0.1,
        }
    }
}

impl PipelineConfig {
    /// Parses config from JSON and validates it.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid("fov_degrees", format!("{} is outside (0, 180)", self.fov_degrees)));
        }
        if !(self.near > 0.0) {
            return Err(invalid("near", format!("{} must be positive", self.near)));
        }
        if !(self.far > self.near) {
            return Err(invalid(
                "far",
                format!("{} must be greater than near ({})", self.far, self.near),
            ));
        }
        if self.light().normalize().is_err() {
            return Err(invalid("light_direction", "must be non-zero".to_string()));
        }
        if !(0.0..=1.0).contains(&self.min_intensity) {
            return Err(invalid(
                "min_intensity",
                format!("{} is outside [0, 1]", self.min_intensity),
            ));
        }
        Ok(())
    }

    pub fn light(&self) -> Vec3 {
        let [x, y, z] = self.light_direction;
        Vec3::direction(x, y, z)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = PipelineConfig::from_json_str(r#"{ "fov_degrees": 90 }"#).unwrap();
        assert_eq!(cfg.fov_degrees, 90.0);
        assert_eq!(cfg.near, 0.01);
        assert_eq!(cfg.light_direction, [0.0, 1.0, -1.0]);
    }

    #[test]
    fn test_rejects_degenerate_fov() {
        for fov in ["0", "180", "-10"] {
            let json = format!(r#"{{ "fov_degrees": {} }}"#, fov);
            match PipelineConfig::from_json_str(&json) {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, "fov_degrees"),
                other => panic!("expected fov rejection, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rejects_inverted_depth_range_and_dark_light() {
        let cfg = PipelineConfig {
            near: 10.0,
            far: 1.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = PipelineConfig {
            light_direction: [0.0, 0.0, 0.0],
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PipelineConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
