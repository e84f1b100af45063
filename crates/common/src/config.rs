use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`GameConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Camera and movement tuning.
///
/// Angles are in degrees, distances in world units, times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub fov: f32,
    pub fov_min: f32,
    pub fov_max: f32,
    /// Degrees of fov removed per unit of scroll.
    pub scroll_sensitivity: f32,
    /// Upward launch speed when a jump starts.
    pub jump_speed: f32,
    /// Vertical acceleration while airborne. Negative pulls down.
    pub gravity: f32,
    pub near_plane: f32,
    pub far_plane: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            movement_speed: 7.0,
            mouse_sensitivity: 0.3,
            fov: 55.0,
            fov_min: 30.0,
            fov_max: 90.0,
            scroll_sensitivity: 2.0,
            jump_speed: 6.0,
            gravity: -15.0,
            near_plane: 0.1,
            far_plane: 100.0,
        }
    }
}

/// Proximity rules for buttons and the door.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub radius: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self { radius: 2.0 }
    }
}

/// Top-level tuning for a play session. Every field has a default, so a
/// config file only needs to name the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub camera: CameraConfig,
    pub interaction: InteractionConfig,
}

impl GameConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject values the camera and game state cannot clamp their way out of.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.camera;
        let all_finite = [
            c.movement_speed,
            c.mouse_sensitivity,
            c.fov,
            c.fov_min,
            c.fov_max,
            c.scroll_sensitivity,
            c.jump_speed,
            c.gravity,
            c.near_plane,
            c.far_plane,
            self.interaction.radius,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(ConfigError::Invalid("values must be finite".into()));
        }
        if c.fov_min <= 0.0 || c.fov_max >= 180.0 || c.fov_min > c.fov_max {
            return Err(ConfigError::Invalid(format!(
                "fov range [{}, {}] must lie within (0, 180) and be ordered",
                c.fov_min, c.fov_max
            )));
        }
        if c.fov < c.fov_min || c.fov > c.fov_max {
            return Err(ConfigError::Invalid(format!(
                "fov {} outside [{}, {}]",
                c.fov, c.fov_min, c.fov_max
            )));
        }
        if c.movement_speed < 0.0 || c.mouse_sensitivity < 0.0 {
            return Err(ConfigError::Invalid(
                "movement speed and mouse sensitivity must be non-negative".into(),
            ));
        }
        if c.jump_speed <= 0.0 || c.gravity >= 0.0 {
            return Err(ConfigError::Invalid(
                "jump speed must be positive and gravity negative".into(),
            ));
        }
        if c.near_plane <= 0.0 || c.far_plane <= c.near_plane {
            return Err(ConfigError::Invalid(format!(
                "clip planes near={} far={} must satisfy 0 < near < far",
                c.near_plane, c.far_plane
            )));
        }
        if self.interaction.radius <= 0.0 {
            return Err(ConfigError::Invalid(
                "interaction radius must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.camera.fov, 55.0);
        assert_eq!(config.interaction.radius, 2.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = GameConfig::from_yaml_str("camera:\n  movement_speed: 3.5\n").unwrap();
        assert_eq!(config.camera.movement_speed, 3.5);
        assert_eq!(config.camera.gravity, -15.0);
        assert_eq!(config.interaction, InteractionConfig::default());
    }

    #[test]
    fn inverted_fov_range_is_rejected() {
        let err = GameConfig::from_yaml_str("camera:\n  fov_min: 80\n  fov_max: 40\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_radius_is_rejected() {
        let err = GameConfig::from_yaml_str("interaction:\n  radius: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn positive_gravity_is_rejected() {
        let mut config = GameConfig::default();
        config.camera.gravity = 9.8;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = GameConfig::from_yaml_str("camera: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn yaml_output_loads_back() {
        let mut config = GameConfig::default();
        config.interaction.radius = 3.0;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(GameConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn load_from_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "camera:\n  fov: 70\n").unwrap();
        let config = GameConfig::load(tmp.path()).unwrap();
        assert_eq!(config.camera.fov, 70.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = GameConfig::load("/nonexistent/escape.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
