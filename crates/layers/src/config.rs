use serde::Deserialize;

use crate::scale::LevelOfDetail;

/// Tunables of a buildings overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Below this zoom nothing is loaded or drawn.
    pub min_zoom: u8,
    /// Zoom at which raw heights are used unshifted. Replaced by the host's
    /// maximum zoom when it reports one.
    pub max_zoom: u8,
    /// Height of the fixed camera above the ground plane, in pixels.
    pub camera_height: f64,
    /// Cap on scaled building height; keeps the projection away from the camera plane.
    pub max_height: u32,
    pub fade_step: f64,
    pub fade_period_ms: u32,
    /// Alpha removed at `min_zoom` relative to `max_zoom`.
    pub alpha_falloff: f32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_zoom: 14,
            max_zoom: 18,
            camera_height: 400.0,
            max_height: 350,
            fade_step: 0.1,
            fade_period_ms: 33,
            alpha_falloff: 0.3,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "overlay config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid overlay config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl OverlayConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_zoom > self.max_zoom {
            return Err(ConfigError::Invalid(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.camera_height > 0.0) || self.max_height as f64 >= self.camera_height {
            return Err(ConfigError::Invalid(format!(
                "max_height {} must stay below camera_height {}",
                self.max_height, self.camera_height
            )));
        }
        if !(self.fade_step > 0.0) || self.fade_period_ms == 0 {
            return Err(ConfigError::Invalid(
                "fade needs a positive step and period".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.alpha_falloff) {
            return Err(ConfigError::Invalid(format!(
                "alpha_falloff {} outside [0, 1]",
                self.alpha_falloff
            )));
        }
        Ok(())
    }

    pub fn level_of_detail(&self) -> LevelOfDetail {
        LevelOfDetail::new(self.max_zoom, self.max_height)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, OverlayConfig};

    #[test]
    fn defaults_are_valid() {
        let config = OverlayConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_height as f64, config.camera_height - 50.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = OverlayConfig::from_json_str(r#"{"min_zoom": 15, "max_zoom": 19}"#)
            .expect("config");
        assert_eq!(config.min_zoom, 15);
        assert_eq!(config.max_zoom, 19);
        assert_eq!(config.fade_period_ms, 33);
    }

    #[test]
    fn rejects_height_at_camera() {
        let err = OverlayConfig::from_json_str(r#"{"camera_height": 300, "max_height": 300}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let config = OverlayConfig {
            min_zoom: 18,
            max_zoom: 14,
            ..OverlayConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
