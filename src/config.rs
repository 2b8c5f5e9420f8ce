use crate::error::Error;
use crate::math::Decay;

use serde_derive::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct OverlayConfig {
    /// Past raw boxes kept per track.
    pub history_length: usize,
    /// Inertia of the smoothing in `[0, 1)`; higher follows detections less.
    pub smoothing_factor: f32,
    /// Boxes below this confidence are never drawn.
    pub confidence_threshold: f32,
    pub decay: Decay,
    /// Track centers drawn per motion trail.
    pub trail_length: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            history_length: 30,
            smoothing_factor: 0.85,
            confidence_threshold: 0.3,
            decay: Decay::Exponential,
            trail_length: 20,
        }
    }
}

impl OverlayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: OverlayConfig = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.history_length == 0 {
            return Err(Error::Config("history_length must be at least 1".into()));
        }

        if !(0.0..1.0).contains(&self.smoothing_factor) {
            return Err(Error::Config(format!(
                "smoothing_factor must be in [0, 1), got {}",
                self.smoothing_factor
            )));
        }

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::Config(format!(
                "confidence_threshold must be in [0, 1], got {}",
                self.confidence_threshold
            )));
        }

        Ok(())
    }
}
