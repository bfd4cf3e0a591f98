//! # Analytics Configuration
//!
//! Every calibration constant of the detectors lives here so thresholds can
//! be tuned per deployment without touching the algorithms.
//!
//! ```rust
//! use gp_core::config::AnalyticsConfig;
//!
//! let yards = AnalyticsConfig::default();
//! let meters = AnalyticsConfig::metric();
//! assert!(meters.kinematics.hi_speed_threshold < yards.kinematics.hi_speed_threshold);
//! ```

mod kinematics_config;
mod respiration_config;

pub use kinematics_config::{KinematicsConfig, YARDS_TO_METERS};
pub use respiration_config::{RespirationConfig, ResampleSource};

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalyticsConfig {
    #[serde(default)]
    pub kinematics: KinematicsConfig,
    #[serde(default)]
    pub respiration: RespirationConfig,
}

impl AnalyticsConfig {
    /// NFL-style feed in yards (default)
    pub fn yards() -> Self {
        Self::default()
    }

    /// Feed in meters
    pub fn metric() -> Self {
        Self {
            kinematics: KinematicsConfig::metric(),
            respiration: RespirationConfig::default(),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.kinematics.validate()?;
        self.respiration.validate()
    }
}
