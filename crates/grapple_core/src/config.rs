use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::GrappleError;
use crate::hand::{Finger, JointId};

/// Configuration for every part of the core.
///
/// Every section falls back to its default when missing from a config file.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct GrappleConfig {
    pub capsule: CapsuleConfig,
    pub finger_bend: FingerBendConfig,
    pub gesture: GestureConfig,
    pub proximity: ProximityConfig,
    pub interaction: InteractionConfig,
}

impl GrappleConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GrappleError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CapsuleConfig {
    /// Seconds to wait after tracking is acquired before enabling capsules.
    pub enable_delay: f32,
    /// Capsules shorter than this are disabled.
    pub min_length: f32,
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            enable_delay: 0.5,
            min_length: 1e-4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FingerBendConfig {
    /// Raw bend value treated as fully bent, indexed by [`Finger::index`].
    pub thresholds: [f32; 5],
}

impl FingerBendConfig {
    #[inline]
    pub fn threshold(&self, finger: Finger) -> f32 {
        self.thresholds[finger.index()]
    }
}

impl Default for FingerBendConfig {
    fn default() -> Self {
        Self {
            thresholds: [0.6, 0.35, 0.35, 0.35, 0.35],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GestureConfig {
    /// How far below its reference distance a joint may be before a gesture is discarded.
    pub global_distance_threshold: f32,
    /// Distance threshold copied into newly recorded gestures.
    pub default_distance_threshold: f32,
    /// Rotation threshold copied into newly recorded gestures.
    pub default_rotation_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            global_distance_threshold: 0.02,
            default_distance_threshold: 0.02,
            default_rotation_threshold: 0.2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct ProximityConfig {
    /// Interactables further than this from the reference joint are ignored.
    pub radius: f32,
    /// Maximum number of proximates per hand.
    pub max_proximates: usize,
    /// Joint used as the proximity reference point.
    pub reference_joint: JointId,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            max_proximates: 3,
            reference_joint: JointId::Palm,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
    /// Cooldown used by groups created without an explicit cooldown.
    pub default_group_cooldown: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            default_group_cooldown: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let json = r#"{ "proximity": { "radius": 1.5 }, "gesture": { "global_distance_threshold": 0.05 } }"#;
        let config = serde_json::from_str::<GrappleConfig>(json).unwrap();

        assert_eq!(config.proximity.radius, 1.5);
        assert_eq!(config.proximity.max_proximates, 3);
        assert_eq!(config.gesture.global_distance_threshold, 0.05);
        assert_eq!(config.capsule, CapsuleConfig::default());
    }
}
