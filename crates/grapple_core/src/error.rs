use thiserror::Error;

/// Errors produced by the core.
///
/// Lookup failures (untracked hand, missing gesture) are not errors, they are
/// reported as `None` by the relevant `try_*` function.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GrappleError {
    #[error("Unsupported hand value: {0}")]
    InvalidHand(String),
    #[error("Invalid joint id: {0} (expected 1..={})", crate::hand::JOINT_COUNT)]
    InvalidJointId(u8),
    #[error("Threshold {value} for {name} must be within [0, 1)")]
    InvalidThreshold { name: &'static str, value: f32 },
    #[error("Could not access gesture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not (de)serialize using serde: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Gesture file version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
