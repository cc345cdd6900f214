use std::fmt;
use std::str::FromStr;

use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::GrappleError;

/// Number of joints tracked per hand.
pub const JOINT_COUNT: usize = 26;

/// Which hand.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub const ALL: [Handedness; 2] = [Handedness::Left, Handedness::Right];

    /// Index into per-hand arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Handedness::Left => 0,
            Handedness::Right => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Handedness {
    type Err = GrappleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Handedness::Left),
            "right" | "r" => Ok(Handedness::Right),
            _ => Err(GrappleError::InvalidHand(s.to_string())),
        }
    }
}

/// The 26 tracked hand joints.
///
/// Declaration order matches the joint array layout, so the wrist is always
/// index 0. Tracking sources number joints from 1 (0 is invalid).
#[derive(
    Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum JointId {
    #[default]
    Wrist,
    Palm,
    ThumbMetacarpal,
    ThumbProximal,
    ThumbDistal,
    ThumbTip,
    IndexMetacarpal,
    IndexProximal,
    IndexIntermediate,
    IndexDistal,
    IndexTip,
    MiddleMetacarpal,
    MiddleProximal,
    MiddleIntermediate,
    MiddleDistal,
    MiddleTip,
    RingMetacarpal,
    RingProximal,
    RingIntermediate,
    RingDistal,
    RingTip,
    LittleMetacarpal,
    LittleProximal,
    LittleIntermediate,
    LittleDistal,
    LittleTip,
}

impl JointId {
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::Wrist,
        JointId::Palm,
        JointId::ThumbMetacarpal,
        JointId::ThumbProximal,
        JointId::ThumbDistal,
        JointId::ThumbTip,
        JointId::IndexMetacarpal,
        JointId::IndexProximal,
        JointId::IndexIntermediate,
        JointId::IndexDistal,
        JointId::IndexTip,
        JointId::MiddleMetacarpal,
        JointId::MiddleProximal,
        JointId::MiddleIntermediate,
        JointId::MiddleDistal,
        JointId::MiddleTip,
        JointId::RingMetacarpal,
        JointId::RingProximal,
        JointId::RingIntermediate,
        JointId::RingDistal,
        JointId::RingTip,
        JointId::LittleMetacarpal,
        JointId::LittleProximal,
        JointId::LittleIntermediate,
        JointId::LittleDistal,
        JointId::LittleTip,
    ];

    /// Index into the joint array.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Id used by tracking sources (index + 1).
    #[inline]
    pub fn raw(self) -> u8 {
        self as u8 + 1
    }

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn is_metacarpal(self) -> bool {
        matches!(
            self,
            JointId::ThumbMetacarpal
                | JointId::IndexMetacarpal
                | JointId::MiddleMetacarpal
                | JointId::RingMetacarpal
                | JointId::LittleMetacarpal
        )
    }

    pub fn is_tip(self) -> bool {
        matches!(
            self,
            JointId::ThumbTip
                | JointId::IndexTip
                | JointId::MiddleTip
                | JointId::RingTip
                | JointId::LittleTip
        )
    }

    /// Finger this joint belongs to, `None` for the wrist and palm.
    pub fn finger(self) -> Option<Finger> {
        Finger::ALL
            .into_iter()
            .find(|finger| finger.joints().contains(&self))
    }
}

impl TryFrom<u8> for JointId {
    type Error = GrappleError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Err(GrappleError::InvalidJointId(raw)),
            _ => JointId::from_index(raw as usize - 1).ok_or(GrappleError::InvalidJointId(raw)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Little,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Little,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Joint chain from metacarpal to tip.
    pub fn joints(self) -> &'static [JointId] {
        match self {
            Finger::Thumb => &[
                JointId::ThumbMetacarpal,
                JointId::ThumbProximal,
                JointId::ThumbDistal,
                JointId::ThumbTip,
            ],
            Finger::Index => &[
                JointId::IndexMetacarpal,
                JointId::IndexProximal,
                JointId::IndexIntermediate,
                JointId::IndexDistal,
                JointId::IndexTip,
            ],
            Finger::Middle => &[
                JointId::MiddleMetacarpal,
                JointId::MiddleProximal,
                JointId::MiddleIntermediate,
                JointId::MiddleDistal,
                JointId::MiddleTip,
            ],
            Finger::Ring => &[
                JointId::RingMetacarpal,
                JointId::RingProximal,
                JointId::RingIntermediate,
                JointId::RingDistal,
                JointId::RingTip,
            ],
            Finger::Little => &[
                JointId::LittleMetacarpal,
                JointId::LittleProximal,
                JointId::LittleIntermediate,
                JointId::LittleDistal,
                JointId::LittleTip,
            ],
        }
    }

    #[inline]
    pub fn metacarpal(self) -> JointId {
        self.joints()[0]
    }

    #[inline]
    pub fn tip(self) -> JointId {
        let joints = self.joints();
        joints[joints.len() - 1]
    }
}

/// A single tracked joint in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joint {
    pub id: JointId,
    pub position: Vec3,
    pub rotation: Quat,
    /// Cached `rotation * Vec3::Z`.
    pub forward: Vec3,
    pub radius: f32,
}

impl Joint {
    pub const DEFAULT_RADIUS: f32 = 0.01;

    pub fn new(id: JointId) -> Self {
        Self {
            id,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            forward: Vec3::Z,
            radius: Self::DEFAULT_RADIUS,
        }
    }

    pub fn set_pose(&mut self, pose: JointPose) {
        self.position = pose.position;
        self.rotation = pose.rotation;
        self.forward = pose.rotation * Vec3::Z;
        self.radius = pose.radius;
    }
}

/// Raw pose reported by a tracking source for one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointPose {
    pub position: Vec3,
    pub rotation: Quat,
    pub radius: f32,
}

impl JointPose {
    pub fn new(position: Vec3, rotation: Quat, radius: f32) -> Self {
        Self {
            position,
            rotation,
            radius,
        }
    }
}

impl Default for JointPose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY, Joint::DEFAULT_RADIUS)
    }
}

/// One hand's joints plus tracking state.
#[derive(Debug, Clone)]
pub struct Hand {
    handedness: Handedness,
    joints: [Joint; JOINT_COUNT],
    tracked: bool,
}

impl Hand {
    pub fn new(handedness: Handedness) -> Self {
        Self {
            handedness,
            joints: JointId::ALL.map(Joint::new),
            tracked: false,
        }
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    pub(crate) fn set_tracked(&mut self, tracked: bool) {
        self.tracked = tracked;
    }

    /// All joints, regardless of tracking state.
    pub fn joints(&self) -> &[Joint; JOINT_COUNT] {
        &self.joints
    }

    pub(crate) fn joints_mut(&mut self) -> &mut [Joint; JOINT_COUNT] {
        &mut self.joints
    }

    #[inline]
    pub fn joint(&self, id: JointId) -> &Joint {
        &self.joints[id.index()]
    }

    #[inline]
    pub fn wrist(&self) -> &Joint {
        &self.joints[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrist_is_first_and_raw_ids_are_offset() {
        assert_eq!(JointId::Wrist.index(), 0);
        assert_eq!(JointId::Wrist.raw(), 1);
        assert_eq!(JointId::LittleTip.raw() as usize, JOINT_COUNT);
        assert_eq!(JointId::try_from(1).unwrap(), JointId::Wrist);
        assert!(JointId::try_from(0).is_err());
        assert!(JointId::try_from(JOINT_COUNT as u8 + 1).is_err());
    }

    #[test]
    fn joint_array_matches_declaration_order() {
        let hand = Hand::new(Handedness::Left);
        for (i, joint) in hand.joints().iter().enumerate() {
            assert_eq!(joint.id.index(), i);
        }
    }

    #[test]
    fn finger_chains_start_at_metacarpal() {
        for finger in Finger::ALL {
            assert!(finger.metacarpal().is_metacarpal());
            assert!(finger.tip().is_tip());
            assert_eq!(finger.tip().finger(), Some(finger));
        }
        assert_eq!(JointId::Palm.finger(), None);
    }

    #[test]
    fn parse_handedness() {
        assert_eq!("Left".parse::<Handedness>().unwrap(), Handedness::Left);
        assert_eq!("r".parse::<Handedness>().unwrap(), Handedness::Right);
        assert!("invalid".parse::<Handedness>().is_err());
        assert_eq!(Handedness::Left.other(), Handedness::Right);
    }
}
