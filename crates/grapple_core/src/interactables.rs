//! Ready made [`Interactable`](crate::interactable::Interactable) implementations.

use bevy_math::{Quat, Vec3};

pub mod button;
pub mod lever;
pub mod slider;
pub mod socket;
pub mod valve;

pub use button::Button;
pub use lever::Lever;
pub use slider::Slider;
pub use socket::Socket;
pub use valve::Valve;

/// World pose shared by every interactable variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::IDENTITY)
    }

    /// Transform a world point into local space.
    #[inline]
    pub fn to_local(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Transform a local point into world space.
    #[inline]
    pub fn to_world(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::from_translation(Vec3::ZERO)
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use bevy_math::Vec3;

    use crate::hand::{Hand, Handedness, Joint, JointId, JOINT_COUNT};

    /// Every joint far away, except `id` at `position`.
    pub fn joints_with(id: JointId, position: Vec3) -> [Joint; JOINT_COUNT] {
        let mut joints = *Hand::new(Handedness::Left).joints();
        for joint in joints.iter_mut() {
            joint.position = Vec3::splat(100.0);
        }
        joints[id.index()].position = position;
        joints
    }

    pub fn joint_at(id: JointId, position: Vec3) -> Joint {
        let mut joint = Joint::new(id);
        joint.position = position;
        joint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_world_round_trip() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_y(0.7));
        let point = Vec3::new(-0.3, 0.4, 0.9);

        assert!(pose.to_world(pose.to_local(point)).abs_diff_eq(point, 1e-5));
    }

    #[test]
    fn default_pose_is_identity() {
        let pose = Pose::default();
        let point = Vec3::new(0.2, -0.1, 0.5);

        assert_eq!(pose.rotation, Quat::IDENTITY);
        assert_eq!(pose.to_world(point), point);
    }
}
