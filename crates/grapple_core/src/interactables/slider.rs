use bevy_math::{Quat, Vec3};

use super::Pose;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{closest_joint, Interactable};

/// A handle sliding along a track on local X, centered on the pose.
#[derive(Debug, Clone)]
pub struct Slider {
    pub pose: Pose,
    pub track_length: f32,
    /// Joints within this distance of the handle grab it.
    pub grab_radius: f32,
    /// Handle position along the track, in `[0, 1]`.
    value: f32,
}

impl Slider {
    pub fn new(pose: Pose, track_length: f32) -> Self {
        Self {
            pose,
            track_length,
            grab_radius: 0.03,
            value: 0.5,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value.clamp(0.0, 1.0);
    }

    pub fn handle_position(&self) -> Vec3 {
        self.pose
            .to_world(Vec3::X * (self.value - 0.5) * self.track_length)
    }

    /// Track value of the projection of `point` onto the track.
    fn project(&self, point: Vec3) -> f32 {
        if self.track_length <= f32::EPSILON {
            return 0.5;
        }
        (self.pose.to_local(point).x / self.track_length + 0.5).clamp(0.0, 1.0)
    }
}

impl Interactable for Slider {
    fn reference_point(&self) -> Vec3 {
        self.handle_position()
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.pose = Pose::new(translation, rotation);
    }

    fn nominate_joint(&self, _hand: Handedness, joints: &[Joint]) -> Option<JointId> {
        closest_joint(joints, self.handle_position(), |joint| joint.id.is_tip())
    }

    fn check_interaction(&mut self, _hand: Handedness, joint: &Joint) -> bool {
        if joint.position.distance(self.handle_position()) > self.grab_radius + joint.radius {
            return false;
        }

        self.value = self.project(joint.position);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactables::test_utils::joint_at;

    #[test]
    fn handle_follows_grabbing_joint() {
        let mut slider = Slider::new(Pose::default(), 0.2);
        assert!(slider.handle_position().abs_diff_eq(Vec3::ZERO, 1e-6));

        let joint = joint_at(JointId::IndexTip, Vec3::new(0.02, 0.01, 0.0));
        assert!(slider.check_interaction(Handedness::Left, &joint));
        assert!((slider.value() - 0.6).abs() < 1e-5);

        let far = joint_at(JointId::IndexTip, Vec3::new(-0.1, 0.0, 0.0));
        assert!(slider.check_interaction(Handedness::Left, &far) == false);
        assert!((slider.value() - 0.6).abs() < 1e-5);
    }

    #[test]
    fn value_is_clamped_to_track() {
        let mut slider = Slider::new(Pose::from_translation(Vec3::Y), 0.2);
        slider.set_value(0.99);

        let joint = joint_at(JointId::IndexTip, Vec3::new(0.12, 1.0, 0.0));
        assert!(slider.check_interaction(Handedness::Right, &joint));
        assert_eq!(slider.value(), 1.0);
    }
}
