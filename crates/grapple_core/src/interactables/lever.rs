use bevy_math::{Quat, Vec3};

use super::Pose;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{closest_joint, Interactable};

/// A lever hinged at the pose, rotating about local X.
///
/// At an angle of zero the handle points along local +Y.
#[derive(Debug, Clone)]
pub struct Lever {
    pub pose: Pose,
    pub length: f32,
    pub min_angle: f32,
    pub max_angle: f32,
    pub grab_radius: f32,
    angle: f32,
}

impl Lever {
    pub fn new(pose: Pose, length: f32, min_angle: f32, max_angle: f32) -> Self {
        Self {
            pose,
            length,
            min_angle,
            max_angle,
            grab_radius: 0.04,
            angle: 0.0_f32.clamp(min_angle, max_angle),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Angle remapped from the limits to `[0, 1]`.
    pub fn normalized(&self) -> f32 {
        let range = self.max_angle - self.min_angle;
        if range <= f32::EPSILON {
            return 0.0;
        }
        (self.angle - self.min_angle) / range
    }

    pub fn handle_position(&self) -> Vec3 {
        self.pose
            .to_world(Quat::from_rotation_x(self.angle) * Vec3::Y * self.length)
    }
}

impl Interactable for Lever {
    fn reference_point(&self) -> Vec3 {
        self.handle_position()
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.pose = Pose::new(translation, rotation);
    }

    fn nominate_joint(&self, _hand: Handedness, joints: &[Joint]) -> Option<JointId> {
        closest_joint(joints, self.handle_position(), |joint| {
            joint.id == JointId::Palm || joint.id.is_tip()
        })
    }

    fn check_interaction(&mut self, _hand: Handedness, joint: &Joint) -> bool {
        if joint.position.distance(self.handle_position()) > self.grab_radius + joint.radius {
            return false;
        }

        let local = self.pose.to_local(joint.position);
        if local.y.abs() > f32::EPSILON || local.z.abs() > f32::EPSILON {
            self.angle = local.z.atan2(local.y).clamp(self.min_angle, self.max_angle);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_4;

    use super::*;
    use crate::interactables::test_utils::joint_at;

    #[test]
    fn angle_follows_joint_within_limits() {
        let mut lever = Lever::new(Pose::default(), 0.2, -FRAC_PI_4, FRAC_PI_4);
        assert!(lever.handle_position().abs_diff_eq(Vec3::Y * 0.2, 1e-6));

        let rotated = Quat::from_rotation_x(0.3) * Vec3::Y * 0.2;
        // Grab slightly off the handle so it is still within reach.
        let grab = joint_at(JointId::Palm, Vec3::Y * 0.2 + Vec3::Z * 0.02);
        assert!(lever.check_interaction(Handedness::Left, &grab));

        let pull = joint_at(JointId::Palm, rotated);
        lever.angle = 0.28;
        assert!(lever.check_interaction(Handedness::Left, &pull));
        assert!((lever.angle() - 0.3).abs() < 1e-4);

        let beyond = joint_at(JointId::Palm, Quat::from_rotation_x(1.2) * Vec3::Y * 0.2);
        lever.angle = FRAC_PI_4;
        lever.grab_radius = 1.0;
        assert!(lever.check_interaction(Handedness::Left, &beyond));
        assert_eq!(lever.angle(), FRAC_PI_4);
        assert_eq!(lever.normalized(), 1.0);
    }

    #[test]
    fn out_of_reach_is_not_grabbed() {
        let mut lever = Lever::new(Pose::default(), 0.2, -1.0, 1.0);
        let joint = joint_at(JointId::Palm, Vec3::NEG_Y);

        assert!(lever.check_interaction(Handedness::Right, &joint) == false);
        assert_eq!(lever.angle(), 0.0);
    }
}
