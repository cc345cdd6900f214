use std::f32::consts::{PI, TAU};

use bevy_math::{Quat, Vec3};

use super::Pose;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{closest_joint, Interactable, InteractableState};

/// A wheel turning about local Y, grabbed on its rim.
#[derive(Debug, Clone)]
pub struct Valve {
    pub pose: Pose,
    pub radius: f32,
    /// Allowed distance between a joint and the rim.
    pub rim_tolerance: f32,
    /// Accumulated rotation in radians, counter clockwise about local Y.
    angle: f32,
    /// Angle of the grabbing joint around the axis on the previous check.
    grab_angles: [Option<f32>; 2],
}

impl Valve {
    pub fn new(pose: Pose, radius: f32) -> Self {
        Self {
            pose,
            radius,
            rim_tolerance: 0.03,
            angle: 0.0,
            grab_angles: [None; 2],
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn turns(&self) -> f32 {
        self.angle / TAU
    }

    /// Angle of a point around the axis, if it lies on the rim.
    fn rim_angle(&self, point: Vec3) -> Option<f32> {
        let local = self.pose.to_local(point);
        let planar = local.x.hypot(local.z);
        let on_rim = (planar - self.radius).abs() <= self.rim_tolerance
            && local.y.abs() <= self.rim_tolerance;

        // Counter clockwise seen from +Y.
        on_rim.then(|| (-local.z).atan2(local.x))
    }
}

/// Wrap an angle difference into `(-PI, PI]`.
fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

impl Interactable for Valve {
    fn reference_point(&self) -> Vec3 {
        self.pose.translation
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.pose = Pose::new(translation, rotation);
    }

    fn nominate_joint(&self, _hand: Handedness, joints: &[Joint]) -> Option<JointId> {
        joints
            .iter()
            .filter(|joint| joint.id == JointId::Palm || joint.id.is_tip())
            .find(|joint| self.rim_angle(joint.position).is_some())
            .map(|joint| joint.id)
            .or_else(|| closest_joint(joints, self.pose.translation, |j| j.id == JointId::Palm))
    }

    fn check_interaction(&mut self, hand: Handedness, joint: &Joint) -> bool {
        let rim = self.rim_angle(joint.position);
        let grab_angle = &mut self.grab_angles[hand.index()];
        let Some(current) = rim else {
            *grab_angle = None;
            return false;
        };

        if let Some(previous) = grab_angle.replace(current) {
            self.angle += wrap_angle(current - previous);
        }
        true
    }

    fn on_state_changed(&mut self, _from: InteractableState, to: InteractableState) {
        if to != InteractableState::Interacted {
            self.grab_angles = [None; 2];
        }
    }
}
