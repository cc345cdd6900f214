use bevy_math::{Quat, Vec3};

use super::Pose;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{closest_joint, Interactable, InteractableState};

/// Snaps a joint in while it is close to the socket center.
#[derive(Debug, Clone)]
pub struct Socket {
    pub pose: Pose,
    /// Distance at which a joint snaps in.
    pub snap_distance: f32,
    /// Distance at which a snapped joint is released, at least `snap_distance`.
    pub release_distance: f32,
    /// Joint a snapped hand is held by.
    pub joint: JointId,
    occupied: bool,
}

impl Socket {
    pub fn new(pose: Pose, snap_distance: f32) -> Self {
        Self {
            pose,
            snap_distance,
            release_distance: snap_distance * 1.5,
            joint: JointId::Palm,
            occupied: false,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }
}

impl Interactable for Socket {
    fn reference_point(&self) -> Vec3 {
        self.pose.translation
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.pose = Pose::new(translation, rotation);
    }

    fn nominate_joint(&self, _hand: Handedness, joints: &[Joint]) -> Option<JointId> {
        closest_joint(joints, self.pose.translation, |joint| joint.id == self.joint)
    }

    fn check_interaction(&mut self, _hand: Handedness, joint: &Joint) -> bool {
        let distance = joint.position.distance(self.pose.translation);
        match self.occupied {
            true => distance <= self.release_distance.max(self.snap_distance),
            false => distance <= self.snap_distance,
        }
    }

    fn on_state_changed(&mut self, _from: InteractableState, to: InteractableState) {
        self.occupied = to == InteractableState::Interacted;
    }
}
