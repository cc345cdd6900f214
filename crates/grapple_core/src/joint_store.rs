use bevy_log::{debug, error};

use crate::hand::{Hand, Handedness, Joint, JointId, JointPose, JOINT_COUNT};

/// Supplies per-joint poses for one hand, once per frame.
pub trait JointPoseProvider {
    /// Pose of a joint, or `None` if the source has no data for it this frame.
    fn joint_pose(&self, id: JointId) -> Option<JointPose>;
}

impl JointPoseProvider for [JointPose; JOINT_COUNT] {
    fn joint_pose(&self, id: JointId) -> Option<JointPose> {
        Some(self[id.index()])
    }
}

impl JointPoseProvider for [Option<JointPose>; JOINT_COUNT] {
    fn joint_pose(&self, id: JointId) -> Option<JointPose> {
        self[id.index()]
    }
}

/// Edge of a hand's tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingChange {
    Acquired,
    Lost,
}

/// Owns the joints of both hands.
#[derive(Debug, Clone)]
pub struct JointStore {
    hands: [Hand; 2],
}

impl Default for JointStore {
    fn default() -> Self {
        Self {
            hands: Handedness::ALL.map(Hand::new),
        }
    }
}

impl JointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the joints of a hand from a pose provider.
    ///
    /// Joints the provider has no pose for keep their previous value.
    pub fn update_hand(&mut self, hand: Handedness, provider: &impl JointPoseProvider) {
        for joint in self.hands[hand.index()].joints_mut().iter_mut() {
            if let Some(pose) = provider.joint_pose(joint.id) {
                joint.set_pose(pose);
            }
        }
    }

    /// Set the tracking state of a hand, returning the edge if it changed.
    ///
    /// Losing tracking keeps the last known joint positions.
    pub fn set_tracked(&mut self, hand: Handedness, tracked: bool) -> Option<TrackingChange> {
        let hand_joints = &mut self.hands[hand.index()];
        if hand_joints.is_tracked() == tracked {
            return None;
        }

        hand_joints.set_tracked(tracked);
        debug!("Hand {hand} tracking {}.", if tracked { "acquired" } else { "lost" });
        match tracked {
            true => Some(TrackingChange::Acquired),
            false => Some(TrackingChange::Lost),
        }
    }

    pub fn is_tracked(&self, hand: Handedness) -> bool {
        self.hands[hand.index()].is_tracked()
    }

    /// Hand data, regardless of tracking state.
    pub fn hand(&self, hand: Handedness) -> &Hand {
        &self.hands[hand.index()]
    }

    /// Joints of a tracked hand.
    pub fn try_get_joints(&self, hand: Handedness) -> Option<&[Joint]> {
        let hand = &self.hands[hand.index()];
        match hand.is_tracked() {
            true => Some(hand.joints().as_slice()),
            false => None,
        }
    }

    /// A single joint of a tracked hand.
    pub fn try_get_joint(&self, hand: Handedness, id: JointId) -> Option<&Joint> {
        self.try_get_joints(hand).map(|joints| &joints[id.index()])
    }

    /// A single joint addressed by a tracking-source joint id.
    pub fn try_get_joint_by_raw_id(&self, hand: Handedness, raw_id: u8) -> Option<&Joint> {
        match JointId::try_from(raw_id) {
            Ok(id) => self.try_get_joint(hand, id),
            Err(err) => {
                error!("{err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::{Quat, Vec3};

    use super::*;

    fn poses(offset: Vec3) -> [JointPose; JOINT_COUNT] {
        std::array::from_fn(|i| {
            JointPose::new(offset + Vec3::X * i as f32, Quat::IDENTITY, 0.01)
        })
    }

    #[test]
    fn untracked_hand_has_no_joints() {
        let mut store = JointStore::new();
        store.update_hand(Handedness::Left, &poses(Vec3::ZERO));

        assert!(store.try_get_joints(Handedness::Left).is_none());
        assert!(store.try_get_joint(Handedness::Left, JointId::Wrist).is_none());
    }

    #[test]
    fn tracked_hand_has_every_joint() {
        let mut store = JointStore::new();
        store.set_tracked(Handedness::Right, true);
        store.update_hand(Handedness::Right, &poses(Vec3::Y));

        let joints = store.try_get_joints(Handedness::Right).unwrap();
        assert_eq!(joints.len(), JOINT_COUNT);
        assert_eq!(joints[0].id, JointId::Wrist);
        assert_eq!(joints[0].position, Vec3::Y);

        let tip = store
            .try_get_joint_by_raw_id(Handedness::Right, JointId::IndexTip.raw())
            .unwrap();
        assert_eq!(tip.id, JointId::IndexTip);
        assert!(store.try_get_joint_by_raw_id(Handedness::Right, 0).is_none());
    }

    #[test]
    fn tracking_edges_are_reported_once() {
        let mut store = JointStore::new();
        assert_eq!(
            store.set_tracked(Handedness::Left, true),
            Some(TrackingChange::Acquired)
        );
        assert_eq!(store.set_tracked(Handedness::Left, true), None);
        assert_eq!(
            store.set_tracked(Handedness::Left, false),
            Some(TrackingChange::Lost)
        );
        assert_eq!(store.set_tracked(Handedness::Left, false), None);
    }

    #[test]
    fn losing_tracking_keeps_stale_joints() {
        let mut store = JointStore::new();
        store.set_tracked(Handedness::Left, true);
        store.update_hand(Handedness::Left, &poses(Vec3::Z));
        store.set_tracked(Handedness::Left, false);

        assert_eq!(
            store.hand(Handedness::Left).wrist().position,
            Vec3::Z
        );
    }

    #[test]
    fn missing_poses_keep_previous_values() {
        let mut store = JointStore::new();
        store.set_tracked(Handedness::Left, true);
        store.update_hand(Handedness::Left, &poses(Vec3::ZERO));

        let mut partial = [None; JOINT_COUNT];
        partial[JointId::Palm.index()] = Some(JointPose::new(Vec3::ONE, Quat::IDENTITY, 0.02));
        store.update_hand(Handedness::Left, &partial);

        let joints = store.try_get_joints(Handedness::Left).unwrap();
        assert_eq!(joints[JointId::Palm.index()].position, Vec3::ONE);
        assert_eq!(joints[JointId::Palm.index()].radius, 0.02);
        assert_eq!(joints[JointId::Wrist.index()].position, Vec3::ZERO);
    }
}
