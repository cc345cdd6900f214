use bevy_math::{Quat, Vec3};

use crate::hand::{Hand, Joint, JointId};

/// Joints walked to build the capsule chain: the wrist, then every finger
/// from metacarpal to tip. The palm is not part of the chain.
pub const CAPSULE_CHAIN: [JointId; 25] = [
    JointId::Wrist,
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

/// Number of capsules per hand.
pub const CAPSULE_COUNT: usize = CAPSULE_CHAIN.len() - 1;

/// Collision proxy spanning two joints of the same hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointCapsule {
    pub start: JointId,
    pub end: JointId,
    pub radius: f32,
    pub length: f32,
    pub center: Vec3,
    /// Maps [`Vec3::Y`] onto the start to end direction.
    pub rotation: Quat,
    pub enabled: bool,
}

impl JointCapsule {
    fn new(start: JointId, end: JointId) -> Self {
        Self {
            start,
            end,
            radius: 0.0,
            length: 0.0,
            center: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            enabled: false,
        }
    }

    /// Recompute the capsule geometry from live joints.
    pub fn refresh(&mut self, joints: &[Joint]) {
        let start = &joints[self.start.index()];
        let end = &joints[self.end.index()];

        let offset = end.position - start.position;
        self.length = offset.length();
        self.center = start.position + offset * 0.5;
        self.radius = start.radius;
        self.rotation = match self.length > f32::EPSILON {
            true => Quat::from_rotation_arc(Vec3::Y, offset / self.length),
            false => Quat::IDENTITY,
        };
    }

    /// Both end points of the capsule's core segment.
    pub fn segment(&self) -> (Vec3, Vec3) {
        let half = self.rotation * Vec3::Y * (self.length * 0.5);
        (self.center - half, self.center + half)
    }
}

/// Joint pairs of the capsule chain.
///
/// Walking the chain, every joint pairs with the one before it, except
/// metacarpals which radiate from the wrist.
pub fn capsule_pairs() -> impl Iterator<Item = (JointId, JointId)> {
    CAPSULE_CHAIN.windows(2).map(|pair| {
        let (prev, curr) = (pair[0], pair[1]);
        match curr.is_metacarpal() {
            true => (curr, JointId::Wrist),
            false => (curr, prev),
        }
    })
}

/// Capsules of one hand.
///
/// Capsules are created once, the first time the hand is initialized, and
/// only have their geometry refreshed afterwards.
#[derive(Debug, Clone, Default)]
pub struct HandCapsules {
    capsules: Vec<JointCapsule>,
    /// Capsules are kept disabled until this is set.
    active: bool,
    min_length: f32,
}

impl HandCapsules {
    pub fn new(min_length: f32) -> Self {
        Self {
            capsules: Vec::new(),
            active: false,
            min_length,
        }
    }

    pub fn is_created(&self) -> bool {
        self.capsules.is_empty() == false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// (Re)initialize on tracking acquisition.
    ///
    /// Returns `true` if the capsules were created by this call.
    pub fn initialize(&mut self, hand: &Hand) -> bool {
        let created = self.is_created() == false;
        if created {
            self.capsules = capsule_pairs()
                .map(|(start, end)| JointCapsule::new(start, end))
                .collect();
        }

        self.active = false;
        self.sync(hand);
        created
    }

    /// Allow capsules to be enabled from the next sync onwards.
    pub fn activate(&mut self, hand: &Hand) {
        self.active = true;
        self.sync(hand);
    }

    /// Disable every capsule without destroying it.
    pub fn deactivate(&mut self) {
        self.active = false;
        for capsule in self.capsules.iter_mut() {
            capsule.enabled = false;
        }
    }

    /// Refresh geometry and enabled flags from live joints.
    pub fn sync(&mut self, hand: &Hand) {
        let enabled = self.active && hand.is_tracked();
        for capsule in self.capsules.iter_mut() {
            capsule.refresh(hand.joints());
            capsule.enabled = enabled && capsule.length >= self.min_length;
        }
    }

    /// Destroy all capsules.
    pub fn teardown(&mut self) -> bool {
        let destroyed = self.is_created();
        self.capsules.clear();
        self.active = false;
        destroyed
    }

    pub fn capsules(&self) -> &[JointCapsule] {
        &self.capsules
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::Quat;

    use super::*;
    use crate::hand::{Handedness, JointPose, JOINT_COUNT};
    use crate::joint_store::JointStore;

    #[test]
    fn chain_has_one_capsule_less_than_joints() {
        assert_eq!(capsule_pairs().count(), CAPSULE_COUNT);
        assert_eq!(CAPSULE_COUNT, 24);
    }

    #[test]
    fn metacarpals_radiate_from_wrist() {
        for (start, end) in capsule_pairs() {
            if start.is_metacarpal() {
                assert_eq!(end, JointId::Wrist);
            } else {
                assert_eq!(start.finger(), end.finger());
                assert_eq!(start.index(), end.index() + 1);
            }
        }
    }

    fn tracked_hand(store: &mut JointStore) -> &Hand {
        let poses: [JointPose; JOINT_COUNT] = std::array::from_fn(|i| {
            JointPose::new(Vec3::new(0.0, i as f32 * 0.01, 0.0), Quat::IDENTITY, 0.005)
        });
        store.set_tracked(Handedness::Left, true);
        store.update_hand(Handedness::Left, &poses);
        store.hand(Handedness::Left)
    }

    #[test]
    fn capsules_follow_joints() {
        let mut store = JointStore::new();
        let hand = tracked_hand(&mut store);

        let mut capsules = HandCapsules::new(1e-4);
        assert!(capsules.initialize(hand));
        assert!(capsules.initialize(hand) == false);
        assert!(capsules.capsules().iter().all(|c| c.enabled == false));

        capsules.activate(hand);
        let tip = capsules
            .capsules()
            .iter()
            .find(|c| c.start == JointId::IndexTip)
            .unwrap();
        assert!(tip.enabled);
        assert_eq!(tip.end, JointId::IndexDistal);
        assert!((tip.length - 0.01).abs() < 1e-5);

        // Tip sits above the distal joint, so start to end points down.
        let (a, b) = tip.segment();
        let start = hand.joint(JointId::IndexTip).position;
        let end = hand.joint(JointId::IndexDistal).position;
        assert!(a.distance(start) < 1e-5);
        assert!(b.distance(end) < 1e-5);
    }

    #[test]
    fn deactivated_capsules_stay_created() {
        let mut store = JointStore::new();
        let hand = tracked_hand(&mut store);

        let mut capsules = HandCapsules::new(1e-4);
        capsules.initialize(hand);
        capsules.activate(hand);
        capsules.deactivate();

        assert!(capsules.is_created());
        assert!(capsules.capsules().iter().all(|c| c.enabled == false));
        assert!(capsules.teardown());
        assert!(capsules.is_created() == false);
    }
}
