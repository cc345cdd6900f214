use bevy_math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::hand::{Handedness, Joint, JointId};
use crate::scheduler::TaskHandle;

#[derive(Serialize, Deserialize, Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractableState {
    /// Registered, but no hand is close.
    #[default]
    Active,
    /// Among the closest interactables of at least one hand.
    Proximate,
    /// Engaged by a hand.
    Interacted,
    /// Ignored by proximity and interaction checks.
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InteractableId(pub(crate) u32);

impl InteractableId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub(crate) u32);

/// Capabilities the interaction state machine needs from an interactable.
///
/// Implemented per interactable variant (see [`crate::interactables`]).
pub trait Interactable: Send + Sync {
    /// Point used for proximity ranking.
    fn reference_point(&self) -> Vec3;

    /// Move the interactable in world space.
    fn set_pose(&mut self, _translation: Vec3, _rotation: Quat) {}

    /// Pick the joint that should drive the interaction, if any.
    fn nominate_joint(&self, hand: Handedness, joints: &[Joint]) -> Option<JointId>;

    /// Whether the nominated joint currently interacts with this.
    fn check_interaction(&mut self, hand: Handedness, joint: &Joint) -> bool;

    /// Whether checks should be skipped for now.
    fn should_pause_checks(&mut self, _hand: Handedness, _joint: &Joint) -> bool {
        false
    }

    fn on_state_changed(&mut self, _from: InteractableState, _to: InteractableState) {}
}

/// Closest joint to `point` among the joints accepted by `filter`.
pub fn closest_joint(
    joints: &[Joint],
    point: Vec3,
    mut filter: impl FnMut(&Joint) -> bool,
) -> Option<JointId> {
    joints
        .iter()
        .filter(|joint| filter(joint))
        .map(|joint| (joint.id, joint.position.distance_squared(point)))
        .min_by(|(_, d0), (_, d1)| d0.total_cmp(d1))
        .map(|(id, _)| id)
}

/// Interactables of which only one may be engaged at a time.
#[derive(Debug, Clone)]
pub struct InteractableGroup {
    members: Vec<InteractableId>,
    /// Seconds after a member is released during which no member is proximate.
    cooldown: f32,
    pub(crate) cooldown_task: Option<TaskHandle>,
}

impl InteractableGroup {
    pub fn new(members: impl IntoIterator<Item = InteractableId>, cooldown: f32) -> Self {
        Self {
            members: members.into_iter().collect(),
            cooldown,
            cooldown_task: None,
        }
    }

    pub fn members(&self) -> &[InteractableId] {
        &self.members
    }

    pub fn contains(&self, id: InteractableId) -> bool {
        self.members.contains(&id)
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_task.is_some()
    }

    pub(crate) fn remove_member(&mut self, id: InteractableId) {
        self.members.retain(|member| *member != id);
    }

    /// Strike members from a list of proximates.
    ///
    /// While a member is engaged every other member is struck, and during the
    /// cooldown every member is.
    pub fn filter(&self, proximates: &mut Vec<InteractableId>, engaged: Option<InteractableId>) {
        if self.is_cooling_down() {
            proximates.retain(|id| self.contains(*id) == false);
        } else if let Some(engaged) = engaged {
            proximates.retain(|id| *id == engaged || self.contains(*id) == false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Scheduler;

    #[test]
    fn engaged_member_keeps_only_itself() {
        let ids = [InteractableId(0), InteractableId(1), InteractableId(2)];
        let group = InteractableGroup::new([ids[0], ids[1]], 0.5);

        let mut proximates = ids.to_vec();
        group.filter(&mut proximates, None);
        assert_eq!(proximates, ids);

        group.filter(&mut proximates, Some(ids[1]));
        assert_eq!(proximates, vec![ids[1], ids[2]]);
    }

    #[test]
    fn cooldown_strikes_every_member() {
        let ids = [InteractableId(0), InteractableId(1), InteractableId(2)];
        let mut group = InteractableGroup::new([ids[0], ids[1]], 0.5);
        let mut scheduler = Scheduler::new();
        group.cooldown_task = Some(scheduler.schedule(0.5, ()));

        let mut proximates = ids.to_vec();
        group.filter(&mut proximates, Some(ids[0]));
        assert_eq!(proximates, vec![ids[2]]);
    }

    #[test]
    fn closest_joint_respects_filter() {
        let mut joints = [Joint::new(JointId::Wrist), Joint::new(JointId::IndexTip)];
        joints[0].position = Vec3::X * 0.1;
        joints[1].position = Vec3::X * 0.2;

        assert_eq!(closest_joint(&joints, Vec3::ZERO, |_| true), Some(JointId::Wrist));
        assert_eq!(
            closest_joint(&joints, Vec3::ZERO, |j| j.id.is_tip()),
            Some(JointId::IndexTip)
        );
        assert_eq!(closest_joint(&joints, Vec3::ZERO, |_| false), None);
    }
}
