use std::collections::BTreeMap;

use bevy_log::{debug, warn};
use bevy_math::{Quat, Vec3};

use crate::config::{InteractionConfig, ProximityConfig};
use crate::event::GrappleEvent;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{
    GroupId, Interactable, InteractableGroup, InteractableId, InteractableState,
};
use crate::proximity::nearest_within;
use crate::scheduler::Scheduler;

struct InteractableEntry {
    interactable: Box<dyn Interactable>,
    state: InteractableState,
    /// Hand currently engaging this interactable.
    claimed_by: Option<Handedness>,
    /// Overrides joint nomination.
    forced_joint: Option<JointId>,
    group: Option<GroupId>,
    /// Per hand interaction check pause.
    paused: [bool; 2],
}

impl InteractableEntry {
    fn set_state(&mut self, id: InteractableId, to: InteractableState, events: &mut Vec<GrappleEvent>) {
        let from = self.state;
        if from == to {
            return;
        }

        self.state = to;
        self.interactable.on_state_changed(from, to);
        events.push(GrappleEvent::StateChanged { id, from, to });
    }

    /// Release the claim of `hand`, returning `true` if it held one.
    fn release(&mut self, id: InteractableId, hand: Handedness, events: &mut Vec<GrappleEvent>) -> bool {
        if self.claimed_by != Some(hand) {
            return false;
        }

        self.claimed_by = None;
        events.push(GrappleEvent::InteractEnded { id, hand });
        true
    }
}

/// Tracks every interactable, the proximates of each hand, and their
/// interaction states.
pub struct InteractableManager {
    proximity: ProximityConfig,
    interaction: InteractionConfig,
    entries: BTreeMap<InteractableId, InteractableEntry>,
    groups: BTreeMap<GroupId, InteractableGroup>,
    /// Nearest first.
    proximates: [Vec<InteractableId>; 2],
    cooldowns: Scheduler<GroupId>,
    next_id: u32,
    next_group_id: u32,
}

impl InteractableManager {
    pub fn new(proximity: ProximityConfig, interaction: InteractionConfig) -> Self {
        Self {
            proximity,
            interaction,
            entries: BTreeMap::new(),
            groups: BTreeMap::new(),
            proximates: Default::default(),
            cooldowns: Scheduler::new(),
            next_id: 0,
            next_group_id: 0,
        }
    }

    pub fn proximity_config(&self) -> &ProximityConfig {
        &self.proximity
    }

    pub fn register(&mut self, interactable: impl Interactable + 'static) -> InteractableId {
        self.register_boxed(Box::new(interactable))
    }

    pub fn register_boxed(&mut self, interactable: Box<dyn Interactable>) -> InteractableId {
        let id = InteractableId(self.next_id);
        self.next_id += 1;

        self.entries.insert(
            id,
            InteractableEntry {
                interactable,
                state: InteractableState::Active,
                claimed_by: None,
                forced_joint: None,
                group: None,
                paused: [false; 2],
            },
        );
        id
    }

    /// Remove an interactable, ending its proximity and interaction first.
    pub fn unregister(
        &mut self,
        id: InteractableId,
        events: &mut Vec<GrappleEvent>,
    ) -> Option<Box<dyn Interactable>> {
        self.remove_from_proximates(id, events);

        let entry = self.entries.remove(&id)?;
        if let Some(group) = entry.group.and_then(|g| self.groups.get_mut(&g)) {
            group.remove_member(id);
        }
        Some(entry.interactable)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = InteractableId> + '_ {
        self.entries.keys().copied()
    }

    pub fn get(&self, id: InteractableId) -> Option<&dyn Interactable> {
        self.entries.get(&id).map(|e| e.interactable.as_ref())
    }

    pub fn get_mut(&mut self, id: InteractableId) -> Option<&mut (dyn Interactable + 'static)> {
        self.entries.get_mut(&id).map(|e| e.interactable.as_mut())
    }

    pub fn set_pose(&mut self, id: InteractableId, translation: Vec3, rotation: Quat) -> bool {
        match self.get_mut(id) {
            Some(interactable) => {
                interactable.set_pose(translation, rotation);
                true
            }
            None => false,
        }
    }

    pub fn state(&self, id: InteractableId) -> Option<InteractableState> {
        self.entries.get(&id).map(|e| e.state)
    }

    pub fn claimed_by(&self, id: InteractableId) -> Option<Handedness> {
        self.entries.get(&id).and_then(|e| e.claimed_by)
    }

    pub fn is_check_paused(&self, id: InteractableId, hand: Handedness) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|e| e.paused[hand.index()])
    }

    /// Force a joint to be used instead of the interactable's nomination.
    pub fn set_forced_joint(&mut self, id: InteractableId, joint: Option<JointId>) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.forced_joint = joint;
                true
            }
            None => false,
        }
    }

    /// Closest proximates of a hand, nearest first.
    pub fn proximates(&self, hand: Handedness) -> &[InteractableId] {
        &self.proximates[hand.index()]
    }

    /// Enable or disable an interactable.
    ///
    /// Disabled interactables leave every proximity set and lose their claim.
    pub fn set_disabled(
        &mut self,
        id: InteractableId,
        disabled: bool,
        events: &mut Vec<GrappleEvent>,
    ) -> bool {
        if self.entries.contains_key(&id) == false {
            warn!("Interactable {id:?} is not registered.");
            return false;
        }

        if disabled {
            self.remove_from_proximates(id, events);
        }

        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        match (disabled, entry.state) {
            (true, _) => entry.set_state(id, InteractableState::Disabled, events),
            (false, InteractableState::Disabled) => {
                entry.set_state(id, InteractableState::Active, events)
            }
            _ => {}
        }
        true
    }

    /// Create a mutual exclusion group.
    ///
    /// Members already in another group are moved into this one.
    pub fn create_group(
        &mut self,
        members: impl IntoIterator<Item = InteractableId>,
        cooldown: Option<f32>,
    ) -> GroupId {
        let group_id = GroupId(self.next_group_id);
        self.next_group_id += 1;

        let members = members
            .into_iter()
            .filter(|id| self.entries.contains_key(id))
            .collect::<Vec<_>>();

        for id in members.iter() {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            if let Some(old_group) = entry.group.and_then(|g| self.groups.get_mut(&g)) {
                old_group.remove_member(*id);
            }
            entry.group = Some(group_id);
        }

        let cooldown = cooldown.unwrap_or(self.interaction.default_group_cooldown);
        self.groups
            .insert(group_id, InteractableGroup::new(members, cooldown));
        group_id
    }

    pub fn remove_group(&mut self, group_id: GroupId) -> Option<InteractableGroup> {
        let group = self.groups.remove(&group_id)?;
        if let Some(task) = group.cooldown_task {
            self.cooldowns.cancel(task);
        }
        for id in group.members() {
            if let Some(entry) = self.entries.get_mut(id) {
                entry.group = None;
            }
        }
        Some(group)
    }

    pub fn group(&self, group_id: GroupId) -> Option<&InteractableGroup> {
        self.groups.get(&group_id)
    }

    /// Advance group cooldown timers.
    pub fn advance(&mut self, delta_seconds: f32) {
        for group_id in self.cooldowns.advance(delta_seconds) {
            if let Some(group) = self.groups.get_mut(&group_id) {
                debug!("Group {group_id:?} cooldown ended.");
                group.cooldown_task = None;
            }
        }
    }

    /// Cancel every pending group cooldown.
    pub fn shutdown(&mut self) {
        self.cooldowns.clear();
        for group in self.groups.values_mut() {
            group.cooldown_task = None;
        }
    }

    /// Run proximity detection and interaction checks for a tracked hand.
    pub fn update_hand(&mut self, hand: Handedness, joints: &[Joint], events: &mut Vec<GrappleEvent>) {
        let (next, struck) = self.detect_proximates(hand, joints);
        let previous = std::mem::take(&mut self.proximates[hand.index()]);

        for id in previous.iter().filter(|id| next.contains(id) == false) {
            // Striking a member is not a release of the group.
            let start_cooldown = struck.contains(id) == false;
            self.leave_proximity(*id, hand, start_cooldown, events);
        }

        for id in next.iter().filter(|id| previous.contains(id) == false) {
            let Some(entry) = self.entries.get_mut(id) else {
                continue;
            };
            events.push(GrappleEvent::ProximityStarted { id: *id, hand });
            if entry.state == InteractableState::Active {
                entry.set_state(*id, InteractableState::Proximate, events);
            }
        }

        self.proximates[hand.index()] = next.clone();
        for id in next {
            // Another member may have been engaged earlier this frame.
            if self.is_group_engaged_elsewhere(id) {
                continue;
            }
            self.check_interaction(id, hand, joints, events);
        }
    }

    /// Release everything a hand was engaging and clear its proximates.
    pub fn on_tracking_lost(&mut self, hand: Handedness, events: &mut Vec<GrappleEvent>) {
        let previous = std::mem::take(&mut self.proximates[hand.index()]);
        for id in previous {
            self.leave_proximity(id, hand, true, events);
        }

        // Claims should always be proximate, sweep anyway.
        let orphaned = self
            .entries
            .iter()
            .filter(|(_, e)| e.claimed_by == Some(hand))
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        for id in orphaned {
            self.leave_proximity(id, hand, true, events);
        }
    }

    /// Nearest non-disabled interactables filtered by groups, and the
    /// members struck by their group.
    fn detect_proximates(
        &self,
        hand: Handedness,
        joints: &[Joint],
    ) -> (Vec<InteractableId>, Vec<InteractableId>) {
        let Some(reference) = joints.get(self.proximity.reference_joint.index()) else {
            warn!("Hand {hand} has no {:?} joint.", self.proximity.reference_joint);
            return (Vec::new(), Vec::new());
        };

        let candidates = self
            .entries
            .iter()
            .filter(|(_, e)| e.state != InteractableState::Disabled)
            .map(|(id, e)| (*id, e.interactable.reference_point()));
        let nearest = nearest_within(
            candidates,
            reference.position,
            self.proximity.radius,
            self.proximity.max_proximates,
        );

        let mut proximates = nearest.clone();
        for group in self.groups.values() {
            let engaged = group.members().iter().copied().find(|id| {
                self.entries
                    .get(id)
                    .is_some_and(|e| e.state == InteractableState::Interacted)
            });
            group.filter(&mut proximates, engaged);
        }

        let struck = nearest
            .into_iter()
            .filter(|id| proximates.contains(id) == false)
            .collect();
        (proximates, struck)
    }

    /// Whether another member of the group of `id` is engaged.
    fn is_group_engaged_elsewhere(&self, id: InteractableId) -> bool {
        let Some(group) = self
            .entries
            .get(&id)
            .and_then(|e| e.group)
            .and_then(|g| self.groups.get(&g))
        else {
            return false;
        };

        group.members().iter().any(|member| {
            *member != id
                && self
                    .entries
                    .get(member)
                    .is_some_and(|e| e.state == InteractableState::Interacted)
        })
    }

    /// `id` is no longer among the proximates of `hand`.
    fn leave_proximity(
        &mut self,
        id: InteractableId,
        hand: Handedness,
        start_cooldown: bool,
        events: &mut Vec<GrappleEvent>,
    ) {
        let other_has = self.proximates[hand.other().index()].contains(&id);
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };

        if entry.paused[hand.index()] {
            entry.paused[hand.index()] = false;
            events.push(GrappleEvent::InteractionCheckLeftProximity { id, hand });
        }

        let released = entry.release(id, hand, events);
        let group = entry.group;

        if entry.state != InteractableState::Disabled {
            match other_has {
                true if released => entry.set_state(id, InteractableState::Proximate, events),
                true => {}
                false => {
                    events.push(GrappleEvent::ProximityEnded { id, hand });
                    entry.set_state(id, InteractableState::Active, events);
                }
            }
        }

        if released && start_cooldown {
            self.start_cooldown(group);
        }
    }

    fn remove_from_proximates(&mut self, id: InteractableId, events: &mut Vec<GrappleEvent>) {
        for hand in Handedness::ALL {
            let proximates = &mut self.proximates[hand.index()];
            let Some(index) = proximates.iter().position(|p| *p == id) else {
                continue;
            };
            proximates.remove(index);
            self.leave_proximity(id, hand, true, events);
        }
    }

    fn check_interaction(
        &mut self,
        id: InteractableId,
        hand: Handedness,
        joints: &[Joint],
        events: &mut Vec<GrappleEvent>,
    ) {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        if entry.state == InteractableState::Disabled {
            return;
        }

        let nominated = entry
            .forced_joint
            .or_else(|| entry.interactable.nominate_joint(hand, joints));
        let Some(joint) = nominated.and_then(|j| joints.get(j.index())) else {
            if entry.release(id, hand, events) {
                entry.set_state(id, InteractableState::Proximate, events);
                let group = entry.group;
                self.start_cooldown(group);
            }
            return;
        };

        let paused = &mut entry.paused[hand.index()];
        if entry.interactable.should_pause_checks(hand, joint) {
            if *paused == false {
                *paused = true;
                events.push(GrappleEvent::InteractionCheckPaused { id, hand });
            }
            return;
        }
        if *paused {
            *paused = false;
            events.push(GrappleEvent::InteractionCheckResumed { id, hand });
        }

        // First claim wins.
        if entry.claimed_by == Some(hand.other()) {
            return;
        }

        let interacting = entry.interactable.check_interaction(hand, joint);
        let claimed = entry.claimed_by == Some(hand);
        match (interacting, claimed) {
            (true, false) => {
                entry.claimed_by = Some(hand);
                entry.set_state(id, InteractableState::Interacted, events);
                events.push(GrappleEvent::InteractStarted { id, hand });
            }
            (false, true) => {
                entry.release(id, hand, events);
                entry.set_state(id, InteractableState::Proximate, events);
                let group = entry.group;
                self.start_cooldown(group);
            }
            _ => {}
        }
    }

    fn start_cooldown(&mut self, group_id: Option<GroupId>) {
        let Some((group_id, group)) =
            group_id.and_then(|id| self.groups.get_mut(&id).map(|g| (id, g)))
        else {
            return;
        };
        if group.cooldown() <= 0.0 {
            return;
        }

        if let Some(task) = group.cooldown_task.take() {
            self.cooldowns.cancel(task);
        }
        group.cooldown_task = Some(self.cooldowns.schedule(group.cooldown(), group_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Hand, JOINT_COUNT};

    /// Sphere that is interacted while the index tip is inside it.
    struct Orb {
        center: Vec3,
        radius: f32,
        pause_below: Option<f32>,
    }

    impl Orb {
        fn new(center: Vec3) -> Self {
            Self {
                center,
                radius: 0.05,
                pause_below: None,
            }
        }
    }

    impl Interactable for Orb {
        fn reference_point(&self) -> Vec3 {
            self.center
        }

        fn nominate_joint(&self, _hand: Handedness, _joints: &[Joint]) -> Option<JointId> {
            Some(JointId::IndexTip)
        }

        fn check_interaction(&mut self, _hand: Handedness, joint: &Joint) -> bool {
            joint.position.distance(self.center) < self.radius
        }

        fn should_pause_checks(&mut self, _hand: Handedness, joint: &Joint) -> bool {
            self.pause_below.is_some_and(|y| joint.position.y < y)
        }
    }

    /// Every joint at `palm`, except the index tip at `tip`.
    fn joints(handedness: Handedness, palm: Vec3, tip: Vec3) -> [Joint; JOINT_COUNT] {
        let mut joints = *Hand::new(handedness).joints();
        for joint in joints.iter_mut() {
            joint.position = palm;
        }
        joints[JointId::IndexTip.index()].position = tip;
        joints
    }

    fn manager() -> InteractableManager {
        InteractableManager::new(ProximityConfig::default(), InteractionConfig::default())
    }

    #[test]
    fn proximates_are_bounded_and_sorted() {
        let mut manager = manager();
        let ids = (0..6)
            .map(|i| manager.register(Orb::new(Vec3::X * i as f32 * 0.05)))
            .collect::<Vec<_>>();
        let mut events = Vec::new();

        let joints = joints(Handedness::Left, Vec3::ZERO, Vec3::Y);
        manager.update_hand(Handedness::Left, &joints, &mut events);

        assert_eq!(manager.proximates(Handedness::Left), &ids[0..3]);
        assert_eq!(manager.state(ids[0]), Some(InteractableState::Proximate));
        assert_eq!(manager.state(ids[4]), Some(InteractableState::Active));
        assert!(events.contains(&GrappleEvent::ProximityStarted {
            id: ids[2],
            hand: Handedness::Left
        }));
    }

    #[test]
    fn disabled_interactables_are_never_proximate() {
        let mut manager = manager();
        let near = manager.register(Orb::new(Vec3::ZERO));
        let far = manager.register(Orb::new(Vec3::X * 0.1));
        let mut events = Vec::new();

        let joints = joints(Handedness::Left, Vec3::ZERO, Vec3::Y);
        manager.update_hand(Handedness::Left, &joints, &mut events);
        assert!(manager.proximates(Handedness::Left).contains(&near));

        assert!(manager.set_disabled(near, true, &mut events));
        assert!(manager.proximates(Handedness::Left).contains(&near) == false);
        manager.update_hand(Handedness::Left, &joints, &mut events);
        assert_eq!(manager.proximates(Handedness::Left), &[far]);
        assert_eq!(manager.state(near), Some(InteractableState::Disabled));

        manager.set_disabled(near, false, &mut events);
        assert_eq!(manager.state(near), Some(InteractableState::Active));
    }

    #[test]
    fn first_claim_wins() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        let mut events = Vec::new();

        let left = joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO);
        let right = joints(Handedness::Right, Vec3::ZERO, Vec3::ZERO);
        manager.update_hand(Handedness::Left, &left, &mut events);
        manager.update_hand(Handedness::Right, &right, &mut events);

        assert_eq!(manager.state(orb), Some(InteractableState::Interacted));
        assert_eq!(manager.claimed_by(orb), Some(Handedness::Left));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GrappleEvent::InteractStarted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn moving_away_ends_interaction() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        let mut events = Vec::new();

        manager.update_hand(
            Handedness::Left,
            &joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO),
            &mut events,
        );
        events.clear();
        manager.update_hand(
            Handedness::Left,
            &joints(Handedness::Left, Vec3::ZERO, Vec3::Y * 0.1),
            &mut events,
        );

        assert_eq!(manager.state(orb), Some(InteractableState::Proximate));
        assert_eq!(manager.claimed_by(orb), None);
        assert!(events.contains(&GrappleEvent::InteractEnded {
            id: orb,
            hand: Handedness::Left
        }));
    }

    #[test]
    fn other_hand_keeps_interactable_proximate() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        let mut events = Vec::new();

        let near = joints(Handedness::Left, Vec3::ZERO, Vec3::Y);
        manager.update_hand(Handedness::Left, &near, &mut events);
        events.clear();
        manager.update_hand(Handedness::Right, &near, &mut events);
        assert_eq!(
            events,
            vec![GrappleEvent::ProximityStarted {
                id: orb,
                hand: Handedness::Right
            }]
        );

        events.clear();
        let far = joints(Handedness::Left, Vec3::X * 10.0, Vec3::X * 10.0);
        manager.update_hand(Handedness::Left, &far, &mut events);

        assert_eq!(manager.state(orb), Some(InteractableState::Proximate));
        assert!(events.is_empty());

        manager.on_tracking_lost(Handedness::Right, &mut events);
        assert_eq!(manager.state(orb), Some(InteractableState::Active));
        assert!(events.contains(&GrappleEvent::ProximityEnded {
            id: orb,
            hand: Handedness::Right
        }));
    }

    #[test]
    fn one_group_member_engaged_per_frame() {
        let mut manager = manager();
        let a = manager.register(Orb::new(Vec3::ZERO));
        let b = manager.register(Orb::new(Vec3::X * 0.01));
        let group = manager.create_group([a, b], Some(0.5));
        let mut events = Vec::new();

        // The tip is inside both orbs.
        let touching = joints(Handedness::Left, Vec3::ZERO, Vec3::X * 0.005);
        for _ in 0..3 {
            manager.update_hand(Handedness::Left, &touching, &mut events);
            manager.advance(0.1);

            assert_eq!(manager.state(a), Some(InteractableState::Interacted));
            assert!(manager.state(b) != Some(InteractableState::Interacted));
            assert!(manager.group(group).is_some_and(|g| g.is_cooling_down() == false));
        }
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GrappleEvent::InteractStarted { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn other_hand_cannot_engage_a_group_member_in_the_same_frame() {
        let mut manager = manager();
        let a = manager.register(Orb::new(Vec3::ZERO));
        let b = manager.register(Orb::new(Vec3::X * 0.2));
        manager.create_group([a, b], Some(0.5));
        let mut events = Vec::new();

        manager.update_hand(
            Handedness::Left,
            &joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO),
            &mut events,
        );
        manager.update_hand(
            Handedness::Right,
            &joints(Handedness::Right, Vec3::X * 0.2, Vec3::X * 0.2),
            &mut events,
        );

        assert_eq!(manager.state(a), Some(InteractableState::Interacted));
        assert_eq!(manager.claimed_by(b), None);
    }

    #[test]
    fn shutdown_cancels_cooldowns() {
        let mut manager = manager();
        let a = manager.register(Orb::new(Vec3::ZERO));
        let b = manager.register(Orb::new(Vec3::X * 0.1));
        let group = manager.create_group([a, b], Some(0.5));
        let mut events = Vec::new();

        manager.update_hand(
            Handedness::Left,
            &joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO),
            &mut events,
        );
        manager.on_tracking_lost(Handedness::Left, &mut events);
        assert!(manager.group(group).is_some_and(|g| g.is_cooling_down()));

        manager.shutdown();
        assert!(manager.cooldowns.is_empty());
        assert!(manager.group(group).is_some_and(|g| g.is_cooling_down() == false));
    }

    #[test]
    fn tracking_loss_resets_engaged_interactables() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        let other = manager.register(Orb::new(Vec3::X * 0.1));
        let mut events = Vec::new();

        let joints = joints(Handedness::Right, Vec3::ZERO, Vec3::ZERO);
        manager.update_hand(Handedness::Right, &joints, &mut events);
        assert_eq!(manager.state(orb), Some(InteractableState::Interacted));

        manager.on_tracking_lost(Handedness::Right, &mut events);
        assert!(manager.proximates(Handedness::Right).is_empty());
        assert_eq!(manager.state(orb), Some(InteractableState::Active));
        assert_eq!(manager.state(other), Some(InteractableState::Active));
        assert_eq!(manager.claimed_by(orb), None);
    }

    #[test]
    fn pausing_skips_checks_until_resumed() {
        let mut manager = manager();
        let orb = manager.register(Orb {
            pause_below: Some(-0.01),
            ..Orb::new(Vec3::ZERO)
        });
        let mut events = Vec::new();

        let below = joints(Handedness::Left, Vec3::ZERO, Vec3::NEG_Y * 0.02);
        manager.update_hand(Handedness::Left, &below, &mut events);
        assert!(manager.is_check_paused(orb, Handedness::Left));
        assert_eq!(manager.state(orb), Some(InteractableState::Proximate));
        assert!(events.contains(&GrappleEvent::InteractionCheckPaused {
            id: orb,
            hand: Handedness::Left
        }));

        events.clear();
        let inside = joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO);
        manager.update_hand(Handedness::Left, &inside, &mut events);
        assert!(manager.is_check_paused(orb, Handedness::Left) == false);
        assert_eq!(
            events,
            vec![
                GrappleEvent::InteractionCheckResumed {
                    id: orb,
                    hand: Handedness::Left
                },
                GrappleEvent::StateChanged {
                    id: orb,
                    from: InteractableState::Proximate,
                    to: InteractableState::Interacted
                },
                GrappleEvent::InteractStarted {
                    id: orb,
                    hand: Handedness::Left
                },
            ]
        );
    }

    #[test]
    fn forced_joint_overrides_nomination() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        manager.set_forced_joint(orb, Some(JointId::Palm));
        let mut events = Vec::new();

        // Index tip is far away, but the palm is inside the orb.
        let joints = joints(Handedness::Left, Vec3::ZERO, Vec3::Y);
        manager.update_hand(Handedness::Left, &joints, &mut events);
        assert_eq!(manager.state(orb), Some(InteractableState::Interacted));
    }

    #[test]
    fn unregister_ends_everything() {
        let mut manager = manager();
        let orb = manager.register(Orb::new(Vec3::ZERO));
        let mut events = Vec::new();

        let joints = joints(Handedness::Left, Vec3::ZERO, Vec3::ZERO);
        manager.update_hand(Handedness::Left, &joints, &mut events);
        events.clear();

        assert!(manager.unregister(orb, &mut events).is_some());
        assert!(manager.proximates(Handedness::Left).is_empty());
        assert!(events.contains(&GrappleEvent::InteractEnded {
            id: orb,
            hand: Handedness::Left
        }));
        assert!(manager.is_empty());
    }
}
