use std::path::Path;

use bevy_log::{debug, info, warn};
use bevy_math::{Quat, Vec3};

use crate::capsule::HandCapsules;
use crate::config::GrappleConfig;
use crate::error::GrappleError;
use crate::event::GrappleEvent;
use crate::finger_bend::FingerBendEstimator;
use crate::gesture::{Gesture, GestureLibrary};
use crate::gesture_recognizer::GestureRecognizer;
use crate::hand::{Finger, Hand, Handedness, Joint, JointId};
use crate::interactable::{GroupId, Interactable, InteractableId, InteractableState};
use crate::interaction::InteractableManager;
use crate::joint_store::{JointPoseProvider, JointStore, TrackingChange};
use crate::scheduler::{Scheduler, TaskHandle};

/// Owns every component and runs the per-frame passes.
///
/// Drive it with [`Grapple::update_hand`] and [`Grapple::set_hand_tracked`]
/// whenever new tracking data arrives, then [`Grapple::tick`] once per frame
/// and [`Grapple::fixed_tick`] once per physics step. Events produced by
/// these calls are buffered until [`Grapple::drain_events`].
pub struct Grapple {
    config: GrappleConfig,
    joints: JointStore,
    capsules: [HandCapsules; 2],
    finger_bend: FingerBendEstimator,
    gestures: GestureRecognizer,
    interactions: InteractableManager,
    /// Delayed capsule enabling, per hand.
    capsule_timers: Scheduler<Handedness>,
    capsule_tasks: [Option<TaskHandle>; 2],
    /// Hands to calibrate on the next tick.
    pending_calibration: [bool; 2],
    events: Vec<GrappleEvent>,
}

impl Default for Grapple {
    fn default() -> Self {
        Self::new(GrappleConfig::default())
    }
}

impl Grapple {
    pub fn new(config: GrappleConfig) -> Self {
        let min_length = config.capsule.min_length;
        Self {
            joints: JointStore::new(),
            capsules: [HandCapsules::new(min_length), HandCapsules::new(min_length)],
            finger_bend: FingerBendEstimator::new(config.finger_bend),
            gestures: GestureRecognizer::new(config.gesture),
            interactions: InteractableManager::new(config.proximity, config.interaction),
            capsule_timers: Scheduler::new(),
            capsule_tasks: [None; 2],
            pending_calibration: [false; 2],
            events: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &GrappleConfig {
        &self.config
    }

    /// Overwrite the joints of a hand with the latest tracking data.
    pub fn update_hand(&mut self, hand: Handedness, provider: &impl JointPoseProvider) {
        self.joints.update_hand(hand, provider);
    }

    /// Set whether a hand is tracked, reacting to acquisition and loss.
    pub fn set_hand_tracked(&mut self, hand: Handedness, tracked: bool) -> Option<TrackingChange> {
        let change = self.joints.set_tracked(hand, tracked)?;
        match change {
            TrackingChange::Acquired => self.on_tracking_acquired(hand),
            TrackingChange::Lost => self.on_tracking_lost(hand),
        }
        Some(change)
    }

    fn on_tracking_acquired(&mut self, hand: Handedness) {
        info!("Hand {hand} tracking acquired.");
        self.events.push(GrappleEvent::TrackingAcquired { hand });

        let capsules = &mut self.capsules[hand.index()];
        if capsules.initialize(self.joints.hand(hand)) {
            self.events.push(GrappleEvent::CapsulesCreated { hand });
        }

        if let Some(task) = self.capsule_tasks[hand.index()].take() {
            self.capsule_timers.cancel(task);
        }
        let delay = self.config.capsule.enable_delay;
        if delay > 0.0 {
            self.capsule_tasks[hand.index()] = Some(self.capsule_timers.schedule(delay, hand));
        } else {
            self.enable_capsules(hand);
        }

        self.pending_calibration[hand.index()] = true;
    }

    fn on_tracking_lost(&mut self, hand: Handedness) {
        info!("Hand {hand} tracking lost.");
        self.events.push(GrappleEvent::TrackingLost { hand });

        self.gestures.force_drop(hand, &mut self.events);
        self.interactions.on_tracking_lost(hand, &mut self.events);

        if let Some(task) = self.capsule_tasks[hand.index()].take() {
            self.capsule_timers.cancel(task);
        }
        self.capsules[hand.index()].deactivate();

        self.finger_bend.reset(hand);
        self.pending_calibration[hand.index()] = false;
    }

    fn enable_capsules(&mut self, hand: Handedness) {
        let capsules = &mut self.capsules[hand.index()];
        if capsules.is_created() == false || self.joints.is_tracked(hand) == false {
            return;
        }

        capsules.activate(self.joints.hand(hand));
        debug!("Hand {hand} capsules enabled.");
        self.events.push(GrappleEvent::CapsulesEnabled { hand });
    }

    /// Tracking pass: timers, calibration, gestures and interactions.
    pub fn tick(&mut self, delta_seconds: f32) {
        for hand in self.capsule_timers.advance(delta_seconds) {
            self.capsule_tasks[hand.index()] = None;
            self.enable_capsules(hand);
        }
        self.interactions.advance(delta_seconds);

        for handedness in Handedness::ALL {
            let hand = self.joints.hand(handedness);
            if hand.is_tracked() == false {
                continue;
            }

            if self.pending_calibration[handedness.index()] {
                self.finger_bend.calibrate(hand);
                self.pending_calibration[handedness.index()] = false;
            }

            self.gestures.recognize(hand, &mut self.events);
            self.interactions
                .update_hand(handedness, hand.joints(), &mut self.events);
        }
    }

    /// Physics pass: refresh capsule geometry.
    pub fn fixed_tick(&mut self) {
        for hand in Handedness::ALL {
            self.capsules[hand.index()].sync(self.joints.hand(hand));
        }
    }

    /// Take every event produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GrappleEvent> + '_ {
        self.events.drain(..)
    }

    /// Destroy capsules and release everything both hands hold.
    pub fn shutdown(&mut self) {
        for hand in Handedness::ALL {
            self.gestures.force_drop(hand, &mut self.events);
            self.interactions.on_tracking_lost(hand, &mut self.events);

            self.capsule_tasks[hand.index()] = None;
            if self.capsules[hand.index()].teardown() {
                self.events.push(GrappleEvent::CapsulesDestroyed { hand });
            }
        }
        self.capsule_timers.clear();
        self.interactions.shutdown();
    }

    pub fn joint_store(&self) -> &JointStore {
        &self.joints
    }

    pub fn hand(&self, hand: Handedness) -> &Hand {
        self.joints.hand(hand)
    }

    pub fn is_tracked(&self, hand: Handedness) -> bool {
        self.joints.is_tracked(hand)
    }

    pub fn try_get_joints(&self, hand: Handedness) -> Option<&[Joint]> {
        self.joints.try_get_joints(hand)
    }

    pub fn try_get_joint(&self, hand: Handedness, id: JointId) -> Option<&Joint> {
        self.joints.try_get_joint(hand, id)
    }

    pub fn capsules(&self, hand: Handedness) -> &HandCapsules {
        &self.capsules[hand.index()]
    }

    pub fn finger_bend(&self) -> &FingerBendEstimator {
        &self.finger_bend
    }

    pub fn try_get_finger_bend(&self, hand: Handedness, finger: Finger, remap: bool) -> Option<f32> {
        self.finger_bend
            .try_get_finger_bend(self.joints.hand(hand), finger, remap)
    }

    pub fn gestures(&self) -> &GestureRecognizer {
        &self.gestures
    }

    pub fn gesture_library(&self) -> &GestureLibrary {
        self.gestures.library()
    }

    /// Mutable access to the gesture library, dropping the current gestures.
    pub fn gesture_library_mut(&mut self) -> &mut GestureLibrary {
        self.gestures.library_mut(&mut self.events)
    }

    /// Append a gesture, returning its final name or `None` if it is malformed.
    pub fn add_gesture(&mut self, gesture: Gesture) -> Option<&str> {
        self.gestures.add_gesture(gesture)
    }

    /// Record the current pose of a tracked hand as a new gesture.
    ///
    /// Returns the final name of the gesture.
    pub fn record_gesture(
        &mut self,
        name: impl Into<String>,
        hand: Handedness,
        forward_joint: Option<JointId>,
    ) -> Option<String> {
        if self.joints.is_tracked(hand) == false {
            warn!("Cannot record a gesture, hand {hand} is not tracked.");
            return None;
        }

        let config = self.gestures.config();
        let gesture = Gesture::record(
            name,
            self.joints.hand(hand),
            forward_joint,
            config.default_distance_threshold,
            config.default_rotation_threshold,
        );
        let name = self.gestures.add_gesture(gesture)?.to_string();
        info!("Recorded gesture '{name}' from hand {hand}.");
        Some(name)
    }

    pub fn export_gestures(&self, path: impl AsRef<Path>) -> Result<(), GrappleError> {
        self.gestures.library().export(path)
    }

    /// Import gestures from a file, returning how many were imported.
    pub fn import_gestures(&mut self, path: impl AsRef<Path>, overwrite: bool) -> usize {
        self.gesture_library_mut().import(path, overwrite)
    }

    /// Replace or extend the gesture library with already loaded gestures.
    pub fn load_gestures(&mut self, gestures: Vec<Gesture>, overwrite: bool) -> usize {
        self.gesture_library_mut().extend(gestures, overwrite)
    }

    pub fn interactions(&self) -> &InteractableManager {
        &self.interactions
    }

    pub fn register_interactable(&mut self, interactable: impl Interactable + 'static) -> InteractableId {
        self.interactions.register(interactable)
    }

    pub fn register_boxed_interactable(&mut self, interactable: Box<dyn Interactable>) -> InteractableId {
        self.interactions.register_boxed(interactable)
    }

    pub fn unregister_interactable(&mut self, id: InteractableId) -> Option<Box<dyn Interactable>> {
        self.interactions.unregister(id, &mut self.events)
    }

    pub fn interactable(&self, id: InteractableId) -> Option<&dyn Interactable> {
        self.interactions.get(id)
    }

    pub fn interactable_mut(&mut self, id: InteractableId) -> Option<&mut (dyn Interactable + 'static)> {
        self.interactions.get_mut(id)
    }

    pub fn interactable_state(&self, id: InteractableId) -> Option<InteractableState> {
        self.interactions.state(id)
    }

    pub fn set_interactable_pose(&mut self, id: InteractableId, translation: Vec3, rotation: Quat) -> bool {
        self.interactions.set_pose(id, translation, rotation)
    }

    pub fn set_interactable_disabled(&mut self, id: InteractableId, disabled: bool) -> bool {
        self.interactions.set_disabled(id, disabled, &mut self.events)
    }

    pub fn set_forced_joint(&mut self, id: InteractableId, joint: Option<JointId>) -> bool {
        self.interactions.set_forced_joint(id, joint)
    }

    /// Group interactables so that only one of them is engaged at a time.
    ///
    /// Uses the configured default cooldown when `cooldown` is `None`.
    pub fn create_group(
        &mut self,
        members: impl IntoIterator<Item = InteractableId>,
        cooldown: Option<f32>,
    ) -> GroupId {
        self.interactions.create_group(members, cooldown)
    }

    pub fn remove_group(&mut self, group: GroupId) -> bool {
        self.interactions.remove_group(group).is_some()
    }

    pub fn proximates(&self, hand: Handedness) -> &[InteractableId] {
        self.interactions.proximates(hand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{JointPose, JOINT_COUNT};

    fn open_hand() -> [JointPose; JOINT_COUNT] {
        std::array::from_fn(|i| JointPose::new(Vec3::Y * i as f32 * 0.01, Quat::IDENTITY, 0.005))
    }

    #[test]
    fn capsules_enable_after_delay() {
        let mut grapple = Grapple::default();
        grapple.update_hand(Handedness::Left, &open_hand());
        grapple.set_hand_tracked(Handedness::Left, true);

        assert!(grapple.capsules(Handedness::Left).is_created());
        assert!(grapple.capsules(Handedness::Left).is_active() == false);

        grapple.tick(0.3);
        grapple.fixed_tick();
        assert!(grapple
            .capsules(Handedness::Left)
            .capsules()
            .iter()
            .all(|c| c.enabled == false));

        grapple.tick(0.3);
        grapple.fixed_tick();
        assert!(grapple
            .capsules(Handedness::Left)
            .capsules()
            .iter()
            .all(|c| c.enabled));

        let events = grapple.drain_events().collect::<Vec<_>>();
        assert_eq!(
            events,
            vec![
                GrappleEvent::TrackingAcquired {
                    hand: Handedness::Left
                },
                GrappleEvent::CapsulesCreated {
                    hand: Handedness::Left
                },
                GrappleEvent::CapsulesEnabled {
                    hand: Handedness::Left
                },
            ]
        );
    }

    #[test]
    fn loss_before_delay_cancels_enabling() {
        let mut grapple = Grapple::default();
        grapple.update_hand(Handedness::Right, &open_hand());
        grapple.set_hand_tracked(Handedness::Right, true);
        grapple.tick(0.1);
        grapple.set_hand_tracked(Handedness::Right, false);
        grapple.tick(1.0);

        assert!(grapple.capsules(Handedness::Right).is_active() == false);
        assert!(grapple
            .drain_events()
            .all(|e| e != GrappleEvent::CapsulesEnabled {
                hand: Handedness::Right
            }));
    }

    #[test]
    fn calibrates_on_first_tick_after_acquisition() {
        let mut grapple = Grapple::default();
        grapple.update_hand(Handedness::Left, &open_hand());
        grapple.set_hand_tracked(Handedness::Left, true);
        assert_eq!(grapple.try_get_finger_bend(Handedness::Left, Finger::Index, false), None);

        grapple.tick(0.016);
        let bend = grapple.try_get_finger_bend(Handedness::Left, Finger::Index, false);
        assert!(bend.is_some_and(|b| (b - 1.0).abs() < 1e-4));

        grapple.set_hand_tracked(Handedness::Left, false);
        assert!(grapple.finger_bend().reference(Handedness::Left).is_calibrated() == false);
    }

    #[test]
    fn record_requires_tracking() {
        let mut grapple = Grapple::default();
        assert_eq!(grapple.record_gesture("Open", Handedness::Left, None), None);

        grapple.update_hand(Handedness::Left, &open_hand());
        grapple.set_hand_tracked(Handedness::Left, true);
        assert_eq!(
            grapple.record_gesture("Open", Handedness::Left, None).as_deref(),
            Some("Open")
        );
        assert_eq!(
            grapple.record_gesture("Open", Handedness::Left, None).as_deref(),
            Some("Open (1)")
        );
        assert_eq!(grapple.gesture_library().len(), 2);
    }

    #[test]
    fn shutdown_destroys_capsules() {
        let mut grapple = Grapple::default();
        grapple.update_hand(Handedness::Left, &open_hand());
        grapple.set_hand_tracked(Handedness::Left, true);
        grapple.drain_events().for_each(drop);

        grapple.shutdown();
        assert!(grapple.capsules(Handedness::Left).is_created() == false);
        assert_eq!(
            grapple.drain_events().collect::<Vec<_>>(),
            vec![GrappleEvent::CapsulesDestroyed {
                hand: Handedness::Left
            }]
        );
    }
}
