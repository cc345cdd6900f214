use bevy_log::debug;

use crate::config::GestureConfig;
use crate::event::GrappleEvent;
use crate::gesture::{Gesture, GestureLibrary};
use crate::hand::{Hand, Handedness};

/// Gesture state of one hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandGestureState {
    /// Index into the library of the currently recognized gesture.
    current: Option<usize>,
    /// Gesture recognized before the current one.
    previous: Option<usize>,
    recognized_this_frame: bool,
}

/// Matches live hand poses against a [`GestureLibrary`].
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    config: GestureConfig,
    library: GestureLibrary,
    states: [HandGestureState; 2],
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            library: GestureLibrary::default(),
            states: Default::default(),
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn library(&self) -> &GestureLibrary {
        &self.library
    }

    /// Mutable access to the library.
    ///
    /// Every hand drops its current gesture, since indices may no longer be valid.
    pub fn library_mut(&mut self, events: &mut Vec<GrappleEvent>) -> &mut GestureLibrary {
        for hand in Handedness::ALL {
            self.force_drop(hand, events);
            self.states[hand.index()].previous = None;
        }
        &mut self.library
    }

    /// Append a gesture, keeping the current gestures of both hands.
    pub fn add_gesture(&mut self, gesture: Gesture) -> Option<&str> {
        self.library.add(gesture)
    }

    /// Pick the best matching gesture of a hand.
    ///
    /// Gestures whose forward constraint fails, or with any joint outside of
    /// `[-global_distance_threshold, distance_threshold]`, are discarded. Of the
    /// remaining ones, the lowest signed sum of deltas wins. Ties keep the
    /// first gesture.
    pub fn best_match(&self, hand: &Hand) -> Option<usize> {
        let wrist = hand.wrist().position;
        let global_threshold = self.config.global_distance_threshold;

        let mut best: Option<(usize, f32)> = None;
        'gestures: for (index, gesture) in self.library.iter().enumerate() {
            if gesture.is_well_formed() == false {
                continue;
            }
            if let Some(constraint) = gesture.forward_constraint() {
                let live_forward = hand.joint(constraint.joint).forward;
                if constraint.accepts(live_forward) == false {
                    continue;
                }
            }

            let mut sum = 0.0;
            for (joint, reference) in hand.joints().iter().zip(gesture.joint_distances.iter()) {
                let delta = wrist.distance(joint.position) - reference;
                if delta < -global_threshold || delta > gesture.distance_threshold {
                    continue 'gestures;
                }
                // Signed on purpose: compensating deltas lower the score.
                sum += delta;
            }

            match best {
                Some((_, best_sum)) if sum >= best_sum => {}
                _ => best = Some((index, sum)),
            }
        }

        best.map(|(index, _)| index)
    }

    /// Run recognition for one hand, emitting events on change.
    pub fn recognize(&mut self, hand: &Hand, events: &mut Vec<GrappleEvent>) {
        let handedness = hand.handedness();
        self.states[handedness.index()].recognized_this_frame = false;

        if hand.is_tracked() == false {
            return;
        }

        let best = self.best_match(hand);
        self.transition(handedness, best, events);
    }

    /// Drop the current gesture of a hand, e.g. on tracking loss.
    pub fn force_drop(&mut self, hand: Handedness, events: &mut Vec<GrappleEvent>) {
        self.transition(hand, None, events);
    }

    fn transition(&mut self, hand: Handedness, next: Option<usize>, events: &mut Vec<GrappleEvent>) {
        let state = &mut self.states[hand.index()];
        if state.current == next {
            return;
        }

        let prev = state.current;
        state.previous = prev;
        state.current = next;
        state.recognized_this_frame = next.is_some();

        if let Some(gesture) = prev.and_then(|i| self.library.get_by_index_mut(i)) {
            debug!("Hand {hand} dropped gesture '{}'.", gesture.name);
            gesture.notify_unrecognized(hand);
            events.push(GrappleEvent::GestureUnrecognized {
                hand,
                gesture: gesture.name.clone(),
            });
        }

        if let Some(gesture) = next.and_then(|i| self.library.get_by_index_mut(i)) {
            debug!("Hand {hand} recognized gesture '{}'.", gesture.name);
            gesture.notify_recognized(hand);
            events.push(GrappleEvent::GestureRecognized {
                hand,
                gesture: gesture.name.clone(),
            });
        }
    }

    pub fn current_gesture(&self, hand: Handedness) -> Option<&Gesture> {
        self.states[hand.index()]
            .current
            .and_then(|i| self.library.get_by_index(i))
    }

    pub fn previous_gesture(&self, hand: Handedness) -> Option<&Gesture> {
        self.states[hand.index()]
            .previous
            .and_then(|i| self.library.get_by_index(i))
    }

    /// Whether the current gesture of a hand changed to a new one this frame.
    pub fn recognized_this_frame(&self, hand: Handedness) -> bool {
        self.states[hand.index()].recognized_this_frame
    }

    pub fn is_gesture_active(&self, hand: Handedness, name: &str) -> bool {
        self.current_gesture(hand).is_some_and(|g| g.name == name)
    }
}
