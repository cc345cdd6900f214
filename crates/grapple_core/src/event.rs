use crate::hand::Handedness;
use crate::interactable::{InteractableId, InteractableState};

/// Everything the core reports to the outside world.
///
/// Events are buffered during a pass and drained by the caller with
/// [`Grapple::drain_events`](crate::Grapple::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum GrappleEvent {
    TrackingAcquired {
        hand: Handedness,
    },
    TrackingLost {
        hand: Handedness,
    },
    /// Capsules of a hand were created for the first time.
    CapsulesCreated {
        hand: Handedness,
    },
    /// Capsules of a hand started colliding after the enable delay.
    CapsulesEnabled {
        hand: Handedness,
    },
    CapsulesDestroyed {
        hand: Handedness,
    },
    GestureRecognized {
        hand: Handedness,
        gesture: String,
    },
    GestureUnrecognized {
        hand: Handedness,
        gesture: String,
    },
    ProximityStarted {
        id: InteractableId,
        hand: Handedness,
    },
    ProximityEnded {
        id: InteractableId,
        hand: Handedness,
    },
    InteractStarted {
        id: InteractableId,
        hand: Handedness,
    },
    InteractEnded {
        id: InteractableId,
        hand: Handedness,
    },
    InteractionCheckPaused {
        id: InteractableId,
        hand: Handedness,
    },
    InteractionCheckResumed {
        id: InteractableId,
        hand: Handedness,
    },
    /// A paused interactable left the proximity of a hand.
    InteractionCheckLeftProximity {
        id: InteractableId,
        hand: Handedness,
    },
    StateChanged {
        id: InteractableId,
        from: InteractableState,
        to: InteractableState,
    },
}
