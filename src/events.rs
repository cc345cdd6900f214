use bevy::prelude::*;
use grapple_core::event::GrappleEvent;
use grapple_core::hand::Handedness;
use grapple_core::interactable::{InteractableId, InteractableState};

use crate::interactable::{InteractableEntities, InteractableStatus};
use crate::rig::GrappleRig;
use crate::GrappleSet;

pub(super) struct GrappleEventsPlugin;

impl Plugin for GrappleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TrackingChanged>()
            .add_event::<CapsulesChanged>()
            .add_event::<GestureChanged>()
            .add_event::<ProximityChanged>()
            .add_event::<InteractionChanged>()
            .add_event::<InteractableStateChanged>()
            .add_systems(
                Update,
                (forward_events, update_interactable_status)
                    .chain()
                    .in_set(GrappleSet::Events),
            );
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackingChanged {
    pub hand: Handedness,
    pub tracked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapsuleChange {
    Created,
    Enabled,
    Destroyed,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapsulesChanged {
    pub hand: Handedness,
    pub change: CapsuleChange,
}

#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct GestureChanged {
    pub hand: Handedness,
    pub gesture: String,
    /// `false` when the gesture stopped being recognized.
    pub recognized: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProximityChanged {
    pub entity: Entity,
    pub hand: Handedness,
    /// `true` whenever the interactable enters the proximity of `hand`,
    /// `false` once it left the proximity of every hand.
    pub started: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Started,
    Ended,
    CheckPaused,
    CheckResumed,
    /// A paused interactable left the proximity of the hand.
    CheckLeftProximity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionChanged {
    pub entity: Entity,
    pub hand: Handedness,
    pub kind: InteractionKind,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractableStateChanged {
    pub entity: Entity,
    pub from: InteractableState,
    pub to: InteractableState,
}

#[allow(clippy::too_many_arguments)]
fn forward_events(
    mut rig: ResMut<GrappleRig>,
    entities: Res<InteractableEntities>,
    mut evw_tracking: EventWriter<TrackingChanged>,
    mut evw_capsules: EventWriter<CapsulesChanged>,
    mut evw_gesture: EventWriter<GestureChanged>,
    mut evw_proximity: EventWriter<ProximityChanged>,
    mut evw_interaction: EventWriter<InteractionChanged>,
    mut evw_state: EventWriter<InteractableStateChanged>,
) {
    let entity_of = |id: InteractableId| {
        let entity = entities.entity(id);
        if entity.is_none() {
            debug!("Interactable {id:?} has no entity, skipping its event.");
        }
        entity
    };

    for event in rig.drain_events() {
        match event {
            GrappleEvent::TrackingAcquired { hand } => {
                evw_tracking.send(TrackingChanged {
                    hand,
                    tracked: true,
                });
            }
            GrappleEvent::TrackingLost { hand } => {
                evw_tracking.send(TrackingChanged {
                    hand,
                    tracked: false,
                });
            }
            GrappleEvent::CapsulesCreated { hand } => {
                evw_capsules.send(CapsulesChanged {
                    hand,
                    change: CapsuleChange::Created,
                });
            }
            GrappleEvent::CapsulesEnabled { hand } => {
                evw_capsules.send(CapsulesChanged {
                    hand,
                    change: CapsuleChange::Enabled,
                });
            }
            GrappleEvent::CapsulesDestroyed { hand } => {
                evw_capsules.send(CapsulesChanged {
                    hand,
                    change: CapsuleChange::Destroyed,
                });
            }
            GrappleEvent::GestureRecognized { hand, gesture } => {
                evw_gesture.send(GestureChanged {
                    hand,
                    gesture,
                    recognized: true,
                });
            }
            GrappleEvent::GestureUnrecognized { hand, gesture } => {
                evw_gesture.send(GestureChanged {
                    hand,
                    gesture,
                    recognized: false,
                });
            }
            GrappleEvent::ProximityStarted { id, hand } => {
                if let Some(entity) = entity_of(id) {
                    evw_proximity.send(ProximityChanged {
                        entity,
                        hand,
                        started: true,
                    });
                }
            }
            GrappleEvent::ProximityEnded { id, hand } => {
                if let Some(entity) = entity_of(id) {
                    evw_proximity.send(ProximityChanged {
                        entity,
                        hand,
                        started: false,
                    });
                }
            }
            GrappleEvent::InteractStarted { id, hand }
            | GrappleEvent::InteractEnded { id, hand }
            | GrappleEvent::InteractionCheckPaused { id, hand }
            | GrappleEvent::InteractionCheckResumed { id, hand }
            | GrappleEvent::InteractionCheckLeftProximity { id, hand } => {
                let kind = match event {
                    GrappleEvent::InteractStarted { .. } => InteractionKind::Started,
                    GrappleEvent::InteractEnded { .. } => InteractionKind::Ended,
                    GrappleEvent::InteractionCheckPaused { .. } => InteractionKind::CheckPaused,
                    GrappleEvent::InteractionCheckResumed { .. } => InteractionKind::CheckResumed,
                    _ => InteractionKind::CheckLeftProximity,
                };
                if let Some(entity) = entity_of(id) {
                    evw_interaction.send(InteractionChanged { entity, hand, kind });
                }
            }
            GrappleEvent::StateChanged { id, from, to } => {
                if let Some(entity) = entity_of(id) {
                    evw_state.send(InteractableStateChanged { entity, from, to });
                }
            }
        }
    }
}

fn update_interactable_status(
    mut evr_state: EventReader<InteractableStateChanged>,
    mut q_status: Query<&mut InteractableStatus>,
) {
    for event in evr_state.read() {
        if let Ok(mut status) = q_status.get_mut(event.entity) {
            status.0 = event.to;
        }
    }
}
