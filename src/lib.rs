use bevy::prelude::*;
use grapple_core::config::GrappleConfig;

pub use grapple_core;

pub mod capsules;
pub mod events;
pub mod gesture_asset;
pub mod gizmos;
pub mod interactable;
pub mod rig;
pub mod synthetic;
pub mod tracking;
pub mod ui;

/// Drives the hand tracking core from the Bevy schedules.
///
/// `Update` runs the tracking pass, `FixedUpdate` the capsule pass.
#[derive(Default)]
pub struct GrapplePlugin {
    pub config: GrappleConfig,
}

impl GrapplePlugin {
    pub fn new(config: GrappleConfig) -> Self {
        Self { config }
    }
}

impl Plugin for GrapplePlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GrappleSet::Tracking,
                GrappleSet::Sync,
                GrappleSet::Tick,
                GrappleSet::Events,
            )
                .chain(),
        )
        .add_plugins((
            rig::GrappleRigPlugin {
                config: self.config.clone(),
            },
            tracking::HandTrackingPlugin,
            events::GrappleEventsPlugin,
            interactable::InteractablePlugin,
            capsules::CapsuleProxyPlugin,
        ));
    }
}

/// Debug gizmos and egui panel, on top of [`GrapplePlugin`].
pub struct GrappleDebugPlugin;

impl Plugin for GrappleDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((gizmos::GrappleGizmosPlugin, ui::GrappleUiPlugin));
    }
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrappleSet {
    /// Copy tracking frames into the core.
    Tracking,
    /// Register entities and sync their transforms.
    Sync,
    /// Gestures, proximity and interactions.
    Tick,
    /// Forward core events as Bevy events.
    Events,
}

pub mod prelude {
    pub use crate::capsules::HandCapsuleProxy;
    pub use crate::events::{
        CapsulesChanged, GestureChanged, InteractableStateChanged, InteractionChanged,
        InteractionKind, ProximityChanged, TrackingChanged,
    };
    pub use crate::gesture_asset::{ActiveGestureList, GestureAssetPlugin, GestureListAsset};
    pub use crate::interactable::{
        ForcedJoint, GrappleInteractable, InteractableDisabled, InteractableEntities,
        InteractableGroupMembers, InteractableStatus, RegisteredGroup, RegisteredInteractable,
    };
    pub use crate::rig::GrappleRig;
    pub use crate::tracking::HandTrackingFrames;
    pub use crate::{GrappleDebugPlugin, GrapplePlugin, GrappleSet};
    pub use grapple_core::prelude::*;
}
