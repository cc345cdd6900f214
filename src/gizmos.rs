use bevy::{color::palettes::css, prelude::*};
use grapple_core::hand::{Handedness, JointId};
use grapple_core::interactable::InteractableState;

use crate::interactable::{InteractableStatus, RegisteredInteractable};
use crate::rig::GrappleRig;

const AXIS_LENGTH: f32 = 0.02;
const INTERACTABLE_SIZE: f32 = 0.015;

pub(super) struct GrappleGizmosPlugin;

impl Plugin for GrappleGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<GrappleGizmos>().add_systems(
            Update,
            (
                joint_gizmos.run_if(|g: Res<GrappleGizmos>| g.joints),
                capsule_gizmos.run_if(|g: Res<GrappleGizmos>| g.capsules),
                interactable_gizmos.run_if(|g: Res<GrappleGizmos>| g.interactables),
            )
                .after(crate::GrappleSet::Events),
        );
    }
}

/// Toggles for the debug gizmos.
#[derive(Resource, Debug, Clone, Copy)]
pub struct GrappleGizmos {
    pub joints: bool,
    pub capsules: bool,
    pub interactables: bool,
}

impl Default for GrappleGizmos {
    fn default() -> Self {
        Self {
            joints: true,
            capsules: false,
            interactables: true,
        }
    }
}

fn hand_color(hand: Handedness) -> Srgba {
    match hand {
        Handedness::Left => css::ORANGE,
        Handedness::Right => css::LIGHT_CYAN,
    }
}

fn state_color(state: InteractableState) -> Srgba {
    match state {
        InteractableState::Active => css::GRAY,
        InteractableState::Proximate => css::YELLOW,
        InteractableState::Interacted => css::LIME,
        InteractableState::Disabled => css::DARK_RED,
    }
}

fn joint_gizmos(rig: Res<GrappleRig>, mut gizmos: Gizmos) {
    for hand in Handedness::ALL {
        let Some(joints) = rig.try_get_joints(hand) else {
            continue;
        };
        let color = hand_color(hand);

        for joint in joints {
            gizmos.sphere(joint.position, joint.rotation, joint.radius, color.with_alpha(0.6));
            if joint.id == JointId::Palm || joint.id.is_tip() {
                gizmos.arrow(
                    joint.position,
                    joint.position + joint.forward * AXIS_LENGTH,
                    css::BLUE,
                );
            }
        }
    }
}

fn capsule_gizmos(rig: Res<GrappleRig>, mut gizmos: Gizmos) {
    for hand in Handedness::ALL {
        for capsule in rig.capsules(hand).capsules() {
            let (start, end) = capsule.segment();
            let color = match capsule.enabled {
                true => hand_color(hand),
                false => css::DARK_GRAY,
            };
            gizmos.line(start, end, color);
            gizmos.circle(
                capsule.center,
                Dir3::new(capsule.rotation * Vec3::Y).unwrap_or(Dir3::Y),
                capsule.radius,
                color,
            );
        }
    }
}

fn interactable_gizmos(
    q_interactables: Query<(&RegisteredInteractable, &InteractableStatus)>,
    rig: Res<GrappleRig>,
    mut gizmos: Gizmos,
) {
    for (id, status) in q_interactables.iter() {
        let Some(interactable) = rig.interactable(**id) else {
            continue;
        };
        gizmos.sphere(
            interactable.reference_point(),
            Quat::IDENTITY,
            INTERACTABLE_SIZE,
            state_color(**status),
        );
    }

    // Link every proximate to the reference joint of its hand.
    let reference_joint = rig.interactions().proximity_config().reference_joint;
    for hand in Handedness::ALL {
        let Some(reference) = rig.try_get_joint(hand, reference_joint) else {
            continue;
        };
        for id in rig.proximates(hand) {
            let Some(interactable) = rig.interactable(*id) else {
                continue;
            };
            gizmos.line(
                reference.position,
                interactable.reference_point(),
                hand_color(hand).with_alpha(0.4),
            );
        }
    }
}
