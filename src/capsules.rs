use bevy::prelude::*;
use grapple_core::capsule::JointCapsule;
use grapple_core::hand::Handedness;

use crate::events::{CapsuleChange, CapsulesChanged};
use crate::rig::GrappleRig;
use crate::GrappleSet;

pub(super) struct CapsuleProxyPlugin;

impl Plugin for CapsuleProxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, spawn_capsule_proxies.after(GrappleSet::Events))
            .add_systems(
                FixedUpdate,
                sync_capsule_proxies.after(crate::rig::fixed_tick_rig),
            );
    }
}

/// Entity mirroring one capsule of a hand, for physics engines to collide with.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HandCapsuleProxy {
    pub hand: Handedness,
    /// Index into the capsules of the hand.
    pub index: usize,
    pub radius: f32,
    pub length: f32,
    pub enabled: bool,
}

impl HandCapsuleProxy {
    fn sync(&mut self, capsule: &JointCapsule, transform: &mut Transform) {
        self.radius = capsule.radius;
        self.length = capsule.length;
        self.enabled = capsule.enabled;
        transform.translation = capsule.center;
        transform.rotation = capsule.rotation;
    }
}

fn spawn_capsule_proxies(
    mut commands: Commands,
    mut evr_capsules: EventReader<CapsulesChanged>,
    q_proxies: Query<(Entity, &HandCapsuleProxy)>,
    rig: Res<GrappleRig>,
) {
    for event in evr_capsules.read() {
        match event.change {
            CapsuleChange::Created => {
                for (index, capsule) in rig.capsules(event.hand).capsules().iter().enumerate() {
                    let mut proxy = HandCapsuleProxy {
                        hand: event.hand,
                        index,
                        radius: 0.0,
                        length: 0.0,
                        enabled: false,
                    };
                    let mut transform = Transform::default();
                    proxy.sync(capsule, &mut transform);

                    commands.spawn((
                        Name::new(format!("{} {:?} Capsule", event.hand, capsule.start)),
                        proxy,
                        TransformBundle::from_transform(transform),
                    ));
                }
            }
            CapsuleChange::Destroyed => {
                for (entity, proxy) in q_proxies.iter() {
                    if proxy.hand == event.hand {
                        commands.entity(entity).despawn_recursive();
                    }
                }
            }
            CapsuleChange::Enabled => {}
        }
    }
}

fn sync_capsule_proxies(
    mut q_proxies: Query<(&mut HandCapsuleProxy, &mut Transform)>,
    rig: Res<GrappleRig>,
) {
    for (mut proxy, mut transform) in q_proxies.iter_mut() {
        let Some(capsule) = rig.capsules(proxy.hand).capsules().get(proxy.index) else {
            continue;
        };
        proxy.sync(capsule, &mut transform);
    }
}
