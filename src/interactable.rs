use bevy::prelude::*;
use bevy::utils::HashMap;
use grapple_core::hand::JointId;
use grapple_core::interactable::{GroupId, Interactable, InteractableId, InteractableState};

use crate::rig::GrappleRig;
use crate::GrappleSet;

pub(super) struct InteractablePlugin;

impl Plugin for InteractablePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractableEntities>().add_systems(
            Update,
            (
                unregister_interactables,
                register_interactables,
                sync_interactable_poses,
                sync_disabled,
                sync_forced_joints,
                unregister_groups,
                register_groups,
            )
                .chain()
                .in_set(GrappleSet::Sync),
        );
    }
}

/// Interactable waiting to be registered into the [`GrappleRig`].
///
/// Taken out of the component once registered.
#[derive(Component)]
pub struct GrappleInteractable(Option<Box<dyn Interactable>>);

impl GrappleInteractable {
    pub fn new(interactable: impl Interactable + 'static) -> Self {
        Self(Some(Box::new(interactable)))
    }
}

/// Id of a registered interactable.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct RegisteredInteractable(pub InteractableId);

/// Mirror of the interactable state, updated from state change events.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, Deref)]
pub struct InteractableStatus(pub InteractableState);

/// Excludes the interactable from proximity and interaction checks.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct InteractableDisabled;

/// Use this joint for interaction checks instead of the nominated one.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct ForcedJoint(pub JointId);

/// Mutual exclusion group made of interactable entities.
///
/// Registered once every member is registered.
#[derive(Component, Debug, Clone)]
pub struct InteractableGroupMembers {
    pub members: Vec<Entity>,
    /// Falls back to the configured default cooldown.
    pub cooldown: Option<f32>,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct RegisteredGroup(pub GroupId);

/// Two way map between interactable ids and entities.
#[derive(Resource, Default, Debug)]
pub struct InteractableEntities {
    entities: HashMap<InteractableId, Entity>,
    ids: HashMap<Entity, InteractableId>,
    groups: HashMap<Entity, GroupId>,
}

impl InteractableEntities {
    pub fn entity(&self, id: InteractableId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    pub fn id(&self, entity: Entity) -> Option<InteractableId> {
        self.ids.get(&entity).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn insert(&mut self, id: InteractableId, entity: Entity) {
        self.entities.insert(id, entity);
        self.ids.insert(entity, id);
    }

    fn remove(&mut self, entity: Entity) -> Option<InteractableId> {
        let id = self.ids.remove(&entity)?;
        self.entities.remove(&id);
        Some(id)
    }
}

fn pose_of(transform: &GlobalTransform) -> (Vec3, Quat) {
    let (_, rotation, translation) = transform.to_scale_rotation_translation();
    (translation, rotation)
}

fn register_interactables(
    mut commands: Commands,
    mut q_interactables: Query<
        (Entity, &mut GrappleInteractable, Option<&GlobalTransform>),
        Without<RegisteredInteractable>,
    >,
    mut rig: ResMut<GrappleRig>,
    mut entities: ResMut<InteractableEntities>,
) {
    for (entity, mut interactable, transform) in q_interactables.iter_mut() {
        let Some(mut interactable) = interactable.0.take() else {
            continue;
        };

        if let Some(transform) = transform {
            let (translation, rotation) = pose_of(transform);
            interactable.set_pose(translation, rotation);
        }

        let id = rig.register_boxed_interactable(interactable);
        entities.insert(id, entity);
        commands
            .entity(entity)
            .insert((RegisteredInteractable(id), InteractableStatus::default()));
        debug!("Registered interactable {id:?} for {entity}.");
    }
}

fn unregister_interactables(
    mut removed: RemovedComponents<RegisteredInteractable>,
    mut rig: ResMut<GrappleRig>,
    mut entities: ResMut<InteractableEntities>,
) {
    for entity in removed.read() {
        let Some(id) = entities.remove(entity) else {
            continue;
        };
        rig.unregister_interactable(id);
        debug!("Unregistered interactable {id:?} of {entity}.");
    }
}

fn sync_interactable_poses(
    q_interactables: Query<
        (&RegisteredInteractable, &GlobalTransform),
        Changed<GlobalTransform>,
    >,
    mut rig: ResMut<GrappleRig>,
) {
    for (id, transform) in q_interactables.iter() {
        let (translation, rotation) = pose_of(transform);
        rig.set_interactable_pose(**id, translation, rotation);
    }
}

fn sync_disabled(
    q_disabled: Query<&RegisteredInteractable, With<InteractableDisabled>>,
    q_enabled: Query<&RegisteredInteractable, Without<InteractableDisabled>>,
    mut removed: RemovedComponents<InteractableDisabled>,
    mut rig: ResMut<GrappleRig>,
) {
    // Also covers interactables disabled before they were registered.
    for id in q_disabled.iter() {
        if rig.interactable_state(**id) != Some(InteractableState::Disabled) {
            rig.set_interactable_disabled(**id, true);
        }
    }

    for entity in removed.read() {
        if let Ok(id) = q_enabled.get(entity) {
            rig.set_interactable_disabled(**id, false);
        }
    }
}

fn sync_forced_joints(
    q_forced: Query<(&RegisteredInteractable, &ForcedJoint), Changed<ForcedJoint>>,
    q_registered: Query<&RegisteredInteractable, Without<ForcedJoint>>,
    mut removed: RemovedComponents<ForcedJoint>,
    mut rig: ResMut<GrappleRig>,
) {
    for (id, joint) in q_forced.iter() {
        rig.set_forced_joint(**id, Some(**joint));
    }

    for entity in removed.read() {
        if let Ok(id) = q_registered.get(entity) {
            rig.set_forced_joint(**id, None);
        }
    }
}

fn register_groups(
    mut commands: Commands,
    q_groups: Query<(Entity, &InteractableGroupMembers), Without<RegisteredGroup>>,
    mut rig: ResMut<GrappleRig>,
    mut entities: ResMut<InteractableEntities>,
) {
    for (entity, group) in q_groups.iter() {
        let ids = group
            .members
            .iter()
            .map(|member| entities.id(*member))
            .collect::<Option<Vec<_>>>();
        // Wait for every member to be registered.
        let Some(ids) = ids else {
            continue;
        };

        let group_id = rig.create_group(ids, group.cooldown);
        entities.groups.insert(entity, group_id);
        commands.entity(entity).insert(RegisteredGroup(group_id));
        debug!("Registered group {group_id:?} for {entity}.");
    }
}

fn unregister_groups(
    mut removed: RemovedComponents<RegisteredGroup>,
    mut rig: ResMut<GrappleRig>,
    mut entities: ResMut<InteractableEntities>,
) {
    for entity in removed.read() {
        if let Some(group_id) = entities.groups.remove(&entity) {
            rig.remove_group(group_id);
        }
    }
}
