use bevy::prelude::*;
use grapple_core::config::GrappleConfig;
use grapple_core::Grapple;

use crate::GrappleSet;

pub(super) struct GrappleRigPlugin {
    pub config: GrappleConfig,
}

impl Plugin for GrappleRigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GrappleRig(Grapple::new(self.config.clone())))
            .add_systems(Update, tick_rig.in_set(GrappleSet::Tick))
            .add_systems(FixedUpdate, fixed_tick_rig)
            .add_systems(Last, shutdown_rig.run_if(on_event::<AppExit>()));
    }
}

/// The hand tracking core, shared by every Grapple system.
#[derive(Resource, Deref, DerefMut)]
pub struct GrappleRig(pub Grapple);

fn tick_rig(mut rig: ResMut<GrappleRig>, time: Res<Time>) {
    rig.tick(time.delta_seconds());
}

pub(crate) fn fixed_tick_rig(mut rig: ResMut<GrappleRig>) {
    rig.fixed_tick();
}

fn shutdown_rig(mut rig: ResMut<GrappleRig>) {
    info!("Shutting down Grapple.");
    rig.shutdown();
}
