use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, AsyncReadExt, LoadContext};
use bevy::prelude::*;
use grapple_core::error::GrappleError;
use grapple_core::gesture::{parse_gesture_list, Gesture};
use thiserror::Error;

use crate::rig::GrappleRig;
use crate::GrappleSet;

/// Loads `*.gestures.json` files and feeds the active one into the [`GrappleRig`].
pub struct GestureAssetPlugin;

impl Plugin for GestureAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<GestureListAsset>()
            .init_asset_loader::<GestureListAssetLoader>()
            .add_systems(Update, apply_gesture_list.before(GrappleSet::Tick));
    }
}

/// A gesture list file.
#[derive(Asset, TypePath, Debug)]
pub struct GestureListAsset {
    pub gestures: Vec<Gesture>,
}

/// Gesture list loaded into the rig whenever it is loaded or modified.
#[derive(Resource, Debug, Clone)]
pub struct ActiveGestureList {
    pub handle: Handle<GestureListAsset>,
    /// Replace the gestures in the rig instead of appending to them.
    pub overwrite: bool,
}

impl ActiveGestureList {
    pub fn new(handle: Handle<GestureListAsset>) -> Self {
        Self {
            handle,
            overwrite: true,
        }
    }
}

fn apply_gesture_list(
    mut evr_assets: EventReader<AssetEvent<GestureListAsset>>,
    active: Option<Res<ActiveGestureList>>,
    gesture_lists: Res<Assets<GestureListAsset>>,
    mut rig: ResMut<GrappleRig>,
) {
    let Some(active) = active else {
        evr_assets.clear();
        return;
    };

    let active_id = active.handle.id();
    for event in evr_assets.read() {
        let id = match event {
            AssetEvent::LoadedWithDependencies { id } | AssetEvent::Modified { id } => *id,
            _ => continue,
        };
        if id != active_id {
            continue;
        }

        let Some(gesture_list) = gesture_lists.get(id) else {
            continue;
        };
        let count = rig.load_gestures(gesture_list.gestures.clone(), active.overwrite);
        info!("Loaded {count} gestures from {id:?}.");
    }
}

#[derive(Default)]
struct GestureListAssetLoader;

impl AssetLoader for GestureListAssetLoader {
    type Asset = GestureListAsset;
    type Settings = ();
    type Error = GestureListLoaderError;

    async fn load<'a>(
        &'a self,
        reader: &'a mut Reader<'_>,
        _settings: &'a (),
        _load_context: &'a mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let gestures = parse_gesture_list(&bytes)?;

        Ok(GestureListAsset { gestures })
    }

    fn extensions(&self) -> &[&str] {
        &["gestures.json"]
    }
}

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GestureListLoaderError {
    #[error("Could not load gesture file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse gesture file: {0}")]
    Parse(#[from] GrappleError),
}
