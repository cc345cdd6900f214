use bevy::prelude::*;
use grapple_core::hand::{Handedness, JointPose, JOINT_COUNT};

use crate::rig::GrappleRig;
use crate::GrappleSet;

pub(super) struct HandTrackingPlugin;

impl Plugin for HandTrackingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HandTrackingFrames>()
            .add_systems(Update, apply_tracking_frames.in_set(GrappleSet::Tracking));
    }
}

/// Latest joint poses per hand, written by a tracking source.
///
/// A hand without a frame is considered untracked.
#[derive(Resource, Default, Debug, Clone)]
pub struct HandTrackingFrames {
    frames: [Option<[JointPose; JOINT_COUNT]>; 2],
}

impl HandTrackingFrames {
    pub fn set(&mut self, hand: Handedness, poses: [JointPose; JOINT_COUNT]) {
        self.frames[hand.index()] = Some(poses);
    }

    pub fn clear(&mut self, hand: Handedness) {
        self.frames[hand.index()] = None;
    }

    pub fn get(&self, hand: Handedness) -> Option<&[JointPose; JOINT_COUNT]> {
        self.frames[hand.index()].as_ref()
    }
}

fn apply_tracking_frames(frames: Res<HandTrackingFrames>, mut rig: ResMut<GrappleRig>) {
    for hand in Handedness::ALL {
        match frames.get(hand) {
            Some(poses) => {
                rig.update_hand(hand, poses);
                rig.set_hand_tracked(hand, true);
            }
            None => {
                rig.set_hand_tracked(hand, false);
            }
        }
    }
}
