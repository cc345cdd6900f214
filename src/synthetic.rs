use bevy::prelude::*;
use grapple_core::hand::{Finger, Handedness, JointId, JointPose, JOINT_COUNT};

use crate::tracking::HandTrackingFrames;
use crate::GrappleSet;

/// Curl at which a synthetic hand makes a fist.
pub const FIST_CURL: f32 = 1.2;

/// Keyboard driven hands, for running without an XR runtime.
///
/// - `1` / `2`: toggle tracking of the left / right hand.
/// - `Space`: toggle making a fist.
/// - `WASD` + `Q` / `E`: move the right hand, hold `Shift` for the left one.
pub struct SyntheticHandPlugin;

impl Plugin for SyntheticHandPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SyntheticHands>().add_systems(
            Update,
            (synthetic_hand_input, write_synthetic_frames)
                .chain()
                .before(GrappleSet::Tracking),
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyntheticHand {
    pub tracked: bool,
    pub origin: Vec3,
    pub rotation: Quat,
    pub curl: f32,
    pub target_curl: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct SyntheticHands {
    pub hands: [SyntheticHand; 2],
    /// Meters per second.
    pub move_speed: f32,
    /// Curl per second.
    pub curl_speed: f32,
}

impl Default for SyntheticHands {
    fn default() -> Self {
        let hand = |x: f32| SyntheticHand {
            tracked: true,
            origin: Vec3::new(x, 1.0, -0.3),
            rotation: Quat::IDENTITY,
            curl: 0.0,
            target_curl: 0.0,
        };

        Self {
            hands: [hand(-0.15), hand(0.15)],
            move_speed: 0.3,
            curl_speed: 4.0,
        }
    }
}

/// Joint poses of a hand pointing along `rotation * -Z`, palm down.
///
/// `curl` bends every finger joint toward the palm, in radians per joint.
pub fn hand_pose(
    handedness: Handedness,
    origin: Vec3,
    rotation: Quat,
    curl: f32,
) -> [JointPose; JOINT_COUNT] {
    // Thumb on the inner side.
    let side = match handedness {
        Handedness::Left => 1.0,
        Handedness::Right => -1.0,
    };

    let mut poses = [JointPose::new(origin, rotation, 0.01); JOINT_COUNT];
    poses[JointId::Palm.index()].position = origin + rotation * Vec3::new(0.0, 0.0, -0.05);

    for finger in Finger::ALL {
        let (offset, segment) = match finger {
            Finger::Thumb => (Vec3::new(side * 0.025, -0.01, -0.02), 0.03),
            _ => {
                let spread = finger.index() as f32 - 2.5;
                (Vec3::new(side * spread * 0.018, 0.0, -0.01), 0.025)
            }
        };

        let mut position = origin + rotation * offset;
        for (k, id) in finger.joints().iter().enumerate() {
            let bend = Quat::from_rotation_x(-curl * k as f32);
            let joint_rotation = rotation * bend;
            let radius = match id.is_tip() {
                true => 0.007,
                false => 0.009,
            };
            poses[id.index()] = JointPose::new(position, joint_rotation, radius);

            let length = match k {
                0 if finger != Finger::Thumb => 0.05,
                _ => segment,
            };
            position += joint_rotation * Vec3::NEG_Z * length;
        }
    }

    poses
}

fn synthetic_hand_input(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut hands: ResMut<SyntheticHands>,
) {
    if keys.just_pressed(KeyCode::Digit1) {
        hands.hands[0].tracked = !hands.hands[0].tracked;
    }
    if keys.just_pressed(KeyCode::Digit2) {
        hands.hands[1].tracked = !hands.hands[1].tracked;
    }
    if keys.just_pressed(KeyCode::Space) {
        for hand in hands.hands.iter_mut() {
            hand.target_curl = match hand.target_curl > 0.0 {
                true => 0.0,
                false => FIST_CURL,
            };
        }
    }

    let mut direction = Vec3::ZERO;
    for (key, axis) in [
        (KeyCode::KeyW, Vec3::NEG_Z),
        (KeyCode::KeyS, Vec3::Z),
        (KeyCode::KeyA, Vec3::NEG_X),
        (KeyCode::KeyD, Vec3::X),
        (KeyCode::KeyQ, Vec3::NEG_Y),
        (KeyCode::KeyE, Vec3::Y),
    ] {
        if keys.pressed(key) {
            direction += axis;
        }
    }

    let moved = match keys.pressed(KeyCode::ShiftLeft) {
        true => Handedness::Left,
        false => Handedness::Right,
    };
    let dt = time.delta_seconds();
    let move_speed = hands.move_speed;
    let curl_speed = hands.curl_speed;

    hands.hands[moved.index()].origin += direction.normalize_or_zero() * move_speed * dt;
    for hand in hands.hands.iter_mut() {
        let step = curl_speed * dt;
        hand.curl += (hand.target_curl - hand.curl).clamp(-step, step);
    }
}

fn write_synthetic_frames(hands: Res<SyntheticHands>, mut frames: ResMut<HandTrackingFrames>) {
    for handedness in Handedness::ALL {
        let hand = &hands.hands[handedness.index()];
        match hand.tracked {
            true => frames.set(
                handedness,
                hand_pose(handedness, hand.origin, hand.rotation, hand.curl),
            ),
            false => frames.clear(handedness),
        }
    }
}
