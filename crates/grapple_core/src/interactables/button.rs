use bevy_math::{Quat, Vec2, Vec3};

use super::Pose;
use crate::hand::{Handedness, Joint, JointId};
use crate::interactable::{closest_joint, Interactable, InteractableState};

/// A push button whose face is the local XZ plane, facing local +Y.
#[derive(Debug, Clone)]
pub struct Button {
    pub pose: Pose,
    /// Half size of the face along local X and Z.
    pub half_extents: Vec2,
    /// How far the surface must be pushed to press the button.
    pub press_depth: f32,
    /// Joints further above the face than this are not nominated.
    pub hover_distance: f32,
    /// Depth below the face past which a joint counts as behind it.
    pub behind_depth: f32,
    pressed: bool,
    /// Surface displacement of the last check.
    depth: f32,
    behind: [bool; 2],
}

impl Button {
    pub fn new(pose: Pose, half_extents: Vec2) -> Self {
        Self {
            pose,
            half_extents,
            press_depth: 0.01,
            hover_distance: 0.05,
            behind_depth: 0.03,
            pressed: false,
            depth: 0.0,
            behind: [false; 2],
        }
    }

    pub fn with_press_depth(mut self, press_depth: f32) -> Self {
        self.press_depth = press_depth;
        self
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// How far the surface is pushed, from 0 (rest) to 1 (pressed).
    pub fn press_progress(&self) -> f32 {
        if self.press_depth <= 0.0 {
            return if self.pressed { 1.0 } else { 0.0 };
        }
        (self.depth / self.press_depth).clamp(0.0, 1.0)
    }

    /// Height of the bottom of a joint above the face.
    fn height(&self, joint: &Joint) -> f32 {
        self.pose.to_local(joint.position).y - joint.radius
    }

    fn within_face(&self, point: Vec3) -> bool {
        let local = self.pose.to_local(point);
        local.x.abs() <= self.half_extents.x && local.z.abs() <= self.half_extents.y
    }
}

impl Interactable for Button {
    fn reference_point(&self) -> Vec3 {
        self.pose.translation
    }

    fn set_pose(&mut self, translation: Vec3, rotation: Quat) {
        self.pose = Pose::new(translation, rotation);
    }

    fn nominate_joint(&self, _hand: Handedness, joints: &[Joint]) -> Option<JointId> {
        closest_joint(joints, self.pose.translation, |joint| {
            self.within_face(joint.position) && self.height(joint) <= self.hover_distance
        })
    }

    fn check_interaction(&mut self, _hand: Handedness, joint: &Joint) -> bool {
        self.depth = (-self.height(joint)).max(0.0);
        self.depth >= self.press_depth
    }

    /// Pause once a joint is behind the face, until it re-emerges above it.
    ///
    /// Prevents presses from joints entering the button from behind.
    fn should_pause_checks(&mut self, hand: Handedness, joint: &Joint) -> bool {
        let height = self.height(joint);
        let behind = &mut self.behind[hand.index()];

        if *behind {
            if height >= 0.0 {
                *behind = false;
            }
        } else if height < -(self.press_depth + self.behind_depth) {
            *behind = true;
        }

        *behind
    }

    fn on_state_changed(&mut self, _from: InteractableState, to: InteractableState) {
        self.pressed = to == InteractableState::Interacted;
        if self.pressed == false {
            self.depth = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactables::test_utils::{joint_at, joints_with};

    fn button() -> Button {
        Button::new(Pose::default(), Vec2::splat(0.02))
    }

    #[test]
    fn nominates_joints_above_the_face() {
        let button = button();

        let above = joints_with(JointId::IndexTip, Vec3::Y * 0.03);
        assert_eq!(
            button.nominate_joint(Handedness::Left, &above),
            Some(JointId::IndexTip)
        );

        let beside = joints_with(JointId::IndexTip, Vec3::new(0.05, 0.01, 0.0));
        assert_eq!(button.nominate_joint(Handedness::Left, &beside), None);

        let high = joints_with(JointId::IndexTip, Vec3::Y * 0.2);
        assert_eq!(button.nominate_joint(Handedness::Left, &high), None);
    }

    #[test]
    fn pressed_past_depth() {
        let mut button = button();
        let radius = crate::hand::Joint::DEFAULT_RADIUS;

        let touching = joint_at(JointId::IndexTip, Vec3::Y * radius);
        assert!(button.check_interaction(Handedness::Left, &touching) == false);

        let pushed = joint_at(JointId::IndexTip, Vec3::Y * (radius - 0.012));
        assert!(button.check_interaction(Handedness::Left, &pushed));
        assert_eq!(button.press_progress(), 1.0);
    }

    #[test]
    fn pauses_behind_until_above() {
        let mut button = button();
        let behind = joint_at(JointId::IndexTip, Vec3::NEG_Y * 0.1);
        let inside = joint_at(JointId::IndexTip, Vec3::NEG_Y * 0.005);
        let above = joint_at(JointId::IndexTip, Vec3::Y * 0.05);

        assert!(button.should_pause_checks(Handedness::Left, &behind));
        // Still paused while coming back through the button.
        assert!(button.should_pause_checks(Handedness::Left, &inside));
        assert!(button.should_pause_checks(Handedness::Right, &inside) == false);
        assert!(button.should_pause_checks(Handedness::Left, &above) == false);
    }
}
