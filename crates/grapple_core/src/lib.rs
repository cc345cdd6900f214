//! Hand joint tracking, gesture recognition and interactable state for XR hands.
//!
//! [`Grapple`] owns every component. Feed it joint poses, tick it once per
//! frame, and drain the [`GrappleEvent`]s it produces.

pub mod capsule;
pub mod config;
pub mod error;
pub mod event;
pub mod finger_bend;
pub mod gesture;
pub mod gesture_recognizer;
pub mod hand;
pub mod interactable;
pub mod interactables;
pub mod interaction;
pub mod joint_store;
pub mod proximity;
pub mod runtime;
pub mod scheduler;

pub use runtime::Grapple;

pub mod prelude {
    pub use crate::capsule::{HandCapsules, JointCapsule};
    pub use crate::config::{
        CapsuleConfig, FingerBendConfig, GestureConfig, GrappleConfig, InteractionConfig,
        ProximityConfig,
    };
    pub use crate::error::GrappleError;
    pub use crate::event::GrappleEvent;
    pub use crate::gesture::{Gesture, GestureLibrary};
    pub use crate::hand::{Finger, Hand, Handedness, Joint, JointId, JointPose, JOINT_COUNT};
    pub use crate::interactable::{
        GroupId, Interactable, InteractableGroup, InteractableId, InteractableState,
    };
    pub use crate::interactables::{Button, Lever, Pose, Slider, Socket, Valve};
    pub use crate::joint_store::{JointPoseProvider, TrackingChange};
    pub use crate::Grapple;
}
