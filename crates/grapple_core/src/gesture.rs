use std::fmt;
use std::fs;
use std::path::Path;

use bevy_log::{error, info, warn};
use bevy_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GrappleError;
use crate::hand::{Hand, Handedness, JointId, JOINT_COUNT};

/// Version written into gesture files.
pub const GESTURE_FILE_VERSION: u32 = 1;

pub type GestureCallback = Box<dyn FnMut(Handedness, &str) + Send + Sync>;

/// Callbacks invoked when a gesture is recognized or dropped.
///
/// Not serialized and not cloned.
#[derive(Default)]
pub struct GestureCallbacks {
    pub recognized: Vec<GestureCallback>,
    pub unrecognized: Vec<GestureCallback>,
}

impl fmt::Debug for GestureCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureCallbacks")
            .field("recognized", &self.recognized.len())
            .field("unrecognized", &self.unrecognized.len())
            .finish()
    }
}

/// Optional orientation requirement of a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardConstraint {
    pub joint: JointId,
    pub forward: Vec3,
    pub rotation_threshold: f32,
}

impl ForwardConstraint {
    /// Cosine based tolerance, not a linear angle.
    #[inline]
    pub fn accepts(&self, live_forward: Vec3) -> bool {
        1.0 - live_forward.dot(self.forward).abs() < self.rotation_threshold
    }
}

/// A named hand pose, stored as each joint's distance to the wrist.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct Gesture {
    pub name: String,
    /// Distance from the wrist to every joint, indexed by [`JointId::index`].
    pub joint_distances: Vec<f32>,
    #[serde(default)]
    pub use_joint_forward: bool,
    #[serde(default)]
    pub forward_joint: JointId,
    #[serde(default)]
    pub joint_forward: Vec3,
    /// How far above its reference distance a joint may be.
    pub distance_threshold: f32,
    pub rotation_threshold: f32,
    #[serde(skip)]
    pub callbacks: GestureCallbacks,
}

impl Gesture {
    /// Snapshot the current pose of a hand.
    pub fn record(
        name: impl Into<String>,
        hand: &Hand,
        forward_joint: Option<JointId>,
        distance_threshold: f32,
        rotation_threshold: f32,
    ) -> Self {
        let wrist = hand.wrist().position;
        let joint_distances = hand
            .joints()
            .iter()
            .map(|joint| wrist.distance(joint.position))
            .collect();

        let (use_joint_forward, forward_joint, joint_forward) = match forward_joint {
            Some(id) => (true, id, hand.joint(id).forward),
            None => (false, JointId::Wrist, Vec3::ZERO),
        };

        Self {
            name: name.into(),
            joint_distances,
            use_joint_forward,
            forward_joint,
            joint_forward,
            distance_threshold,
            rotation_threshold,
            callbacks: GestureCallbacks::default(),
        }
    }

    pub fn forward_constraint(&self) -> Option<ForwardConstraint> {
        match self.use_joint_forward {
            true => Some(ForwardConstraint {
                joint: self.forward_joint,
                forward: self.joint_forward,
                rotation_threshold: self.rotation_threshold,
            }),
            false => None,
        }
    }

    pub fn on_recognized(
        mut self,
        callback: impl FnMut(Handedness, &str) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.recognized.push(Box::new(callback));
        self
    }

    pub fn on_unrecognized(
        mut self,
        callback: impl FnMut(Handedness, &str) + Send + Sync + 'static,
    ) -> Self {
        self.callbacks.unrecognized.push(Box::new(callback));
        self
    }

    pub(crate) fn notify_recognized(&mut self, hand: Handedness) {
        for callback in self.callbacks.recognized.iter_mut() {
            callback(hand, &self.name);
        }
    }

    pub(crate) fn notify_unrecognized(&mut self, hand: Handedness) {
        for callback in self.callbacks.unrecognized.iter_mut() {
            callback(hand, &self.name);
        }
    }

    /// Whether the profile has one distance per joint.
    pub fn is_well_formed(&self) -> bool {
        self.joint_distances.len() == JOINT_COUNT
    }
}

/// Gestures compare equal by joint distance profile only.
impl PartialEq for Gesture {
    fn eq(&self, other: &Self) -> bool {
        self.joint_distances == other.joint_distances
    }
}

impl Clone for Gesture {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            joint_distances: self.joint_distances.clone(),
            use_joint_forward: self.use_joint_forward,
            forward_joint: self.forward_joint,
            joint_forward: self.joint_forward,
            distance_threshold: self.distance_threshold,
            rotation_threshold: self.rotation_threshold,
            callbacks: GestureCallbacks::default(),
        }
    }
}

/// On-disk representation.
#[derive(Serialize)]
struct GestureFileRef<'a> {
    version: u32,
    gestures: &'a [Gesture],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GestureFile {
    Versioned { version: u32, gestures: Vec<Gesture> },
    Bare(Vec<Gesture>),
}

/// Parse a gesture list from JSON bytes.
///
/// Both the versioned envelope and a bare list are accepted.
pub fn parse_gesture_list(bytes: &[u8]) -> Result<Vec<Gesture>, GrappleError> {
    let gestures = match serde_json::from_slice::<GestureFile>(bytes)? {
        GestureFile::Versioned { version, gestures } => {
            if version > GESTURE_FILE_VERSION {
                return Err(GrappleError::UnsupportedVersion {
                    found: version,
                    supported: GESTURE_FILE_VERSION,
                });
            }
            gestures
        }
        GestureFile::Bare(gestures) => gestures,
    };

    Ok(gestures)
}

/// Read a gesture list from disk.
pub fn read_gesture_file(path: impl AsRef<Path>) -> Result<Vec<Gesture>, GrappleError> {
    let bytes = fs::read(path)?;
    parse_gesture_list(&bytes)
}

/// Ordered collection of gestures.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GestureLibrary {
    gestures: Vec<Gesture>,
}

impl GestureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a gesture, renaming it if the name is taken.
    ///
    /// Returns the final name of the gesture, or `None` if its profile is
    /// malformed.
    pub fn add(&mut self, mut gesture: Gesture) -> Option<&str> {
        if gesture.is_well_formed() == false {
            warn!(
                "Gesture '{}' has {} joint distances, expected {}. Skipping...",
                gesture.name,
                gesture.joint_distances.len(),
                JOINT_COUNT
            );
            return None;
        }

        let unique_name = self.unique_name(&gesture.name);
        if unique_name != gesture.name {
            warn!(
                "Gesture name '{}' already exists, renaming to '{}'.",
                gesture.name, unique_name
            );
            gesture.name = unique_name;
        }

        self.gestures.push(gesture);
        self.gestures.last().map(|g| g.name.as_str())
    }

    fn unique_name(&self, name: &str) -> String {
        if self.get(name).is_none() {
            return name.to_string();
        }

        let mut suffix = 1;
        loop {
            let candidate = format!("{name} ({suffix})");
            if self.get(&candidate).is_none() {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Gesture> {
        let index = self.gestures.iter().position(|g| g.name == name)?;
        Some(self.gestures.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Gesture> {
        self.gestures.iter().find(|g| g.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Gesture> {
        self.gestures.iter_mut().find(|g| g.name == name)
    }

    pub fn get_by_index(&self, index: usize) -> Option<&Gesture> {
        self.gestures.get(index)
    }

    pub(crate) fn get_by_index_mut(&mut self, index: usize) -> Option<&mut Gesture> {
        self.gestures.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gesture> {
        self.gestures.iter()
    }

    pub fn as_slice(&self) -> &[Gesture] {
        &self.gestures
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn clear(&mut self) {
        self.gestures.clear();
    }

    /// Replace or merge with another list of gestures.
    ///
    /// Malformed gestures are skipped. Returns the number of gestures added.
    pub fn extend(&mut self, gestures: Vec<Gesture>, overwrite: bool) -> usize {
        if overwrite {
            self.gestures.clear();
        }

        let mut count = 0;
        for gesture in gestures {
            if self.add(gesture).is_some() {
                count += 1;
            }
        }
        count
    }

    /// Write the whole library to disk, replacing the file.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<(), GrappleError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if parent.as_os_str().is_empty() == false {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&GestureFileRef {
            version: GESTURE_FILE_VERSION,
            gestures: &self.gestures,
        })?;
        fs::write(path, json)?;

        info!("Exported {} gestures to {}.", self.len(), path.display());
        Ok(())
    }

    /// Load gestures from disk, replacing or merging with the current ones.
    ///
    /// Failing to read the file leaves the library untouched and imports nothing.
    pub fn import(&mut self, path: impl AsRef<Path>, overwrite: bool) -> usize {
        let path = path.as_ref();
        let gestures = match read_gesture_file(path) {
            Ok(gestures) => gestures,
            Err(GrappleError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Gesture file {} does not exist. Nothing to import.", path.display());
                return 0;
            }
            Err(err) => {
                error!("Could not import {}: {err}", path.display());
                return 0;
            }
        };

        let count = self.extend(gestures, overwrite);
        info!("Imported {count} gestures from {}.", path.display());
        count
    }
}
