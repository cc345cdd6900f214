use bevy_log::{error, warn};

use crate::config::FingerBendConfig;
use crate::error::GrappleError;
use crate::hand::{Finger, Hand, Handedness};

/// Per-hand reference length of every finger when fully stretched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StretchReference {
    lengths: [f32; 5],
    calibrated: bool,
}

impl StretchReference {
    /// Arc length of every finger chain.
    pub fn measure(hand: &Hand) -> Self {
        let mut lengths = [0.0; 5];
        for finger in Finger::ALL {
            lengths[finger.index()] = finger
                .joints()
                .windows(2)
                .map(|pair| {
                    hand.joint(pair[0])
                        .position
                        .distance(hand.joint(pair[1]).position)
                })
                .sum();
        }

        Self {
            lengths,
            calibrated: true,
        }
    }

    pub fn length(&self, finger: Finger) -> f32 {
        self.lengths[finger.index()]
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }
}

/// Estimates how stretched each finger is.
///
/// The reference length is calibrated once per tracking acquisition, not
/// every frame.
#[derive(Debug, Clone, Default)]
pub struct FingerBendEstimator {
    config: FingerBendConfig,
    references: [StretchReference; 2],
}

impl FingerBendEstimator {
    pub fn new(config: FingerBendConfig) -> Self {
        Self {
            config,
            references: [StretchReference::default(); 2],
        }
    }

    pub fn config(&self) -> &FingerBendConfig {
        &self.config
    }

    /// Store the stretched reference lengths of a hand.
    pub fn calibrate(&mut self, hand: &Hand) {
        self.references[hand.handedness().index()] = StretchReference::measure(hand);
    }

    /// Forget the calibration of a hand.
    pub fn reset(&mut self, hand: Handedness) {
        self.references[hand.index()] = StretchReference::default();
    }

    pub fn reference(&self, hand: Handedness) -> &StretchReference {
        &self.references[hand.index()]
    }

    /// Bend ratio of a finger in `[0, 1]`, 1 being fully stretched.
    ///
    /// With `remap`, the configured threshold of the finger maps to 0 so that
    /// both ends of the range are reachable in practice.
    pub fn try_get_finger_bend(&self, hand: &Hand, finger: Finger, remap: bool) -> Option<f32> {
        if hand.is_tracked() == false {
            return None;
        }

        let reference = &self.references[hand.handedness().index()];
        if reference.is_calibrated() == false {
            warn!("Hand {} has not been calibrated yet.", hand.handedness());
            return None;
        }

        let threshold = self.config.threshold(finger);
        if (0.0..1.0).contains(&threshold) == false {
            error!(
                "{}",
                GrappleError::InvalidThreshold {
                    name: "finger bend",
                    value: threshold,
                }
            );
            return None;
        }

        let stretched = reference.length(finger);
        if stretched <= f32::EPSILON {
            return None;
        }

        let distance = hand
            .joint(finger.metacarpal())
            .position
            .distance(hand.joint(finger.tip()).position);
        let raw = (distance / stretched).clamp(0.0, 1.0);

        match remap {
            true => Some(((raw - threshold) / (1.0 - threshold)).clamp(0.0, 1.0)),
            false => Some(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy_math::{Quat, Vec3};

    use super::*;
    use crate::hand::{JointId, JointPose, JOINT_COUNT};
    use crate::joint_store::JointStore;

    /// Hand with every finger laid out straight along +Y.
    fn straight_poses() -> [JointPose; JOINT_COUNT] {
        let mut poses = [JointPose::default(); JOINT_COUNT];
        for (f, finger) in Finger::ALL.into_iter().enumerate() {
            for (j, id) in finger.joints().iter().enumerate() {
                poses[id.index()] = JointPose::new(
                    Vec3::new(f as f32 * 0.02, 0.02 + j as f32 * 0.03, 0.0),
                    Quat::IDENTITY,
                    0.008,
                );
            }
        }
        poses
    }

    fn tracked_store(poses: &[JointPose; JOINT_COUNT]) -> JointStore {
        let mut store = JointStore::new();
        store.set_tracked(Handedness::Right, true);
        store.update_hand(Handedness::Right, poses);
        store
    }

    #[test]
    fn uncalibrated_hand_fails() {
        let store = tracked_store(&straight_poses());
        let estimator = FingerBendEstimator::new(FingerBendConfig::default());

        assert!(estimator
            .try_get_finger_bend(store.hand(Handedness::Right), Finger::Index, false)
            .is_none());
    }

    #[test]
    fn straight_finger_is_fully_stretched() {
        let store = tracked_store(&straight_poses());
        let mut estimator = FingerBendEstimator::new(FingerBendConfig::default());
        estimator.calibrate(store.hand(Handedness::Right));

        let hand = store.hand(Handedness::Right);
        for finger in Finger::ALL {
            let raw = estimator.try_get_finger_bend(hand, finger, false).unwrap();
            let remapped = estimator.try_get_finger_bend(hand, finger, true).unwrap();
            assert!((raw - 1.0).abs() < 1e-5);
            assert!((remapped - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn curled_finger_remaps_to_zero() {
        let mut poses = straight_poses();
        let mut store = tracked_store(&poses);
        let mut estimator = FingerBendEstimator::new(FingerBendConfig::default());
        estimator.calibrate(store.hand(Handedness::Right));

        // Fold the index tip back onto its metacarpal.
        poses[JointId::IndexTip.index()].position = poses[JointId::IndexMetacarpal.index()]
            .position
            + Vec3::Z * 0.01;
        store.update_hand(Handedness::Right, &poses);

        let hand = store.hand(Handedness::Right);
        let raw = estimator.try_get_finger_bend(hand, Finger::Index, false).unwrap();
        let remapped = estimator.try_get_finger_bend(hand, Finger::Index, true).unwrap();
        assert!(raw < 0.35);
        assert_eq!(remapped, 0.0);
    }

    #[test]
    fn bend_is_clamped() {
        let mut poses = straight_poses();
        let mut store = tracked_store(&poses);
        let mut estimator = FingerBendEstimator::new(FingerBendConfig::default());
        estimator.calibrate(store.hand(Handedness::Right));

        // Stretch beyond the calibrated length.
        poses[JointId::MiddleTip.index()].position += Vec3::Y;
        store.update_hand(Handedness::Right, &poses);

        let hand = store.hand(Handedness::Right);
        for remap in [false, true] {
            let bend = estimator.try_get_finger_bend(hand, Finger::Middle, remap).unwrap();
            assert!((0.0..=1.0).contains(&bend));
        }
    }

    #[test]
    fn invalid_threshold_fails() {
        let store = tracked_store(&straight_poses());
        let mut estimator = FingerBendEstimator::new(FingerBendConfig {
            thresholds: [1.0; 5],
        });
        estimator.calibrate(store.hand(Handedness::Right));

        assert!(estimator
            .try_get_finger_bend(store.hand(Handedness::Right), Finger::Ring, true)
            .is_none());
    }
}
