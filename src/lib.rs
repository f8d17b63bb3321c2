//! Motion Screen Library
//!
//! Skeleton-sequence alignment and movement-screen scoring for depth
//! sensor captures.
//!
//! A capture is a labeled sequence of 20-joint skeleton frames. This
//! library turns such captures into three kinds of results:
//!
//! - **Action recognition**: normalize each frame into a translation-
//!   and scale-invariant feature vector, align the capture against a
//!   template database with dynamic time warping, and report the
//!   closest template label.
//! - **Joint geometry**: per-frame joint angles, bone-vs-axis and
//!   bone-vs-plane angles, and finite-difference velocities, held in a
//!   bounded sliding window for live overlays.
//! - **Movement screening**: declarative rule sets (standard value plus
//!   tolerance band, e.g. the deep-squat screen) scored against the
//!   capture frame by frame.
//!
//! # Quick Start
//!
//! ```
//! use motion_screen::{
//!     ActionMatcher, ActionTemplate, PoseSequence, ScreenConfig, SkeletonFrame,
//! };
//! use nalgebra::Point3;
//!
//! // A trivial one-frame capture; real captures come from a sensor.
//! let mut positions = [Point3::origin(); motion_screen::JOINT_COUNT];
//! positions[motion_screen::Joint::ShoulderLeft.index()] = Point3::new(-0.2, 1.3, 2.5);
//! positions[motion_screen::Joint::ShoulderRight.index()] = Point3::new(0.2, 1.3, 2.5);
//! let frame = SkeletonFrame::new(positions);
//!
//! let mut template = PoseSequence::new("wave");
//! template.push(Some(frame.clone()));
//!
//! let mut query = PoseSequence::new("");
//! query.push(Some(frame));
//!
//! let mut matcher = ActionMatcher::new(ScreenConfig::default());
//! matcher.add_template(ActionTemplate::new("wave", template));
//!
//! let result = matcher.best_match(&query);
//! assert_eq!(result.label, "wave");
//! ```
//!
//! # Presets
//!
//! ```
//! use motion_screen::{ScreenConfig, ScreenTest};
//!
//! let sensor_config = ScreenConfig::kinect();
//! let clinical_config = ScreenConfig::clinical();
//! let deep_squat = ScreenTest::deep_squat();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod dtw;
pub mod error;
pub mod features;
pub mod geometry;
pub mod matcher;
pub mod rules;
pub mod skeleton;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use config::ScreenConfig;
pub use dtw::{align, euclidean_distance, Alignment, CostMatrix};
pub use error::{Result, ScreenError};
pub use features::{FeatureNormalizer, FeatureVector};
pub use geometry::{
    neighbor_joints, plane_angle, vector_angle, Axis, JointGeometryEngine, JointStatus,
    JointStatusMap, NeighborAngles, Plane,
};
pub use matcher::{ActionMatcher, ActionTemplate, MatchResult, UNKNOWN_LABEL};
pub use rules::{
    evaluate_rule, evaluate_test, Extremum, FrameSelector, Measurement, Rule, RuleEvaluation,
    ScreenTest, TestEvaluation,
};
pub use skeleton::{
    FrameTracking, Joint, JointConfidence, JointWeights, PoseSequence, SkeletonFrame, JOINT_COUNT,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{squat_bottom_frame, standing_frame, translate_joint};
    use nalgebra::Vector3;

    /// Capture of `n` frames raising the right hand from hip height.
    fn hand_raise(n: usize) -> PoseSequence {
        let mut seq = PoseSequence::new("hand_raise");
        for i in 0..n {
            let lift = 0.6 * i as f64 / (n - 1) as f64;
            let frame = translate_joint(
                &standing_frame(),
                Joint::HandRight,
                Vector3::new(0.0, lift, 0.0),
            );
            seq.push(Some(frame));
        }
        seq
    }

    /// Capture of `n` frames descending into a squat and recovering.
    fn squat(n: usize) -> PoseSequence {
        let mut seq = PoseSequence::new("squat");
        for i in 0..n {
            seq.push(Some(if i == n / 2 {
                squat_bottom_frame()
            } else {
                standing_frame()
            }));
        }
        seq
    }

    #[test]
    fn test_recognition_pipeline() {
        let mut matcher = ActionMatcher::new(ScreenConfig::default());
        matcher.add_template(ActionTemplate::new("hand_raise", hand_raise(20)));
        matcher.add_template(ActionTemplate::new("squat", squat(20)));

        // A resampled rendition of the raise matches its template.
        let result = matcher.best_match(&hand_raise(31));
        assert_eq!(result.label, "hand_raise");
        assert!(result.is_match());
    }

    #[test]
    fn test_screening_pipeline() {
        let evaluation = evaluate_test(&squat(9), &ScreenTest::deep_squat());
        assert_eq!(evaluation.score, 2);
    }

    #[test]
    fn test_geometry_pipeline() {
        let config = ScreenConfig::default();
        let mut engine = JointGeometryEngine::new(&config);
        for frame in squat(9).tracked_frames() {
            engine.update(Some(frame));
        }
        assert_eq!(engine.window_len(), config.window_capacity);
        assert!(engine.current_joint(Joint::KneeRight).is_some());
    }
}
