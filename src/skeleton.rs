//! Skeleton data model: joints, frames, and pose sequences.
//!
//! The capture collaborator (sensor layer) produces one [`SkeletonFrame`]
//! per tick and groups them into a [`PoseSequence`]. This crate only ever
//! reads these types; it never mutates a delivered frame.
//!
//! Joints are a closed set of 20 body landmarks, so everything keyed by
//! joint is a fixed-size array indexed by [`Joint::index`] rather than a
//! map.

use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Number of tracked body landmarks.
pub const JOINT_COUNT: usize = 20;

/// A named skeletal landmark.
///
/// Discriminants are stable and double as array indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Joint {
    HipCenter = 0,
    Spine = 1,
    ShoulderCenter = 2,
    Head = 3,
    ShoulderLeft = 4,
    ElbowLeft = 5,
    WristLeft = 6,
    HandLeft = 7,
    ShoulderRight = 8,
    ElbowRight = 9,
    WristRight = 10,
    HandRight = 11,
    HipLeft = 12,
    KneeLeft = 13,
    AnkleLeft = 14,
    FootLeft = 15,
    HipRight = 16,
    KneeRight = 17,
    AnkleRight = 18,
    FootRight = 19,
}

impl Joint {
    /// All joints in index order. The feature-vector layout and every
    /// per-joint array in the crate follow this order.
    pub const ALL: [Joint; JOINT_COUNT] = [
        Joint::HipCenter,
        Joint::Spine,
        Joint::ShoulderCenter,
        Joint::Head,
        Joint::ShoulderLeft,
        Joint::ElbowLeft,
        Joint::WristLeft,
        Joint::HandLeft,
        Joint::ShoulderRight,
        Joint::ElbowRight,
        Joint::WristRight,
        Joint::HandRight,
        Joint::HipLeft,
        Joint::KneeLeft,
        Joint::AnkleLeft,
        Joint::FootLeft,
        Joint::HipRight,
        Joint::KneeRight,
        Joint::AnkleRight,
        Joint::FootRight,
    ];

    /// Ordinal of this joint, valid as an index into any
    /// `[T; JOINT_COUNT]` table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Per-joint tracking confidence reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JointConfidence {
    /// Position directly observed.
    #[default]
    Tracked,
    /// Position estimated from neighboring joints.
    Inferred,
    /// No usable position for this joint.
    NotTracked,
}

/// Frame-level tracking state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrameTracking {
    /// Full skeleton tracked.
    #[default]
    Tracked,
    /// Only an overall position is known, no per-joint skeleton.
    PositionOnly,
    /// Nothing usable in this frame.
    NotTracked,
}

/// One captured skeleton: a position and confidence per joint, plus the
/// frame-level tracking state. Coordinates are meters in sensor space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonFrame {
    positions: [Point3<f64>; JOINT_COUNT],
    confidences: [JointConfidence; JOINT_COUNT],
    tracking: FrameTracking,
}

impl SkeletonFrame {
    /// Create a fully-tracked frame from per-joint positions in
    /// [`Joint::ALL`] order.
    #[must_use]
    pub fn new(positions: [Point3<f64>; JOINT_COUNT]) -> Self {
        Self {
            positions,
            confidences: [JointConfidence::Tracked; JOINT_COUNT],
            tracking: FrameTracking::Tracked,
        }
    }

    /// Create a frame with explicit per-joint confidences and tracking
    /// state, as delivered by the sensor layer.
    #[must_use]
    pub fn with_tracking(
        positions: [Point3<f64>; JOINT_COUNT],
        confidences: [JointConfidence; JOINT_COUNT],
        tracking: FrameTracking,
    ) -> Self {
        Self {
            positions,
            confidences,
            tracking,
        }
    }

    /// Position of a joint.
    #[must_use]
    pub fn position(&self, joint: Joint) -> Point3<f64> {
        self.positions[joint.index()]
    }

    /// Tracking confidence of a joint.
    #[must_use]
    pub fn confidence(&self, joint: Joint) -> JointConfidence {
        self.confidences[joint.index()]
    }

    /// Frame-level tracking state.
    #[must_use]
    pub const fn tracking(&self) -> FrameTracking {
        self.tracking
    }

    /// Whether the whole skeleton in this frame is tracked.
    #[must_use]
    pub fn is_tracked(&self) -> bool {
        self.tracking == FrameTracking::Tracked
    }

    /// Whether a joint has a directly observed or inferred position.
    #[must_use]
    pub fn joint_usable(&self, joint: Joint) -> bool {
        self.confidences[joint.index()] != JointConfidence::NotTracked
    }
}

/// An ordered, time-indexed capture of skeleton frames with a label.
///
/// `None` entries represent dropped frames. Index order is capture
/// order; there are no timestamps, the capture rate is assumed fixed
/// (see `ScreenConfig::frame_rate`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoseSequence {
    /// Action label ("Unknown" for unclassified captures).
    pub label: String,
    frames: Vec<Option<SkeletonFrame>>,
}

impl PoseSequence {
    /// Create an empty sequence with a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            frames: Vec::new(),
        }
    }

    /// Create a sequence from captured frames.
    #[must_use]
    pub fn from_frames(label: impl Into<String>, frames: Vec<Option<SkeletonFrame>>) -> Self {
        Self {
            label: label.into(),
            frames,
        }
    }

    /// Append a frame (or a dropped-frame marker).
    pub fn push(&mut self, frame: Option<SkeletonFrame>) {
        self.frames.push(frame);
    }

    /// Number of capture ticks, dropped frames included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether no frames were captured at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frame slots in capture order.
    #[must_use]
    pub fn frames(&self) -> &[Option<SkeletonFrame>] {
        &self.frames
    }

    /// Iterator over frames that were captured and fully tracked.
    pub fn tracked_frames(&self) -> impl Iterator<Item = &SkeletonFrame> {
        self.frames
            .iter()
            .filter_map(|f| f.as_ref())
            .filter(|f| f.is_tracked())
    }

    /// Number of captured, fully-tracked frames.
    #[must_use]
    pub fn tracked_len(&self) -> usize {
        self.tracked_frames().count()
    }

    /// Drop frames beyond `max_len`, keeping the head of the capture.
    ///
    /// DTW cost grows with the product of sequence lengths; the capture
    /// layer calls this before handing a long session to the matcher.
    pub fn truncate_to(&mut self, max_len: usize) {
        self.frames.truncate(max_len);
    }
}

/// Per-joint emphasis weights used when matching against a template.
///
/// Weight 0 removes a joint from the comparison entirely, 1 is the
/// neutral default. Templates for arm-dominated actions set leg joints
/// to 0 so leg jitter cannot dominate the alignment cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointWeights([f64; JOINT_COUNT]);

impl Default for JointWeights {
    fn default() -> Self {
        Self([1.0; JOINT_COUNT])
    }
}

impl JointWeights {
    /// Uniform weight 1 for all joints.
    #[must_use]
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Weight for a joint.
    #[must_use]
    pub fn get(&self, joint: Joint) -> f64 {
        self.0[joint.index()]
    }

    /// Set the weight for a joint, returning self for chaining.
    #[must_use]
    pub fn with(mut self, joint: Joint, weight: f64) -> Self {
        self.0[joint.index()] = weight;
        self
    }

    /// Whether every joint carries the neutral weight 1.
    #[must_use]
    pub fn is_uniform(&self) -> bool {
        self.0.iter().all(|&w| (w - 1.0).abs() < f64::EPSILON)
    }
}
