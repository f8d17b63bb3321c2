//! Pose-invariant feature vectors for sequence alignment.
//!
//! A captured pose depends on where the subject stands and how tall
//! they are; neither should affect alignment cost. [`FeatureNormalizer`]
//! removes both: every joint is translated so the reference joint sits
//! at the origin, then scaled by the shoulder-to-shoulder distance, and
//! the result is flattened into one vector in [`Joint::ALL`] order,
//! two entries per joint for frontal captures or three with depth
//! enabled.

use tracing::warn;

use crate::config::ScreenConfig;
use crate::error::{Result, ScreenError};
use crate::skeleton::{Joint, JointWeights, PoseSequence, SkeletonFrame};

/// Flattened numeric encoding of one pose frame.
pub type FeatureVector = Vec<f64>;

/// Converts skeleton frames into centered, scale-normalized feature
/// vectors.
///
/// Stateful only in that it remembers the last valid shoulder scale:
/// a frame with momentarily coincident shoulders (tracking glitch)
/// reuses the previous scale instead of failing the whole sequence.
#[derive(Debug)]
pub struct FeatureNormalizer {
    reference_joint: Joint,
    use_depth: bool,
    scale_eps: f64,
    last_valid_scale: Option<f64>,
}

impl FeatureNormalizer {
    /// Create a normalizer from configuration.
    #[must_use]
    pub fn new(config: &ScreenConfig) -> Self {
        Self {
            reference_joint: config.reference_joint,
            use_depth: config.use_depth,
            scale_eps: config.scale_eps,
            last_valid_scale: None,
        }
    }

    /// Number of entries in each emitted feature vector.
    #[must_use]
    pub const fn dim(&self) -> usize {
        if self.use_depth {
            Joint::ALL.len() * 3
        } else {
            Joint::ALL.len() * 2
        }
    }

    /// Forget the remembered scale (call between unrelated captures).
    pub fn reset(&mut self) {
        self.last_valid_scale = None;
    }

    /// Normalize one frame into a feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::DegenerateGeometry`] when the shoulders
    /// coincide and no previous valid scale is available.
    pub fn normalize_frame(&mut self, frame: &SkeletonFrame) -> Result<FeatureVector> {
        self.normalize_frame_weighted(frame, None)
    }

    /// Normalize one frame, scaling each joint's entries by its weight.
    ///
    /// Weight 0 zeroes a joint's contribution to any distance computed
    /// on the output; both sequences in a comparison must use the same
    /// weights for the distance to be meaningful.
    ///
    /// # Errors
    ///
    /// Same conditions as [`normalize_frame`](Self::normalize_frame).
    pub fn normalize_frame_weighted(
        &mut self,
        frame: &SkeletonFrame,
        weights: Option<&JointWeights>,
    ) -> Result<FeatureVector> {
        let scale = self.shoulder_scale(frame)?;
        let center = frame.position(self.reference_joint);

        let mut features = Vec::with_capacity(self.dim());
        for joint in Joint::ALL {
            let w = weights.map_or(1.0, |ws| ws.get(joint));
            let p = frame.position(joint) - center;
            features.push(w * p.x / scale);
            features.push(w * p.y / scale);
            if self.use_depth {
                features.push(w * p.z / scale);
            }
        }
        Ok(features)
    }

    /// Normalize a whole sequence, skipping dropped and untracked
    /// frames.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::EmptySequence`] when no frame survives.
    pub fn normalize_sequence(&mut self, sequence: &PoseSequence) -> Result<Vec<FeatureVector>> {
        self.normalize_sequence_weighted(sequence, None)
    }

    /// Weighted variant of [`normalize_sequence`](Self::normalize_sequence).
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::EmptySequence`] when no frame survives.
    pub fn normalize_sequence_weighted(
        &mut self,
        sequence: &PoseSequence,
        weights: Option<&JointWeights>,
    ) -> Result<Vec<FeatureVector>> {
        let mut vectors = Vec::with_capacity(sequence.len());
        for frame in sequence.tracked_frames() {
            match self.normalize_frame_weighted(frame, weights) {
                Ok(v) => vectors.push(v),
                // Degenerate single frames are skipped, not fatal.
                Err(ScreenError::DegenerateGeometry { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        if vectors.is_empty() {
            return Err(ScreenError::empty_sequence(format!(
                "no usable frames in sequence '{}'",
                sequence.label
            )));
        }
        Ok(vectors)
    }

    /// Shoulder-to-shoulder distance for the frame, falling back to the
    /// last valid scale on a degenerate pose.
    fn shoulder_scale(&mut self, frame: &SkeletonFrame) -> Result<f64> {
        let left = frame.position(Joint::ShoulderLeft);
        let right = frame.position(Joint::ShoulderRight);
        let delta = left - right;
        // Scale dimensionality matches the feature layout.
        let scale = if self.use_depth {
            delta.norm()
        } else {
            delta.xy().norm()
        };

        if scale > self.scale_eps {
            self.last_valid_scale = Some(scale);
            return Ok(scale);
        }

        match self.last_valid_scale {
            Some(previous) => {
                warn!(scale, previous, "degenerate shoulder distance, reusing previous scale");
                Ok(previous)
            }
            None => Err(ScreenError::degenerate_geometry(
                "shoulder distance is zero and no previous scale is known",
            )),
        }
    }
}
