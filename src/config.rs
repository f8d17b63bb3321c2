//! Configuration for alignment and assessment.
//!
//! [`ScreenConfig`] centralizes every tunable parameter with defaults
//! matching the Kinect-v1 capture pipeline this engine was built
//! against. Assumptions that are easy to bury in processing code (the
//! 30 Hz frame rate, the 5-frame status window) are explicit fields
//! here.
//!
//! # Example
//!
//! ```
//! use motion_screen::{Joint, ScreenConfig};
//!
//! let config = ScreenConfig::default();
//! assert_eq!(config.frame_rate, 30.0);
//!
//! let clinical = ScreenConfig::clinical().with_frame_rate(25.0);
//! assert!(clinical.use_depth);
//! assert_eq!(clinical.reference_joint, Joint::ShoulderCenter);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScreenError};
use crate::skeleton::Joint;

/// Configuration for geometry, normalization, alignment, and matching.
///
/// # Core parameters
///
/// - `frame_rate`: assumed capture rate, used only for velocity scaling.
///   The sensor does not timestamp frames, so this is a modeling
///   assumption, not a measurement.
/// - `window_capacity`: frames of per-joint status retained for
///   velocity finite differences and live feedback.
/// - `max_sequence_len`: bound the capture layer should enforce before
///   invoking the matcher; DTW is O(N·M).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Assumed capture frame rate in Hz.
    /// - Kinect v1 skeleton stream: 30
    /// - Downsampled clinical review: 10-15
    pub frame_rate: f64,

    /// Capacity of the sliding joint-status window (frames).
    pub window_capacity: usize,

    /// Joint every pose is centered on before scale normalization.
    pub reference_joint: Joint,

    /// Include the depth (z) coordinate in feature vectors.
    /// Frontal captures compare better in 2-D; floor-level or oblique
    /// setups need the full 3-D layout.
    pub use_depth: bool,

    /// Maximum sequence length the caller should feed the matcher.
    pub max_sequence_len: usize,

    /// Skip templates whose length differs from the query by more than
    /// this ratio. `None` disables pruning and every template is tried.
    pub length_prune_ratio: Option<f64>,

    /// Shoulder distances below this are treated as a degenerate pose.
    pub scale_eps: f64,

    /// General numerical epsilon for zero-norm vector checks.
    pub numerical_eps: f64,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            frame_rate: 30.0,
            window_capacity: 5,
            reference_joint: Joint::ShoulderCenter,
            use_depth: false,
            max_sequence_len: 500,
            length_prune_ratio: None,
            scale_eps: 1e-6,
            numerical_eps: 1e-9,
        }
    }
}

impl ScreenConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for a Kinect-v1 sensor feeding live exercise feedback.
    #[must_use]
    pub fn kinect() -> Self {
        Self::default()
    }

    /// Preset for clinical movement screens: full 3-D features and a
    /// longer status window for smoother velocity estimates.
    #[must_use]
    pub fn clinical() -> Self {
        Self {
            use_depth: true,
            window_capacity: 8,
            max_sequence_len: 800,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is out of valid range.
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate <= 0.0 {
            return Err(ScreenError::invalid_config("frame_rate must be positive"));
        }
        if self.window_capacity == 0 {
            return Err(ScreenError::invalid_config(
                "window_capacity must be at least 1",
            ));
        }
        if self.max_sequence_len == 0 {
            return Err(ScreenError::invalid_config(
                "max_sequence_len must be at least 1",
            ));
        }
        if let Some(ratio) = self.length_prune_ratio {
            if ratio < 1.0 {
                return Err(ScreenError::invalid_config(
                    "length_prune_ratio must be >= 1",
                ));
            }
        }
        if self.scale_eps <= 0.0 || self.numerical_eps <= 0.0 {
            return Err(ScreenError::invalid_config("epsilons must be positive"));
        }
        Ok(())
    }

    /// Set the assumed frame rate.
    #[must_use]
    pub const fn with_frame_rate(mut self, hz: f64) -> Self {
        self.frame_rate = hz;
        self
    }

    /// Set the sliding-window capacity.
    #[must_use]
    pub const fn with_window_capacity(mut self, frames: usize) -> Self {
        self.window_capacity = frames;
        self
    }

    /// Toggle depth-inclusive feature vectors.
    #[must_use]
    pub const fn with_depth(mut self, use_depth: bool) -> Self {
        self.use_depth = use_depth;
        self
    }

    /// Set the maximum sequence length advertised to callers.
    #[must_use]
    pub const fn with_max_sequence_len(mut self, len: usize) -> Self {
        self.max_sequence_len = len;
        self
    }

    /// Enable template length pruning with the given ratio.
    #[must_use]
    pub const fn with_length_prune_ratio(mut self, ratio: f64) -> Self {
        self.length_prune_ratio = Some(ratio);
        self
    }

    /// Number of feature entries emitted per joint.
    #[must_use]
    pub const fn coords_per_joint(&self) -> usize {
        if self.use_depth {
            3
        } else {
            2
        }
    }
}
