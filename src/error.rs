//! Error types for pose alignment and movement-screen scoring.
//!
//! Every condition here is locally recoverable: a degenerate pose or an
//! empty capture must never take down the capture loop that feeds this
//! crate.

use thiserror::Error;

/// Main error type for motion-screen operations.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Alignment or matching was invoked on an empty sequence, or no
    /// frame in the sequence survived tracking filters.
    #[error("Empty sequence: {context}")]
    EmptySequence { context: String },

    /// Zero-length reference vectors make normalization or angle
    /// computation undefined (e.g. coincident shoulders).
    #[error("Degenerate geometry: {context}")]
    DegenerateGeometry { context: String },

    /// A frame or joint lacks valid tracking data.
    #[error("Missing tracking data: {context}")]
    MissingTracking { context: String },

    /// Feature vectors being aligned have differing dimensionality.
    #[error("Feature length mismatch: query dim {query} vs target dim {target}")]
    FeatureLengthMismatch { query: usize, target: usize },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for motion-screen operations.
pub type Result<T> = std::result::Result<T, ScreenError>;

impl ScreenError {
    /// Create an empty sequence error.
    #[must_use]
    pub fn empty_sequence(context: impl Into<String>) -> Self {
        Self::EmptySequence {
            context: context.into(),
        }
    }

    /// Create a degenerate geometry error.
    #[must_use]
    pub fn degenerate_geometry(context: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            context: context.into(),
        }
    }

    /// Create a missing tracking error.
    #[must_use]
    pub fn missing_tracking(context: impl Into<String>) -> Self {
        Self::MissingTracking {
            context: context.into(),
        }
    }

    /// Create a feature length mismatch error.
    #[must_use]
    pub const fn feature_length_mismatch(query: usize, target: usize) -> Self {
        Self::FeatureLengthMismatch { query, target }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
