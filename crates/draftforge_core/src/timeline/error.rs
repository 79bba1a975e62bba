//! Timeline error types.

use std::path::PathBuf;

use crate::models::TrackError;
use crate::probe::ProbeError;

/// Errors that stop a timeline from being built.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// No scene images were supplied.
    #[error("At least one image is required to build a timeline")]
    InsufficientAssets,

    /// Narration length is unusable for the requested scene count.
    #[error("Invalid audio duration {duration}us: {reason}")]
    InvalidDuration { duration: i64, reason: String },

    /// Probing failed and no fallback estimate was given.
    #[error("Could not determine the duration of '{}' and no fallback was given: {source}", path.display())]
    DurationUnavailable {
        path: PathBuf,
        #[source]
        source: ProbeError,
    },

    /// A segment could not be placed on its track.
    #[error("Track placement failed: {0}")]
    Track(#[from] TrackError),
}

impl TimelineError {
    /// Create an invalid duration error.
    pub fn invalid_duration(duration: i64, reason: impl Into<String>) -> Self {
        Self::InvalidDuration {
            duration,
            reason: reason.into(),
        }
    }

    /// True for every variant meaning "the audio length is not usable".
    pub fn is_duration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDuration { .. } | Self::DurationUnavailable { .. }
        )
    }
}
