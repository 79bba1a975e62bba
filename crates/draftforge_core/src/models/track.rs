//! Tracks: ordered channels of one segment kind.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::new_id;
use super::segment::Segment;
use crate::timing::TimeRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

impl TrackKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Video => "video",
            TrackKind::Audio => "audio",
            TrackKind::Text => "text",
        }
    }

    /// Whether segments on this kind of track must be disjoint and ordered.
    pub fn is_single_row(&self) -> bool {
        matches!(self, TrackKind::Video | TrackKind::Audio)
    }
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised when a segment does not fit on a track.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("Cannot place a {segment} segment on a {track} track")]
    KindMismatch { track: TrackKind, segment: TrackKind },

    #[error("Segment at {new:?} overlaps or precedes previous segment at {previous:?}")]
    Overlap { previous: TimeRange, new: TimeRange },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub kind: TrackKind,
    segments: Vec<Segment>,
}

impl Track {
    pub fn new(kind: TrackKind) -> Self {
        Self {
            id: new_id(),
            kind,
            segments: Vec::new(),
        }
    }

    /// Append a segment.
    ///
    /// On video and audio tracks the segment must start at or after the end
    /// of the last one. Text tracks accept overlapping captions.
    pub fn push(&mut self, segment: Segment) -> Result<(), TrackError> {
        if segment.track_kind() != self.kind {
            return Err(TrackError::KindMismatch {
                track: self.kind,
                segment: segment.track_kind(),
            });
        }

        if self.kind.is_single_row() {
            if let Some(last) = self.segments.last() {
                let previous = last.target_range();
                let new = segment.target_range();
                if new.start < previous.end() {
                    return Err(TrackError::Overlap { previous, new });
                }
            }
        }

        self.segments.push(segment);
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// End of the last-ending segment.
    pub fn end(&self) -> i64 {
        self.segments
            .iter()
            .map(|s| s.target_range().end())
            .max()
            .unwrap_or(0)
    }
}
