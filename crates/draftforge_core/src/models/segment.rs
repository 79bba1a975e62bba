//! Segments: placed instances of a material on a track.

use serde::{Deserialize, Serialize};

use super::ids::new_id;
use super::material::MaterialKind;
use super::track::TrackKind;
use crate::timing::TimeRange;

/// Per-placement visual transform.
///
/// `transform_x`/`transform_y` are in canvas-normalised units where the
/// canvas spans `[-1, 1]` on each axis and negative Y is toward the bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipSettings {
    pub alpha: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub transform_x: f64,
    pub transform_y: f64,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            transform_x: 0.0,
            transform_y: 0.0,
            flip_h: false,
            flip_v: false,
        }
    }
}

impl ClipSettings {
    /// Identity transform shifted vertically by `offset_y`.
    pub fn with_vertical_offset(offset_y: f64) -> Self {
        Self {
            transform_y: offset_y,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoSegment {
    pub id: String,
    pub material_id: String,
    pub source_range: TimeRange,
    pub target_range: TimeRange,
    pub speed: f64,
    pub volume: f64,
    pub clip_settings: ClipSettings,
}

impl VideoSegment {
    /// A still shown for `range`, sampled from the same span of the source.
    pub fn still(material_id: impl Into<String>, range: TimeRange) -> Self {
        Self {
            id: new_id(),
            material_id: material_id.into(),
            source_range: range,
            target_range: range,
            speed: 1.0,
            volume: 1.0,
            clip_settings: ClipSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    pub id: String,
    pub material_id: String,
    pub target_range: TimeRange,
    pub source_range: Option<TimeRange>,
    pub speed: f64,
    pub volume: f64,
}

impl AudioSegment {
    /// Full-length playback at unit speed and volume.
    pub fn full(material_id: impl Into<String>, duration: i64) -> Self {
        let range = TimeRange::new(0, duration);
        Self {
            id: new_id(),
            material_id: material_id.into(),
            target_range: range,
            source_range: Some(range),
            speed: 1.0,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSegment {
    pub id: String,
    pub material_id: String,
    pub target_range: TimeRange,
    /// Style name understood by the editor (e.g. "subtitle").
    pub style: String,
    pub clip_settings: ClipSettings,
}

impl TextSegment {
    pub fn caption(material_id: impl Into<String>, range: TimeRange, offset_y: f64) -> Self {
        Self {
            id: new_id(),
            material_id: material_id.into(),
            target_range: range,
            style: "subtitle".to_string(),
            clip_settings: ClipSettings::with_vertical_offset(offset_y),
        }
    }
}

/// Any segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Video(VideoSegment),
    Audio(AudioSegment),
    Text(TextSegment),
}

impl Segment {
    pub fn id(&self) -> &str {
        match self {
            Segment::Video(s) => &s.id,
            Segment::Audio(s) => &s.id,
            Segment::Text(s) => &s.id,
        }
    }

    pub fn material_id(&self) -> &str {
        match self {
            Segment::Video(s) => &s.material_id,
            Segment::Audio(s) => &s.material_id,
            Segment::Text(s) => &s.material_id,
        }
    }

    pub fn target_range(&self) -> TimeRange {
        match self {
            Segment::Video(s) => s.target_range,
            Segment::Audio(s) => s.target_range,
            Segment::Text(s) => s.target_range,
        }
    }

    /// Track kind this segment belongs on.
    pub fn track_kind(&self) -> TrackKind {
        match self {
            Segment::Video(_) => TrackKind::Video,
            Segment::Audio(_) => TrackKind::Audio,
            Segment::Text(_) => TrackKind::Text,
        }
    }

    /// Material bucket the referenced ID must exist in.
    pub fn material_kind(&self) -> MaterialKind {
        match self {
            Segment::Video(_) => MaterialKind::Photo,
            Segment::Audio(_) => MaterialKind::Audio,
            Segment::Text(_) => MaterialKind::Text,
        }
    }
}
