//! The editor's draft document shape.
//!
//! Field names follow the editor's `draft_content.json`. Times are integer
//! microseconds throughout.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{ClipSettings, TrackKind};
use crate::timing::TimeRange;

/// Schema version written into new documents.
pub const DOCUMENT_VERSION: u32 = 360_000;

/// Nominal duration the editor expects on a still-image material (3 hours).
pub const PHOTO_MATERIAL_DURATION: i64 = 10_800_000_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub version: u32,
    pub canvas_config: CanvasSpec,
    pub fps: f64,
    /// Total project length in microseconds.
    pub duration: i64,
    pub materials: DocumentMaterials,
    pub tracks: DocumentTracks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    /// Aspect ratio preset; "original" means use width/height as given.
    pub ratio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMaterials {
    pub videos: Vec<VideoMaterialEntry>,
    pub audios: Vec<AudioMaterialEntry>,
    pub texts: Vec<TextMaterialEntry>,
}

/// A still image, stored in the editor's `videos` bucket as type `photo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMaterialEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub material_name: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMaterialEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub name: String,
    pub duration: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMaterialEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Rich-content JSON string (text plus style ranges).
    pub content: String,
    pub font_size: f64,
    pub text_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentTracks {
    pub video: Vec<TrackEntry>,
    pub audio: Vec<TrackEntry>,
    pub text: Vec<TrackEntry>,
}

impl DocumentTracks {
    pub fn iter(&self) -> impl Iterator<Item = &TrackEntry> {
        self.video.iter().chain(self.audio.iter()).chain(self.text.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TrackKind,
    pub segments: Vec<SegmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentEntry {
    pub id: String,
    pub material_id: String,
    pub target_timerange: TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_timerange: Option<TimeRange>,
    pub speed: f64,
    pub volume: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip: Option<ClipEntry>,
    /// Text style name, captions only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipEntry {
    pub alpha: f64,
    pub rotation: f64,
    pub scale: Point,
    pub transform: Point,
    pub flip: Flip,
}

impl From<&ClipSettings> for ClipEntry {
    fn from(clip: &ClipSettings) -> Self {
        Self {
            alpha: clip.alpha,
            rotation: clip.rotation,
            scale: Point {
                x: clip.scale_x,
                y: clip.scale_y,
            },
            transform: Point {
                x: clip.transform_x,
                y: clip.transform_y,
            },
            flip: Flip {
                horizontal: clip.flip_h,
                vertical: clip.flip_v,
            },
        }
    }
}

impl Document {
    /// Pretty-printed JSON, the form written to disk.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Every material ID in bucket order: videos, audios, texts.
    pub fn material_ids(&self) -> Vec<&str> {
        let m = &self.materials;
        m.videos
            .iter()
            .map(|v| v.id.as_str())
            .chain(m.audios.iter().map(|a| a.id.as_str()))
            .chain(m.texts.iter().map(|t| t.id.as_str()))
            .collect()
    }

    /// Every file path referenced by a material, videos then audios.
    pub fn material_paths(&self) -> Vec<&Path> {
        let m = &self.materials;
        m.videos
            .iter()
            .map(|v| Path::new(&v.path))
            .chain(m.audios.iter().map(|a| Path::new(&a.path)))
            .collect()
    }

    /// Segment count across all tracks.
    pub fn segment_count(&self) -> usize {
        self.tracks.iter().map(|t| t.segments.len()).sum()
    }
}
