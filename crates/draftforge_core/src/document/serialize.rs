//! Project to document conversion, with a reference check first.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{new_id, MaterialKind, Project, Segment, Track, TrackKind};

use super::schema::{
    AudioMaterialEntry, CanvasSpec, ClipEntry, Document, DocumentMaterials, DocumentTracks,
    SegmentEntry, TextMaterialEntry, TrackEntry, VideoMaterialEntry, DOCUMENT_VERSION,
    PHOTO_MATERIAL_DURATION,
};

/// A project whose internal references do not hold.
///
/// The timeline builder never produces these; seeing one means a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Segment {segment_id} references missing {kind} material {material_id}")]
    MissingMaterial {
        segment_id: String,
        material_id: String,
        kind: MaterialKind,
    },

    #[error("Segment ID {0} is used more than once")]
    DuplicateSegment(String),

    #[error("Track {track_id} ({track}) holds a {segment} segment")]
    TrackKindMismatch {
        track_id: String,
        track: TrackKind,
        segment: TrackKind,
    },

    #[error("Project duration {project}us does not match narration duration {narration}us")]
    DurationMismatch { project: i64, narration: i64 },
}

/// Check every segment's material reference, segment ID uniqueness, track
/// kinds and the project duration.
pub fn validate_references(project: &Project) -> Result<(), IntegrityError> {
    let mut seen = HashSet::new();

    for track in project.tracks.iter() {
        for segment in track.segments() {
            if segment.track_kind() != track.kind {
                return Err(IntegrityError::TrackKindMismatch {
                    track_id: track.id.clone(),
                    track: track.kind,
                    segment: segment.track_kind(),
                });
            }
            if !seen.insert(segment.id()) {
                return Err(IntegrityError::DuplicateSegment(segment.id().to_string()));
            }
            let kind = segment.material_kind();
            if !project.materials.contains(kind, segment.material_id()) {
                return Err(IntegrityError::MissingMaterial {
                    segment_id: segment.id().to_string(),
                    material_id: segment.material_id().to_string(),
                    kind,
                });
            }
        }
    }

    if let Some(narration) = project.narration_segment() {
        let narration = narration.target_range().duration;
        if narration != project.total_duration {
            return Err(IntegrityError::DurationMismatch {
                project: project.total_duration,
                narration,
            });
        }
    }

    Ok(())
}

/// Render `project` to the editor's document shape.
///
/// The document gets a fresh ID and an empty name; callers set the name.
pub fn serialize(project: &Project) -> Result<Document, IntegrityError> {
    validate_references(project)?;

    let m = &project.materials;
    let materials = DocumentMaterials {
        videos: m
            .photos
            .iter()
            .map(|p| VideoMaterialEntry {
                id: p.id.clone(),
                kind: "photo".to_string(),
                path: p.absolute_path.to_string_lossy().to_string(),
                material_name: p.display_name.clone(),
                duration: PHOTO_MATERIAL_DURATION,
            })
            .collect(),
        audios: m
            .audios
            .iter()
            .map(|a| AudioMaterialEntry {
                id: a.id.clone(),
                kind: "extract_music".to_string(),
                path: a.absolute_path.to_string_lossy().to_string(),
                name: a.display_name.clone(),
                duration: a.duration,
            })
            .collect(),
        texts: m
            .texts
            .iter()
            .map(|t| TextMaterialEntry {
                id: t.id.clone(),
                kind: "subtitle".to_string(),
                content: t.rich_content.clone(),
                font_size: t.style_defaults.font_size,
                text_color: t.style_defaults.text_color.clone(),
            })
            .collect(),
    };

    let tracks = DocumentTracks {
        video: project.tracks.video.iter().map(track_entry).collect(),
        audio: project.tracks.audio.iter().map(track_entry).collect(),
        text: project.tracks.text.iter().map(track_entry).collect(),
    };

    let document = Document {
        id: new_id(),
        name: String::new(),
        version: DOCUMENT_VERSION,
        canvas_config: CanvasSpec {
            width: project.canvas.width,
            height: project.canvas.height,
            ratio: "original".to_string(),
        },
        fps: project.canvas.fps,
        duration: project.total_duration,
        materials,
        tracks,
    };

    tracing::debug!(
        "Serialized document {}: {} material(s), {} segment(s)",
        document.id,
        document.material_ids().len(),
        document.segment_count()
    );

    Ok(document)
}

fn track_entry(track: &Track) -> TrackEntry {
    TrackEntry {
        id: track.id.clone(),
        kind: track.kind,
        segments: track.segments().iter().map(segment_entry).collect(),
    }
}

fn segment_entry(segment: &Segment) -> SegmentEntry {
    match segment {
        Segment::Video(s) => SegmentEntry {
            id: s.id.clone(),
            material_id: s.material_id.clone(),
            target_timerange: s.target_range,
            source_timerange: Some(s.source_range),
            speed: s.speed,
            volume: s.volume,
            clip: Some(ClipEntry::from(&s.clip_settings)),
            style: None,
            visible: true,
        },
        Segment::Audio(s) => SegmentEntry {
            id: s.id.clone(),
            material_id: s.material_id.clone(),
            target_timerange: s.target_range,
            source_timerange: s.source_range,
            speed: s.speed,
            volume: s.volume,
            clip: None,
            style: None,
            visible: true,
        },
        Segment::Text(s) => SegmentEntry {
            id: s.id.clone(),
            material_id: s.material_id.clone(),
            target_timerange: s.target_range,
            source_timerange: None,
            speed: 1.0,
            volume: 1.0,
            clip: Some(ClipEntry::from(&s.clip_settings)),
            style: Some(s.style.clone()),
            visible: true,
        },
    }
}
