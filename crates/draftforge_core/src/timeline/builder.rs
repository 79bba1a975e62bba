//! Scene partitioning and project construction.

use std::path::{Path, PathBuf};

use crate::models::{
    AudioMaterial, AudioSegment, CanvasConfig, Material, PhotoMaterial, Project, Segment,
    TextMaterial, TextSegment, TextStyle, Track, TrackKind, VideoSegment,
};
use crate::probe::{DurationProbe, ProbeError};
use crate::subtitles::SrtEntry;
use crate::timing::{micros_to_secs, partition_evenly};

use super::error::TimelineError;

/// Vertical caption position: near the bottom of the canvas.
pub const DEFAULT_CAPTION_OFFSET_Y: f64 = -0.8;

/// Paragraph separator the editor uses inside a single text material.
pub const PARAGRAPH_SEPARATOR: &str = "\u{2029}";

/// Where the narration duration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationSource {
    Probed,
    /// Probing failed; the caller's estimate was used.
    Fallback,
}

/// The narration file with a known duration.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioAsset {
    pub path: PathBuf,
    /// Microseconds.
    pub duration: i64,
    pub source: DurationSource,
}

impl AudioAsset {
    /// Audio with an already known duration.
    pub fn with_duration(path: impl Into<PathBuf>, duration: i64) -> Self {
        Self {
            path: path.into(),
            duration,
            source: DurationSource::Probed,
        }
    }

    /// Measure `path` with `probe`, falling back to `fallback` (microseconds)
    /// when probing fails or reports a non-positive length.
    pub fn resolve(
        path: &Path,
        probe: &dyn DurationProbe,
        fallback: Option<i64>,
    ) -> Result<Self, TimelineError> {
        let probed = probe.probe(path).and_then(|d| {
            if d > 0 {
                Ok(d)
            } else {
                Err(ProbeError::InvalidHeader {
                    path: path.to_path_buf(),
                    message: format!("probe reported {}us", d),
                })
            }
        });

        match (probed, fallback) {
            (Ok(duration), _) => {
                tracing::info!(
                    "Audio duration: {:.3}s ({})",
                    micros_to_secs(duration),
                    path.display()
                );
                Ok(Self {
                    path: path.to_path_buf(),
                    duration,
                    source: DurationSource::Probed,
                })
            }
            (Err(e), Some(estimate)) => {
                tracing::warn!(
                    "Duration probe failed for {} ({}); using fallback estimate {:.3}s",
                    path.display(),
                    e,
                    micros_to_secs(estimate)
                );
                Ok(Self {
                    path: path.to_path_buf(),
                    duration: estimate,
                    source: DurationSource::Fallback,
                })
            }
            (Err(source), None) => Err(TimelineError::DurationUnavailable {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// A scene image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub path: PathBuf,
}

impl ImageAsset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl From<PathBuf> for ImageAsset {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

/// How captions are rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionStyle {
    pub text: TextStyle,
    /// Canvas-normalised vertical offset; negative is toward the bottom.
    pub offset_y: f64,
    pub paragraph_separator: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            text: TextStyle::default(),
            offset_y: DEFAULT_CAPTION_OFFSET_Y,
            paragraph_separator: PARAGRAPH_SEPARATOR.to_string(),
        }
    }
}

/// Builds a [`Project`] from resolved assets.
#[derive(Debug, Clone, Default)]
pub struct TimelineBuilder {
    canvas: CanvasConfig,
    captions: CaptionStyle,
}

impl TimelineBuilder {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas,
            captions: CaptionStyle::default(),
        }
    }

    /// Set the caption style (builder pattern).
    pub fn with_caption_style(mut self, style: CaptionStyle) -> Self {
        self.captions = style;
        self
    }

    pub fn build(
        &self,
        audio: &AudioAsset,
        images: &[ImageAsset],
        captions: Option<&[SrtEntry]>,
    ) -> Result<Project, TimelineError> {
        if images.is_empty() {
            return Err(TimelineError::InsufficientAssets);
        }

        let total = audio.duration;
        if total <= 0 {
            return Err(TimelineError::invalid_duration(total, "must be positive"));
        }
        if total < images.len() as i64 {
            return Err(TimelineError::invalid_duration(
                total,
                format!("too short for {} scenes", images.len()),
            ));
        }

        let mut project = Project::new(self.canvas);

        // Scenes
        let mut video = Track::new(TrackKind::Video);
        for (image, range) in images.iter().zip(partition_evenly(total, images.len())) {
            let id = project
                .materials
                .insert(Material::Photo(PhotoMaterial::new(&image.path)));
            video.push(Segment::Video(VideoSegment::still(id, range)))?;
        }
        project.tracks.video.push(video);

        // Narration
        let mut narration = Track::new(TrackKind::Audio);
        let id = project
            .materials
            .insert(Material::Audio(AudioMaterial::new(&audio.path, total)));
        narration.push(Segment::Audio(AudioSegment::full(id, total)))?;
        project.tracks.audio.push(narration);

        // Captions
        if let Some(entries) = captions {
            let text = self.caption_track(&mut project, entries, total)?;
            if !text.is_empty() {
                project.tracks.text.push(text);
            }
        }

        project.total_duration = total;

        tracing::info!(
            "Built timeline: {} scene(s) of ~{:.3}s, {} caption(s), total {:.3}s",
            images.len(),
            micros_to_secs(total / images.len() as i64),
            project.materials.texts.len(),
            micros_to_secs(total)
        );

        Ok(project)
    }

    fn caption_track(
        &self,
        project: &mut Project,
        entries: &[SrtEntry],
        total: i64,
    ) -> Result<Track, TimelineError> {
        let mut track = Track::new(TrackKind::Text);

        for entry in entries {
            let Some(range) = entry.range().clamp_to(total) else {
                tracing::warn!(
                    "Dropping caption #{} at {:.3}s: outside the {:.3}s narration",
                    entry.sequence_number,
                    micros_to_secs(entry.start),
                    micros_to_secs(total)
                );
                continue;
            };
            if range != entry.range() {
                tracing::debug!(
                    "Caption #{} clamped to [{}, {})",
                    entry.sequence_number,
                    range.start,
                    range.end()
                );
            }

            let material = TextMaterial::new(
                &entry.text,
                &self.captions.text,
                &self.captions.paragraph_separator,
            );
            let id = project.materials.insert(Material::Text(material));
            track.push(Segment::Text(TextSegment::caption(
                id,
                range,
                self.captions.offset_y,
            )))?;
        }

        Ok(track)
    }
}

/// Build a project with the default caption style.
pub fn build(
    audio: &AudioAsset,
    images: &[ImageAsset],
    captions: Option<&[SrtEntry]>,
    canvas: CanvasConfig,
) -> Result<Project, TimelineError> {
    TimelineBuilder::new(canvas).build(audio, images, captions)
}
