//! The assembled project.

use serde::{Deserialize, Serialize};

use super::material::Materials;
use super::segment::Segment;
use super::track::Track;

/// Canvas dimensions and frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
        }
    }
}

/// Tracks bucketed by kind.
#[derive(Debug, Clone, Default)]
pub struct Tracks {
    pub video: Vec<Track>,
    pub audio: Vec<Track>,
    pub text: Vec<Track>,
}

impl Tracks {
    /// Every track, video then audio then text.
    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.video.iter().chain(self.audio.iter()).chain(self.text.iter())
    }
}

#[derive(Debug, Clone)]
pub struct Project {
    pub canvas: CanvasConfig,
    /// Microseconds. Equal to the narration segment's duration.
    pub total_duration: i64,
    pub materials: Materials,
    pub tracks: Tracks,
}

impl Project {
    pub fn new(canvas: CanvasConfig) -> Self {
        Self {
            canvas,
            total_duration: 0,
            materials: Materials::default(),
            tracks: Tracks::default(),
        }
    }

    /// The single narration segment, if the audio track has been built.
    pub fn narration_segment(&self) -> Option<&Segment> {
        self.tracks.audio.first()?.segments().first()
    }

    /// Every segment across all tracks.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.tracks.iter().flat_map(|t| t.segments().iter())
    }
}
