//! Data model for an editor draft.
//!
//! Materials live in per-kind arenas on the [`Project`]; segments on tracks
//! reference them by opaque ID only. Both are closed enums so every consumer
//! matches all variants.

mod ids;
mod material;
mod project;
mod segment;
mod track;

pub use ids::new_id;
pub use material::{
    AudioMaterial, Identified, Material, MaterialBucket, MaterialKind, Materials, PhotoMaterial,
    TextMaterial, TextStyle,
};
pub use project::{CanvasConfig, Project, Tracks};
pub use segment::{AudioSegment, ClipSettings, Segment, TextSegment, VideoSegment};
pub use track::{Track, TrackError, TrackKind};
