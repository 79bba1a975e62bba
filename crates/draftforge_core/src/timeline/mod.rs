//! Timeline assembly.
//!
//! Turns a narration file, an ordered list of scene images and optional
//! captions into a populated [`Project`](crate::models::Project):
//!
//! - the narration length `D` is split evenly across the images, the last
//!   scene absorbing the division remainder so the video track ends at `D`;
//! - the narration plays once over `[0, D)`;
//! - each caption becomes a text segment at its own time, clamped to `D`.

mod builder;
mod error;

pub use builder::{
    build, AudioAsset, CaptionStyle, DurationSource, ImageAsset, TimelineBuilder,
    DEFAULT_CAPTION_OFFSET_Y, PARAGRAPH_SEPARATOR,
};
pub use error::TimelineError;
