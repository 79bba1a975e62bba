//! Draftforge Core - draft assembly for CapCut / JianYing
//!
//! Turns a folder holding one narration track, a set of scene images and an
//! optional SRT file into an editor draft: scenes split the narration evenly,
//! captions follow their SRT timing, and the result is installed as a project
//! folder the editor can open. No UI dependencies.

pub mod config;
pub mod document;
pub mod install;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod probe;
pub mod scan;
pub mod subtitles;
pub mod timeline;
pub mod timing;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
