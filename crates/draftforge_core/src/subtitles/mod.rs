//! Caption loading.
//!
//! Reads SRT files into [`SrtEntry`] values with microsecond timing. Parsing
//! is lenient per entry: a malformed block is skipped and reported rather than
//! failing the file.
//!
//! # Usage
//!
//! ```ignore
//! use draftforge_core::subtitles::parse_file;
//!
//! let report = parse_file("captions.srt")?;
//! for entry in &report.entries {
//!     println!("{} -> {}: {}", entry.start, entry.end, entry.text);
//! }
//! ```

mod error;
mod srt;
mod types;

use std::fs;
use std::path::Path;

pub use error::{ParseError, SubtitleError};
pub use srt::{parse_srt, parse_srt_time};
pub use types::{ParseReport, SrtEntry, LINE_BREAK};

/// Parse a caption file from disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ParseReport, SubtitleError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| SubtitleError::read(path, e))?;
    let content =
        String::from_utf8(bytes).map_err(|_| SubtitleError::Encoding(path.to_path_buf()))?;

    let report = parse_srt(&content);
    tracing::debug!(
        "Parsed {} caption entries from {}",
        report.entries.len(),
        path.display()
    );
    Ok(report)
}
