//! Caption types.
//!
//! Timing is in whole microseconds to match the timeline.

use crate::timing::TimeRange;

use super::error::ParseError;

/// Marker joining the lines of a multi-line caption.
pub const LINE_BREAK: &str = "\n";

/// One caption entry from an SRT file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrtEntry {
    /// Index line value as written in the file.
    pub sequence_number: u32,
    /// Start time in microseconds.
    pub start: i64,
    /// End time in microseconds.
    pub end: i64,
    /// Text lines joined with [`LINE_BREAK`].
    pub text: String,
}

impl SrtEntry {
    /// Timeline span `[start, end)`.
    pub fn range(&self) -> TimeRange {
        TimeRange::from_bounds(self.start, self.end)
    }

    /// Individual text lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split(LINE_BREAK)
    }
}

/// Result of parsing a caption file: the good entries plus what was skipped.
#[derive(Debug, Clone, Default)]
pub struct ParseReport {
    pub entries: Vec<SrtEntry>,
    pub skipped: Vec<ParseError>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}
