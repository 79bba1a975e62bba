//! Subtitle error types.

use std::path::PathBuf;

/// Errors that can occur while loading a caption file.
#[derive(Debug, thiserror::Error)]
pub enum SubtitleError {
    /// Failed to read subtitle file.
    #[error("Failed to read file '{}': {source}", path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File is not valid UTF-8.
    #[error("File '{}' is not valid UTF-8", .0.display())]
    Encoding(PathBuf),
}

/// Why a single caption block was rejected.
///
/// These never abort a parse; the block is skipped and reported.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Index line is missing or not a number.
    #[error("Invalid index at line {line}: '{value}'")]
    InvalidIndex { line: usize, value: String },

    /// Invalid or malformed time format.
    #[error("Invalid time format at line {line}: '{value}'")]
    InvalidTime { line: usize, value: String },

    /// End timestamp earlier than the start.
    #[error("End before start at line {line}")]
    EndBeforeStart { line: usize },

    /// Block has timing but no text.
    #[error("No text at line {line}")]
    MissingText { line: usize },
}

impl SubtitleError {
    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }
}

impl ParseError {
    /// Create an invalid index error.
    pub fn invalid_index(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidIndex {
            line,
            value: value.into(),
        }
    }

    /// Create an invalid time error.
    pub fn invalid_time(line: usize, value: impl Into<String>) -> Self {
        Self::InvalidTime {
            line,
            value: value.into(),
        }
    }

    /// Line number the problem was found on (1-based).
    pub fn line(&self) -> usize {
        match self {
            Self::InvalidIndex { line, .. }
            | Self::InvalidTime { line, .. }
            | Self::EndBeforeStart { line }
            | Self::MissingText { line } => *line,
        }
    }
}
