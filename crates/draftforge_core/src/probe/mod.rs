//! Narration duration probing.
//!
//! A [`DurationProbe`] reports the playable length of an audio file in
//! microseconds. Two implementations are provided:
//!
//! - [`WavHeaderProbe`] reads the RIFF header directly (WAV only, no tools).
//! - [`FfprobeProbe`] asks `ffprobe` for the container duration.
//!
//! [`ChainProbe`] tries several probes in order; [`default_probe`] builds the
//! standard chain (WAV header first, then ffprobe).

mod ffprobe;
mod wav;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use ffprobe::FfprobeProbe;
pub use wav::WavHeaderProbe;

/// Errors from probing a media file's duration.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} could not be started: {message}")]
    ToolUnavailable { tool: String, message: String },

    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    #[error("'{}' is not supported by the {probe} probe", path.display())]
    Unsupported { probe: String, path: PathBuf },

    #[error("Invalid WAV header in '{}': {message}", path.display())]
    InvalidHeader { path: PathBuf, message: String },

    #[error("No probe could determine the duration of '{}': {}", path.display(), attempts.join("; "))]
    Exhausted { path: PathBuf, attempts: Vec<String> },
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Something that can measure an audio file's duration.
pub trait DurationProbe: Send + Sync {
    /// Probe name for logging.
    fn name(&self) -> &str;

    /// Duration of `path` in microseconds.
    fn probe(&self, path: &Path) -> ProbeResult<i64>;
}

/// Tries each probe in turn and returns the first success.
pub struct ChainProbe {
    probes: Vec<Box<dyn DurationProbe>>,
}

impl ChainProbe {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    /// Add a probe (builder pattern).
    pub fn with<P: DurationProbe + 'static>(mut self, probe: P) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }
}

impl Default for ChainProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationProbe for ChainProbe {
    fn name(&self) -> &str {
        "chain"
    }

    fn probe(&self, path: &Path) -> ProbeResult<i64> {
        let mut attempts = Vec::new();
        for probe in &self.probes {
            match probe.probe(path) {
                Ok(duration) => {
                    tracing::debug!(
                        "{} probe: {} is {}us",
                        probe.name(),
                        path.display(),
                        duration
                    );
                    return Ok(duration);
                }
                Err(e) => {
                    tracing::debug!("{} probe failed: {}", probe.name(), e);
                    attempts.push(format!("{}: {}", probe.name(), e));
                }
            }
        }
        Err(ProbeError::Exhausted {
            path: path.to_path_buf(),
            attempts,
        })
    }
}

/// Probe that always returns the same duration. Useful when the caller
/// already knows the length.
pub struct FixedProbe(pub i64);

impl DurationProbe for FixedProbe {
    fn name(&self) -> &str {
        "fixed"
    }

    fn probe(&self, _path: &Path) -> ProbeResult<i64> {
        Ok(self.0)
    }
}

/// WAV header first, then `ffprobe` at `ffprobe_path`.
pub fn default_probe(ffprobe_path: impl Into<PathBuf>) -> ChainProbe {
    ChainProbe::new()
        .with(WavHeaderProbe)
        .with(FfprobeProbe::new(ffprobe_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProbe;

    impl DurationProbe for FailingProbe {
        fn name(&self) -> &str {
            "failing"
        }

        fn probe(&self, path: &Path) -> ProbeResult<i64> {
            Err(ProbeError::Unsupported {
                probe: "failing".to_string(),
                path: path.to_path_buf(),
            })
        }
    }

    #[test]
    fn chain_returns_first_success() {
        let chain = ChainProbe::new().with(FailingProbe).with(FixedProbe(42));
        assert_eq!(chain.probe(Path::new("x.mp3")).unwrap(), 42);
    }

    #[test]
    fn chain_reports_all_attempts() {
        let chain = ChainProbe::new().with(FailingProbe).with(FailingProbe);
        let err = chain.probe(Path::new("x.mp3")).unwrap_err();
        match err {
            ProbeError::Exhausted { attempts, .. } => assert_eq!(attempts.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_chain_is_exhausted() {
        let chain = ChainProbe::default();
        assert!(chain.is_empty());
        assert!(matches!(
            chain.probe(Path::new("x.wav")),
            Err(ProbeError::Exhausted { .. })
        ));
    }
}
