//! Duration via `ffprobe -show_entries format=duration`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::{DurationProbe, ProbeError, ProbeResult};
use crate::timing::secs_to_micros;

const TOOL: &str = "ffprobe";

/// Runs ffprobe and reads the container duration.
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl FfprobeProbe {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self::new(TOOL)
    }
}

impl DurationProbe for FfprobeProbe {
    fn name(&self) -> &str {
        TOOL
    }

    fn probe(&self, path: &Path) -> ProbeResult<i64> {
        if !path.exists() {
            return Err(ProbeError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-v", "error", "-show_entries", "format=duration", "-of", "json"])
            .arg(path);

        tracing::debug!("Running ffprobe: {:?}", cmd);

        let output = cmd.output().map_err(|e| ProbeError::ToolUnavailable {
            tool: TOOL.to_string(),
            message: format!("{}: {}", self.binary.display(), e),
        })?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                tool: TOOL.to_string(),
                exit_code: output.status.code().unwrap_or(-1),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        parse_duration_json(&output.stdout)
    }
}

/// Extract `format.duration` (seconds, as a string) and convert to
/// microseconds.
fn parse_duration_json(stdout: &[u8]) -> ProbeResult<i64> {
    let parse_error = |message: String| ProbeError::ParseError {
        tool: TOOL.to_string(),
        message,
    };

    let json: Value = serde_json::from_slice(stdout).map_err(|e| parse_error(e.to_string()))?;

    let duration = json
        .get("format")
        .and_then(|f| f.get("duration"))
        .ok_or_else(|| parse_error("missing format.duration".to_string()))?;

    // ffprobe prints the duration as a string; accept a number too.
    let secs = match duration {
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| parse_error(format!("bad duration '{}'", s)))?,
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| parse_error(format!("bad duration {}", n)))?,
        other => return Err(parse_error(format!("bad duration {}", other))),
    };

    if !secs.is_finite() {
        return Err(parse_error(format!("non-finite duration {}", secs)));
    }

    Ok(secs_to_micros(secs))
}
