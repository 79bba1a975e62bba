//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::install::DEFAULT_DOCUMENT_FILE;
use crate::logging::{LogConfig, LogLevel};
use crate::models::{CanvasConfig, TextStyle};
use crate::timeline::{CaptionStyle, DEFAULT_CAPTION_OFFSET_Y, PARAGRAPH_SEPARATOR};
use crate::timing::MICROS_PER_MILLI;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub canvas: CanvasSettings,

    #[serde(default)]
    pub captions: CaptionSettings,

    #[serde(default)]
    pub probe: ProbeSettings,

    #[serde(default)]
    pub install: InstallSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Output and log locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root for `generate` when no `--output` is given.
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Folder for per-run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "drafts".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

/// Project canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_fps")]
    pub fps: f64,
}

fn default_width() -> u32 {
    1920
}

fn default_height() -> u32 {
    1080
}

fn default_fps() -> f64 {
    30.0
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            fps: default_fps(),
        }
    }
}

impl CanvasSettings {
    pub fn to_canvas(&self) -> CanvasConfig {
        CanvasConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

/// Caption rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionSettings {
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// `#RRGGBB`.
    #[serde(default = "default_text_color")]
    pub text_color: String,

    /// Vertical position in canvas units, negative toward the bottom.
    #[serde(default = "default_offset_y")]
    pub offset_y: f64,

    /// Joins the lines of a multi-line caption.
    #[serde(default = "default_paragraph_separator")]
    pub paragraph_separator: String,
}

fn default_font_size() -> f64 {
    TextStyle::default().font_size
}

fn default_text_color() -> String {
    TextStyle::default().text_color
}

fn default_offset_y() -> f64 {
    DEFAULT_CAPTION_OFFSET_Y
}

fn default_paragraph_separator() -> String {
    PARAGRAPH_SEPARATOR.to_string()
}

impl Default for CaptionSettings {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            text_color: default_text_color(),
            offset_y: default_offset_y(),
            paragraph_separator: default_paragraph_separator(),
        }
    }
}

impl CaptionSettings {
    pub fn to_style(&self) -> CaptionStyle {
        CaptionStyle {
            text: TextStyle {
                font_size: self.font_size,
                text_color: self.text_color.clone(),
            },
            offset_y: self.offset_y,
            paragraph_separator: self.paragraph_separator.clone(),
        }
    }
}

/// Narration duration probing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// ffprobe binary name or path.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Estimate used when probing fails. `0` disables the fallback.
    #[serde(default)]
    pub fallback_duration_ms: u64,
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
            fallback_duration_ms: 0,
        }
    }
}

impl ProbeSettings {
    /// The fallback estimate in microseconds, if enabled.
    pub fn fallback_duration(&self) -> Option<i64> {
        if self.fallback_duration_ms == 0 {
            return None;
        }
        i64::try_from(self.fallback_duration_ms)
            .ok()
            .and_then(|ms| ms.checked_mul(MICROS_PER_MILLI))
    }
}

/// Draft-store installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallSettings {
    /// Candidate draft-store roots, tried in order before
    /// `DRAFTFORGE_DRAFT_ROOTS` and the built-in list.
    #[serde(default)]
    pub draft_roots: Vec<String>,

    /// Name of the main document file inside a draft folder.
    #[serde(default = "default_document_file_name")]
    pub document_file_name: String,
}

fn default_document_file_name() -> String {
    DEFAULT_DOCUMENT_FILE.to_string()
}

impl Default for InstallSettings {
    fn default() -> Self {
        Self {
            draft_roots: Vec::new(),
            document_file_name: default_document_file_name(),
        }
    }
}

impl InstallSettings {
    pub fn draft_roots(&self) -> Vec<PathBuf> {
        self.draft_roots.iter().map(PathBuf::from).collect()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,

    /// Prefix run-log lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            show_timestamps: true,
        }
    }
}

impl LoggingSettings {
    /// Parsed level; unknown names fall back to `info`.
    pub fn log_level(&self) -> LogLevel {
        self.level.parse().unwrap_or_default()
    }

    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level(),
            show_timestamps: self.show_timestamps,
        }
    }
}

/// Config sections for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Canvas,
    Captions,
    Probe,
    Install,
    Logging,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 6] = [
        ConfigSection::Paths,
        ConfigSection::Canvas,
        ConfigSection::Captions,
        ConfigSection::Probe,
        ConfigSection::Install,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Canvas => "canvas",
            ConfigSection::Captions => "captions",
            ConfigSection::Probe => "probe",
            ConfigSection::Install => "install",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output and log directories",
            ConfigSection::Canvas => "Project canvas",
            ConfigSection::Captions => "Caption appearance",
            ConfigSection::Probe => "Audio duration probing",
            ConfigSection::Install => "Editor draft store",
            ConfigSection::Logging => "Logging configuration",
        }
    }
}
