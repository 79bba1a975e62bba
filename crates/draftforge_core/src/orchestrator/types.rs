//! Core types for the generation pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::document::Document;
use crate::install::{DraftStoreLocator, InstallReport};
use crate::logging::RunLogger;
use crate::models::Project;
use crate::probe::{default_probe, DurationProbe};
use crate::scan::ScannedAssets;
use crate::subtitles::SrtEntry;
use crate::timeline::DurationSource;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Where the finished draft goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallTarget {
    /// A plain directory; created if missing.
    OutputDir(PathBuf),
    /// The editor's draft store, found by the locator.
    DraftStore(DraftStoreLocator),
}

/// What to generate.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub input_dir: PathBuf,
    pub target: InstallTarget,
    /// Project folder name. A fresh ID is used when absent.
    pub name: Option<String>,
    /// Narration length in microseconds, used when probing fails.
    /// Overrides the configured fallback.
    pub duration_estimate: Option<i64>,
}

impl GenerateRequest {
    pub fn new(input_dir: impl Into<PathBuf>, target: InstallTarget) -> Self {
        Self {
            input_dir: input_dir.into(),
            target,
            name: None,
            duration_estimate: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_duration_estimate(mut self, micros: i64) -> Self {
        self.duration_estimate = Some(micros);
        self
    }

    /// Name used for logs: the project name, else the input folder name.
    pub fn job_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.input_dir
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "draft".to_string())
        })
    }
}

/// Read-only context passed to pipeline steps.
///
/// Mutable state goes in `JobState`.
pub struct Context {
    pub request: GenerateRequest,
    pub settings: Settings,
    pub job_name: String,
    pub logger: Arc<RunLogger>,
    probe: Box<dyn DurationProbe>,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    /// Create a context that probes with the configured ffprobe.
    pub fn new(
        request: GenerateRequest,
        settings: Settings,
        job_name: impl Into<String>,
        logger: Arc<RunLogger>,
    ) -> Self {
        let probe = Box::new(default_probe(&settings.probe.ffprobe_path));
        Self {
            request,
            settings,
            job_name: job_name.into(),
            logger,
            probe,
            progress_callback: None,
        }
    }

    /// Replace the duration probe.
    pub fn with_probe(mut self, probe: Box<dyn DurationProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn probe(&self) -> &dyn DurationProbe {
        self.probe.as_ref()
    }

    pub fn input_dir(&self) -> &Path {
        &self.request.input_dir
    }

    /// The request's estimate, else the configured fallback.
    pub fn fallback_duration(&self) -> Option<i64> {
        self.request
            .duration_estimate
            .or_else(|| self.settings.probe.fallback_duration())
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }
}

/// State that accumulates results from pipeline steps.
///
/// Each step writes its own section once.
#[derive(Debug, Default)]
pub struct JobState {
    pub job_id: String,
    /// RFC 3339 start time.
    pub started_at: Option<String>,
    pub scan: Option<ScannedAssets>,
    pub captions: Option<CaptionsOutput>,
    pub timeline: Option<TimelineOutput>,
    pub document: Option<Document>,
    pub install: Option<InstallReport>,
}

impl JobState {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    pub fn has_scan(&self) -> bool {
        self.scan.is_some()
    }

    /// Parsed caption entries, if a caption file was used.
    pub fn caption_entries(&self) -> Option<&[SrtEntry]> {
        self.captions.as_ref().map(|c| c.entries.as_slice())
    }
}

/// Output from the Captions step.
#[derive(Debug, Clone)]
pub struct CaptionsOutput {
    pub source: PathBuf,
    pub entries: Vec<SrtEntry>,
    /// Malformed blocks that were dropped.
    pub skipped: usize,
}

/// Output from the Timeline step.
#[derive(Debug, Clone)]
pub struct TimelineOutput {
    pub project: Project,
    pub duration_source: DurationSource,
    pub scene_count: usize,
    pub caption_count: usize,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Nothing to do; not an error.
    Skipped(String),
}
