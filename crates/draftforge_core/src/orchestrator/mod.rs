//! Pipeline orchestrator for draft generation.
//!
//! Each run is a fixed sequence of steps over a read-only [`Context`] and a
//! mutable [`JobState`]:
//!
//! ```text
//! Pipeline
//!     ├── Step: Scan
//!     ├── Step: Captions
//!     ├── Step: Timeline
//!     ├── Step: Serialize
//!     └── Step: Install
//! ```
//!
//! Only `Install` writes outside the run log, so any error before it leaves
//! nothing behind.
//!
//! # Example
//!
//! ```no_run
//! use draftforge_core::config::Settings;
//! use draftforge_core::orchestrator::generate_into;
//!
//! let outcome = generate_into("episode_1/", "drafts/", Some("Episode 1"), &Settings::default())?;
//! for warning in &outcome.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! # Ok::<(), draftforge_core::orchestrator::PipelineError>(())
//! ```

mod errors;
mod pipeline;
mod step;
pub mod steps;
mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::config::Settings;
use crate::document::Document;
use crate::install::DraftStoreLocator;
use crate::logging::{LogCallback, RunLogger};
use crate::models::new_id;
use crate::probe::DurationProbe;
use crate::timeline::DurationSource;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{CaptionsStep, InstallStep, ScanStep, SerializeStep, TimelineStep};
pub use types::{
    CaptionsOutput, Context, GenerateRequest, InstallTarget, JobState, ProgressCallback,
    StepOutcome, TimelineOutput,
};

/// Create the standard pipeline with all steps in order.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ScanStep::new())
        .with_step(CaptionsStep::new())
        .with_step(TimelineStep::new())
        .with_step(SerializeStep::new())
        .with_step(InstallStep::new())
}

/// A written draft.
///
/// Non-empty `warnings` mean the folder exists but may need manual repair
/// or lost some input.
#[derive(Debug)]
pub struct GenerateOutcome {
    pub project_dir: PathBuf,
    pub document_path: PathBuf,
    /// The document as written, with relocated paths.
    pub document: Document,
    pub duration_source: DurationSource,
    pub scene_count: usize,
    pub caption_count: usize,
    pub warnings: Vec<String>,
    pub log_path: PathBuf,
    pub steps: PipelineRunResult,
}

impl GenerateOutcome {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    fn from_state(
        state: JobState,
        steps: PipelineRunResult,
        log_path: PathBuf,
    ) -> Result<Self, StepError> {
        let (Some(timeline), Some(report)) = (state.timeline, state.install) else {
            return Err(StepError::invalid_output(
                "Pipeline finished without installing a draft",
            ));
        };

        let mut warnings = Vec::new();
        if let Some(scan) = &state.scan {
            warnings.extend(
                scan.ignored
                    .iter()
                    .map(|p| format!("Ignored extra input file {}", p.display())),
            );
        }
        if let Some(captions) = state.captions.as_ref().filter(|c| c.skipped > 0) {
            warnings.push(format!(
                "{} malformed caption block(s) skipped in {}",
                captions.skipped,
                captions.source.display()
            ));
        }
        if timeline.duration_source == DurationSource::Fallback {
            warnings.push("Narration length is an estimate; probing failed".to_string());
        }
        warnings.extend(report.warnings.iter().map(ToString::to_string));

        Ok(Self {
            project_dir: report.project_dir,
            document_path: report.document_path,
            document: report.document,
            duration_source: timeline.duration_source,
            scene_count: timeline.scene_count,
            caption_count: timeline.caption_count,
            warnings,
            log_path,
            steps,
        })
    }
}

/// Runs the standard pipeline once per request.
///
/// Holds the collaborators a front end may swap: the duration probe, the
/// run-log callback and a progress callback.
pub struct Generator {
    settings: Settings,
    pipeline: Pipeline,
    probe: Option<Box<dyn DurationProbe>>,
    log_callback: Option<LogCallback>,
    progress_callback: Option<ProgressCallback>,
}

impl Generator {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            pipeline: create_standard_pipeline(),
            probe: None,
            log_callback: None,
            progress_callback: None,
        }
    }

    /// Use `probe` instead of the configured WAV/ffprobe chain.
    pub fn with_probe(mut self, probe: Box<dyn DurationProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_log_callback(mut self, callback: LogCallback) -> Self {
        self.log_callback = Some(callback);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.pipeline.cancel_handle()
    }

    /// Run the pipeline for `request`.
    ///
    /// `Err` means nothing was written outside the run log.
    pub fn run(self, request: GenerateRequest) -> PipelineResult<GenerateOutcome> {
        let job_name = request.job_name();
        let run_name = format!("{}_{}", job_name, Local::now().format("%Y%m%d_%H%M%S"));

        let logger = RunLogger::new(
            run_name,
            &self.settings.paths.logs_folder,
            self.settings.logging.to_log_config(),
            self.log_callback,
        )
        .map_err(|e| {
            PipelineError::setup_failed(&job_name, format!("cannot create run log: {}", e))
        })?;
        let logger = Arc::new(logger);
        let log_path = logger.log_path().to_path_buf();

        logger.section(&format!("Generating draft '{}'", job_name));
        logger.info(&format!("Input: {}", request.input_dir.display()));

        let mut ctx = Context::new(request, self.settings, &job_name, Arc::clone(&logger));
        if let Some(probe) = self.probe {
            ctx = ctx.with_probe(probe);
        }
        if let Some(callback) = self.progress_callback {
            ctx = ctx.with_progress_callback(callback);
        }

        let mut state = JobState::new(new_id());
        let result = self.pipeline.run(&ctx, &mut state);
        if let Err(e) = &result {
            logger.error(&e.to_string());
        }
        logger.flush();
        let steps = result?;

        GenerateOutcome::from_state(state, steps, log_path)
            .map_err(|e| PipelineError::step_failed(&job_name, "Install", e))
    }
}

/// Run one generation with the configured probe.
pub fn run_generation(
    request: GenerateRequest,
    settings: &Settings,
) -> PipelineResult<GenerateOutcome> {
    Generator::new(settings.clone()).run(request)
}

/// Generate under the configured `[paths] output_folder` with a fresh ID.
pub fn generate(
    input_dir: impl AsRef<Path>,
    settings: &Settings,
) -> PipelineResult<GenerateOutcome> {
    let target = InstallTarget::OutputDir(PathBuf::from(&settings.paths.output_folder));
    run_generation(GenerateRequest::new(input_dir.as_ref(), target), settings)
}

/// Generate under `output_dir`, optionally as a named project.
pub fn generate_into(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    name: Option<&str>,
    settings: &Settings,
) -> PipelineResult<GenerateOutcome> {
    let target = InstallTarget::OutputDir(output_dir.as_ref().to_path_buf());
    let mut request = GenerateRequest::new(input_dir.as_ref(), target);
    request.name = name.map(str::to_string);
    run_generation(request, settings)
}

/// Generate straight into the editor's draft store.
///
/// Candidates come from `[install] draft_roots`, then `DRAFTFORGE_DRAFT_ROOTS`,
/// then the built-in per-platform list.
pub fn generate_and_import(
    input_dir: impl AsRef<Path>,
    name: Option<&str>,
    settings: &Settings,
) -> PipelineResult<GenerateOutcome> {
    let locator = DraftStoreLocator::from_env(&settings.install.draft_roots());
    let mut request = GenerateRequest::new(input_dir.as_ref(), InstallTarget::DraftStore(locator));
    request.name = name.map(str::to_string);
    run_generation(request, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::install::DEFAULT_DOCUMENT_FILE;
    use crate::probe::FixedProbe;
    use crate::scan::ScanError;
    use super::steps::test_support::{Fixture, TWO_CAPTIONS};

    fn settings_for(fixture: &Fixture) -> Settings {
        let mut settings = Settings::default();
        settings.paths.logs_folder = fixture.logs().to_string_lossy().to_string();
        settings.paths.output_folder = fixture.output().to_string_lossy().to_string();
        settings
    }

    fn request(fixture: &Fixture) -> GenerateRequest {
        GenerateRequest::new(fixture.input(), InstallTarget::OutputDir(fixture.output()))
    }

    #[test]
    fn standard_pipeline_order() {
        let pipeline = create_standard_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["Scan", "Captions", "Timeline", "Serialize", "Install"]
        );
    }

    #[test]
    fn generates_clean_draft() {
        let fixture = Fixture::new(Some(TWO_CAPTIONS));
        let outcome = Generator::new(settings_for(&fixture))
            .with_probe(Box::new(FixedProbe(9_000_001)))
            .run(request(&fixture).with_name("ep1"))
            .unwrap();

        assert!(outcome.is_clean(), "{:?}", outcome.warnings);
        assert_eq!(outcome.project_dir, fixture.output().join("ep1"));
        assert!(outcome.document_path.ends_with(DEFAULT_DOCUMENT_FILE));
        assert_eq!(outcome.document.duration, 9_000_001);
        assert_eq!(outcome.document.name, "ep1");
        assert_eq!(outcome.scene_count, 3);
        assert_eq!(outcome.caption_count, 2);
        assert_eq!(outcome.steps.steps_completed.len(), 5);
        assert!(outcome.log_path.is_file());

        // Every material now lives in the project folder.
        for path in outcome.document.material_paths() {
            assert!(path.starts_with(&outcome.project_dir), "{}", path.display());
        }
    }

    #[test]
    fn captions_step_skipped_without_srt() {
        let fixture = Fixture::new(None);
        let outcome = Generator::new(settings_for(&fixture))
            .with_probe(Box::new(FixedProbe(3_000_000)))
            .run(request(&fixture))
            .unwrap();

        assert_eq!(outcome.steps.steps_skipped, vec!["Captions"]);
        assert_eq!(outcome.caption_count, 0);
        assert!(outcome.document.tracks.text.is_empty());
    }

    #[test]
    fn fallback_is_reported_as_warning() {
        let fixture = Fixture::new(None);
        let mut settings = settings_for(&fixture);
        settings.probe.ffprobe_path = "/nonexistent/ffprobe".to_string();
        settings.probe.fallback_duration_ms = 4_000;

        let outcome = run_generation(request(&fixture), &settings).unwrap();
        assert_eq!(outcome.duration_source, DurationSource::Fallback);
        assert_eq!(outcome.document.duration, 4_000_000);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn failure_writes_nothing() {
        let fixture = Fixture::new(None);
        std::fs::remove_file(fixture.input().join("narration.wav")).unwrap();

        let err = Generator::new(settings_for(&fixture))
            .with_probe(Box::new(FixedProbe(3_000_000)))
            .run(request(&fixture))
            .unwrap_err();

        match &err {
            PipelineError::StepFailed { step_name, .. } => assert_eq!(step_name, "Scan"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            err.step_error(),
            Some(StepError::Scan(ScanError::MissingAudio(_)))
        ));
        assert!(!fixture.output().exists());
    }

    #[test]
    fn cancelled_run_writes_nothing() {
        let fixture = Fixture::new(None);
        let generator =
            Generator::new(settings_for(&fixture)).with_probe(Box::new(FixedProbe(3_000_000)));
        generator.cancel_handle().cancel();

        let err = generator.run(request(&fixture)).unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { .. }));
        assert!(!fixture.output().exists());
    }

    #[test]
    fn generate_into_names_project() {
        let fixture = Fixture::new(None);
        let mut settings = settings_for(&fixture);
        settings.probe.fallback_duration_ms = 3_000;
        settings.probe.ffprobe_path = "/nonexistent/ffprobe".to_string();
        let target = fixture.dir.path().join("elsewhere");

        let outcome = generate_into(fixture.input(), &target, Some("named"), &settings).unwrap();
        assert_eq!(outcome.project_dir, target.join("named"));
    }

    #[test]
    fn generate_and_import_uses_configured_roots() {
        let fixture = Fixture::new(None);
        let store = fixture.dir.path().join("store");
        std::fs::create_dir_all(&store).unwrap();
        let mut settings = settings_for(&fixture);
        settings.install.draft_roots = vec![store.to_string_lossy().to_string()];
        settings.probe.fallback_duration_ms = 3_000;
        settings.probe.ffprobe_path = "/nonexistent/ffprobe".to_string();

        let outcome = generate_and_import(fixture.input(), None, &settings).unwrap();
        assert!(outcome.project_dir.starts_with(&store));
        assert!(!fixture.output().exists());
    }
}
