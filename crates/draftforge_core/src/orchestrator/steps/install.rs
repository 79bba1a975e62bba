//! Install step - writes the draft folder.

use std::fs;
use std::path::PathBuf;

use crate::install::Installer;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, InstallTarget, JobState, StepOutcome};

/// Copies media and writes the document and descriptors under the target.
///
/// Root resolution and project folder creation are fatal. Everything after
/// that is best-effort and ends up as warnings on the report.
pub struct InstallStep;

impl InstallStep {
    pub fn new() -> Self {
        Self
    }

    fn resolve_root(ctx: &Context) -> StepResult<PathBuf> {
        match &ctx.request.target {
            InstallTarget::OutputDir(dir) => {
                fs::create_dir_all(dir)
                    .map_err(|e| StepError::io_error("creating output directory", e))?;
                Ok(dir.clone())
            }
            InstallTarget::DraftStore(locator) => {
                for candidate in locator.candidates() {
                    ctx.logger
                        .debug(&format!("Draft store candidate: {}", candidate.display()));
                }
                Ok(locator.locate()?)
            }
        }
    }
}

impl Default for InstallStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for InstallStep {
    fn name(&self) -> &str {
        "Install"
    }

    fn description(&self) -> &str {
        "Copy media and write draft files"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.scan.is_none() || state.document.is_none() {
            return Err(StepError::invalid_input(
                "Install requires scanned media and a document",
            ));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let (Some(scan), Some(document)) = (&state.scan, &state.document) else {
            return Err(StepError::invalid_input(
                "Install requires scanned media and a document",
            ));
        };

        let root = Self::resolve_root(ctx)?;
        ctx.logger.info(&format!("Installing into {}", root.display()));

        let installer =
            Installer::new().with_document_file_name(&ctx.settings.install.document_file_name);
        let report = installer.install(
            &root,
            document.clone(),
            &scan.media_files(),
            ctx.request.name.as_deref(),
        )?;

        ctx.logger
            .info(&format!("Project folder: {}", report.project_dir.display()));
        ctx.logger
            .info(&format!("{} media file(s) copied", report.copied.len()));
        for warning in &report.warnings {
            ctx.logger.warn(&warning.to_string());
        }

        state.install = Some(report);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.install {
            Some(report) if report.project_dir.is_dir() => Ok(()),
            Some(report) => Err(StepError::invalid_output(format!(
                "Project folder missing after install: {}",
                report.project_dir.display()
            ))),
            None => Err(StepError::invalid_output("No install report recorded")),
        }
    }
}
