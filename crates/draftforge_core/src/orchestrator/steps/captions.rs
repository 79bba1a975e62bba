//! Captions step - parses the caption file, if any.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{CaptionsOutput, Context, JobState, StepOutcome};
use crate::subtitles::parse_file;

/// Parses the SRT selected by the scan. Malformed blocks are logged and
/// dropped; an unreadable file fails the run.
pub struct CaptionsStep;

impl CaptionsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CaptionsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for CaptionsStep {
    fn name(&self) -> &str {
        "Captions"
    }

    fn description(&self) -> &str {
        "Parse caption file"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_scan() {
            return Err(StepError::invalid_input("Captions require a completed scan"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let Some(path) = state.scan.as_ref().and_then(|s| s.caption_file.clone()) else {
            return Ok(StepOutcome::Skipped("No caption file".to_string()));
        };

        let report = parse_file(&path)?;
        for skipped in &report.skipped {
            ctx.logger.warn(&format!("Skipped caption block: {}", skipped));
        }
        ctx.logger.info(&format!(
            "{} caption(s) parsed from {}",
            report.entries.len(),
            path.display()
        ));

        state.captions = Some(CaptionsOutput {
            source: path,
            skipped: report.skipped.len(),
            entries: report.entries,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.captions.is_none() {
            return Err(StepError::invalid_output("No captions recorded"));
        }
        Ok(())
    }
}
