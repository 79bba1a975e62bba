//! Serialize step - renders the project to the editor document.

use crate::document::serialize;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};

pub struct SerializeStep;

impl SerializeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SerializeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for SerializeStep {
    fn name(&self) -> &str {
        "Serialize"
    }

    fn description(&self) -> &str {
        "Render draft document"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.timeline.is_none() {
            return Err(StepError::invalid_input("Serialize requires a built timeline"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let project = &state
            .timeline
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("Serialize requires a built timeline"))?
            .project;

        // The builder only emits consistent projects.
        let result = serialize(project);
        debug_assert!(
            result.is_ok(),
            "timeline produced an inconsistent project: {:?}",
            result.as_ref().err()
        );
        let mut document = result?;

        if let Some(name) = &ctx.request.name {
            document.name = name.clone();
        }
        ctx.logger.info(&format!(
            "Document {} with {} material(s), {} segment(s)",
            document.id,
            document.material_ids().len(),
            document.segment_count()
        ));

        state.document = Some(document);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let (Some(document), Some(timeline)) = (&state.document, &state.timeline) else {
            return Err(StepError::invalid_output("No document recorded"));
        };
        if document.duration != timeline.project.total_duration {
            return Err(StepError::invalid_output(format!(
                "Document duration {} differs from project {}",
                document.duration, timeline.project.total_duration
            )));
        }
        Ok(())
    }
}
