//! Timeline step - measures the narration and lays out the tracks.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome, TimelineOutput};
use crate::timeline::{AudioAsset, DurationSource, ImageAsset, TimelineBuilder};
use crate::timing::micros_to_secs;

/// Resolves the narration duration and builds the project.
///
/// The probe comes from the context; the fallback estimate is the request's,
/// else the configured one.
pub struct TimelineStep;

impl TimelineStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TimelineStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TimelineStep {
    fn name(&self) -> &str {
        "Timeline"
    }

    fn description(&self) -> &str {
        "Measure narration and build tracks"
    }

    fn validate_input(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if !state.has_scan() {
            return Err(StepError::invalid_input("Timeline requires a completed scan"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let scan = state
            .scan
            .as_ref()
            .ok_or_else(|| StepError::invalid_input("Timeline requires a completed scan"))?;

        let audio = AudioAsset::resolve(&scan.audio_file, ctx.probe(), ctx.fallback_duration())?;
        match audio.source {
            DurationSource::Probed => ctx.logger.info(&format!(
                "Narration length {:.3}s",
                micros_to_secs(audio.duration)
            )),
            DurationSource::Fallback => ctx.logger.warn(&format!(
                "Could not measure {}; using estimate {:.3}s",
                audio.path.display(),
                micros_to_secs(audio.duration)
            )),
        }

        let images: Vec<ImageAsset> = scan
            .image_files
            .iter()
            .cloned()
            .map(ImageAsset::from)
            .collect();
        let builder = TimelineBuilder::new(ctx.settings.canvas.to_canvas())
            .with_caption_style(ctx.settings.captions.to_style());
        let project = builder.build(&audio, &images, state.caption_entries())?;

        let caption_count: usize = project
            .tracks
            .text
            .iter()
            .map(|t| t.segments().len())
            .sum();
        if let Some(parsed) = state.captions.as_ref().map(|c| c.entries.len()) {
            if caption_count < parsed {
                ctx.logger.warn(&format!(
                    "{} caption(s) fall outside the narration and were dropped",
                    parsed - caption_count
                ));
            }
        }
        ctx.logger.info(&format!(
            "{} scene(s), {} caption(s) over {:.3}s",
            images.len(),
            caption_count,
            micros_to_secs(project.total_duration)
        ));

        state.timeline = Some(TimelineOutput {
            duration_source: audio.source,
            scene_count: images.len(),
            caption_count,
            project,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        let timeline = state
            .timeline
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("No timeline recorded"))?;
        let narration = timeline
            .project
            .narration_segment()
            .map(|s| s.target_range().duration);
        if narration != Some(timeline.project.total_duration) {
            return Err(StepError::invalid_output(format!(
                "Project duration {} does not match narration {:?}",
                timeline.project.total_duration, narration
            )));
        }
        Ok(())
    }
}
