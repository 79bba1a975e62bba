//! Scan step - classifies the input directory.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobState, StepOutcome};
use crate::scan::scan_directory;

/// Picks the narration, scene images and caption file from the input folder.
pub struct ScanStep;

impl ScanStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScanStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ScanStep {
    fn name(&self) -> &str {
        "Scan"
    }

    fn description(&self) -> &str {
        "Classify input files"
    }

    fn validate_input(&self, ctx: &Context, _state: &JobState) -> StepResult<()> {
        if !ctx.input_dir().is_dir() {
            return Err(StepError::invalid_input(format!(
                "Input folder does not exist: {}",
                ctx.input_dir().display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let scanned = scan_directory(ctx.input_dir())?;

        ctx.logger.info(&format!("Narration: {}", scanned.audio_file.display()));
        ctx.logger
            .info(&format!("{} scene image(s)", scanned.image_files.len()));
        for (i, image) in scanned.image_files.iter().enumerate() {
            ctx.logger
                .debug(&format!("  scene {}: {}", i + 1, image.display()));
        }
        match &scanned.caption_file {
            Some(path) => ctx.logger.info(&format!("Captions: {}", path.display())),
            None => ctx.logger.info("Captions: none"),
        }
        for path in &scanned.ignored {
            ctx.logger
                .warn(&format!("Ignoring extra input file {}", path.display()));
        }

        state.scan = Some(scanned);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        match &state.scan {
            Some(scan) if !scan.image_files.is_empty() => Ok(()),
            Some(_) => Err(StepError::invalid_output("Scan selected no images")),
            None => Err(StepError::invalid_output("Scan recorded no result")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::steps::test_support::{file_names, name_of, Fixture};
    use crate::scan::ScanError;
    use std::fs;

    #[test]
    fn records_assets_in_natural_order() {
        let fixture = Fixture::new(None);
        let ctx = fixture.context(3_000_000);
        let mut state = JobState::new("job");

        let step = ScanStep::new();
        step.validate_input(&ctx, &state).unwrap();
        assert_eq!(step.execute(&ctx, &mut state).unwrap(), StepOutcome::Success);
        step.validate_output(&ctx, &state).unwrap();

        let scan = state.scan.unwrap();
        assert_eq!(name_of(&scan.audio_file), "narration.wav");
        assert_eq!(
            file_names(&scan.image_files),
            vec!["scene1.jpg", "scene2.png", "scene10.png"]
        );
        assert!(scan.caption_file.is_none());
    }

    #[test]
    fn missing_audio_is_an_error() {
        let fixture = Fixture::new(None);
        fs::remove_file(fixture.input().join("narration.wav")).unwrap();
        let ctx = fixture.context(3_000_000);

        let err = ScanStep::new()
            .execute(&ctx, &mut JobState::new("job"))
            .unwrap_err();
        assert!(matches!(err, StepError::Scan(ScanError::MissingAudio(_))));
    }

    #[test]
    fn rejects_missing_input_folder() {
        let fixture = Fixture::new(None);
        fs::remove_dir_all(fixture.input()).unwrap();
        let ctx = fixture.context(3_000_000);

        let err = ScanStep::new()
            .validate_input(&ctx, &JobState::new("job"))
            .unwrap_err();
        assert!(matches!(err, StepError::InvalidInput(_)));
    }
}
