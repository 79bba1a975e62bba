//! Pipeline runner that executes steps in sequence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::{PipelineError, PipelineResult, StepResult};
use super::step::PipelineStep;
use super::types::{Context, JobState, StepOutcome};

/// An ordered list of steps sharing one context and state.
pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    cancelled: Arc<AtomicBool>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn add_step<S: PipelineStep + 'static>(&mut self, step: S) -> &mut Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Add a step (builder pattern).
    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.add_step(step);
        self
    }

    /// Get a cancellation handle.
    ///
    /// Call `cancel()` on the returned handle to stop the pipeline
    /// at the next step boundary.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancelled),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Run every step in order against `state`.
    ///
    /// Stops at the first failure. Cancellation is honoured before each step.
    pub fn run(&self, ctx: &Context, state: &mut JobState) -> PipelineResult<PipelineRunResult> {
        let mut result = PipelineRunResult::default();
        let total = self.steps.len().max(1);

        for (index, step) in self.steps.iter().enumerate() {
            let name = step.name();
            if self.is_cancelled() {
                ctx.logger.warn(&format!("Cancelled before '{}'", name));
                return Err(PipelineError::cancelled(&ctx.job_name));
            }

            ctx.logger.phase(name);
            ctx.report_progress(name, (index * 100 / total) as u32, step.description());

            match Self::run_step(step.as_ref(), ctx, state) {
                Ok(StepOutcome::Success) => {
                    ctx.logger.success(&format!("{} completed", name));
                    result.steps_completed.push(name.to_string());
                }
                Ok(StepOutcome::Skipped(reason)) => {
                    ctx.logger.info(&format!("{} skipped: {}", name, reason));
                    result.steps_skipped.push(name.to_string());
                }
                Err(e) => {
                    ctx.logger.error(&format!("{} failed: {}", name, e));
                    return Err(PipelineError::step_failed(&ctx.job_name, name, e));
                }
            }
        }

        ctx.report_progress("Complete", 100, "Draft generated");
        ctx.logger
            .success(&format!("All {} step(s) finished", self.steps.len()));
        Ok(result)
    }

    /// `validate_input`, `execute`, then `validate_output` for a successful step.
    fn run_step(
        step: &dyn PipelineStep,
        ctx: &Context,
        state: &mut JobState,
    ) -> StepResult<StepOutcome> {
        ctx.logger.debug(&format!("Checking input for '{}'", step.name()));
        step.validate_input(ctx, state)?;

        let outcome = step.execute(ctx, state)?;
        if outcome == StepOutcome::Success {
            ctx.logger.debug(&format!("Checking output of '{}'", step.name()));
            step.validate_output(ctx, state)?;
        }
        Ok(outcome)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Step names in order.
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle for cancelling a running pipeline.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// The pipeline stops at the next step boundary. A draft is only
    /// written by the last step, so a cancelled run writes nothing.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineRunResult {
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
}

impl PipelineRunResult {
    /// True when no step was skipped.
    pub fn all_completed(&self) -> bool {
        self.steps_skipped.is_empty()
    }

    pub fn total_steps(&self) -> usize {
        self.steps_completed.len() + self.steps_skipped.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::logging::{init_test_tracing, LogConfig, RunLogger};
    use crate::orchestrator::errors::StepError;
    use crate::orchestrator::types::{GenerateRequest, InstallTarget};
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::atomic::AtomicUsize;
    use tempfile::{tempdir, TempDir};

    struct CountingStep {
        name: &'static str,
        execute_count: Arc<AtomicUsize>,
        outcome: StepOutcome,
    }

    impl CountingStep {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                execute_count: Arc::new(AtomicUsize::new(0)),
                outcome: StepOutcome::Success,
            }
        }
    }

    impl PipelineStep for CountingStep {
        fn name(&self) -> &str {
            self.name
        }

        fn validate_input(&self, _ctx: &Context, _state: &JobState) -> Result<(), StepError> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut JobState) -> Result<StepOutcome, StepError> {
            self.execute_count.fetch_add(1, Ordering::SeqCst);
            Ok(self.outcome.clone())
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> Result<(), StepError> {
            Ok(())
        }
    }

    struct FailingStep;

    impl PipelineStep for FailingStep {
        fn name(&self) -> &str {
            "Broken"
        }

        fn validate_input(&self, _ctx: &Context, _state: &JobState) -> Result<(), StepError> {
            Ok(())
        }

        fn execute(&self, _ctx: &Context, _state: &mut JobState) -> Result<StepOutcome, StepError> {
            Err(StepError::invalid_input("nothing to do"))
        }

        fn validate_output(&self, _ctx: &Context, _state: &JobState) -> Result<(), StepError> {
            Ok(())
        }
    }

    fn test_context() -> (TempDir, Context) {
        init_test_tracing();
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("test", dir.path(), LogConfig::default(), None).unwrap();
        let request = GenerateRequest::new(
            dir.path().join("in"),
            InstallTarget::OutputDir(PathBuf::from("unused")),
        );
        let ctx = Context::new(request, Settings::default(), "test_job", Arc::new(logger));
        (dir, ctx)
    }

    #[test]
    fn pipeline_builds_correctly() {
        let pipeline = Pipeline::new()
            .with_step(CountingStep::new("Step1"))
            .with_step(CountingStep::new("Step2"));

        assert_eq!(pipeline.step_count(), 2);
        assert_eq!(pipeline.step_names(), vec!["Step1", "Step2"]);
    }

    #[test]
    fn runs_steps_in_order_and_records_skips() {
        let (_dir, ctx) = test_context();
        let mut skipped = CountingStep::new("Optional");
        skipped.outcome = StepOutcome::Skipped("no input".to_string());
        let first = CountingStep::new("First");
        let first_count = Arc::clone(&first.execute_count);

        let progress = Arc::new(Mutex::new(Vec::new()));
        let progress_clone = Arc::clone(&progress);
        let ctx = ctx.with_progress_callback(Box::new(move |step, percent, _msg| {
            progress_clone.lock().push((step.to_string(), percent));
        }));

        let pipeline = Pipeline::new().with_step(first).with_step(skipped);
        let mut state = JobState::new("job");
        let result = pipeline.run(&ctx, &mut state).unwrap();

        assert_eq!(first_count.load(Ordering::SeqCst), 1);
        assert_eq!(result.steps_completed, vec!["First"]);
        assert_eq!(result.steps_skipped, vec!["Optional"]);
        assert!(!result.all_completed());
        assert_eq!(result.total_steps(), 2);

        let progress = progress.lock();
        assert_eq!(progress.first(), Some(&("First".to_string(), 0)));
        assert_eq!(progress.last(), Some(&("Complete".to_string(), 100)));
    }

    #[test]
    fn failure_stops_pipeline_with_context() {
        let (_dir, ctx) = test_context();
        let after = CountingStep::new("After");
        let after_count = Arc::clone(&after.execute_count);
        let pipeline = Pipeline::new().with_step(FailingStep).with_step(after);

        let err = pipeline.run(&ctx, &mut JobState::new("job")).unwrap_err();
        match err {
            PipelineError::StepFailed {
                job_name,
                step_name,
                ..
            } => {
                assert_eq!(job_name, "test_job");
                assert_eq!(step_name, "Broken");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(after_count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_handle_works() {
        let pipeline = Pipeline::new();
        let handle = pipeline.cancel_handle();

        assert!(!pipeline.is_cancelled());
        handle.cancel();
        assert!(pipeline.is_cancelled());
        assert!(handle.is_cancelled());
    }

    #[test]
    fn cancelled_pipeline_runs_nothing() {
        let (_dir, ctx) = test_context();
        let step = CountingStep::new("Only");
        let count = Arc::clone(&step.execute_count);
        let pipeline = Pipeline::new().with_step(step);
        pipeline.cancel_handle().cancel();

        let err = pipeline.run(&ctx, &mut JobState::new("job")).unwrap_err();
        assert!(matches!(err, PipelineError::Cancelled { .. }));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
