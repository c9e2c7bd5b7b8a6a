//! Example deployment pipeline built with wirehook.
//!
//! Every [`Stage`] owns an emitter seeded with the stage's class hooks and
//! fires hooks as its methods complete. All stages are wired to one
//! [`Dashboard`] emitter, which aggregates the hooks of every stage (fan-in).
//!
//! ```text
//! ┌─────────┐  ┌─────────┐  ┌─────────┐
//! │  build  │  │  test   │  │ deploy  │   stage emitters
//! └────┬────┘  └────┬────┘  └────┬────┘   (class hooks: announce, log_failure)
//!      │ wire       │ wire       │ wire
//!      └────────────┼────────────┘
//!                   ▼
//!            ┌────────────┐
//!            │ dashboard  │   started / completed / failed counters
//!            └────────────┘
//! ```

mod dashboard;
mod logging;
mod stage;

pub use dashboard::{Dashboard, StageSummary};
pub use logging::{TracingFormat, TracingSetup};
pub use stage::{PipelineError, Stage, StageReport, StageRun};

/// Ordered stages reporting to a shared dashboard.
pub struct Pipeline {
    dashboard: Dashboard,
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Creates a pipeline with one stage per name, all watched by a new
    /// dashboard.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let dashboard = Dashboard::new();
        let stages: Vec<Stage> = names.into_iter().map(Stage::new).collect();
        for stage in &stages {
            dashboard.watch(stage);
        }
        Self { dashboard, stages }
    }

    /// Returns the dashboard.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Returns the stages in run order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Runs every stage in order.
    ///
    /// `step` performs one attempt and returns its output or a failure
    /// reason. A failed stage is retried up to `retries` more times before
    /// the run stops with [`PipelineError::Exhausted`].
    pub fn run<F>(&mut self, retries: u32, mut step: F) -> Result<(), PipelineError>
    where
        F: FnMut(&StageRun) -> Result<String, String>,
    {
        for stage in &mut self.stages {
            let span = tracing::info_span!("stage", name = stage.name());
            let _enter = span.enter();

            loop {
                let run = stage.start();
                match step(&run) {
                    Ok(output) => {
                        stage.complete(&output)?;
                        break;
                    }
                    Err(reason) => {
                        stage.fail(&reason);
                        if run.attempt > retries {
                            return Err(PipelineError::Exhausted {
                                stage: run.stage,
                                attempts: run.attempt,
                                reason,
                            });
                        }
                    }
                }
            }
        }

        tracing::info!(stages = self.stages.len(), "pipeline finished");
        Ok(())
    }
}
