//! Pipeline stages.
//!
//! Each [`Stage`] owns an emitter built with the stage's class hooks and
//! fires `started`, `completed` and `failed` as its methods return.

use serde::{Deserialize, Serialize};
use wirehook::prelude::*;

/// Errors raised while running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A stage completed without producing output.
    #[error("stage `{stage}` produced no output")]
    EmptyOutput {
        /// Stage name.
        stage: String,
    },
    /// A stage kept failing until it ran out of attempts.
    #[error("stage `{stage}` failed after {attempts} attempts: {reason}")]
    Exhausted {
        /// Stage name.
        stage: String,
        /// Attempts made.
        attempts: u32,
        /// Reason given by the last attempt.
        reason: String,
    },
    /// A hook callback failed.
    #[error(transparent)]
    Hook(#[from] HookError),
}

/// Payload of the `started` hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRun {
    /// Stage name.
    pub stage: String,
    /// 1-based attempt number.
    pub attempt: u32,
}

/// Payload of the `completed` and `failed` hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    /// Stage name.
    pub stage: String,
    /// Attempt the report belongs to.
    pub attempt: u32,
    /// Output on completion, reason on failure.
    pub detail: String,
}

/// A named pipeline step with its own emitter.
pub struct Stage {
    emitter: Emitter,
    name: String,
    attempts: u32,
}

impl HasEmitter for Stage {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}

#[hooks]
impl Stage {
    /// Creates a stage; its emitter is labelled with `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let emitter = Emitter::builder()
            .label(name.clone())
            .with_class::<Stage>()
            .build();
        Self {
            emitter,
            name,
            attempts: 0,
        }
    }

    /// Returns the stage name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of attempts started so far.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    #[once("started")]
    fn announce(emitter: &Emitter, params: Params) -> Result<(), HookError> {
        let run: StageRun = params.deserialize()?;
        tracing::info!(stage = %run.stage, emitter = %emitter.id(), "stage running for the first time");
        Ok(())
    }

    #[on("failed")]
    fn log_failure(emitter: &Emitter, params: Params) -> Result<(), HookError> {
        let report: StageReport = params.deserialize()?;
        tracing::warn!(
            stage = emitter.label(),
            attempt = report.attempt,
            reason = %report.detail,
            "stage attempt failed"
        );
        Ok(())
    }

    /// Starts a new attempt.
    #[fires("started")]
    pub fn start(&mut self) -> StageRun {
        self.attempts += 1;
        StageRun {
            stage: self.name.clone(),
            attempt: self.attempts,
        }
    }

    /// Completes the current attempt with `output`.
    ///
    /// Empty output is rejected and nothing is fired.
    #[fires("completed")]
    pub fn complete(&mut self, output: &str) -> Result<StageReport, PipelineError> {
        if output.trim().is_empty() {
            return Err(PipelineError::EmptyOutput {
                stage: self.name.clone(),
            });
        }
        Ok(StageReport {
            stage: self.name.clone(),
            attempt: self.attempts,
            detail: output.to_string(),
        })
    }

    /// Fails the current attempt with `reason`.
    #[fires("failed")]
    pub fn fail(&mut self, reason: &str) -> StageReport {
        StageReport {
            stage: self.name.clone(),
            attempt: self.attempts,
            detail: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn stage_emitter_carries_class_hooks() {
        let stage = Stage::new("build");

        assert_eq!(stage.emitter().label(), Some("build"));
        assert_eq!(stage.emitter().hook_count("started"), 1);
        assert_eq!(stage.emitter().hook_count("failed"), 1);
    }

    #[test]
    fn first_start_consumes_the_announcement() {
        let mut stage = Stage::new("build");

        assert_eq!(stage.start().attempt, 1);
        assert_eq!(stage.start().attempt, 2);
        assert_eq!(stage.attempts(), 2);
        assert!(!stage.emitter().contains_hook("started"));
    }

    #[test]
    fn complete_fires_report() {
        let mut stage = Stage::new("test");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        stage.emitter().on(
            "completed",
            Callback::new(move |_: &Emitter, params: Params| -> Result<(), HookError> {
                seen_clone.lock().unwrap().push(params.deserialize::<StageReport>()?);
                Ok(())
            }),
        );

        stage.start();
        let report = stage.complete("42 passed").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![report]);
    }

    #[test]
    fn empty_output_is_rejected_without_firing() {
        let mut stage = Stage::new("test");
        let fired = Arc::new(Mutex::new(false));
        let fired_clone = Arc::clone(&fired);
        stage.emitter().on(
            "completed",
            Callback::new(move |_: &Emitter, _| {
                *fired_clone.lock().unwrap() = true;
            }),
        );

        stage.start();
        let err = stage.complete("  ").unwrap_err();

        assert!(matches!(err, PipelineError::EmptyOutput { .. }));
        assert!(!*fired.lock().unwrap());
    }
}
