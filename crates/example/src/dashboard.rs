//! Shared dashboard fed by every stage.
//!
//! Stages are wired to the dashboard's emitter, so a single set of callbacks
//! sees the hooks of all of them.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use wirehook::prelude::*;

use crate::stage::{Stage, StageReport, StageRun};

/// Per-stage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageSummary {
    /// Attempts started.
    pub started: u32,
    /// Attempts completed.
    pub completed: u32,
    /// Attempts failed.
    pub failed: u32,
    /// Detail of the latest completion or failure.
    pub last_detail: Option<String>,
}

type Summaries = Arc<Mutex<BTreeMap<String, StageSummary>>>;

/// Aggregates stage hooks into [`StageSummary`] counters.
pub struct Dashboard {
    emitter: Emitter,
    summaries: Summaries,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    /// Creates a dashboard with its counting callbacks registered.
    #[must_use]
    pub fn new() -> Self {
        let emitter = Emitter::builder().label("dashboard").build();
        let summaries = Summaries::default();

        let started = Arc::clone(&summaries);
        let completed = Arc::clone(&summaries);
        let failed = Arc::clone(&summaries);
        emitter
            .on(
                "started",
                Callback::new(move |_: &Emitter, params: Params| -> Result<(), HookError> {
                    let run: StageRun = params.deserialize()?;
                    started.lock().entry(run.stage).or_default().started += 1;
                    Ok(())
                }),
            )
            .on(
                "completed",
                Callback::new(move |_: &Emitter, params: Params| -> Result<(), HookError> {
                    let report: StageReport = params.deserialize()?;
                    let mut summaries = completed.lock();
                    let summary = summaries.entry(report.stage).or_default();
                    summary.completed += 1;
                    summary.last_detail = Some(report.detail);
                    Ok(())
                }),
            )
            .on(
                "failed",
                Callback::new(move |_: &Emitter, params: Params| -> Result<(), HookError> {
                    let report: StageReport = params.deserialize()?;
                    let mut summaries = failed.lock();
                    let summary = summaries.entry(report.stage).or_default();
                    summary.failed += 1;
                    summary.last_detail = Some(report.detail);
                    Ok(())
                }),
            );

        Self { emitter, summaries }
    }

    /// Starts receiving `stage`'s hooks.
    pub fn watch(&self, stage: &Stage) {
        stage.emitter().wire(&self.emitter);
    }

    /// Stops receiving `stage`'s hooks.
    pub fn unwatch(&self, stage: &Stage) {
        stage.emitter().unwire(&self.emitter);
    }

    /// Returns the summary of the stage called `name`.
    #[must_use]
    pub fn summary(&self, name: &str) -> Option<StageSummary> {
        self.summaries.lock().get(name).cloned()
    }

    /// Returns all summaries, ordered by stage name.
    #[must_use]
    pub fn summaries(&self) -> BTreeMap<String, StageSummary> {
        self.summaries.lock().clone()
    }
}

impl HasEmitter for Dashboard {
    fn emitter(&self) -> &Emitter {
        &self.emitter
    }
}
