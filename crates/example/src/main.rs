//! Example pipeline CLI.
//!
//! Runs a simulated deployment pipeline and logs the dashboard summary.
//! Stages whose name starts with `flaky` fail their first attempt.
//!
//! # Usage
//!
//! ```bash
//! pipeline [--format pretty|compact|json] [stage...]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=wirehook_emitter=debug pipeline build flaky-test deploy
//! ```

use std::process::ExitCode;

use example::{Pipeline, TracingFormat, TracingSetup};

const DEFAULT_STAGES: [&str; 3] = ["build", "flaky-test", "deploy"];

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1).peekable();
    let mut format = TracingFormat::Pretty;
    if args.peek().map(String::as_str) == Some("--format") {
        args.next();
        match args.next().as_deref().and_then(TracingFormat::parse) {
            Some(parsed) => format = parsed,
            None => {
                eprintln!("Usage: pipeline [--format pretty|compact|json] [stage...]");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut setup = TracingSetup::new().with_format(format);
    if let Ok(directives) = std::env::var("RUST_LOG") {
        setup = setup.with_env_filter(directives);
    }
    setup.init();

    let mut stages: Vec<String> = args.collect();
    if stages.is_empty() {
        stages = DEFAULT_STAGES.iter().map(ToString::to_string).collect();
    }

    let mut pipeline = Pipeline::new(stages);
    let result = pipeline.run(1, |run| {
        if run.stage.starts_with("flaky") && run.attempt == 1 {
            Err("transient failure".to_string())
        } else {
            Ok(format!("{} finished on attempt {}", run.stage, run.attempt))
        }
    });

    for (stage, summary) in pipeline.dashboard().summaries() {
        tracing::info!(
            %stage,
            started = summary.started,
            completed = summary.completed,
            failed = summary.failed,
            detail = summary.last_detail.as_deref(),
            "stage summary"
        );
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "pipeline failed");
            ExitCode::FAILURE
        }
    }
}
