//! Replay an access script against a fresh in-memory engine.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use hs_access_core::config::AppConfig;
use hs_access_core::error::{AppError, ErrorKind};
use hs_access_service::AccessControl;

use crate::output::{self, OutputFormat};
use crate::script::{self, Outcome, Session};

/// Arguments for the replay command
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script file, one JSON step per line
    pub script: PathBuf,

    /// Fail when any step is denied
    #[arg(long)]
    pub strict: bool,
}

/// One row of the replay report.
#[derive(Debug, Serialize, Tabled)]
struct ReplayRow {
    line: usize,
    op: &'static str,
    result: String,
}

/// Execute the replay command
pub async fn execute(
    args: &ReplayArgs,
    config: AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let source = tokio::fs::read_to_string(&args.script).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Usage,
            format!("Failed to read '{}'", args.script.display()),
            e,
        )
    })?;
    let steps = script::parse(&source)?;
    info!(path = %args.script.display(), steps = steps.len(), "Replaying access script");

    let (control, notifier) = AccessControl::in_memory(config.access);
    let mut events = notifier.subscribe();
    drop(notifier);
    let listener = tokio::spawn(async move {
        let mut delivered = 0usize;
        loop {
            match events.recv().await {
                Ok(event) => {
                    delivered += 1;
                    debug!(event = ?event.payload, "Access event");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event listener fell behind");
                }
                Err(RecvError::Closed) => break delivered,
            }
        }
    });

    let mut session = Session::new(control);
    let mut rows = Vec::with_capacity(steps.len());
    let mut denied = 0usize;
    for (line, step) in steps {
        let op = step.op();
        let outcome = session
            .apply(step)
            .await
            .map_err(|e| AppError::new(e.kind, format!("Line {line}: {}", e.message)))?;
        if matches!(outcome, Outcome::Denied { .. }) {
            denied += 1;
        }
        rows.push(ReplayRow {
            line,
            op,
            result: outcome.to_string(),
        });
    }
    drop(session);

    let delivered = listener
        .await
        .map_err(|e| AppError::internal(format!("Event listener failed: {e}")))?;

    output::print_list(&rows, format);
    if format == OutputFormat::Table {
        output::print_kv("Steps", &rows.len().to_string());
        output::print_kv("Denied", &denied.to_string());
        output::print_kv("Events", &delivered.to_string());
    }

    if args.strict && denied > 0 {
        return Err(AppError::access(format!("{denied} step(s) denied")));
    }
    Ok(())
}
