//! Runs the dump and the replay back to back on one session.

use std::io::Write;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::dump::{DumpReport, Extractor};
use crate::error::Result;
use crate::replay::{ReplayReport, Replayer};
use crate::session::SqlSession;

/// Result of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// Total duration in seconds, including the replay delay.
    pub duration_seconds: f64,

    /// Dump stage summary.
    pub dump: DumpReport,

    /// Replay stage summary.
    pub replay: ReplayReport,
}

impl RunResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Dump accounts to the configured file, wait, then replay the file.
///
/// The wait gives the operator time to inspect the file; nothing is awaited
/// but the clock. Replay output is written to `out`.
pub async fn run<S, W>(session: &mut S, config: &Config, out: &mut W) -> Result<RunResult>
where
    S: SqlSession + ?Sized,
    W: Write + ?Sized,
{
    let started_at = Utc::now();
    let start = Instant::now();

    let dump = Extractor::new(&mut *session, config).run().await?;

    if !config.replay_delay.is_zero() {
        info!(
            "Replaying {} in {}s",
            config.dump_file.display(),
            config.replay_delay.as_secs_f64()
        );
        tokio::time::sleep(config.replay_delay).await;
    }

    let replay = Replayer::new(&mut *session)
        .run_file(&config.dump_file, out)
        .await?;

    Ok(RunResult {
        started_at,
        duration_seconds: start.elapsed().as_secs_f64(),
        dump,
        replay,
    })
}
