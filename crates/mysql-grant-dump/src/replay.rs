//! Replay of a dump file against the server.
//!
//! The file is split on `;`. Leading `--` comment lines are dropped from each
//! piece and pieces left empty are skipped; the rest run in file order and
//! their rows are printed as `-- <column>: <value>` lines.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::session::{ResultSet, SqlSession};

/// Marker printed for SQL NULL.
pub const NULL_MARKER: &str = "NULL";

/// Summary of a completed replay.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplayReport {
    /// Statements executed.
    pub statements: usize,
    /// Result rows printed.
    pub rows: usize,
}

/// Split dump text into executable statements.
///
/// Splitting is purely textual: a `;` inside a quoted string or identifier
/// also ends a statement.
pub fn split_statements(content: &str) -> Vec<String> {
    content
        .split(';')
        .filter_map(|segment| {
            let statement = segment
                .lines()
                .map(str::trim)
                .skip_while(|line| line.is_empty() || line.starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n");
            let statement = statement.trim();
            (!statement.is_empty()).then(|| statement.to_string())
        })
        .collect()
}

/// Print every row: one `-- column: value` line per column, then a blank line.
///
/// Values are written as the server sent them, without decoding.
/// Returns the number of rows printed.
pub fn print_result_set<W>(out: &mut W, result: &ResultSet) -> std::io::Result<usize>
where
    W: Write + ?Sized,
{
    for row in &result.rows {
        for (column, value) in result.columns.iter().zip(row) {
            write!(out, "-- {}: ", column)?;
            out.write_all(value.as_deref().unwrap_or(NULL_MARKER.as_bytes()))?;
            writeln!(out)?;
        }
        writeln!(out)?;
    }
    Ok(result.rows.len())
}

/// Executes dump statements over one session.
pub struct Replayer<'a, S: SqlSession + ?Sized> {
    session: &'a mut S,
}

impl<'a, S: SqlSession + ?Sized> Replayer<'a, S> {
    pub fn new(session: &'a mut S) -> Self {
        Self { session }
    }

    /// Read and replay a dump file.
    pub async fn run_file<P, W>(&mut self, path: P, out: &mut W) -> Result<ReplayReport>
    where
        P: AsRef<Path>,
        W: Write + ?Sized,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        info!("Replaying {}", path.display());
        self.run(&content, out).await
    }

    /// Replay dump text, stopping at the first failing statement.
    pub async fn run<W>(&mut self, content: &str, out: &mut W) -> Result<ReplayReport>
    where
        W: Write + ?Sized,
    {
        let mut report = ReplayReport::default();

        for statement in split_statements(content) {
            debug!("Replaying: {}", statement);
            let result = self.session.query(&statement).await?;
            report.rows += print_result_set(out, &result)?;
            report.statements += 1;
        }
        out.flush()?;

        info!(
            "Replayed {} statement(s), {} row(s)",
            report.statements, report.rows
        );
        Ok(report)
    }
}
