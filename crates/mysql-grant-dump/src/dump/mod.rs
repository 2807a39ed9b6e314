//! Account dump: list accounts, render their definitions, write the file.
//!
//! - [`Extractor`]: runs the dump over a [`SqlSession`]
//! - [`CreateUser`]: `SHOW CREATE USER` parser used by the pt-like format
//! - [`write_dump`]: writes and syncs the rendered lines

mod create_user;

pub use create_user::{create_if_not_exists, strip_if_not_exists, CreateUser};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::account::{list_accounts, Account};
use crate::config::{Config, DumpFormat};
use crate::error::{DumpError, Result};
use crate::session::SqlSession;

/// Makes `SHOW CREATE USER` print password hashes as hex literals, so binary
/// hash bytes never reach the dump file.
pub const HEX_HASHES_ON: &str = "SET print_identified_with_as_hex = 1";

/// Restores the session default.
pub const HEX_HASHES_OFF: &str = "SET print_identified_with_as_hex = 0";

/// Summary of a completed dump.
#[derive(Debug, Clone, Serialize)]
pub struct DumpReport {
    /// Format the file was written in.
    pub format: DumpFormat,
    /// File written.
    pub path: PathBuf,
    /// Accounts dumped, in server order.
    pub accounts: Vec<Account>,
    /// Lines written, comments included.
    pub lines_written: usize,
}

/// Dumps account definitions over one session.
pub struct Extractor<'a, S: SqlSession + ?Sized> {
    session: &'a mut S,
    config: &'a Config,
}

impl<'a, S: SqlSession + ?Sized> Extractor<'a, S> {
    pub fn new(session: &'a mut S, config: &'a Config) -> Self {
        Self { session, config }
    }

    /// List accounts, render them in the configured format and write the file.
    ///
    /// A failed query or write aborts the dump; a file written before the
    /// failure is left in place.
    pub async fn run(&mut self) -> Result<DumpReport> {
        let format = self.config.format;
        let accounts = list_accounts(&mut *self.session, self.config.only_user.as_deref()).await?;
        info!("Dumping {} account(s) in {} format", accounts.len(), format);

        let lines = self.render(&accounts, Local::now()).await?;

        write_dump(&self.config.dump_file, &lines)?;
        info!(
            "Wrote {} line(s) to {}",
            lines.len(),
            self.config.dump_file.display()
        );

        Ok(DumpReport {
            format,
            path: self.config.dump_file.clone(),
            accounts,
            lines_written: lines.len(),
        })
    }

    /// Render the dump lines for `accounts`.
    ///
    /// For formats that read definitions from the server, hex hash output is
    /// switched on first and switched off afterwards even if rendering
    /// failed. Failing to switch it off is only logged.
    pub async fn render(
        &mut self,
        accounts: &[Account],
        now: DateTime<Local>,
    ) -> Result<Vec<String>> {
        let format = self.config.format;
        if !format.needs_hex_hashes() {
            return Ok(accounts.iter().map(raw_line).collect());
        }

        self.session.execute(HEX_HASHES_ON).await?;
        let rendered = self.render_definitions(accounts, now).await;
        if let Err(e) = self.session.execute(HEX_HASHES_OFF).await {
            warn!("Failed to reset print_identified_with_as_hex: {}", e);
        }
        rendered
    }

    async fn render_definitions(
        &mut self,
        accounts: &[Account],
        now: DateTime<Local>,
    ) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        if self.config.format == DumpFormat::PtLike {
            lines.extend(pt_like_header(&self.config.source_host, now));
        }

        for account in accounts {
            debug!("Reading definition of {}", account);
            let create = self.show_create_user(account).await?;

            match self.config.format {
                DumpFormat::PtLike => {
                    lines.push(format!("-- Grants for {}", account));
                    lines.extend(CreateUser::parse(&create).pt_like_lines());
                }
                _ => {
                    lines.push(format!(
                        "-- CREATE USER IF NOT EXISTS for {}@{}: ",
                        account.user, account.host
                    ));
                    lines.push(format!("{};", create_if_not_exists(&create)));
                }
            }

            for grant in self.show_grants(account).await? {
                let grant = match self.config.format {
                    DumpFormat::Import => strip_if_not_exists(&grant),
                    _ => grant,
                };
                lines.push(format!("{};", grant));
            }
        }

        Ok(lines)
    }

    async fn show_create_user(&mut self, account: &Account) -> Result<String> {
        let sql = account.show_create_user();
        let result = self.session.query(&sql).await?;
        match result.first_value() {
            Ok(Some(create)) => Ok(create.to_string()),
            Ok(None) => Err(DumpError::query(sql, "no CREATE USER statement returned")),
            Err(e) => Err(DumpError::query(sql, e)),
        }
    }

    async fn show_grants(&mut self, account: &Account) -> Result<Vec<String>> {
        let sql = account.show_grants();
        let result = self.session.query(&sql).await?;
        let grants = result
            .column_values(0)
            .map_err(|e| DumpError::query(&sql, e))?;
        Ok(grants.into_iter().map(str::to_string).collect())
    }
}

/// Raw-format line: the statements to run at replay time, not their output.
fn raw_line(account: &Account) -> String {
    format!("{}; {};", account.show_create_user(), account.show_grants())
}

fn pt_like_header(host: &str, now: DateTime<Local>) -> [String; 2] {
    [
        format!("-- Grants dumped by {}", env!("CARGO_PKG_NAME")),
        format!(
            "-- Dumped from server {} via TCP/IP, MySQL at {}",
            host,
            now.format("%Y-%m-%d %H:%M:%S")
        ),
    ]
}

/// Write one line per entry, newline-terminated, then flush and sync.
///
/// The file is created or truncated in place.
pub fn write_dump<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}
