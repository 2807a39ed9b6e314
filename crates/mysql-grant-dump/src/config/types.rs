//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DumpError;

/// Default MySQL TCP port.
pub const DEFAULT_PORT: u16 = 3306;

/// Default pause between writing the dump and replaying it.
pub const DEFAULT_REPLAY_DELAY: Duration = Duration::from_secs(5);

/// Output format of the dump file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DumpFormat {
    /// `SHOW CREATE USER` / `SHOW GRANTS FOR` statements, executed at replay time.
    #[default]
    Raw,
    /// Idempotent `CREATE USER IF NOT EXISTS` followed by the grants.
    Import,
    /// pt-show-grants style: create, then `ALTER USER ... IDENTIFIED`, then grants.
    PtLike,
}

impl DumpFormat {
    /// Name as accepted on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DumpFormat::Raw => "raw",
            DumpFormat::Import => "import",
            DumpFormat::PtLike => "pt-like",
        }
    }

    /// Whether this format executes `SHOW CREATE USER` during the dump and so
    /// needs password hashes printed as hex literals.
    pub fn needs_hex_hashes(&self) -> bool {
        matches!(self, DumpFormat::Import | DumpFormat::PtLike)
    }
}

impl fmt::Display for DumpFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DumpFormat {
    type Err = DumpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(DumpFormat::Raw),
            "import" => Ok(DumpFormat::Import),
            "pt-like" => Ok(DumpFormat::PtLike),
            other => Err(DumpError::Config(format!(
                "format must be one of raw, import, pt-like; got '{}'",
                other
            ))),
        }
    }
}

/// MySQL login read from the credentials file.
#[derive(Clone, Default)]
pub struct Credentials {
    /// Username.
    pub user: String,

    /// Password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Root configuration for one dump-and-replay run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server to dump accounts from.
    pub source_host: String,

    /// Server port (default: 3306).
    pub port: u16,

    /// File the dump is written to and replayed from.
    pub dump_file: PathBuf,

    /// Dump only this user (all hosts), skipping the system-account filter.
    pub only_user: Option<String>,

    /// Output format.
    pub format: DumpFormat,

    /// Pause between the dump and the replay.
    pub replay_delay: Duration,

    /// Login used for the connection.
    pub credentials: Credentials,
}

impl Config {
    /// Create a configuration with default port, format and delay.
    pub fn new(
        source_host: impl Into<String>,
        dump_file: impl Into<PathBuf>,
        credentials: Credentials,
    ) -> Self {
        Self {
            source_host: source_host.into(),
            port: DEFAULT_PORT,
            dump_file: dump_file.into(),
            only_user: None,
            format: DumpFormat::default(),
            replay_delay: DEFAULT_REPLAY_DELAY,
            credentials,
        }
    }
}
