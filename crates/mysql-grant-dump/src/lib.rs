//! # mysql-grant-dump
//!
//! Dump MySQL 8 user accounts to a SQL file and replay it.
//!
//! The library provides:
//!
//! - **Account listing** with the built-in system accounts excluded, or a
//!   single named user
//! - **Three dump formats**: `raw` (`SHOW` statements), `import`
//!   (idempotent `CREATE USER IF NOT EXISTS` + grants) and `pt-like`
//!   (pt-show-grants style `CREATE` / `ALTER USER` split)
//! - **Replay** of a dump file statement by statement, printing result rows
//!
//! ## Example
//!
//! ```rust,no_run
//! use mysql_grant_dump::{Config, Credentials, MysqlSession};
//!
//! #[tokio::main]
//! async fn main() -> mysql_grant_dump::Result<()> {
//!     let creds = Credentials::load("/home/dba/.my.cnf")?;
//!     let config = Config::new("db1.internal", "users.sql", creds);
//!     config.validate()?;
//!
//!     let mut session = MysqlSession::connect(&config).await?;
//!     let result = mysql_grant_dump::run(&mut session, &config, &mut std::io::stdout()).await?;
//!     session.disconnect().await?;
//!     println!("Dumped {} accounts", result.dump.accounts.len());
//!     Ok(())
//! }
//! ```

pub mod account;
pub mod config;
pub mod dump;
pub mod error;
pub mod replay;
pub mod runner;
pub mod session;

// Re-exports for convenient access
pub use account::Account;
pub use config::{Config, Credentials, DumpFormat};
pub use dump::{DumpReport, Extractor};
pub use error::{DumpError, Result};
pub use replay::{ReplayReport, Replayer};
pub use runner::{run, RunResult};
pub use session::{MysqlSession, ResultSet, SqlSession};
