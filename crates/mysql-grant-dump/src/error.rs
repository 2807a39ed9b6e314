//! Error types for the grant dump library.

use thiserror::Error;

/// Exit code for configuration and credential errors.
pub const EXIT_CONFIG_ERROR: u8 = 1;

/// Exit code for database connection and query errors.
pub const EXIT_DATABASE_ERROR: u8 = 2;

/// Exit code for file I/O errors.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for dump and replay operations.
#[derive(Error, Debug)]
pub enum DumpError {
    /// Configuration error (missing flags, invalid values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credentials file missing values or unreadable
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Connection or protocol error from the MySQL driver
    #[error("Database error: {0}")]
    Database(#[from] mysql_async::Error),

    /// A specific statement failed
    #[error("Query failed: {statement}\n  Reason: {message}")]
    Query { statement: String, message: String },

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DumpError {
    /// Create a Query error for the statement that failed.
    pub fn query(statement: impl Into<String>, message: impl std::fmt::Display) -> Self {
        DumpError::Query {
            statement: statement.into(),
            message: message.to_string(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            DumpError::Config(_) | DumpError::Credentials(_) => EXIT_CONFIG_ERROR,
            DumpError::Database(_) | DumpError::Query { .. } => EXIT_DATABASE_ERROR,
            DumpError::Io(_) | DumpError::Json(_) => EXIT_IO_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for dump operations.
pub type Result<T> = std::result::Result<T, DumpError>;
