//! Credentials file (`~/.my.cnf`) loading.
//!
//! Only `user=` and `password=` lines are read; section headers and any
//! other options are ignored.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::Credentials;
use crate::error::{DumpError, Result};

/// Location of the credentials file: `$HOME/.my.cnf`.
///
/// Reads `$HOME` itself rather than the platform home lookup, so an unset
/// `HOME` is reported as such instead of falling back to the passwd entry.
pub fn default_path() -> Result<PathBuf> {
    match std::env::var_os("HOME") {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".my.cnf")),
        _ => Err(DumpError::Config(
            "HOME environment variable not set".into(),
        )),
    }
}

impl Credentials {
    /// Read credentials from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            DumpError::Credentials(format!("failed to read {}: {}", path.display(), e))
        })?;
        debug!("Read credentials from {}", path.display());
        Self::parse(&content)
    }

    /// Parse credentials from file contents. Both values must be non-empty.
    pub fn parse(content: &str) -> Result<Self> {
        let mut creds = Credentials::default();

        for line in content.lines().map(str::trim) {
            if let Some(user) = line.strip_prefix("user=") {
                creds.user = user.trim().to_string();
            } else if let Some(password) = line.strip_prefix("password=") {
                creds.password = password.trim().to_string();
            }
        }

        if creds.user.is_empty() || creds.password.is_empty() {
            return Err(DumpError::Credentials(
                "MySQL user or password not found in credentials file".into(),
            ));
        }

        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_client_section() {
        let creds = Credentials::parse("[client]\nuser=testuser\npassword=testpass\n").unwrap();
        assert_eq!(creds.user, "testuser");
        assert_eq!(creds.password, "testpass");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let creds = Credentials::parse("  user= admin \n\tpassword=s3cret  \n").unwrap();
        assert_eq!(creds.user, "admin");
        assert_eq!(creds.password, "s3cret");
    }

    #[test]
    fn test_parse_ignores_other_options() {
        let content = "[client]\nhost=db1\nuser_agent=x\nuser=root\npassword=pw\nport=3307\n";
        let creds = Credentials::parse(content).unwrap();
        assert_eq!(creds.user, "root");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn test_parse_missing_credentials() {
        let err = Credentials::parse("[client]\n# no user or password\n").unwrap_err();
        assert!(err
            .to_string()
            .contains("MySQL user or password not found"));
    }

    #[test]
    fn test_parse_missing_password() {
        assert!(Credentials::parse("user=root\n").is_err());
        assert!(Credentials::parse("user=root\npassword=\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[client]").unwrap();
        writeln!(file, "user=backup").unwrap();
        writeln!(file, "password=hunter2").unwrap();

        let creds = Credentials::load(file.path()).unwrap();
        assert_eq!(creds.user, "backup");
        assert_eq!(creds.password, "hunter2");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Credentials::load("/nonexistent/.my.cnf").unwrap_err();
        assert!(matches!(err, DumpError::Credentials(_)));
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::parse("user=root\npassword=super_secret_password_123\n").unwrap();
        let debug_output = format!("{:?}", creds);
        assert!(
            debug_output.contains("[REDACTED]"),
            "Debug output should contain [REDACTED]"
        );
        assert!(
            !debug_output.contains("super_secret_password_123"),
            "Debug output should not contain actual password value"
        );
    }
}
