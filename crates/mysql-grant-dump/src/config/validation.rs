//! Configuration validation.

use std::path::Path;

use super::Config;
use crate::error::{DumpError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    if config.source_host.trim().is_empty() {
        return Err(DumpError::Config("source host (-s) is required".into()));
    }
    if config.dump_file.as_os_str().is_empty() {
        return Err(DumpError::Config("dump file (-f) is required".into()));
    }

    // Catches swapped or duplicated -s/-f arguments
    if config.dump_file.as_path() == Path::new(&config.source_host) {
        return Err(DumpError::Config(
            "source host and dump file cannot be the same".into(),
        ));
    }

    if config.port == 0 {
        return Err(DumpError::Config("port must be between 1 and 65535".into()));
    }

    if let Some(user) = &config.only_user {
        if user.is_empty() {
            return Err(DumpError::Config("user filter (-o) cannot be empty".into()));
        }
    }

    if config.credentials.user.is_empty() || config.credentials.password.is_empty() {
        return Err(DumpError::Credentials(
            "MySQL user or password not set".into(),
        ));
    }

    Ok(())
}
