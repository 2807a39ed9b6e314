//! Configuration loading and validation.

mod credentials;
mod types;
mod validation;

pub use credentials::default_path as default_credentials_path;
pub use types::*;

use mysql_async::{Opts, OptsBuilder};

use crate::error::Result;

impl Config {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Build connection options for mysql_async.
    ///
    /// No default database is selected; every query names `mysql.user` or an
    /// account explicitly.
    pub fn connect_opts(&self) -> Opts {
        OptsBuilder::default()
            .ip_or_hostname(self.source_host.clone())
            .tcp_port(self.port)
            .prefer_socket(false)
            .user(Some(self.credentials.user.clone()))
            .pass(Some(self.credentials.password.clone()))
            .into()
    }

    /// `user@host:port` for log lines; never includes the password.
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}",
            self.credentials.user, self.source_host, self.port
        )
    }
}
