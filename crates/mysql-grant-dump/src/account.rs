//! MySQL accounts and the statements that describe them.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{DumpError, Result};
use crate::session::SqlSession;

/// Account listing with the built-in system accounts excluded.
pub const LIST_ACCOUNTS_SQL: &str = "SELECT user, host FROM mysql.user \
     WHERE user NOT IN ('mysql.infoschema', 'mysql.session', 'mysql.sys')";

/// Account listing restricted to one user name (all hosts).
pub const LIST_USER_SQL: &str = "SELECT user, host FROM mysql.user WHERE user = ?";

/// A MySQL principal: user name plus host pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Account {
    pub user: String,
    pub host: String,
}

impl Account {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// `` `user`@`host` `` with embedded backticks doubled.
    pub fn quoted(&self) -> String {
        format!("{}@{}", quote_ident(&self.user), quote_ident(&self.host))
    }

    /// `SHOW CREATE USER` for this account, without terminator.
    pub fn show_create_user(&self) -> String {
        format!("SHOW CREATE USER {}", self.quoted())
    }

    /// `SHOW GRANTS FOR` for this account, without terminator.
    pub fn show_grants(&self) -> String {
        format!("SHOW GRANTS FOR {}", self.quoted())
    }
}

/// Renders as `'user'@'host'`, the form pt-show-grants uses in comments.
impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'@'{}'", self.user, self.host)
    }
}

/// Quote a MySQL identifier.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// List the accounts to dump.
///
/// With `only_user` set, every host of that user is returned and the
/// system-account exclusion does not apply.
pub async fn list_accounts<S>(session: &mut S, only_user: Option<&str>) -> Result<Vec<Account>>
where
    S: SqlSession + ?Sized,
{
    let (sql, result) = match only_user {
        Some(user) => (
            LIST_USER_SQL,
            session.query_with(LIST_USER_SQL, &[user]).await?,
        ),
        None => (LIST_ACCOUNTS_SQL, session.query(LIST_ACCOUNTS_SQL).await?),
    };

    let mut accounts = Vec::with_capacity(result.rows.len());
    for row in &result.rows {
        let (Some(Some(user)), Some(Some(host))) = (row.first(), row.get(1)) else {
            return Err(DumpError::query(sql, "account row is missing user or host"));
        };
        accounts.push(Account::new(text(sql, user)?, text(sql, host)?));
    }

    debug!("Found {} account(s)", accounts.len());
    Ok(accounts)
}

fn text<'a>(sql: &str, bytes: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(bytes).map_err(|e| DumpError::query(sql, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::scripted::ScriptedSession;
    use crate::session::ResultSet;

    fn account_rows(pairs: &[(&str, &str)]) -> ResultSet {
        ResultSet::new(
            vec!["user".into(), "host".into()],
            pairs
                .iter()
                .map(|&(u, h)| vec![Some(u.into()), Some(h.into())])
                .collect(),
        )
    }

    #[test]
    fn test_quoted() {
        let account = Account::new("u", "h");
        assert_eq!(account.quoted(), "`u`@`h`");
        assert_eq!(account.show_create_user(), "SHOW CREATE USER `u`@`h`");
        assert_eq!(account.show_grants(), "SHOW GRANTS FOR `u`@`h`");
    }

    #[test]
    fn test_quoted_escapes_backticks() {
        let account = Account::new("we`ird", "%");
        assert_eq!(account.quoted(), "`we``ird`@`%`");
    }

    #[test]
    fn test_quoted_anonymous_user() {
        let account = Account::new("", "localhost");
        assert_eq!(account.quoted(), "``@`localhost`");
    }

    #[test]
    fn test_display() {
        assert_eq!(Account::new("flyway", "%").to_string(), "'flyway'@'%'");
    }

    #[test]
    fn test_list_sql_excludes_system_accounts() {
        for name in ["mysql.infoschema", "mysql.session", "mysql.sys"] {
            assert!(LIST_ACCOUNTS_SQL.contains(&format!("'{}'", name)));
        }
        assert!(LIST_ACCOUNTS_SQL.contains("NOT IN"));
        assert!(!LIST_USER_SQL.contains("NOT IN"));
    }

    #[tokio::test]
    async fn test_list_all_accounts() {
        let mut session = ScriptedSession::new().with_result(
            LIST_ACCOUNTS_SQL,
            account_rows(&[("app", "%"), ("root", "localhost")]),
        );

        let accounts = list_accounts(&mut session, None).await.unwrap();
        assert_eq!(
            accounts,
            vec![Account::new("app", "%"), Account::new("root", "localhost")]
        );
        assert_eq!(session.log, vec![LIST_ACCOUNTS_SQL.to_string()]);
        assert!(session.params.is_empty());
    }

    #[tokio::test]
    async fn test_list_only_user() {
        let mut session = ScriptedSession::new().with_result(
            LIST_USER_SQL,
            account_rows(&[("specificuser", "localhost")]),
        );

        let accounts = list_accounts(&mut session, Some("specificuser"))
            .await
            .unwrap();
        assert_eq!(accounts, vec![Account::new("specificuser", "localhost")]);
        assert_eq!(session.log, vec![LIST_USER_SQL.to_string()]);
        assert_eq!(session.params, vec![vec!["specificuser".to_string()]]);
    }

    #[tokio::test]
    async fn test_list_rejects_null_host() {
        let mut session = ScriptedSession::new().with_result(
            LIST_ACCOUNTS_SQL,
            ResultSet::new(
                vec!["user".into(), "host".into()],
                vec![vec![Some("app".into()), None]],
            ),
        );
        assert!(list_accounts(&mut session, None).await.is_err());
    }

    #[tokio::test]
    async fn test_list_rejects_invalid_utf8_user() {
        let mut session = ScriptedSession::new().with_result(
            LIST_ACCOUNTS_SQL,
            ResultSet::new(
                vec!["user".into(), "host".into()],
                vec![vec![Some(vec![0x61, 0xff]), Some("%".into())]],
            ),
        );
        let err = list_accounts(&mut session, None).await.unwrap_err();
        assert!(matches!(err, DumpError::Query { .. }));
    }

    #[tokio::test]
    async fn test_list_propagates_query_error() {
        let mut session = ScriptedSession::new().fail_on(LIST_ACCOUNTS_SQL);
        let err = list_accounts(&mut session, None).await.unwrap_err();
        assert!(matches!(err, DumpError::Query { .. }));
    }
}
