//! Database session abstraction.
//!
//! The extractor and replayer talk to the server only through [`SqlSession`],
//! so one connection is threaded explicitly through both stages and tests can
//! substitute a scripted session.
//!
//! - [`MysqlSession`]: a single `mysql_async` connection
//! - [`ResultSet`]: fully-buffered query result holding the server's bytes

mod mysql;

#[cfg(test)]
pub(crate) mod scripted;

pub use mysql::MysqlSession;

use std::str::Utf8Error;

use async_trait::async_trait;

use crate::error::Result;

/// Buffered result of a single statement.
///
/// Values are the bytes the server sent, unchanged; SQL NULL is `None`.
/// Password hashes in `SHOW CREATE USER` output are binary, so values are
/// only decoded where text is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    /// Column names in select order.
    pub columns: Vec<String>,
    /// Rows, each with one entry per column.
    pub rows: Vec<Vec<Option<Vec<u8>>>>,
}

impl ResultSet {
    /// Create a result set from column names and rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<Vec<u8>>>>) -> Self {
        Self { columns, rows }
    }

    /// Single-column result set, as returned by `SHOW GRANTS`.
    pub fn single_column(name: &str, values: &[&str]) -> Self {
        Self {
            columns: vec![name.to_string()],
            rows: values
                .iter()
                .map(|v| vec![Some(v.as_bytes().to_vec())])
                .collect(),
        }
    }

    /// First column of the first row, decoded as UTF-8.
    pub fn first_value(&self) -> std::result::Result<Option<&str>, Utf8Error> {
        match self.rows.first().and_then(|row| row.first()) {
            Some(Some(bytes)) => std::str::from_utf8(bytes).map(Some),
            _ => Ok(None),
        }
    }

    /// Non-null values of one column in row order, decoded as UTF-8.
    pub fn column_values(&self, idx: usize) -> std::result::Result<Vec<&str>, Utf8Error> {
        self.rows
            .iter()
            .filter_map(|row| row.get(idx).and_then(|v| v.as_deref()))
            .map(std::str::from_utf8)
            .collect()
    }
}

/// A connection that executes statements one at a time.
///
/// Implementations must run statements in call order on a single session,
/// since session variables set by [`execute`](SqlSession::execute) affect
/// later queries.
#[async_trait]
pub trait SqlSession: Send {
    /// Execute a statement and discard any result.
    async fn execute(&mut self, sql: &str) -> Result<()>;

    /// Run a statement over the text protocol and buffer its first result set.
    async fn query(&mut self, sql: &str) -> Result<ResultSet>;

    /// Run a statement with positional `?` parameters.
    async fn query_with(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value() {
        let rs = ResultSet::single_column("Create User", &["CREATE USER `a`@`%`"]);
        assert_eq!(rs.first_value(), Ok(Some("CREATE USER `a`@`%`")));
        assert_eq!(ResultSet::default().first_value(), Ok(None));
    }

    #[test]
    fn test_first_value_null() {
        let rs = ResultSet::new(vec!["c".into()], vec![vec![None]]);
        assert_eq!(rs.first_value(), Ok(None));
    }

    #[test]
    fn test_first_value_rejects_invalid_utf8() {
        let rs = ResultSet::new(vec!["c".into()], vec![vec![Some(vec![b'A', 0xff, 0x83])]]);
        assert!(rs.first_value().is_err());
    }

    #[test]
    fn test_column_values_skips_nulls() {
        let rs = ResultSet::new(
            vec!["user".into(), "host".into()],
            vec![
                vec![Some("a".into()), Some("%".into())],
                vec![Some("b".into()), None],
            ],
        );
        assert_eq!(rs.column_values(1).unwrap(), vec!["%"]);
        assert_eq!(rs.column_values(0).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_column_values_rejects_invalid_utf8() {
        let rs = ResultSet::new(
            vec!["Grants".into()],
            vec![
                vec![Some("GRANT USAGE".into())],
                vec![Some(vec![0xc3, 0x28])],
            ],
        );
        assert!(rs.column_values(0).is_err());
    }
}
