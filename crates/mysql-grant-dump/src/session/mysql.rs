//! MySQL session backed by a single mysql_async connection.

use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Conn, Params, Row, Value};
use tracing::{debug, info};

use super::{ResultSet, SqlSession};
use crate::config::Config;
use crate::error::{DumpError, Result};

/// One connection reused for the dump and the replay.
pub struct MysqlSession {
    conn: Conn,
}

impl MysqlSession {
    /// Connect to the configured server and verify the connection.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut conn = Conn::new(config.connect_opts()).await?;

        conn.query_drop("SELECT 1")
            .await
            .map_err(|e| DumpError::query("SELECT 1", e))?;

        info!("Connected to MySQL: {}", config.display_target());

        Ok(Self { conn })
    }

    /// Close the connection gracefully.
    pub async fn disconnect(self) -> Result<()> {
        self.conn.disconnect().await?;
        debug!("Disconnected from MySQL");
        Ok(())
    }

    fn row_to_values(row: &Row) -> Vec<Option<Vec<u8>>> {
        (0..row.len())
            .map(|i| row.as_ref(i).and_then(value_to_bytes))
            .collect()
    }
}

#[async_trait]
impl SqlSession for MysqlSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        debug!("Executing: {}", sql);
        self.conn
            .query_drop(sql)
            .await
            .map_err(|e| DumpError::query(sql, e))
    }

    async fn query(&mut self, sql: &str) -> Result<ResultSet> {
        debug!("Querying: {}", sql);
        let mut result = self
            .conn
            .query_iter(sql)
            .await
            .map_err(|e| DumpError::query(sql, e))?;

        let columns = column_names(result.columns());
        let rows: Vec<Row> = result
            .collect()
            .await
            .map_err(|e| DumpError::query(sql, e))?;
        result
            .drop_result()
            .await
            .map_err(|e| DumpError::query(sql, e))?;

        Ok(ResultSet::new(
            columns,
            rows.iter().map(Self::row_to_values).collect(),
        ))
    }

    async fn query_with(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet> {
        debug!("Querying: {} with {} parameter(s)", sql, params.len());
        let params = Params::Positional(params.iter().map(|p| Value::from(*p)).collect());

        let mut result = self
            .conn
            .exec_iter(sql, params)
            .await
            .map_err(|e| DumpError::query(sql, e))?;

        let columns = column_names(result.columns());
        let rows: Vec<Row> = result
            .collect()
            .await
            .map_err(|e| DumpError::query(sql, e))?;
        result
            .drop_result()
            .await
            .map_err(|e| DumpError::query(sql, e))?;

        Ok(ResultSet::new(
            columns,
            rows.iter().map(Self::row_to_values).collect(),
        ))
    }
}

fn column_names(columns: Option<std::sync::Arc<[mysql_async::Column]>>) -> Vec<String> {
    columns
        .map(|cols| cols.iter().map(|c| c.name_str().into_owned()).collect())
        .unwrap_or_default()
}

/// Cell bytes for a protocol value. Text-protocol results arrive as bytes and
/// are passed through unchanged; the typed variants only appear for prepared
/// statements and are rendered the way the server would print them.
fn value_to_bytes(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::NULL => None,
        Value::Bytes(bytes) => Some(bytes.clone()),
        other => value_to_string(other).map(String::into_bytes),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::NULL | Value::Bytes(_) => None,
        Value::Int(v) => Some(v.to_string()),
        Value::UInt(v) => Some(v.to_string()),
        Value::Float(v) => Some(v.to_string()),
        Value::Double(v) => Some(v.to_string()),
        Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut s = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if *micros > 0 {
                s.push_str(&format!(".{:06}", micros));
            }
            Some(s)
        }
        Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let total_hours = u32::from(*hours) + days * 24;
            let mut s = format!(
                "{}{:02}:{:02}:{:02}",
                if *negative { "-" } else { "" },
                total_hours,
                minutes,
                seconds
            );
            if *micros > 0 {
                s.push_str(&format!(".{:06}", micros));
            }
            Some(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_null() {
        assert_eq!(value_to_bytes(&Value::NULL), None);
    }

    #[test]
    fn test_value_bytes() {
        let v = Value::Bytes(b"GRANT USAGE ON *.* TO `a`@`%`".to_vec());
        assert_eq!(
            value_to_bytes(&v).as_deref(),
            Some(&b"GRANT USAGE ON *.* TO `a`@`%`"[..])
        );
    }

    #[test]
    fn test_value_binary_hash_bytes_unchanged() {
        let hash = vec![0x24, 0x41, 0x24, 0x0a, 0x2b, 0x5d, 0xff, 0x83, 0x3e];
        assert_eq!(value_to_bytes(&Value::Bytes(hash.clone())), Some(hash));
    }

    #[test]
    fn test_value_numbers() {
        assert_eq!(value_to_bytes(&Value::Int(-3)).as_deref(), Some(&b"-3"[..]));
        assert_eq!(value_to_string(&Value::UInt(42)).as_deref(), Some("42"));
        assert_eq!(value_to_string(&Value::Double(1.5)).as_deref(), Some("1.5"));
    }

    #[test]
    fn test_value_date() {
        let v = Value::Date(2024, 3, 9, 14, 5, 0, 0);
        assert_eq!(value_to_string(&v).as_deref(), Some("2024-03-09 14:05:00"));
        let v = Value::Date(2024, 3, 9, 14, 5, 0, 120);
        assert_eq!(
            value_to_string(&v).as_deref(),
            Some("2024-03-09 14:05:00.000120")
        );
    }

    #[test]
    fn test_value_time() {
        let v = Value::Time(true, 1, 2, 3, 4, 0);
        assert_eq!(value_to_string(&v).as_deref(), Some("-26:03:04"));
    }
}
