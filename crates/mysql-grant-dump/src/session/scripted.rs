//! In-memory session for unit tests.
//!
//! Returns canned result sets keyed by exact statement text and records every
//! statement it receives. Unknown statements succeed with an empty result.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::{ResultSet, SqlSession};
use crate::error::{DumpError, Result};

#[derive(Debug, Default)]
pub(crate) struct ScriptedSession {
    results: HashMap<String, ResultSet>,
    failures: HashSet<String>,
    /// Every statement received, in order.
    pub log: Vec<String>,
    /// Parameters passed to `query_with`, in order.
    pub params: Vec<Vec<String>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(mut self, sql: &str, result: ResultSet) -> Self {
        self.results.insert(sql.to_string(), result);
        self
    }

    pub fn fail_on(mut self, sql: &str) -> Self {
        self.failures.insert(sql.to_string());
        self
    }

    fn respond(&mut self, sql: &str) -> Result<ResultSet> {
        self.log.push(sql.to_string());
        if self.failures.contains(sql) {
            return Err(DumpError::query(sql, "scripted failure"));
        }
        Ok(self.results.get(sql).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl SqlSession for ScriptedSession {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        self.respond(sql).map(|_| ())
    }

    async fn query(&mut self, sql: &str) -> Result<ResultSet> {
        self.respond(sql)
    }

    async fn query_with(&mut self, sql: &str, params: &[&str]) -> Result<ResultSet> {
        self.params
            .push(params.iter().map(|p| (*p).to_string()).collect());
        self.respond(sql)
    }
}
