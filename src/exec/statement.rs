//! Statement lifecycle management.
//!
//! Resolves a SQL source to something executable, merges the
//! execution-scoped session options, and guarantees that the saved options
//! are restored and any statement this layer prepared is closed before the
//! execution returns - on success, early consumer exit, or failure.

use crate::config::ExecConfig;
use crate::driver::{Connection, QueryOptions, Statement};
use crate::models::ExecutionOptions;
use tracing::warn;

/// The SQL input of one execution.
pub enum SqlSource<'a, S> {
    /// Finished SQL text from a higher-level query. Prepared server-side
    /// when the native-prepared path is enabled, otherwise sent through
    /// the wire protocol directly.
    Text(&'a str),
    /// An externally owned prepared statement. Executed as-is; closing it
    /// stays the caller's responsibility.
    Prepared(&'a mut S),
}

impl<S> SqlSource<'_, S> {
    /// Text shown in logs for this source.
    pub fn display_sql(&self) -> &str {
        match self {
            Self::Text(sql) => sql,
            Self::Prepared(_) => "<prepared statement>",
        }
    }
}

/// Session options merged in for the duration of one execution.
pub(crate) fn session_options(config: &ExecConfig, options: &ExecutionOptions) -> QueryOptions {
    QueryOptions {
        cache_rows: true,
        database_timezone: config.database_timezone,
        application_timezone: config.application_timezone,
        stream: options.stream,
        cast_booleans: config.cast_booleans,
    }
}

/// Tracks what one execution must undo.
///
/// Opened before any driver work, finished after routing - including the
/// consumer callback and any drain, which still need the mutated session
/// options and the open statement.
pub(crate) struct StatementScope<C: Connection> {
    saved: QueryOptions,
    /// Statement prepared by this execution, closed on finish. An
    /// externally supplied statement is never stored here.
    pub(crate) owned: Option<C::Statement>,
}

impl<C: Connection> StatementScope<C> {
    pub(crate) fn open(conn: &C) -> Self {
        Self {
            saved: conn.query_options(),
            owned: None,
        }
    }

    /// Restore the saved session options and close the owned statement,
    /// if any. Cleanup failures are logged and never mask the execution
    /// outcome.
    pub(crate) fn finish(self, conn: &mut C) {
        let Self { saved, owned } = self;
        conn.set_query_options(saved);
        if let Some(mut stmt) = owned {
            if let Err(e) = stmt.close() {
                warn!(error = %e, "failed to close prepared statement");
            }
        }
    }
}
