//! Driver seam: the contract a connection must expose to be driven by the
//! execution layer.
//!
//! The execution core owns no wire protocol of its own. It sits between a
//! higher query-building layer and a lower-level driver, and consumes the
//! driver through these traits: a synchronous `query` for the blocking
//! path, a `start_query`/`fetch_result` pair for the cooperative path, and
//! a prepared-statement handle for the native-prepared path.
//!
//! None of the trait methods may block the calling task on the cooperative
//! path: `start_query` issues the statement and returns, `fetch_result`
//! collects a result that readiness polling has already confirmed. The
//! suspension points live in the execution layer, not in the driver.

use crate::config::Timezone;
use crate::models::BindValue;
use std::os::unix::io::RawFd;

/// Native transport identifier of a connection, used as the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransportId(RawFd);

impl TransportId {
    /// The underlying raw descriptor.
    pub fn raw(&self) -> RawFd {
        self.0
    }
}

impl From<RawFd> for TransportId {
    fn from(fd: RawFd) -> Self {
        Self(fd)
    }
}

impl std::fmt::Display for TransportId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The mutable per-session query-options record.
///
/// The dispatcher saves this record on entry, merges execution-scoped
/// settings into it for the duration of the call, and restores the saved
/// copy on every exit path.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Whether the driver caches fetched rows for re-iteration.
    pub cache_rows: bool,
    /// Timezone the driver uses to interpret server values.
    pub database_timezone: Timezone,
    /// Timezone values are converted to before reaching the caller.
    pub application_timezone: Timezone,
    /// Whether the result set is delivered incrementally.
    pub stream: bool,
    /// Whether single-bit integer columns are cast to booleans.
    pub cast_booleans: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            cache_rows: true,
            database_timezone: Timezone::Utc,
            application_timezone: Timezone::Utc,
            stream: false,
            cast_booleans: true,
        }
    }
}

/// A single database session, owned by the caller and passed by reference
/// into every execution.
///
/// Two executions on the same connection must not be interleaved; the
/// protocol is not pipelined. Callers serialize access per connection.
/// Independent connections may execute fully concurrently.
pub trait Connection {
    /// Driver-level error type, wrapped into the domain error at the
    /// execution boundary.
    type Error: std::error::Error + Send + Sync + 'static;
    /// Server-side prepared statement handle.
    type Statement: Statement<Error = Self::Error, Rows = Self::Rows>;
    /// Result set, materialized or streaming.
    type Rows: Rows<Error = Self::Error>;

    /// Native transport identifier for registry lookups.
    fn transport_id(&self) -> TransportId;

    /// Snapshot of the current per-session query options.
    fn query_options(&self) -> QueryOptions;

    /// Replace the per-session query options.
    fn set_query_options(&mut self, options: QueryOptions);

    /// Prepare a server-side statement from SQL text.
    fn prepare(&mut self, sql: &str) -> Result<Self::Statement, Self::Error>;

    /// Execute SQL synchronously, blocking until the result is ready.
    fn query(&mut self, sql: &str, options: &QueryOptions) -> Result<Self::Rows, Self::Error>;

    /// Issue SQL on the wire without waiting for the result.
    fn start_query(&mut self, sql: &str, options: &QueryOptions) -> Result<(), Self::Error>;

    /// Collect the result of a previously issued `start_query`. Only
    /// called after the transport signaled readability.
    fn fetch_result(&mut self) -> Result<Self::Rows, Self::Error>;
}

/// A server-side prepared statement.
///
/// Statements created by the execution layer are closed by it before the
/// execution returns; externally supplied statements are never closed here.
pub trait Statement {
    type Error: std::error::Error + Send + Sync + 'static;
    type Rows;

    /// Execute with the given bind values.
    fn execute(&mut self, arguments: &[BindValue]) -> Result<Self::Rows, Self::Error>;

    /// Release the server-side handle.
    fn close(&mut self) -> Result<(), Self::Error>;
}

/// A result set cursor.
///
/// A streaming result set left partially consumed desynchronizes the wire;
/// the execution layer drains abandoned streams through [`Rows::drain`].
pub trait Rows {
    type Error: std::error::Error + Send + Sync + 'static;
    type Row;

    /// Advance the cursor, returning `None` when exhausted.
    fn next_row(&mut self) -> Result<Option<Self::Row>, Self::Error>;

    /// Consume all remaining rows without processing them.
    fn drain(&mut self) -> Result<(), Self::Error> {
        while self.next_row()?.is_some() {}
        Ok(())
    }
}
