//! Execution dispatcher.
//!
//! Entry point of the crate. Decides the blocking or cooperative strategy
//! for each call, runs the statement through the lifecycle scope, and
//! routes the outcome to the consumer contract: select-like statements
//! yield the result set, everything else yields the live connection.
//!
//! `execute` is an `async fn`, but on the blocking strategy it performs no
//! awaits and completes on its first poll - callers without a scheduler
//! observe a conventional synchronous call.

use crate::config::ExecConfig;
use crate::driver::{Connection, Statement};
use crate::error::{ExecError, ExecResult};
use crate::exec::drain;
use crate::exec::registry::TransportRegistry;
use crate::exec::statement::{SqlSource, StatementScope, session_options};
use crate::exec::strategy::Strategy;
use crate::exec::transport::Direction;
use crate::models::{BindValue, Completion, ExecutionOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Receives the outcome of one execution.
///
/// `Rows` consumers are invoked for select-like statements and report how
/// they finished; on a streaming result, [`Completion::ExitedEarly`] makes
/// the dispatcher drain the remaining rows before returning. `Connection`
/// consumers are invoked with the live connection after a non-select
/// statement. A consumer whose variant does not match the statement kind
/// is not invoked.
pub enum Consumer<'f, C: Connection> {
    Rows(Box<dyn FnMut(&mut C::Rows) -> Completion + 'f>),
    Connection(Box<dyn FnMut(&mut C) + 'f>),
}

impl<'f, C: Connection> Consumer<'f, C> {
    /// Consumer for the result set of a select-like statement.
    pub fn rows(f: impl FnMut(&mut C::Rows) -> Completion + 'f) -> Self {
        Self::Rows(Box::new(f))
    }

    /// Consumer for the connection after a non-select statement.
    pub fn connection(f: impl FnMut(&mut C) + 'f) -> Self {
        Self::Connection(Box::new(f))
    }
}

/// Runs SQL statements over caller-owned connections.
///
/// The dispatcher is stateless apart from its configuration and the shared
/// transport registry; one instance can serve any number of connections,
/// as long as each individual connection is used by one execution at a
/// time.
pub struct Dispatcher {
    config: ExecConfig,
    registry: Arc<TransportRegistry>,
}

impl Dispatcher {
    /// Create a dispatcher with its own transport registry.
    pub fn new(config: ExecConfig) -> Self {
        Self {
            config,
            registry: Arc::new(TransportRegistry::new()),
        }
    }

    /// Create a dispatcher sharing an existing transport registry.
    pub fn with_registry(config: ExecConfig, registry: Arc<TransportRegistry>) -> Self {
        Self { config, registry }
    }

    /// The transport registry, for pool layers that need to evict handles
    /// when connections are torn down.
    pub fn registry(&self) -> &Arc<TransportRegistry> {
        &self.registry
    }

    /// The active configuration.
    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Execute SQL on the given connection.
    ///
    /// With no cooperative scheduler in the calling context this behaves
    /// as a conventional blocking call. Inside a runtime the statement is
    /// issued without blocking the thread, suspending only at the
    /// writable wait before the query and the readable wait before the
    /// fetch.
    ///
    /// Select-like statements return the result set (after the consumer,
    /// if any, has seen it); other statements return `None`. Every driver
    /// or timeout failure surfaces as [`ExecError`].
    pub async fn execute<C: Connection>(
        &self,
        conn: &mut C,
        source: SqlSource<'_, C::Statement>,
        options: &ExecutionOptions,
        consumer: Option<Consumer<'_, C>>,
    ) -> ExecResult<Option<C::Rows>> {
        let strategy = Strategy::detect();
        let mut scope = StatementScope::open(conn);
        let outcome = self
            .drive(conn, source, options, consumer, strategy, &mut scope)
            .await;
        scope.finish(conn);
        outcome
    }

    async fn drive<C: Connection>(
        &self,
        conn: &mut C,
        source: SqlSource<'_, C::Statement>,
        options: &ExecutionOptions,
        consumer: Option<Consumer<'_, C>>,
        strategy: Strategy,
        scope: &mut StatementScope<C>,
    ) -> ExecResult<Option<C::Rows>> {
        let arguments: Vec<BindValue> = options.arguments.iter().map(BindValue::coerce).collect();
        let session = session_options(&self.config, options);
        let logged_sql = match &options.log_sql {
            Some(suffix) => format!("{}{}", source.display_sql(), suffix),
            None => source.display_sql().to_string(),
        };

        let start = Instant::now();
        debug!(
            sql = %logged_sql,
            kind = %options.kind,
            args = arguments.len(),
            stream = options.stream,
            strategy = strategy.name(),
            "executing statement"
        );

        let rows = match source {
            SqlSource::Prepared(stmt) => {
                conn.set_query_options(session);
                stmt.execute(&arguments).map_err(ExecError::driver)?
            }
            SqlSource::Text(sql) if options.native_prepared => {
                let mut stmt = conn.prepare(sql).map_err(ExecError::driver)?;
                conn.set_query_options(session);
                let result = stmt.execute(&arguments);
                // Owned by the scope from here on; a failed execute still
                // closes the statement.
                scope.owned = Some(stmt);
                result.map_err(ExecError::driver)?
            }
            SqlSource::Text(sql) => match strategy {
                Strategy::Blocking => conn.query(sql, &session).map_err(ExecError::driver)?,
                Strategy::Cooperative => {
                    let handle = self.registry.handle_for(conn.transport_id()).await?;
                    handle
                        .wait(Direction::Writable, self.config.wait_timeout)
                        .await?;
                    conn.start_query(sql, &session).map_err(ExecError::driver)?;
                    handle
                        .wait(Direction::Readable, self.config.wait_timeout)
                        .await?;
                    conn.fetch_result().map_err(ExecError::driver)?
                }
            },
        };

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "statement finished"
        );

        Ok(route(conn, rows, options, consumer))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(ExecConfig::default())
    }
}

/// Route the raw result to the consumer contract.
fn route<C: Connection>(
    conn: &mut C,
    mut rows: C::Rows,
    options: &ExecutionOptions,
    consumer: Option<Consumer<'_, C>>,
) -> Option<C::Rows> {
    if options.kind.returns_rows() {
        if let Some(Consumer::Rows(mut on_rows)) = consumer {
            if options.stream {
                if on_rows(&mut rows) == Completion::ExitedEarly {
                    drain::settle_abandoned(&mut rows);
                }
            } else {
                on_rows(&mut rows);
            }
        }
        Some(rows)
    } else {
        if let Some(Consumer::Connection(mut on_conn)) = consumer {
            on_conn(conn);
        }
        None
    }
}
