//! Shared test driver.
//!
//! A scripted in-process driver over a `UnixStream` socketpair. The local
//! end is the connection's transport; `start_query` writes one byte from
//! the peer side (the "server response"), and `fetch_result` consumes it.
//! The dispatcher's readable wait therefore only completes if the query
//! was actually issued first, which exercises the real readiness protocol
//! end to end.

// Not every test binary touches every helper.
#![allow(dead_code)]

use db_exec::{BindValue, Connection, QueryOptions, Rows, Statement, TransportId};
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::io::{Read, Write};
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::sync::{Arc, Mutex, Once};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Scripted result cursor.
#[derive(Debug)]
pub struct MockRows {
    rows: VecDeque<JsonValue>,
}

impl MockRows {
    fn new(rows: Vec<JsonValue>) -> Self {
        Self { rows: rows.into() }
    }

    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl Rows for MockRows {
    type Error = MockError;
    type Row = JsonValue;

    fn next_row(&mut self) -> Result<Option<JsonValue>, MockError> {
        Ok(self.rows.pop_front())
    }
}

/// Scripted prepared-statement handle.
pub struct MockStatement {
    events: Arc<Mutex<Vec<String>>>,
    results: Arc<Mutex<VecDeque<Vec<JsonValue>>>>,
    bound: Arc<Mutex<Vec<BindValue>>>,
    fail_execute: bool,
    pub closed: bool,
}

impl Statement for MockStatement {
    type Error = MockError;
    type Rows = MockRows;

    fn execute(&mut self, arguments: &[BindValue]) -> Result<MockRows, MockError> {
        self.events.lock().unwrap().push("execute".to_string());
        *self.bound.lock().unwrap() = arguments.to_vec();
        if self.fail_execute {
            return Err(MockError("execute failed".to_string()));
        }
        let rows = self.results.lock().unwrap().pop_front().unwrap_or_default();
        Ok(MockRows::new(rows))
    }

    fn close(&mut self) -> Result<(), MockError> {
        self.events.lock().unwrap().push("close".to_string());
        self.closed = true;
        Ok(())
    }
}

/// Scripted connection over a socketpair transport.
pub struct MockConnection {
    local: UnixStream,
    peer: UnixStream,
    options: QueryOptions,
    events: Arc<Mutex<Vec<String>>>,
    results: Arc<Mutex<VecDeque<Vec<JsonValue>>>>,
    bound: Arc<Mutex<Vec<BindValue>>>,
    respond_on_start: bool,
    fail_execute: bool,
}

impl MockConnection {
    pub fn new() -> Self {
        let (local, peer) = UnixStream::pair().expect("socketpair");
        Self {
            local,
            peer,
            options: QueryOptions::default(),
            events: Arc::new(Mutex::new(Vec::new())),
            results: Arc::new(Mutex::new(VecDeque::new())),
            bound: Arc::new(Mutex::new(Vec::new())),
            respond_on_start: true,
            fail_execute: false,
        }
    }

    /// Never answer an issued query; the readable wait will starve.
    pub fn silent(mut self) -> Self {
        self.respond_on_start = false;
        self
    }

    /// Make statement execution fail.
    pub fn with_failing_execute(mut self) -> Self {
        self.fail_execute = true;
        self
    }

    /// Queue a result set for the next statement.
    pub fn push_result(&self, rows: Vec<JsonValue>) {
        self.results.lock().unwrap().push_back(rows);
    }

    /// An externally owned prepared statement sharing this connection's
    /// script.
    pub fn external_statement(&self) -> MockStatement {
        MockStatement {
            events: Arc::clone(&self.events),
            results: Arc::clone(&self.results),
            bound: Arc::clone(&self.bound),
            fail_execute: self.fail_execute,
            closed: false,
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn bound_arguments(&self) -> Vec<BindValue> {
        self.bound.lock().unwrap().clone()
    }
}

impl Connection for MockConnection {
    type Error = MockError;
    type Statement = MockStatement;
    type Rows = MockRows;

    fn transport_id(&self) -> TransportId {
        TransportId::from(self.local.as_raw_fd())
    }

    fn query_options(&self) -> QueryOptions {
        self.options.clone()
    }

    fn set_query_options(&mut self, options: QueryOptions) {
        self.options = options;
    }

    fn prepare(&mut self, sql: &str) -> Result<MockStatement, MockError> {
        self.events.lock().unwrap().push(format!("prepare:{sql}"));
        Ok(MockStatement {
            events: Arc::clone(&self.events),
            results: Arc::clone(&self.results),
            bound: Arc::clone(&self.bound),
            fail_execute: self.fail_execute,
            closed: false,
        })
    }

    fn query(&mut self, sql: &str, _options: &QueryOptions) -> Result<MockRows, MockError> {
        self.events.lock().unwrap().push(format!("query:{sql}"));
        let rows = self.results.lock().unwrap().pop_front().unwrap_or_default();
        Ok(MockRows::new(rows))
    }

    fn start_query(&mut self, sql: &str, _options: &QueryOptions) -> Result<(), MockError> {
        self.events.lock().unwrap().push(format!("start:{sql}"));
        if self.respond_on_start {
            self.peer
                .write_all(&[1])
                .map_err(|e| MockError(e.to_string()))?;
        }
        Ok(())
    }

    fn fetch_result(&mut self) -> Result<MockRows, MockError> {
        self.events.lock().unwrap().push("fetch".to_string());
        let mut byte = [0u8; 1];
        self.local
            .read_exact(&mut byte)
            .map_err(|e| MockError(e.to_string()))?;
        let rows = self.results.lock().unwrap().pop_front().unwrap_or_default();
        Ok(MockRows::new(rows))
    }
}

/// Initialize test logging once; honors `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
