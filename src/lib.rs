//! db-exec
//!
//! A dual-mode SQL execution core. Statements run over a single,
//! caller-owned connection: with no cooperative scheduler present,
//! execution is a conventional blocking call; inside a tokio runtime the
//! query is issued without blocking the thread, suspending only at the
//! transport readiness waits. The surrounding driver/ORM layer supplies
//! the connection, the finished SQL, and the options bag; this crate owns
//! strategy selection, the transport registry, statement lifecycle, and
//! abandoned-stream draining.

pub mod config;
pub mod driver;
pub mod error;
pub mod exec;
pub mod models;

pub use config::{ExecConfig, Timezone};
pub use driver::{Connection, QueryOptions, Rows, Statement, TransportId};
pub use error::{ExecError, ExecResult};
pub use exec::{Consumer, Direction, Dispatcher, SqlSource, TransportHandle, TransportRegistry};
pub use models::{BindValue, Completion, ExecutionOptions, StatementKind};
