//! Error types for the execution layer.
//!
//! All failures from this crate surface as the single [`ExecError`] type,
//! carrying the original driver cause for diagnostics. Translation happens
//! exactly once at the boundary of an execution call; no retries are
//! performed at this layer.

use std::time::Duration;
use thiserror::Error;

/// Boxed cause type for driver failures.
pub type BoxDynError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ExecError {
    /// A failure signaled by the underlying driver during prepare,
    /// execute, fetch, or drain.
    #[error("driver error: {source}")]
    Driver {
        #[source]
        source: BoxDynError,
    },

    /// A readiness wait exceeded its configured ceiling.
    #[error("timeout: {operation} exceeded {timeout:?}")]
    Timeout { operation: String, timeout: Duration },
}

impl ExecError {
    /// Wrap a driver-level failure.
    pub fn driver(source: impl Into<BoxDynError>) -> Self {
        Self::Driver {
            source: source.into(),
        }
    }

    /// Create a timeout error for a readiness wait that ran out of budget.
    pub fn timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }

    /// Check whether this error wraps a timeout cause.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias for execution-layer operations.
pub type ExecResult<T> = Result<T, ExecError>;
