//! Waitable transport handles.
//!
//! A [`TransportHandle`] wraps a connection's raw descriptor in a reactor
//! registration so a cooperative task can suspend until the transport is
//! writable or readable. The handle borrows the descriptor; closing it
//! remains the connection's business.

use crate::driver::TransportId;
use crate::error::{ExecError, ExecResult};
use std::os::unix::io::{AsRawFd, RawFd};
use std::time::Duration;
use tokio::io::unix::AsyncFd;
use tokio::io::{Interest, Ready};

/// Direction of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Writable,
    Readable,
}

impl Direction {
    fn interest(&self) -> Interest {
        match self {
            Self::Writable => Interest::WRITABLE,
            Self::Readable => Interest::READABLE,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Writable => write!(f, "writable"),
            Self::Readable => write!(f, "readable"),
        }
    }
}

/// Does not own the descriptor; dropping the wrapper must not close it.
struct BorrowedTransport(RawFd);

impl AsRawFd for BorrowedTransport {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// A waitable wrapper over a connection's transport descriptor.
///
/// At most one readiness wait may be outstanding per handle at a time;
/// the single-writer rule on connections guarantees this.
pub struct TransportHandle {
    id: TransportId,
    inner: AsyncFd<BorrowedTransport>,
}

impl TransportHandle {
    /// Register the descriptor with the reactor. Must be called from
    /// within a runtime context.
    pub(crate) fn new(id: TransportId) -> ExecResult<Self> {
        let inner = AsyncFd::with_interest(
            BorrowedTransport(id.raw()),
            Interest::READABLE.add(Interest::WRITABLE),
        )
        .map_err(ExecError::driver)?;
        Ok(Self { id, inner })
    }

    /// The transport identifier this handle was created for.
    pub fn id(&self) -> TransportId {
        self.id
    }

    /// Suspend the current task until the transport signals the requested
    /// direction, failing with a timeout error once the ceiling elapses.
    pub async fn wait(&self, direction: Direction, timeout: Duration) -> ExecResult<()> {
        match tokio::time::timeout(timeout, self.inner.ready(direction.interest())).await {
            Ok(Ok(mut guard)) => {
                // The driver performs the actual I/O out of band and fully
                // consumes the response before the next wait, so read
                // readiness is cleared here. Write readiness persists
                // between statements.
                if direction == Direction::Readable {
                    guard.clear_ready_matching(Ready::READABLE);
                }
                Ok(())
            }
            Ok(Err(e)) => Err(ExecError::driver(e)),
            Err(_) => Err(ExecError::timeout(format!("{direction} wait"), timeout)),
        }
    }
}

impl std::fmt::Debug for TransportHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportHandle")
            .field("id", &self.id)
            .finish()
    }
}
