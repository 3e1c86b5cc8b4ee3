//! Execution strategy selection.
//!
//! One strategy is chosen per call and never mixed within a call: with no
//! cooperative scheduler on the current thread the dispatcher runs the
//! conventional blocking path; inside a runtime it runs the nonblocking
//! path, suspending only at the two readiness waits.

use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    /// No scheduler present: synchronous driver calls, no suspension.
    Blocking,
    /// Scheduler present: readiness waits around the async query pair.
    Cooperative,
}

impl Strategy {
    /// Probe the calling context for a cooperative scheduler.
    pub(crate) fn detect() -> Self {
        if Handle::try_current().is_ok() {
            Self::Cooperative
        } else {
            Self::Blocking
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Blocking => "blocking",
            Self::Cooperative => "cooperative",
        }
    }
}
