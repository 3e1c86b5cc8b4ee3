//! Abandoned-stream draining.
//!
//! A streaming result set the consumer walked away from leaves unread rows
//! on the wire; the next statement on that connection would then read
//! protocol frames out of order. Draining consumes the remainder so the
//! connection stays usable.

use crate::driver::Rows;
use tracing::{debug, warn};

/// Consume all remaining rows of an abandoned streaming result.
///
/// Never fails past this layer: if the drain itself errors the connection
/// is already broken and the failure that caused the early exit is the one
/// the caller should see.
pub(crate) fn settle_abandoned<R: Rows>(rows: &mut R) {
    debug!("draining abandoned result stream");
    if let Err(e) = rows.drain() {
        warn!(error = %e, "failed to drain abandoned result stream");
    }
}
