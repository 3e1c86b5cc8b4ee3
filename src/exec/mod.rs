//! Execution core.
//!
//! This module holds the moving parts of the execution layer:
//! - Strategy selection between the blocking and cooperative paths
//! - The transport registry and waitable handles
//! - Statement lifecycle scoping
//! - Abandoned-stream draining
//! - The dispatcher tying it all together

pub mod dispatcher;
pub(crate) mod drain;
pub mod registry;
pub mod statement;
pub(crate) mod strategy;
pub mod transport;

pub use dispatcher::{Consumer, Dispatcher};
pub use registry::TransportRegistry;
pub use statement::SqlSource;
pub use transport::{Direction, TransportHandle};
