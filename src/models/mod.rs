//! Data models for the execution layer.
//!
//! This module defines the per-call options bag, statement classification,
//! bind values, and the consumer completion signal.

pub mod options;

pub use options::{BindValue, Completion, ExecutionOptions, StatementKind};
