//! Configuration for the execution layer.
//!
//! The execution core takes no CLI arguments and reads no environment; the
//! surrounding driver layer constructs an [`ExecConfig`] and hands it to the
//! dispatcher. Defaults are documented as module constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default readiness-wait ceiling in seconds, applied per wait.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 5;

/// Timezone applied to values crossing the driver boundary.
///
/// The database timezone governs how the driver interprets server values;
/// the application timezone governs what the caller sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timezone {
    #[default]
    Utc,
    Local,
}

impl std::fmt::Display for Timezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utc => write!(f, "utc"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Session-level settings the dispatcher applies around every execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecConfig {
    /// Ceiling for a single readiness wait. A wait that exceeds it fails
    /// the whole execution; there is no retry.
    pub wait_timeout: Duration,
    /// Timezone the driver uses to interpret server values.
    pub database_timezone: Timezone,
    /// Timezone values are converted to before reaching the caller.
    pub application_timezone: Timezone,
    /// Whether single-bit integer columns are cast to booleans.
    pub cast_booleans: bool,
}

impl ExecConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self {
            wait_timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            database_timezone: Timezone::Utc,
            application_timezone: Timezone::Utc,
            cast_booleans: true,
        }
    }

    /// Set the readiness-wait ceiling.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Set the database/application timezone pair.
    pub fn with_timezones(mut self, database: Timezone, application: Timezone) -> Self {
        self.database_timezone = database;
        self.application_timezone = application;
        self
    }

    /// Set whether single-bit integers are cast to booleans.
    pub fn with_cast_booleans(mut self, cast: bool) -> Self {
        self.cast_booleans = cast;
        self
    }

    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.wait_timeout.is_zero() {
            return Err("wait_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self::new()
    }
}
