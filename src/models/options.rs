//! Per-call execution options and bind values.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Classification of a statement, used to route results.
///
/// Only `Select` statements produce a result set for the consumer; all
/// other kinds hand the consumer the live connection instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// Whether statements of this kind produce rows.
    pub fn returns_rows(&self) -> bool {
        matches!(self, Self::Select)
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Select => write!(f, "select"),
            Self::Insert => write!(f, "insert"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A bind value for parameterized statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindValue {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Binary data (base64 encoded in JSON)
    #[serde(with = "base64_bytes")]
    Bytes(Vec<u8>),
    /// JSON value
    Json(JsonValue),
}

impl BindValue {
    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the type name of this value for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
        }
    }

    /// Coerce this value into the form the wire protocol binds.
    ///
    /// Booleans travel as single-bit integers and JSON travels as text;
    /// everything else binds as-is.
    pub fn coerce(&self) -> BindValue {
        match self {
            Self::Bool(v) => Self::Int(i64::from(*v)),
            Self::Json(v) => Self::String(v.to_string()),
            other => other.clone(),
        }
    }
}

/// Custom serialization for binary data as base64.
mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Options recognized for a single execution.
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Statement classification; drives consumer routing.
    pub kind: StatementKind,
    /// Ordered bind values, empty when the statement takes none.
    pub arguments: Vec<BindValue>,
    /// Whether the result set is consumed incrementally.
    pub stream: bool,
    /// Extra text appended to the statement when logging.
    pub log_sql: Option<String>,
    /// Whether to use the server-side prepared-statement path.
    pub native_prepared: bool,
}

impl ExecutionOptions {
    /// Create options for a statement of the given kind, with defaults.
    pub fn new(kind: StatementKind) -> Self {
        Self {
            kind,
            arguments: Vec::new(),
            stream: false,
            log_sql: None,
            native_prepared: false,
        }
    }

    /// Add a bind value.
    pub fn with_argument(mut self, value: BindValue) -> Self {
        self.arguments.push(value);
        self
    }

    /// Replace the bind values.
    pub fn with_arguments(mut self, values: Vec<BindValue>) -> Self {
        self.arguments = values;
        self
    }

    /// Consume the result set incrementally.
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }

    /// Append extra text to the statement when logging.
    pub fn with_log_sql(mut self, suffix: impl Into<String>) -> Self {
        self.log_sql = Some(suffix.into());
        self
    }

    /// Use the server-side prepared-statement path.
    pub fn prepared(mut self) -> Self {
        self.native_prepared = true;
        self
    }
}

/// How a row consumer finished.
///
/// `ExitedEarly` tells the dispatcher the streamed result was abandoned
/// and its remaining rows must be drained to keep the wire in sync. A
/// consumer that processed everything it wanted - even zero rows -
/// returns `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Completed,
    ExitedEarly,
}
