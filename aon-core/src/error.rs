//! Engine error types.
//!
//! Every error is reported across the C ABI as its `Display` message, so the
//! messages are written to be read by whoever called the host function.

use thiserror::Error;

/// Errors produced while converting between JSON and AON.
#[derive(Debug, Error)]
pub enum Error {
    /// The JSON input could not be parsed, or a value could not be written.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// A null pointer was passed through the C ABI.
    #[error("null pointer")]
    NullPointer,

    /// An argument passed through the C ABI was not valid UTF-8.
    #[error("invalid UTF-8 in {0}")]
    InvalidUtf8(&'static str),

    /// The converted text cannot be returned as a C string.
    #[error("output contains an interior NUL byte")]
    InteriorNul,

    #[error("invalid root schema name '{0}'")]
    InvalidRootName(String),

    #[error("JSON root must be an array or object")]
    InvalidRoot,

    #[error("empty JSON document")]
    EmptyDocument,

    #[error("root schema '{0}' not found")]
    RootSchemaNotFound(String),

    #[error("row {0} of the JSON document is not an object")]
    NonObjectRow(usize),

    /// Field names end up in schema definitions and cannot contain AON
    /// punctuation, whitespace or control characters.
    #[error("unsupported field name '{0}'")]
    UnsupportedFieldName(String),

    /// A field holds lists in some objects and nested objects in others.
    #[error("field '{0}' holds both lists and objects")]
    MixedField(String),

    /// AON lists cannot contain lists.
    #[error("field '{0}' holds a list nested in a list")]
    NestedList(String),

    #[error("missing !aon header")]
    MissingHeader,

    #[error("missing end marker")]
    MissingEnd,

    #[error("no schemas found")]
    NoSchemas,

    #[error("unexpected line '{0}'")]
    UnexpectedLine(String),

    #[error("malformed schema line '{0}'")]
    MalformedSchema(String),

    #[error("malformed count line 'count:{0}'")]
    MalformedCount(String),

    #[error("data row {row} size mismatch: expected {expected}, got {found}")]
    RowSizeMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("object of schema '{schema}' size mismatch: expected {expected}, got {found}")]
    ObjectSizeMismatch {
        schema: String,
        expected: usize,
        found: usize,
    },

    #[error("count mismatch: header says {expected}, found {found}")]
    CountMismatch { expected: usize, found: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
