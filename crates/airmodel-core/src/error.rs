//! Error types for AirModel operations.

use std::fmt;

/// The primary error type for all AirModel operations.
#[derive(Debug)]
pub enum Error {
    /// A condition or sort key could not be resolved to a backend field
    InvalidField(FieldError),
    /// A scope was registered with an unusable name or body
    InvalidScopeBody(ScopeError),
    /// A scope name is not registered for the model being queried
    UnknownScope {
        /// Table of the model the relation is rooted at
        model: &'static str,
        /// The scope that was requested
        scope: String,
    },
    /// A required lookup matched no records
    RecordNotFound(NotFoundError),
    /// Errors raised by the record store, passed through untouched
    Store(StoreError),
    /// Value conversion errors
    Type(TypeError),
    /// Serialization/deserialization errors
    Serde(String),
    /// Custom error with message
    Custom(String),
}

#[derive(Debug)]
pub struct FieldError {
    /// Logical field name as supplied, if any
    pub field: Option<String>,
    pub message: String,
}

#[derive(Debug)]
pub struct ScopeError {
    pub model: &'static str,
    pub scope: String,
    pub message: String,
}

#[derive(Debug)]
pub struct NotFoundError {
    pub table: &'static str,
    /// Compiled filter formula that matched nothing
    pub filter: Option<String>,
}

#[derive(Debug)]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    /// Could not reach the remote store
    Connection,
    /// Credentials were rejected
    Authentication,
    /// Base or table does not exist
    NotFound,
    /// The store rejected the request parameters (bad formula, unknown field)
    InvalidRequest,
    /// Request quota exceeded
    RateLimited,
    /// Any other remote failure
    Remote,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub field: Option<String>,
    pub rust_type: Option<&'static str>,
}

impl Error {
    /// Build an `InvalidField` error.
    pub fn invalid_field(field: Option<&str>, message: impl Into<String>) -> Self {
        Error::InvalidField(FieldError {
            field: field.map(str::to_string),
            message: message.into(),
        })
    }

    /// Build an `InvalidScopeBody` error.
    pub fn invalid_scope(
        model: &'static str,
        scope: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InvalidScopeBody(ScopeError {
            model,
            scope: scope.into(),
            message: message.into(),
        })
    }

    /// Is this a "no matching record" error?
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::RecordNotFound(_))
    }

    /// Is this an error raised by the record store rather than by query building?
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidField(e) => write!(f, "Invalid field: {}", e),
            Error::InvalidScopeBody(e) => write!(f, "Invalid scope: {}", e),
            Error::UnknownScope { model, scope } => {
                write!(f, "Unknown scope '{}' for model '{}'", scope, model)
            }
            Error::RecordNotFound(e) => write!(f, "{}", e),
            Error::Store(e) => write!(f, "Store error: {}", e),
            Error::Type(e) => write!(f, "Type error: {}", e),
            Error::Serde(msg) => write!(f, "Serialization error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Store(e) => e
                .source
                .as_deref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "'{}': {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scope '{}' on model '{}': {}",
            self.scope, self.model, self.message
        )
    }
}

impl fmt::Display for NotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Some(filter) => write!(f, "Record not found in '{}' for {}", self.table, filter),
            None => write!(f, "Record not found in '{}'", self.table),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(
                f,
                "expected {} for field '{}', found {}",
                self.expected, field, self.actual
            )
        } else {
            write!(f, "expected {}, found {}", self.expected, self.actual)
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Store(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err.to_string())
    }
}

/// Result type alias for AirModel operations.
pub type Result<T> = std::result::Result<T, Error>;
