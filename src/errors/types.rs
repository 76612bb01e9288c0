//! # Error Types
//!
//! Error types for the operator built on `thiserror`.

use crate::model::ApiResult;

/// Custom result type for operator calls
pub type Result<T> = std::result::Result<T, OperatorError>;

/// Main error type for the operator
#[derive(thiserror::Error, Debug)]
pub enum OperatorError {
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// The backend answered 404
    #[error("Resource not found: {resource} with ID '{id}'")]
    NotFound { resource: String, id: String },

    /// Any other non-2xx answer, or a 2xx answer whose envelope reports a failure
    #[error("HTTP error: {message} (status: {status})")]
    Http { message: String, status: u16, body: Option<ApiResult> },

    /// Network level failures talking to the backend
    #[error("Transport error: {context}")]
    Transport {
        #[source]
        source: reqwest::Error,
        context: String,
    },

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// YAML serialization errors
    #[error("YAML error: {context}")]
    Yaml {
        #[source]
        source: serde_yaml::Error,
        context: String,
    },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// A `tyk://` URL that cannot be decoded back into a target
    #[error("Invalid internal target '{value}': {reason}")]
    InvalidTarget { value: String, reason: String },

    /// The selected backend has no implementation of the operation
    #[error("Operation '{operation}' is not supported by the {backend} backend")]
    Unsupported { operation: String, backend: String },
}

impl OperatorError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field<S: Into<String>, F: Into<String>>(message: S, field: F) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a not found error
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound { resource: resource.into(), id: id.into() }
    }

    /// Create an HTTP error
    pub fn http<S: Into<String>>(message: S, status: u16) -> Self {
        Self::Http { message: message.into(), status, body: None }
    }

    /// Create an HTTP error carrying the decoded response envelope
    pub fn http_with_body<S: Into<String>>(message: S, status: u16, body: ApiResult) -> Self {
        Self::Http { message: message.into(), status, body: Some(body) }
    }

    /// Create a transport error
    pub fn transport<S: Into<String>>(context: S, source: reqwest::Error) -> Self {
        Self::Transport { source, context: context.into() }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(context: S, source: serde_json::Error) -> Self {
        Self::Serialization { source, context: context.into() }
    }

    /// Create a YAML error
    pub fn yaml<S: Into<String>>(context: S, source: serde_yaml::Error) -> Self {
        Self::Yaml { source, context: context.into() }
    }

    /// Create an I/O error
    pub fn io<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        Self::Io { source, context: context.into() }
    }

    /// Create an invalid internal target error
    pub fn invalid_target<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        Self::InvalidTarget { value: value.into(), reason: reason.into() }
    }

    /// Create an unsupported operation error
    pub fn unsupported<O: Into<String>, B: Into<String>>(operation: O, backend: B) -> Self {
        Self::Unsupported { operation: operation.into(), backend: backend.into() }
    }

    /// HTTP status reported by the backend, if the error came from one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            OperatorError::NotFound { .. } => Some(404),
            OperatorError::Http { status, .. } => Some(*status),
            OperatorError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OperatorError::NotFound { .. })
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, OperatorError::Unsupported { .. })
    }
}

/// Turn a not found error into `Ok(None)`, passing everything else through.
pub fn ignore_not_found<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

impl From<std::io::Error> for OperatorError {
    fn from(error: std::io::Error) -> Self {
        Self::io("I/O operation failed", error)
    }
}

impl From<serde_json::Error> for OperatorError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization("JSON serialization failed", error)
    }
}

impl From<serde_yaml::Error> for OperatorError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::yaml("YAML serialization failed", error)
    }
}

impl From<reqwest::Error> for OperatorError {
    fn from(error: reqwest::Error) -> Self {
        Self::transport("request to backend failed", error)
    }
}

impl From<validator::ValidationErrors> for OperatorError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| e.message.as_ref().map_or("Invalid value".to_string(), |m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(format!("Validation failed: {}", message))
    }
}
