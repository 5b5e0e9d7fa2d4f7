//! Error types for routing.

use thiserror::Error;

/// Characters that may not appear in a parameter name.
pub const RESERVED_PARAM_CHARS: &str = "/:";

/// Router-specific errors.
///
/// Registration errors are returned synchronously from
/// [`Router::route`](crate::Router::route) and its wrappers. Request-time
/// errors never leave the dispatcher; they are only handed to a configured
/// panic handler.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The parameter segment of a pattern contains a reserved character.
    #[error("parameter name {name:?} in pattern {pattern:?} cannot contain any of `/:`")]
    InvalidParamName { pattern: String, name: String },

    /// A handler for this path and method combination was already registered.
    #[error("handler for {method} {path} was already registered")]
    DuplicateHandler { method: String, path: String },

    /// The same path was registered with two different parameter names.
    #[error("path {path} already uses parameter {existing:?}, cannot register {requested:?}")]
    ParamNameConflict {
        path: String,
        existing: String,
        requested: String,
    },

    /// The query string or form body could not be decoded.
    #[error("malformed form data: {0}")]
    MalformedForm(String),

    /// The form body exceeds the configured limit.
    #[error("form body exceeds {limit} bytes")]
    FormTooLarge { limit: usize },

    /// A handler panicked while serving a request.
    #[error("handler panicked: {0}")]
    HandlerPanic(String),

    /// The router configuration could not be loaded.
    #[error("invalid router configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl RouterError {
    /// Returns true for errors raised while registering routes.
    pub fn is_registration(&self) -> bool {
        matches!(
            self,
            Self::InvalidParamName { .. }
                | Self::DuplicateHandler { .. }
                | Self::ParamNameConflict { .. }
        )
    }
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
