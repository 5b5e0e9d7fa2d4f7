//! Router configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default cap on URL-encoded form bodies (10 MiB).
pub const DEFAULT_MAX_FORM_BYTES: usize = 10 << 20;

/// What to do when a path is registered again with a different parameter
/// name, e.g. `GET /users/:id` followed by `PUT /users/:name`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamConflict {
    /// Keep the name from the first registration and log a warning.
    #[default]
    FirstWins,
    /// Fail the later registration with
    /// [`RouterError::ParamNameConflict`](crate::RouterError::ParamNameConflict).
    Reject,
}

/// Settings for a [`Router`](crate::Router).
///
/// # Example
///
/// ```
/// use tinymux::{ParamConflict, RouterConfig};
///
/// let config = RouterConfig::from_json(r#"{"param_conflict": "reject"}"#).unwrap();
/// assert_eq!(config.param_conflict, ParamConflict::Reject);
/// assert_eq!(config.allow_separator, ", ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Largest form body, in bytes, the dispatcher will parse.
    pub max_form_bytes: usize,
    /// Policy for conflicting parameter names on one path.
    pub param_conflict: ParamConflict,
    /// Separator between method names in the `Allow` header.
    pub allow_separator: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
            param_conflict: ParamConflict::default(),
            allow_separator: ", ".to_string(),
        }
    }
}

impl RouterConfig {
    /// Loads a configuration from a JSON document. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the form body limit.
    #[must_use]
    pub fn max_form_bytes(mut self, limit: usize) -> Self {
        self.max_form_bytes = limit;
        self
    }

    /// Sets the parameter-name conflict policy.
    #[must_use]
    pub fn param_conflict(mut self, policy: ParamConflict) -> Self {
        self.param_conflict = policy;
        self
    }

    /// Sets the `Allow` header separator.
    #[must_use]
    pub fn allow_separator(mut self, separator: impl Into<String>) -> Self {
        self.allow_separator = separator.into();
        self
    }
}
