//! Path normalization and pattern parsing.

use crate::error::{RESERVED_PARAM_CHARS, Result, RouterError};

/// Marker that ends the canonical key of a parameterized route.
pub const PARAM_MARKER: &str = "/:";

/// Normalizes a path for routing.
///
/// Backslashes become slashes, runs of slashes collapse into one, trailing
/// slashes are dropped (the root path keeps its single slash), the result is
/// lowercased and always starts with exactly one `/`. The function is total
/// and idempotent.
///
/// # Example
///
/// ```
/// use tinymux::normalize;
///
/// assert_eq!(normalize("/API//Test/"), "/api/test");
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("users\\42"), "/users/42");
/// ```
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }

    let mut s = path.replace('\\', "/");
    while s.contains("//") {
        s = s.replace("//", "/");
    }

    let trimmed = s.trim_end_matches('/').to_lowercase();
    if trimmed.starts_with('/') {
        trimmed
    } else {
        format!("/{trimmed}")
    }
}

/// Parses a registration pattern into its canonical key and parameter name.
///
/// The first `/:` in the normalized pattern starts the parameter segment.
/// Everything after it is the parameter name and is dropped from the key,
/// which keeps the `/:` marker. The returned name is empty for patterns
/// without a parameter.
pub fn parse_pattern(pattern: &str) -> Result<(String, String)> {
    let path = normalize(pattern);

    let Some(i) = path.find(PARAM_MARKER) else {
        return Ok((path, String::new()));
    };

    let name = &path[i + PARAM_MARKER.len()..];
    if RESERVED_PARAM_CHARS.chars().any(|c| name.contains(c)) {
        return Err(RouterError::InvalidParamName {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    Ok((path[..i + PARAM_MARKER.len()].to_string(), name.to_string()))
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    /// The pattern as it was registered.
    pattern: String,
    /// Canonical key used by the route table.
    key: String,
    /// Parameter name, empty when the pattern has none.
    param: String,
}

impl PathPattern {
    /// Parses a path pattern string.
    ///
    /// Pattern syntax:
    /// - `/users` - Literal path
    /// - `/users/:id` - Path with a trailing parameter
    ///
    /// # Example
    ///
    /// ```
    /// use tinymux::PathPattern;
    ///
    /// let pattern = PathPattern::new("/Posts/:id").unwrap();
    /// assert_eq!(pattern.key(), "/posts/:");
    /// assert_eq!(pattern.param(), Some("id"));
    /// ```
    pub fn new(pattern: &str) -> Result<Self> {
        let (key, param) = parse_pattern(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            key,
            param,
        })
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the canonical route table key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the parameter name, if the pattern has one.
    pub fn param(&self) -> Option<&str> {
        (!self.param.is_empty()).then_some(self.param.as_str())
    }

    /// Generates a concrete path for this pattern.
    ///
    /// Literal patterns ignore `value`. Parameterized patterns return `None`
    /// when the value is empty or contains a slash, and for a parameter
    /// directly under the root: none of those paths resolve back to this
    /// pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use tinymux::PathPattern;
    ///
    /// let pattern = PathPattern::new("/posts/:id").unwrap();
    /// assert_eq!(pattern.reverse("123"), Some("/posts/123".to_string()));
    /// assert_eq!(pattern.reverse("a/b"), None);
    /// ```
    pub fn reverse(&self, value: &str) -> Option<String> {
        if self.param.is_empty() {
            return Some(self.key.clone());
        }
        if value.is_empty() || value.contains(['/', '\\']) {
            return None;
        }

        let prefix = &self.key[..self.key.len() - PARAM_MARKER.len()];
        if prefix.is_empty() {
            return None;
        }
        Some(format!("{prefix}/{value}"))
    }
}
