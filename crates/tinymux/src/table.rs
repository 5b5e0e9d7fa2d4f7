//! Route table and lookup.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::config::ParamConflict;
use crate::error::{Result, RouterError};
use crate::path::{PARAM_MARKER, PathPattern, normalize};
use crate::request::Method;
use crate::router::Handler;

/// Handlers registered for one canonical path.
#[derive(Clone)]
pub struct RouteRecord {
    /// Canonical path key.
    path: String,
    /// Parameter name, empty when the path has none.
    param: String,
    /// Handlers in registration order.
    methods: Vec<(Method, Handler)>,
}

impl RouteRecord {
    fn new(path: &str, param: &str) -> Self {
        Self {
            path: path.to_string(),
            param: param.to_string(),
            methods: Vec::new(),
        }
    }

    /// Returns the canonical path key.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the parameter name, if the path has one.
    pub fn param(&self) -> Option<&str> {
        (!self.param.is_empty()).then_some(self.param.as_str())
    }

    /// Returns the handler for `method`.
    pub fn handler(&self, method: &Method) -> Option<&Handler> {
        self.methods
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, h)| h)
    }

    /// Returns the registered methods in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter().map(|(m, _)| m)
    }

    /// Builds the value of an `Allow` header.
    pub fn allow(&self, separator: &str) -> String {
        self.methods()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl fmt::Debug for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRecord")
            .field("path", &self.path)
            .field("param", &self.param)
            .field("methods", &self.methods().collect::<Vec<_>>())
            .finish()
    }
}

/// Maps canonical path keys to route records.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, RouteRecord>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `handler` for `method` on the pattern's canonical path.
    ///
    /// The record for a path is created by its first registration, which
    /// also fixes the parameter name. A later registration with another
    /// name is handled according to `conflict`.
    pub fn insert(
        &mut self,
        method: Method,
        pattern: &PathPattern,
        handler: Handler,
        conflict: ParamConflict,
    ) -> Result<()> {
        let requested = pattern.param().unwrap_or_default();
        let record = self
            .routes
            .entry(pattern.key().to_string())
            .or_insert_with(|| RouteRecord::new(pattern.key(), requested));

        if record.param != requested {
            match conflict {
                ParamConflict::FirstWins => warn!(
                    path = %record.path,
                    existing = %record.param,
                    requested,
                    "parameter name conflict, keeping the first registration"
                ),
                ParamConflict::Reject => {
                    return Err(RouterError::ParamNameConflict {
                        path: record.path.clone(),
                        existing: record.param.clone(),
                        requested: requested.to_string(),
                    });
                }
            }
        }

        if record.handler(&method).is_some() {
            return Err(RouterError::DuplicateHandler {
                method: method.to_string(),
                path: record.path.clone(),
            });
        }

        debug!(%method, path = %record.path, pattern = pattern.pattern(), "registered route");
        record.methods.push((method, handler));
        Ok(())
    }

    /// Returns the record stored under a canonical key.
    pub fn get(&self, key: &str) -> Option<&RouteRecord> {
        self.routes.get(key)
    }

    /// Finds the record for a request path.
    ///
    /// An exact match on the normalized path wins. Otherwise the last
    /// segment is taken as a parameter value and the remaining prefix is
    /// looked up with the `/:` marker appended. Paths with a single segment
    /// never match a parameterized route. The value is empty for exact
    /// matches.
    pub fn resolve(&self, path: &str) -> Option<(&RouteRecord, String)> {
        let path = normalize(path);

        if let Some(record) = self.routes.get(&path) {
            return Some((record, String::new()));
        }

        let i = path.rfind('/').filter(|&i| i > 0)?;
        let key = format!("{}{PARAM_MARKER}", &path[..i]);
        self.routes
            .get(&key)
            .map(|record| (record, path[i + 1..].to_string()))
    }

    /// Returns the number of distinct paths.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns whether no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns an iterator over all records, in no particular order.
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.routes.values()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.values()).finish()
    }
}
