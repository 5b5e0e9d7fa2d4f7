//! # tinymux
//!
//! A small HTTP request router with named trailing parameters and
//! per-method handlers.
//!
//! This crate provides:
//! - Case-insensitive path matching with slash normalization
//! - One optional named parameter as the last path segment
//! - Per-method handlers with `405 Method Not Allowed` and an `Allow` header
//! - Form parameters merged with the path parameter
//! - Per-request panic recovery
//!
//! ## Quick Start
//!
//! ```
//! use tinymux::{Params, Request, Response, Router};
//!
//! async fn list_users(_req: Request, _params: Params) -> Response {
//!     Response::text("all users")
//! }
//!
//! async fn get_user(_req: Request, params: Params) -> Response {
//!     let id = params.get("id").unwrap_or("unknown");
//!     Response::json(&serde_json::json!({ "id": id }))
//! }
//!
//! let mut router = Router::new();
//! router.get("/api/users", list_users).unwrap();
//! router.get("/api/users/:id", get_user).unwrap();
//!
//! let (record, value) = router.resolve("/API/users/42/").unwrap();
//! assert_eq!(record.param(), Some("id"));
//! assert_eq!(value, "42");
//! ```
//!
//! Requests are served with [`Router::handle`], which always produces a
//! response:
//!
//! ```ignore
//! let response = router.handle(Request::get("/api/users/42")).await;
//! assert_eq!(response.status, 200);
//! ```
//!
//! ## Path Parameters
//!
//! A pattern may end with `/:name`. A request path matches it when no exact
//! route exists and everything before its last segment equals the pattern
//! prefix. The last segment becomes the first value of `name`, ahead of any
//! form values with the same name:
//!
//! ```ignore
//! router.put("/api/users/:id", update_user)?;
//! // PUT /api/users/7?id=8  ->  params.get_all("id") == ["7", "8"]
//! ```
//!
//! Paths are lowercased during matching, so parameter names and values
//! arrive lowercased as well.
//!
//! ## Setup and serving
//!
//! Registration needs `&mut Router`; serving only needs `&Router`. Build the
//! router first, then share it, e.g. behind an `Arc`, with every task that
//! serves requests.
//!
//! ## Parameter name conflicts
//!
//! Registering `/users/:id` and later `/users/:name` for another method
//! targets the same route. By default the first name is kept and a warning
//! is logged; [`ParamConflict::Reject`] turns this into an error.

mod config;
mod error;
mod params;
mod path;
mod request;
mod response;
mod router;
mod table;

pub use config::{DEFAULT_MAX_FORM_BYTES, ParamConflict, RouterConfig};
pub use error::{Result, RouterError};
pub use params::Params;
pub use path::{PathPattern, normalize, parse_pattern};
pub use request::{Method, Request};
pub use response::Response;
pub use router::{BoxFuture, Handler, PanicHandler, Router};
pub use table::{RouteRecord, RouteTable};
