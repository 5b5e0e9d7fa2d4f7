//! Main router implementation.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error};

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::params::Params;
use crate::path::PathPattern;
use crate::request::{Method, Request};
use crate::response::Response;
use crate::table::{RouteRecord, RouteTable};

/// A boxed future for async handlers.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A boxed async handler function.
pub type Handler = Arc<dyn Fn(Request, Params) -> BoxFuture<'static, Response> + Send + Sync>;

/// Builds the response for a request whose handling panicked or whose form
/// data could not be parsed.
///
/// The request it receives carries no body. A panic inside the panic handler
/// is caught as well and answered with an empty `500`.
pub type PanicHandler = Arc<dyn Fn(&Request, &RouterError) -> Response + Send + Sync>;

/// The main router for handling HTTP requests.
///
/// Routes are registered through `&mut self` methods during setup. Serving
/// only needs `&self`, so a fully built router can be shared between tasks
/// behind an [`Arc`] without locking.
#[derive(Clone, Default)]
pub struct Router {
    /// Registered routes.
    table: RouteTable,
    /// Optional custom panic handler.
    panic_handler: Option<PanicHandler>,
    config: RouterConfig,
}

impl Router {
    /// Creates a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty router with the given configuration.
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the router configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Sets the handler called when request handling panics.
    ///
    /// Without one, such requests get an empty `500` response.
    pub fn panic_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Request, &RouterError) -> Response + Send + Sync + 'static,
    {
        self.panic_handler = Some(Arc::new(handler));
    }

    /// Registers a handler for `method` and `pattern`.
    ///
    /// Patterns may end with a named parameter:
    ///
    /// ```
    /// use tinymux::{Params, Request, Response, Router};
    ///
    /// async fn user(_req: Request, params: Params) -> Response {
    ///     Response::text(format!("user {}", params.get("id").unwrap_or_default()))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.route("GET", "/api/users/:id", user).unwrap();
    /// assert!(router.route("GET", "/API/Users/:id/", user).is_err());
    /// ```
    ///
    /// Only one parameter is supported and it must be the last segment.
    pub fn route<M, F, Fut>(&mut self, method: M, pattern: &str, handler: F) -> Result<()>
    where
        M: Into<Method>,
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let pattern = PathPattern::new(pattern)?;
        let handler: Handler = Arc::new(move |req, params| -> BoxFuture<'static, Response> {
            Box::pin(handler(req, params))
        });
        self.table
            .insert(method.into(), &pattern, handler, self.config.param_conflict)
    }

    /// Adds a GET route.
    pub fn get<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Get, pattern, handler)
    }

    /// Adds a PUT route.
    pub fn put<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Put, pattern, handler)
    }

    /// Adds a POST route.
    pub fn post<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Post, pattern, handler)
    }

    /// Adds a PATCH route.
    pub fn patch<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Patch, pattern, handler)
    }

    /// Adds a DELETE route.
    pub fn delete<F, Fut>(&mut self, pattern: &str, handler: F) -> Result<()>
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.route(Method::Delete, pattern, handler)
    }

    /// Returns every registered `(method, canonical path)` pair.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> {
        self.table
            .records()
            .flat_map(|record| record.methods().map(move |m| (m, record.path())))
    }

    /// Finds the route record for a request path, along with the value of
    /// its trailing parameter (empty for exact matches).
    pub fn resolve(&self, path: &str) -> Option<(&RouteRecord, String)> {
        self.table.resolve(path)
    }

    /// Handles a request and writes the outcome into `response`.
    pub async fn serve(&self, response: &mut Response, request: Request) {
        *response = self.handle(request).await;
    }

    /// Handles an incoming request.
    ///
    /// Never fails: unknown paths produce `404`, known paths without a
    /// handler for the method produce `405` with an `Allow` header, and
    /// panics or unreadable form data go to the panic handler (or an empty
    /// `500`). A panic only affects the request that raised it.
    pub async fn handle(&self, request: Request) -> Response {
        // The body moves into the handler.
        let head = request.head();
        let outcome = AssertUnwindSafe(self.dispatch(request))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => self.recover(&head, &err),
            Err(payload) => {
                let err = RouterError::HandlerPanic(panic_message(&*payload));
                self.recover(&head, &err)
            }
        }
    }

    async fn dispatch(&self, request: Request) -> Result<Response> {
        let Some((record, value)) = self.table.resolve(&request.path) else {
            debug!(method = %request.method, path = %request.path, "no route");
            return Ok(Response::not_found());
        };

        let Some(handler) = record.handler(&request.method) else {
            let allow = record.allow(&self.config.allow_separator);
            debug!(method = %request.method, path = %request.path, %allow, "method not allowed");
            return Ok(Response::method_not_allowed(allow));
        };

        let mut params = request.form(self.config.max_form_bytes)?;
        if let Some(name) = record.param() {
            params.prepend(name, value);
        }

        Ok(handler(request, params).await)
    }

    fn recover(&self, request: &Request, err: &RouterError) -> Response {
        error!(method = %request.method, path = %request.path, error = %err, "request failed");
        let Some(handler) = &self.panic_handler else {
            return Response::internal_server_error();
        };
        std::panic::catch_unwind(AssertUnwindSafe(|| handler(request, err))).unwrap_or_else(
            |payload| {
                error!(
                    method = %request.method,
                    path = %request.path,
                    panic = %panic_message(&*payload),
                    "panic handler panicked"
                );
                Response::internal_server_error()
            },
        )
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
