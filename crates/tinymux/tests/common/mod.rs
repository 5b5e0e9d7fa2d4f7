#![allow(dead_code)]

use tinymux::{Params, Request, Response, Router};

/// Installs a test subscriber so router logs show up in failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Echoes the handler name and every parameter, sorted by name.
pub fn echo(
    name: &'static str,
) -> impl Fn(Request, Params) -> std::future::Ready<Response> + Clone {
    move |req: Request, params: Params| {
        let mut pairs: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{k}={}", v.join(",")))
            .collect();
        pairs.sort();
        std::future::ready(Response::text(format!(
            "{name} {} [{}]",
            req.method,
            pairs.join(" ")
        )))
    }
}

pub async fn send(router: &Router, req: Request) -> Response {
    router.handle(req).await
}

pub fn body(res: &Response) -> String {
    res.body_string()
        .unwrap_or_else(|| panic!("non UTF-8 body for status {}", res.status))
}
