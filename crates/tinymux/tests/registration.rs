//! Tests for route registration and resolution.

mod common;
use common::*;

use proptest::prelude::*;
use tinymux::{
    Method, ParamConflict, Request, Router, RouterConfig, RouterError, normalize, parse_pattern,
};

fn assert_normalized(path: &str) -> Result<(), TestCaseError> {
    let once = normalize(path);
    prop_assert_eq!(normalize(&once), once.clone());
    prop_assert!(once.starts_with('/'));
    prop_assert!(!once.contains("//"));
    prop_assert!(!once.contains('\\'));
    prop_assert!(once == "/" || !once.ends_with('/'));
    Ok(())
}

proptest! {
    #[test]
    fn normalize_is_idempotent(path in "\\PC{0,24}") {
        assert_normalized(&path)?;
    }

    #[test]
    fn normalize_is_idempotent_on_separator_runs(path in "[/\\\\aZ:é]{0,24}") {
        assert_normalized(&path)?;
    }
}

#[test]
fn normalize_known_inputs() {
    assert_eq!(normalize("/API//Test/"), "/api/test");
    assert_eq!(normalize("\\/\\/x"), "/x");
    assert_eq!(normalize("///"), "/");
    assert_eq!(normalize("/a\\"), "/a");
}

#[test]
fn duplicate_registration_fails() {
    let mut router = Router::new();
    router.get("/api/test", echo("first")).unwrap();

    let err = router.get("/api/test", echo("second")).unwrap_err();
    assert!(matches!(
        err,
        RouterError::DuplicateHandler { ref method, ref path } if method == "GET" && path == "/api/test"
    ));
    assert!(err.is_registration());

    // Same route after normalization.
    assert!(router.get("/API/Test/", echo("third")).is_err());
    assert!(router.post("/api/test", echo("post")).is_ok());
}

#[test]
fn duplicate_param_route_fails_even_with_other_name() {
    let mut router = Router::new();
    router.get("/users/:id", echo("a")).unwrap();
    let err = router.get("/users/:name", echo("b")).unwrap_err();
    assert!(matches!(err, RouterError::DuplicateHandler { .. }));
}

#[test]
fn invalid_param_names_fail() {
    let mut router = Router::new();
    for pattern in ["/api/:id/more", "/api/:a:b", "/api/:x\\y"] {
        let err = router.get(pattern, echo("bad")).unwrap_err();
        assert!(
            matches!(err, RouterError::InvalidParamName { .. }),
            "pattern {pattern}: {err}"
        );
    }
    assert!(router.table().is_empty());
}

#[test]
fn parse_pattern_keeps_marker() {
    assert_eq!(
        parse_pattern("/api/users/:id").unwrap(),
        ("/api/users/:".to_string(), "id".to_string())
    );
    assert_eq!(
        parse_pattern("api/users").unwrap(),
        ("/api/users".to_string(), String::new())
    );
}

#[test]
fn resolve_extracts_trailing_value() {
    let mut router = Router::new();
    router.get("/api/users/:id", echo("user")).unwrap();

    let (record, value) = router.resolve("/api/users/42").unwrap();
    assert_eq!(record.path(), "/api/users/:");
    assert_eq!(value, "42");
    assert!(record.handler(&Method::Get).is_some());
    assert!(record.handler(&Method::Post).is_none());

    assert!(router.resolve("/api/users").is_none());
    assert!(router.resolve("/api/users/42/friends").is_none());
    assert!(router.resolve("/api/people/42").is_none());
}

#[test]
fn first_registration_fixes_param_name() {
    init_tracing();
    let mut router = Router::new();
    router.get("/users/:id", echo("get")).unwrap();
    router.put("/users/:name", echo("put")).unwrap();

    let (record, _) = router.resolve("/users/5").unwrap();
    assert_eq!(record.param(), Some("id"));
}

#[tokio::test]
async fn first_wins_name_is_used_for_dispatch() {
    let mut router = Router::new();
    router.get("/users/:id", echo("get")).unwrap();
    router.put("/users/:name", echo("put")).unwrap();

    let res = send(&router, Request::put("/users/5")).await;
    assert_eq!(body(&res), "put PUT [id=5]");
}

#[test]
fn reject_policy_refuses_conflicting_names() {
    let config = RouterConfig::default().param_conflict(ParamConflict::Reject);
    let mut router = Router::with_config(config);
    router.get("/users/:id", echo("get")).unwrap();

    let err = router.put("/users/:name", echo("put")).unwrap_err();
    assert!(matches!(
        err,
        RouterError::ParamNameConflict { ref existing, ref requested, .. }
            if existing == "id" && requested == "name"
    ));
    assert!(router.put("/users/:id", echo("put")).is_ok());
}

#[test]
fn literal_and_param_routes_conflict_under_reject() {
    let config = RouterConfig::default().param_conflict(ParamConflict::Reject);
    let mut router = Router::with_config(config);
    router.get("/users/:", echo("empty")).unwrap();
    assert!(router.post("/users/:id", echo("named")).is_err());
}

#[test]
fn routes_lists_registrations() {
    let mut router = Router::new();
    router.get("/a", echo("a")).unwrap();
    router.delete("/a", echo("a")).unwrap();
    router.route(Method::Options, "/b/:id", echo("b")).unwrap();

    let mut routes: Vec<String> = router
        .routes()
        .map(|(method, path)| format!("{method} {path}"))
        .collect();
    routes.sort();
    assert_eq!(routes, ["DELETE /a", "GET /a", "OPTIONS /b/:"]);
    assert_eq!(router.table().len(), 2);
}
