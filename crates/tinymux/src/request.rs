//! HTTP request type.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::error::{Result, RouterError};
use crate::params::Params;

/// Content type of URL-encoded form bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP request methods.
///
/// Method names are case-sensitive: `"GET"` parses to [`Method::Get`] while
/// `"get"` is the extension method `Other("get")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET method
    Get,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// HEAD method
    Head,
    /// OPTIONS method
    Options,
    /// Any other method token.
    Other(String),
}

impl Method {
    /// Returns the method as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(s) => s.as_str(),
        }
    }

    /// Returns whether requests with this method may carry a form body.
    pub fn has_form_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl From<&str> for Method {
    fn from(s: &str) -> Self {
        match s {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path, without the query string.
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: String,
    /// Request headers.
    pub headers: HashMap<String, String>,
    /// Request body.
    pub body: Vec<u8>,
}

impl Request {
    /// Creates a new request. A query string in `uri` is split off into
    /// [`Request::query`].
    pub fn new(method: impl Into<Method>, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self {
            method: method.into(),
            path: path.to_string(),
            query: query.to_string(),
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a GET request.
    pub fn get(uri: &str) -> Self {
        Self::new(Method::Get, uri)
    }

    /// Creates a POST request.
    pub fn post(uri: &str) -> Self {
        Self::new(Method::Post, uri)
    }

    /// Creates a PUT request.
    pub fn put(uri: &str) -> Self {
        Self::new(Method::Put, uri)
    }

    /// Creates a DELETE request.
    pub fn delete(uri: &str) -> Self {
        Self::new(Method::Delete, uri)
    }

    /// Sets a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a URL-encoded form body and the matching content type.
    #[must_use]
    pub fn form_body(self, pairs: &[(&str, &str)]) -> Self {
        let body = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        self.header("Content-Type", FORM_CONTENT_TYPE).body(body)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query_param(mut self, key: &str, value: &str) -> Self {
        self.query = form_urlencoded::Serializer::for_suffix(std::mem::take(&mut self.query), 0)
            .append_pair(key, value)
            .finish();
        self
    }

    /// Copies the method, path, query and headers, leaving the body empty.
    pub fn head(&self) -> Self {
        Self {
            method: self.method.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            headers: self.headers.clone(),
            body: Vec::new(),
        }
    }

    /// Gets a header value.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        // Case-insensitive header lookup
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns whether the body is a URL-encoded form.
    pub fn is_form(&self) -> bool {
        self.get_header("Content-Type").is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|media| media.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        })
    }

    /// Parses form parameters.
    ///
    /// Body values come first, followed by query string values. The body is
    /// only read for `POST`, `PUT` and `PATCH` requests with a URL-encoded
    /// content type, and must not exceed `max_body` bytes.
    pub fn form(&self, max_body: usize) -> Result<Params> {
        let mut params = Params::new();

        if self.method.has_form_body() && self.is_form() {
            if self.body.len() > max_body {
                return Err(RouterError::FormTooLarge { limit: max_body });
            }
            let body = std::str::from_utf8(&self.body)
                .map_err(|e| RouterError::MalformedForm(e.to_string()))?;
            parse_pairs(body, &mut params)?;
        }

        parse_pairs(&self.query, &mut params)?;
        Ok(params)
    }
}

/// Decodes `key=value&...` pairs into `params`.
fn parse_pairs(input: &str, params: &mut Params) -> Result<()> {
    for pair in input.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.append(decode_component(key)?, decode_component(value)?);
    }
    Ok(())
}

/// Strict URL decoding: `+` is a space and every `%` must start a valid
/// two-digit hex escape.
fn decode_component(s: &str) -> Result<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let byte = bytes
                    .get(i + 1..i + 3)
                    .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
                    .and_then(|hex| std::str::from_utf8(hex).ok())
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                    .ok_or_else(|| {
                        RouterError::MalformedForm(format!("invalid escape in {s:?}"))
                    })?;
                out.push(byte);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8(out).map_err(|e| RouterError::MalformedForm(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(Method::from("GET"), Method::Get);
        assert_eq!(Method::from("DELETE"), Method::Delete);
        assert_eq!(Method::from("get"), Method::Other("get".to_string()));
        assert_eq!(Method::from("PURGE").to_string(), "PURGE");
    }

    #[test]
    fn test_request_builder() {
        let req = Request::get("/users?page=1")
            .header("Content-Type", "application/json")
            .query_param("sort", "last name");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/users");
        assert_eq!(req.query, "page=1&sort=last+name");
        assert_eq!(req.get_header("content-type"), Some("application/json"));

        let req = Request::get("/").query_param("q", "ä&b").query_param("r", "x/y?z");
        assert_eq!(req.query, "q=%C3%A4%26b&r=x%2Fy%3Fz");
        let form = req.form(1024).unwrap();
        assert_eq!(form.get("q"), Some("ä&b"));
        assert_eq!(form.get("r"), Some("x/y?z"));
    }

    #[test]
    fn test_head_drops_body() {
        let req = Request::post("/items?x=1")
            .header("X-Trace", "abc")
            .body("payload");
        let head = req.head();
        assert_eq!(head.method, Method::Post);
        assert_eq!(head.path, "/items");
        assert_eq!(head.query, "x=1");
        assert_eq!(head.get_header("x-trace"), Some("abc"));
        assert!(head.body.is_empty());
        assert_eq!(req.body, b"payload");
    }

    #[test]
    fn test_query_string_parsing() {
        let req = Request::get("/?name=John+Doe&age=30&city=New%20York&flag&&city=Paris");
        let form = req.form(1024).unwrap();
        assert_eq!(form.get("name"), Some("John Doe"));
        assert_eq!(form.get("age"), Some("30"));
        assert_eq!(form.get_all("city"), ["New York", "Paris"]);
        assert_eq!(form.get("flag"), Some(""));
    }

    #[test]
    fn test_body_before_query() {
        let req = Request::post("/items?tag=query").form_body(&[("tag", "body"), ("q", "ä&b")]);
        let form = req.form(1024).unwrap();
        assert_eq!(form.get_all("tag"), ["body", "query"]);
        assert_eq!(form.get("q"), Some("ä&b"));
    }

    #[test]
    fn test_body_ignored_for_get_and_other_content_types() {
        let get = Request::get("/").form_body(&[("a", "1")]);
        assert!(get.form(1024).unwrap().is_empty());

        let json = Request::post("/")
            .header("Content-Type", "application/json")
            .body("a=1");
        assert!(json.form(1024).unwrap().is_empty());

        let charset = Request::post("/")
            .header("content-type", "application/x-www-form-urlencoded; charset=utf-8")
            .body("a=1");
        assert_eq!(charset.form(1024).unwrap().get("a"), Some("1"));
    }

    #[test]
    fn test_malformed_form() {
        let bad_escape = Request::get("/?a=%zz");
        assert!(matches!(
            bad_escape.form(1024),
            Err(RouterError::MalformedForm(_))
        ));

        let truncated = Request::get("/?a=%4");
        assert!(truncated.form(1024).is_err());

        let bad_utf8 = Request::get("/?a=%ff");
        assert!(bad_utf8.form(1024).is_err());
    }

    #[test]
    fn test_form_too_large() {
        let req = Request::post("/").form_body(&[("data", "0123456789")]);
        assert!(matches!(
            req.form(4),
            Err(RouterError::FormTooLarge { limit: 4 })
        ));
    }
}
