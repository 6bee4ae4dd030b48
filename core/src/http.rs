//! HTTP requests and responses as plain data.
//!
//! # Design
//! A request chain renders into an `HttpRequest` and a raw round-trip comes
//! back as an `HttpResponse`. Neither type knows about the network, so the
//! envelope mapping can be exercised without a transport, and callers that
//! bring their own HTTP stack can drive the round-trip themselves.

use std::fmt;

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `CurriedRequest::build_*`. `url` is absolute: the client's root
/// URL joined with the rendered chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// A JSON request: always accepts JSON, and declares a JSON body if one
    /// is present.
    pub(crate) fn json(method: HttpMethod, url: String, body: Option<String>) -> Self {
        let mut headers = vec![("accept".to_string(), APPLICATION_JSON.to_string())];
        if body.is_some() {
            headers.push(("content-type".to_string(), APPLICATION_JSON.to_string()));
        }
        Self {
            method,
            url,
            headers,
            body,
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for any 2xx status.
    pub fn succeeded(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// The body, or `None` when it is empty or only whitespace.
    pub fn body(&self) -> Option<&str> {
        let trimmed = self.body.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_request_without_body_only_accepts_json() {
        let req = HttpRequest::json(HttpMethod::Get, "http://localhost/rooms/1".into(), None);
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn json_request_with_body_declares_content_type() {
        let req = HttpRequest::json(
            HttpMethod::Post,
            "http://localhost/users".into(),
            Some("{}".into()),
        );
        assert!(req
            .headers
            .contains(&("content-type".to_string(), "application/json".to_string())));
    }

    #[test]
    fn success_range_is_2xx() {
        let at = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(at(200).succeeded());
        assert!(at(204).succeeded());
        assert!(at(299).succeeded());
        assert!(!at(199).succeeded());
        assert!(!at(301).succeeded());
        assert!(!at(401).succeeded());
    }

    #[test]
    fn blank_body_is_absent() {
        let response = HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: " \n".to_string(),
        };
        assert!(response.body().is_none());
    }
}
