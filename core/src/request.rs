//! Request types and the ordered request source

use serde::{Deserialize, Serialize};

/// HTTP method of a prepared request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// GET
    #[default]
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
    /// HEAD
    Head,
    /// OPTIONS
    Options,
}

impl Method {
    /// Uppercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            other => Err(format!("unsupported HTTP method: {other}")),
        }
    }
}

/// Unique request identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A single prepared HTTP call
///
/// Built by the caller and never mutated by the dispatcher; workers only
/// ever see it through a shared reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Request identifier (assigned by [`RequestSource`] when not given)
    #[serde(default)]
    pub id: RequestId,

    /// HTTP method
    #[serde(default)]
    pub method: Method,

    /// Target URL
    pub url: String,

    /// Header name/value pairs, sent in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Request {
    /// GET request for `url`
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Request with the given method and URL and no headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            id: RequestId::default(),
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the identifier
    pub fn with_id(mut self, id: impl Into<RequestId>) -> Self {
        self.id = id.into();
        self
    }
}

/// Ordered, finite batch of requests, each executed exactly once
///
/// Requests are renumbered on construction so ids follow submission order.
#[derive(Debug, Clone, Default)]
pub struct RequestSource {
    requests: Vec<Request>,
}

impl RequestSource {
    /// Wrap `requests`, assigning ids `0..len` in order
    pub fn new(requests: Vec<Request>) -> Self {
        let requests = requests
            .into_iter()
            .enumerate()
            .map(|(idx, req)| req.with_id(idx as u64))
            .collect();
        Self { requests }
    }

    /// `count` copies of `template`
    pub fn repeat(template: Request, count: usize) -> Self {
        Self::new(vec![template; count])
    }

    /// Number of requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the source holds no requests
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Iterate in submission order
    pub fn iter(&self) -> std::slice::Iter<'_, Request> {
        self.requests.iter()
    }
}

impl From<Vec<Request>> for RequestSource {
    fn from(requests: Vec<Request>) -> Self {
        Self::new(requests)
    }
}

impl IntoIterator for RequestSource {
    type Item = Request;
    type IntoIter = std::vec::IntoIter<Request>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_case_insensitive() {
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
        assert!("BREW".parse::<Method>().is_err());
    }

    #[test]
    fn test_method_serialization() {
        let json = serde_json::to_string(&Method::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }

    #[test]
    fn test_request_id_from_u64() {
        let id: RequestId = 42u64.into();
        assert_eq!(id.0, 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_request_builder() {
        let req = Request::new(Method::Post, "http://localhost/items")
            .with_header("Content-Type", "application/json")
            .with_body("{}");

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.body.as_deref(), Some("{}"));
    }

    #[test]
    fn test_request_deserialize_defaults() {
        let req: Request = serde_json::from_str(r#"{"url": "http://localhost/"}"#).unwrap();
        assert_eq!(req.method, Method::Get);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn test_source_assigns_ids_in_order() {
        let source = RequestSource::new(vec![
            Request::get("http://a/"),
            Request::get("http://b/"),
            Request::get("http://c/"),
        ]);

        let ids: Vec<u64> = source.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_source_repeat() {
        let source = RequestSource::repeat(Request::get("http://localhost/"), 4);
        assert_eq!(source.len(), 4);
        assert!(!source.is_empty());
        assert_eq!(source.into_iter().last().map(|r| r.id), Some(RequestId(3)));
    }

    #[test]
    fn test_empty_source() {
        assert!(RequestSource::default().is_empty());
    }
}
