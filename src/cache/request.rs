//! Minimal request/response model for intercepted fetches.

use serde::Serialize;

/// What the browser would load the resource as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Destination {
    /// Top-level navigation.
    Document,
    Script,
    Style,
    Image,
    Manifest,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Absolute URL or origin-relative path.
    pub url: String,
    pub destination: Destination,
}

impl Request {
    pub fn new(method: &str, url: &str, destination: Destination) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            destination,
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url, Destination::Other)
    }

    pub fn navigate(url: &str) -> Self {
        Self::new("GET", url, Destination::Document)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Origin-relative key of this request, or `None` when it targets
    /// another origin.
    pub fn same_origin_path(&self, origin: &str) -> Option<String> {
        let origin = origin.trim_end_matches('/');
        // `//host/path` inherits the scheme but names its own host.
        let url = match self.url.strip_prefix("//") {
            Some(rest) => {
                let (scheme, _) = origin.split_once("://")?;
                format!("{}://{}", scheme, rest)
            }
            None if self.url.starts_with('/') => return Some(self.url.clone()),
            None => self.url.clone(),
        };
        let rest = url.strip_prefix(origin)?;
        match rest.chars().next() {
            None => Some("/".to_string()),
            Some('/') => Some(rest.to_string()),
            Some('?') => Some(format!("/{}", rest)),
            _ => None,
        }
    }
}

/// Response type in the fetch sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseKind {
    /// Same-origin network response.
    Basic,
    /// Cross-origin response.
    Cors,
    /// Cross-origin, unreadable.
    Opaque,
    /// Produced by the controller itself.
    Synthetic,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Basic => "basic",
            ResponseKind::Cors => "cors",
            ResponseKind::Opaque => "opaque",
            ResponseKind::Synthetic => "synthetic",
        }
    }

    pub fn from_db_str(s: &str) -> Self {
        match s {
            "basic" => ResponseKind::Basic,
            "cors" => ResponseKind::Cors,
            "opaque" => ResponseKind::Opaque,
            _ => ResponseKind::Synthetic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, kind: ResponseKind, content_type: Option<&str>, body: Vec<u8>) -> Self {
        Self {
            status,
            kind,
            content_type: content_type.map(str::to_string),
            body,
        }
    }

    /// Placeholder served when neither cache nor network can answer.
    pub fn offline() -> Self {
        Self::new(
            503,
            ResponseKind::Synthetic,
            Some("text/plain; charset=utf-8"),
            b"Offline: resource not available".to_vec(),
        )
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Only complete same-origin responses are worth storing.
    pub fn is_cacheable(&self) -> bool {
        self.is_ok() && self.kind == ResponseKind::Basic
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
