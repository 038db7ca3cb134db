//! Where uncached responses come from.

use super::request::{Request, Response, ResponseKind};
use super::{CacheError, CacheResult};
use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub trait Network: Send {
    /// Scheme + host (+ port) the application is served from.
    fn origin(&self) -> &str;

    /// `Err` means the network itself failed (offline, DNS, refused …);
    /// HTTP error statuses are regular responses.
    fn fetch(&self, req: &Request) -> CacheResult<Response>;
}

fn content_type_for(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .as_deref()
    {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("js") | Some("mjs") => "text/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// A deployed build directory (`dist/`) served as if it were the origin.
pub struct DirOrigin {
    root: PathBuf,
    origin: String,
}

impl DirOrigin {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            origin: "http://localhost".to_string(),
        }
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = origin.trim_end_matches('/').to_string();
        self
    }

    /// Maps an origin-relative path to a file below the root, refusing `..`.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let rel = path.trim_start_matches('/');
        let rel = if rel.is_empty() || rel.ends_with('/') {
            format!("{}index.html", rel)
        } else {
            rel.to_string()
        };
        let rel = Path::new(&rel);
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(rel))
    }
}

impl Network for DirOrigin {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn fetch(&self, req: &Request) -> CacheResult<Response> {
        let path = req
            .same_origin_path(&self.origin)
            .ok_or_else(|| CacheError::Network(format!("cannot reach {}", req.url)))?;

        if !self.root.is_dir() {
            return Err(CacheError::Network(format!(
                "origin directory unavailable: {}",
                self.root.display()
            )));
        }

        let Some(file) = self.resolve(&path) else {
            return Ok(Response::new(400, ResponseKind::Basic, None, Vec::new()));
        };

        match fs::read(&file) {
            Ok(body) => Ok(Response::new(
                200,
                ResponseKind::Basic,
                Some(content_type_for(&file)),
                body,
            )),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Response::new(
                404,
                ResponseKind::Basic,
                Some("text/plain; charset=utf-8"),
                b"Not Found".to_vec(),
            )),
            Err(e) => Err(CacheError::Network(format!("{}: {}", file.display(), e))),
        }
    }
}

/// A live HTTP(S) deployment, fetched with a blocking `ureq` agent.
pub struct HttpOrigin {
    agent: ureq::Agent,
    origin: String,
}

impl HttpOrigin {
    pub fn new(base: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(15))
            .build();
        Self {
            agent,
            origin: base.trim_end_matches('/').to_string(),
        }
    }

    fn into_response(resp: ureq::Response, kind: ResponseKind) -> CacheResult<Response> {
        let status = resp.status();
        let content_type = Some(resp.content_type().to_string());
        let mut body = Vec::new();
        resp.into_reader()
            .read_to_end(&mut body)
            .map_err(|e| CacheError::Network(e.to_string()))?;
        Ok(Response {
            status,
            kind,
            content_type,
            body,
        })
    }
}

impl Network for HttpOrigin {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn fetch(&self, req: &Request) -> CacheResult<Response> {
        let (url, kind) = match req.same_origin_path(&self.origin) {
            Some(path) => (format!("{}{}", self.origin, path), ResponseKind::Basic),
            None => {
                let url = match req.url.strip_prefix("//") {
                    Some(rest) => {
                        let scheme = self.origin.split("://").next().unwrap_or("https");
                        format!("{}://{}", scheme, rest)
                    }
                    None => req.url.clone(),
                };
                (url, ResponseKind::Cors)
            }
        };

        match self.agent.request(&req.method, &url).call() {
            Ok(resp) => Self::into_response(resp, kind),
            // 4xx/5xx still are responses
            Err(ureq::Error::Status(_, resp)) => Self::into_response(resp, kind),
            Err(e) => Err(CacheError::Network(e.to_string())),
        }
    }
}

/// Every fetch fails, as with no connectivity at all.
pub struct OfflineNetwork {
    origin: String,
}

impl OfflineNetwork {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
        }
    }
}

impl Network for OfflineNetwork {
    fn origin(&self) -> &str {
        &self.origin
    }

    fn fetch(&self, req: &Request) -> CacheResult<Response> {
        Err(CacheError::Network(format!("offline: {}", req.url)))
    }
}
