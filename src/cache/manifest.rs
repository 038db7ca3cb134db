//! The controller's definition file and the asset heuristics.

use super::{CacheError, CacheResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Path of the definition file at the origin. Re-fetching it is how a new
/// deployment is detected.
pub const DEFINITION_PATH: &str = "/sw-manifest.json";

/// Navigation fallback while offline.
pub const ENTRY_POINT: &str = "/index.html";

/// Shell assets a generation needs before it can leave `installing`.
pub const ESSENTIAL_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/assets/app.js",
    "/assets/app.css",
    "/manifest.webmanifest",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

static STATIC_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(/assets/|\.(png|jpe?g|gif|svg|webp|avif|ico|css|js|mjs|woff2?|ttf)(\?.*)?$)")
        .unwrap()
});

/// Paths that belong in the static bucket when cached at runtime.
pub fn is_static_asset(path: &str) -> bool {
    STATIC_ASSET.is_match(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// Generation tag.
    pub version: String,
    #[serde(default)]
    pub assets: Vec<String>,
}

impl Definition {
    pub fn parse(body: &[u8]) -> CacheResult<Self> {
        let def: Definition = serde_json::from_slice(body)
            .map_err(|e| CacheError::Definition(e.to_string()))?;
        let version = def.version.trim();
        if version.is_empty()
            || !version
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(CacheError::Definition(format!(
                "invalid version tag '{}'",
                def.version
            )));
        }
        Ok(Definition {
            version: version.to_string(),
            assets: def.assets,
        })
    }

    /// The built-in shell assets followed by any extra declared ones.
    /// A definition can add to the shell but never drop part of it.
    pub fn essential_assets(&self) -> Vec<String> {
        let mut out: Vec<String> = ESSENTIAL_ASSETS.iter().map(|s| s.to_string()).collect();
        for a in &self.assets {
            let p = if a.starts_with('/') {
                a.clone()
            } else {
                format!("/{}", a)
            };
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }
}
