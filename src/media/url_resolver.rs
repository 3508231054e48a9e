//! Classification and resolution of raw media references.
//!
//! Upstream records mix fully qualified CDN links, inline data URIs and bare
//! storage paths (`uploads/products/a b.jpg`, `/api/uploads/x.png`, ...).
//! Storage paths are rebased onto `{base}/uploads/` with each segment
//! percent-encoded on its own so internal slashes survive.

use std::borrow::Cow;

use tracing::trace;

use crate::models::MediaKind;

/// Redundant prefixes stripped from storage-relative paths, longest first.
const STORAGE_PREFIXES: [&str; 2] = ["api/uploads/", "uploads/"];

/// Shape of a raw media reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `http://`, `https://` or protocol-relative `//`.
    Absolute,
    /// `data:` URI.
    DataUri,
    /// Anything else: a path inside media storage.
    Relative,
}

impl RefKind {
    pub fn classify(raw: &str) -> Self {
        let lower = raw.get(..8).unwrap_or(raw).to_ascii_lowercase();
        if lower.starts_with("//") || lower.starts_with("http://") || lower.starts_with("https://")
        {
            RefKind::Absolute
        } else if lower.starts_with("data:") {
            RefKind::DataUri
        } else {
            RefKind::Relative
        }
    }

    /// True when the reference can be served as-is.
    pub fn is_servable(self) -> bool {
        !matches!(self, RefKind::Relative)
    }
}

/// Resolves raw references against a storage base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlResolver {
    base: Option<String>,
}

impl UrlResolver {
    /// Creates a resolver. A blank base is treated as unset.
    pub fn new(base: Option<&str>) -> Self {
        let base = base
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .map(str::to_owned);
        Self { base }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Resolves a raw reference into a servable URL.
    ///
    /// Returns `None` for absent or blank input. Without a configured base a
    /// bare `/uploads/...` path is produced instead of failing.
    pub fn resolve(&self, raw: Option<&str>) -> Option<String> {
        let raw = raw.map(str::trim).filter(|r| !r.is_empty())?;

        if RefKind::classify(raw).is_servable() {
            return Some(raw.to_owned());
        }

        let encoded = encode_storage_path(raw);
        let resolved = match &self.base {
            Some(base) => format!("{base}/uploads/{encoded}"),
            None => format!("/uploads/{encoded}"),
        };
        trace!(raw, %resolved, "Resolved storage path");
        Some(resolved)
    }
}

/// Strips leading slashes and one storage prefix, then percent-encodes each
/// path segment individually.
fn encode_storage_path(raw: &str) -> String {
    let path = raw.trim_start_matches('/');
    let path = STORAGE_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
        .unwrap_or(path);

    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<Cow<'_, str>>>()
        .join("/")
}

/// Returns true if a raw field value plausibly refers to an image.
///
/// Accepts servable references, rooted paths, and anything whose path part
/// ends in a known raster extension.
pub fn looks_like_image(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }
    if RefKind::classify(raw).is_servable() || raw.starts_with('/') {
        return true;
    }

    let path = raw.split(['?', '#']).next().unwrap_or(raw);
    path.rsplit_once('.')
        .map(|(_, ext)| !ext.contains('/') && MediaKind::is_raster_extension(ext))
        .unwrap_or(false)
}
