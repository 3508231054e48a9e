//! Gallery configuration.
//!
//! Layered as built-in defaults, then an optional TOML file, then
//! environment overrides. The file lives at
//! `XDG_CONFIG_HOME/product-gallery/config.toml` unless a path is given.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{GalleryError, Result};
use crate::media::collection_cache::DEFAULT_CACHE_ENTRIES;
use crate::ui::gallery::DEFAULT_PLACEHOLDER_IMAGE;
use crate::ui::viewport::DEFAULT_DESKTOP_BREAKPOINT_PX;

/// Default poster for videos with no other still available.
pub const DEFAULT_VIDEO_PLACEHOLDER: &str = "/images/video-placeholder.png";

const ENV_BASE_URL: &str = "PRODUCT_GALLERY_BASE_URL";
const ENV_BREAKPOINT: &str = "PRODUCT_GALLERY_BREAKPOINT_PX";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Base URL that storage-relative media paths are resolved against.
    pub base_url: Option<String>,
    /// Minimum viewport width for the full-screen overlay.
    pub desktop_breakpoint_px: u32,
    /// Shown when the collection is empty or the main image fails to load.
    pub placeholder_image: String,
    /// Last-resort video poster.
    pub video_placeholder: String,
    /// Composed collections kept in the memo cache.
    pub collection_cache_entries: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            desktop_breakpoint_px: DEFAULT_DESKTOP_BREAKPOINT_PX,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            video_placeholder: DEFAULT_VIDEO_PLACEHOLDER.to_owned(),
            collection_cache_entries: DEFAULT_CACHE_ENTRIES,
        }
    }
}

impl GalleryConfig {
    /// Loads the layered configuration from `path`, or the default location
    /// when `path` is `None`, then applies process environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Returns the default config file path based on XDG directories.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "product-gallery")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| GalleryError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Applies environment overrides through `lookup`. Unparseable values are
    /// ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup(ENV_BASE_URL) {
            self.base_url = Some(base).filter(|b| !b.trim().is_empty());
        }

        if let Some(raw) = lookup(ENV_BREAKPOINT) {
            match raw.trim().parse::<u32>() {
                Ok(px) => self.desktop_breakpoint_px = px,
                Err(err) => warn!(value = %raw, error = ?err, "Ignoring invalid {}", ENV_BREAKPOINT),
            }
        }
    }
}
