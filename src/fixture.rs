//! Provider fixtures for the demo binary and tests.
//!
//! A fixture is a TOML document with a `[primary]` table, an optional
//! `[secondary]` table and an optional top-level `active_image_override`:
//!
//! ```toml
//! active_image_override = "https://cdn.shop/hero.jpg"
//!
//! [primary]
//! image = "products/mug.jpg"
//! video_url = "https://youtu.be/abc123"
//!
//! [secondary]
//! group_image = "groups/mugs.jpg"
//! ```

use std::path::Path;

use crate::error::{GalleryError, Result};
use crate::models::ProviderRecord;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryFixture {
    pub primary: ProviderRecord,
    pub secondary: Option<ProviderRecord>,
    pub active_image_override: Option<String>,
}

impl GalleryFixture {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GalleryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Parses fixture text; `origin` is only used in error reports.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let table: toml::Table = toml::from_str(text).map_err(|source| GalleryError::Fixture {
            path: origin.to_path_buf(),
            source,
        })?;

        let primary = table
            .get("primary")
            .and_then(toml::Value::as_table)
            .map(ProviderRecord::from_toml_table)
            .ok_or_else(|| GalleryError::MissingPrimary {
                path: origin.to_path_buf(),
            })?;
        let secondary = table
            .get("secondary")
            .and_then(toml::Value::as_table)
            .map(ProviderRecord::from_toml_table);
        let active_image_override = table
            .get("active_image_override")
            .and_then(toml::Value::as_str)
            .map(str::to_owned);

        Ok(Self {
            primary,
            secondary,
            active_image_override,
        })
    }
}
