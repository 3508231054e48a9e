//! Raw provider records and the typed field sets that read them.
//!
//! Upstream records are loosely typed: any field may be missing, blank, or
//! hold a non-string value. A [`ProviderRecord`] keeps only non-blank string
//! fields, and a [`MediaFieldSet`] declares, per provider, which fields are
//! probed and in what priority order.

use std::collections::BTreeMap;

use tracing::trace;

use super::SourceTag;

/// Raw string fields of one provider record, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderRecord {
    fields: BTreeMap<String, String>,
}

impl ProviderRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter. Blank values are treated as absent.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.fields.remove(&name);
        } else {
            self.fields.insert(name, value);
        }
    }

    /// Builds a record from a TOML table, dropping values that are not strings.
    pub fn from_toml_table(table: &toml::Table) -> Self {
        let mut record = Self::new();
        for (name, value) in table {
            match value.as_str() {
                Some(s) => record.insert(name.as_str(), s),
                None => trace!(field = %name, "Ignoring non-string provider field"),
            }
        }
        record
    }

    /// Returns the trimmed value of a field, or `None` when absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First present field among `names`, in order.
    pub fn first_of(&self, names: &[&str]) -> Option<&str> {
        names.iter().find_map(|name| self.get(name))
    }
}

/// How a provider exposes its images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFields {
    /// Each named slot is a separate image, emitted in declaration order.
    Slots(&'static [&'static str]),
    /// Alternate names for a single image; the first present one wins.
    FirstOf(&'static [&'static str]),
}

impl ImageFields {
    pub fn names(&self) -> &'static [&'static str] {
        match self {
            ImageFields::Slots(names) | ImageFields::FirstOf(names) => names,
        }
    }
}

/// Declared field priority for one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaFieldSet {
    pub source: SourceTag,
    pub images: ImageFields,
    /// Alternate names for the video URL, highest priority first.
    pub video_url: &'static [&'static str],
    /// Alternate names for an explicit video poster. Empty when the provider
    /// never carries one.
    pub video_poster: &'static [&'static str],
}

/// Field set of the product record.
pub const PRIMARY_FIELDS: MediaFieldSet = MediaFieldSet {
    source: SourceTag::Primary,
    images: ImageFields::Slots(&["image", "image_2", "image_3", "image_4", "image_5"]),
    video_url: &["video_url", "video", "videoUrl", "youtube_url"],
    video_poster: &["video_poster", "video_thumbnail", "poster"],
};

/// Field set of the group record: one image, one video, no explicit poster.
pub const SECONDARY_FIELDS: MediaFieldSet = MediaFieldSet {
    source: SourceTag::Secondary,
    images: ImageFields::FirstOf(&["image", "group_image", "cover_image"]),
    video_url: &["video_url", "video", "group_video"],
    video_poster: &[],
};

/// Name of the primary field treated as the canonical first image.
pub const CANONICAL_IMAGE_FIELD: &str = "image";

impl MediaFieldSet {
    pub fn for_source(source: SourceTag) -> &'static MediaFieldSet {
        match source {
            SourceTag::Primary => &PRIMARY_FIELDS,
            SourceTag::Secondary => &SECONDARY_FIELDS,
        }
    }

    /// Every field name this set reads, used for change fingerprints.
    pub fn all_fields(&self) -> impl Iterator<Item = &'static str> {
        self.images
            .names()
            .iter()
            .chain(self.video_url.iter())
            .chain(self.video_poster.iter())
            .copied()
    }
}
