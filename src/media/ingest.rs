//! Media ingestion: provider records in, provider-scoped item lists out.
//!
//! Each provider is read through its [`MediaFieldSet`]. Images come first in
//! declared field order, followed by at most one video whose poster is chosen
//! by a fallback chain so that no video is ever left without a still:
//!
//! 1. explicit poster field (only providers that declare one)
//! 2. YouTube still frame derived from the playback URL
//! 3. the provider's own first image
//! 4. the first primary image (secondary provider only)
//! 5. the configured video placeholder asset
//!
//! Missing, blank and non-image-looking values are skipped; nothing here fails.

use tracing::{debug, trace};

use super::url_resolver::{looks_like_image, UrlResolver};
use super::youtube;
use crate::models::{
    ImageFields, MediaFieldSet, MediaItem, MediaKind, ProviderRecord, PRIMARY_FIELDS,
    SECONDARY_FIELDS,
};

/// Reads provider records into [`MediaItem`] lists.
#[derive(Debug, Clone, Copy)]
pub struct Ingestor<'a> {
    resolver: &'a UrlResolver,
    video_placeholder: &'a str,
}

impl<'a> Ingestor<'a> {
    pub fn new(resolver: &'a UrlResolver, video_placeholder: &'a str) -> Self {
        Self {
            resolver,
            video_placeholder,
        }
    }

    /// Items of the product record: every image slot, then its video.
    pub fn ingest_primary(&self, record: &ProviderRecord) -> Vec<MediaItem> {
        self.ingest_with(record, &PRIMARY_FIELDS, None)
    }

    /// Items of the optional group record: one image, then one video.
    ///
    /// `primary` is the already-ingested primary list; its first image is the
    /// poster fallback for a group video when the group has no image.
    pub fn ingest_secondary(
        &self,
        record: Option<&ProviderRecord>,
        primary: &[MediaItem],
    ) -> Vec<MediaItem> {
        let Some(record) = record else {
            return Vec::new();
        };
        let primary_image = primary
            .iter()
            .find(|item| item.kind == MediaKind::Image)
            .map(|item| item.display_url.as_str());
        self.ingest_with(record, &SECONDARY_FIELDS, primary_image)
    }

    fn ingest_with(
        &self,
        record: &ProviderRecord,
        fields: &MediaFieldSet,
        fallback_image: Option<&str>,
    ) -> Vec<MediaItem> {
        let images = self.collect_images(record, fields.images);
        let mut items: Vec<MediaItem> = images
            .into_iter()
            .map(|url| MediaItem::image(url, fields.source))
            .collect();

        if let Some(video) = self.collect_video(record, fields, &items, fallback_image) {
            items.push(video);
        }

        debug!(
            source = %fields.source,
            count = items.len(),
            "Ingested provider media"
        );
        items
    }

    fn collect_images(&self, record: &ProviderRecord, images: ImageFields) -> Vec<String> {
        let accept = |name: &str| -> Option<String> {
            let raw = record.get(name)?;
            if !looks_like_image(raw) {
                trace!(field = name, value = raw, "Skipping non-image field value");
                return None;
            }
            self.resolver.resolve(Some(raw))
        };

        match images {
            ImageFields::Slots(names) => names.iter().filter_map(|name| accept(*name)).collect(),
            ImageFields::FirstOf(names) => names
                .iter()
                .find_map(|name| accept(*name))
                .into_iter()
                .collect(),
        }
    }

    fn collect_video(
        &self,
        record: &ProviderRecord,
        fields: &MediaFieldSet,
        own_images: &[MediaItem],
        fallback_image: Option<&str>,
    ) -> Option<MediaItem> {
        let raw = record.first_of(fields.video_url)?;
        let playback = self.resolver.resolve(Some(raw))?;

        let poster = self
            .resolver
            .resolve(record.first_of(fields.video_poster))
            .or_else(|| youtube::thumbnail_url(&playback))
            .or_else(|| own_images.first().map(|item| item.display_url.clone()))
            .or_else(|| fallback_image.map(str::to_owned))
            .unwrap_or_else(|| self.video_placeholder.to_owned());

        trace!(source = %fields.source, %playback, %poster, "Collected video");
        Some(MediaItem::video(poster, playback, fields.source))
    }
}
