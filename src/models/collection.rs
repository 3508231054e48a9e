use std::ops::Deref;

use super::{MediaItem, MediaKind};

/// Ordered, deduplicated gallery entries for one render pass.
///
/// Built once by the composer and shared behind an `Arc`; never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaCollection {
    items: Vec<MediaItem>,
}

impl MediaCollection {
    /// Wraps items that are already deduplicated. Use
    /// [`crate::media::compose`] to build one from provider lists.
    pub(crate) fn from_unique(items: Vec<MediaItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    /// Bounds-checked access; an index cached across a recomputation may be stale.
    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    /// Position of the first item whose viewer URL matches `url` for `kind`.
    pub fn position_of(&self, kind: MediaKind, url: &str) -> Option<usize> {
        self.items.iter().position(|item| {
            item.kind == kind
                && match kind {
                    MediaKind::Image => item.display_url == url,
                    MediaKind::Video => item.playback_url.as_deref() == Some(url),
                }
        })
    }

    /// Position of an item with the same identity as `item`.
    pub fn position_of_item(&self, item: &MediaItem) -> Option<usize> {
        let identity = item.identity();
        self.items.iter().position(|i| i.identity() == identity)
    }

    /// Wrapping step over the collection. `None` when empty.
    pub fn step(&self, from: usize, forward: bool) -> Option<usize> {
        let len = self.items.len();
        if len == 0 {
            return None;
        }
        let from = from % len;
        Some(if forward {
            (from + 1) % len
        } else {
            (from + len - 1) % len
        })
    }
}

impl Deref for MediaCollection {
    type Target = [MediaItem];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a> IntoIterator for &'a MediaCollection {
    type Item = &'a MediaItem;
    type IntoIter = std::slice::Iter<'a, MediaItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
