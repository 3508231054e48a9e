use std::collections::HashSet;

use tracing::debug;

use crate::models::{MediaCollection, MediaItem};

/// Merges provider lists into a [`MediaCollection`].
///
/// Primary items precede secondary items. Later duplicates are dropped, so an
/// entry supplied by both providers keeps its primary attribution.
pub fn compose(primary: Vec<MediaItem>, secondary: Vec<MediaItem>) -> MediaCollection {
    let total = primary.len() + secondary.len();
    let items = dedup(primary.into_iter().chain(secondary));

    if items.len() < total {
        debug!(
            dropped = total - items.len(),
            kept = items.len(),
            "Dropped duplicate media items"
        );
    }
    MediaCollection::from_unique(items)
}

/// Keeps the first occurrence of every identity, preserving order.
pub fn dedup(items: impl IntoIterator<Item = MediaItem>) -> Vec<MediaItem> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        let key = (
            item.kind,
            item.display_url.clone(),
            item.playback_url.clone(),
        );
        if seen.insert(key) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, SourceTag};

    #[test]
    fn test_primary_before_secondary() {
        let c = compose(
            vec![
                MediaItem::image("p1.jpg", SourceTag::Primary),
                MediaItem::video("p1.jpg", "p.mp4", SourceTag::Primary),
            ],
            vec![MediaItem::image("s1.jpg", SourceTag::Secondary)],
        );
        let sources: Vec<SourceTag> = c.iter().map(|i| i.source).collect();
        assert_eq!(
            sources,
            vec![SourceTag::Primary, SourceTag::Primary, SourceTag::Secondary]
        );
        assert_eq!(c[1].kind, MediaKind::Video);
    }

    #[test]
    fn test_cross_provider_duplicate_keeps_primary() {
        let c = compose(
            vec![MediaItem::image("same.jpg", SourceTag::Primary)],
            vec![MediaItem::image("same.jpg", SourceTag::Secondary)],
        );
        assert_eq!(c.len(), 1);
        assert_eq!(c[0].source, SourceTag::Primary);
    }

    #[test]
    fn test_same_url_different_kind_is_kept() {
        let c = compose(
            vec![
                MediaItem::image("a.jpg", SourceTag::Primary),
                MediaItem::video("a.jpg", "a.mp4", SourceTag::Primary),
            ],
            vec![MediaItem::video("a.jpg", "b.mp4", SourceTag::Secondary)],
        );
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let once = dedup(vec![
            MediaItem::image("a.jpg", SourceTag::Primary),
            MediaItem::image("b.jpg", SourceTag::Primary),
            MediaItem::image("a.jpg", SourceTag::Secondary),
        ]);
        let twice = dedup(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }
}
