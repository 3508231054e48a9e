use std::fmt;

/// Kind of a gallery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Returns true if the extension names a raster image format we display inline.
    pub fn is_raster_extension(ext: &str) -> bool {
        matches!(
            ext.to_ascii_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "avif" | "bmp"
        )
    }
}

/// Which provider an item was ingested from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceTag {
    /// The product record.
    Primary,
    /// The optional group record.
    Secondary,
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceTag::Primary => f.pad("primary"),
            SourceTag::Secondary => f.pad("secondary"),
        }
    }
}

/// One normalized gallery entry with resolved URLs.
///
/// For images `display_url` is the image itself. For videos it is the poster
/// and `playback_url` holds the playable URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaItem {
    pub kind: MediaKind,
    pub display_url: String,
    pub playback_url: Option<String>,
    pub source: SourceTag,
}

/// Borrowed identity tuple used for deduplication.
///
/// Source attribution is not part of the key: the first provider to supply a
/// given entry owns it.
pub type MediaIdentity<'a> = (MediaKind, &'a str, Option<&'a str>);

impl MediaItem {
    pub fn image(display_url: impl Into<String>, source: SourceTag) -> Self {
        Self {
            kind: MediaKind::Image,
            display_url: display_url.into(),
            playback_url: None,
            source,
        }
    }

    pub fn video(
        poster_url: impl Into<String>,
        playback_url: impl Into<String>,
        source: SourceTag,
    ) -> Self {
        Self {
            kind: MediaKind::Video,
            display_url: poster_url.into(),
            playback_url: Some(playback_url.into()),
            source,
        }
    }

    /// Check if this is a video entry
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    /// Poster for videos, the image itself otherwise
    pub fn poster(&self) -> &str {
        &self.display_url
    }

    pub fn identity(&self) -> MediaIdentity<'_> {
        (
            self.kind,
            self.display_url.as_str(),
            self.playback_url.as_deref(),
        )
    }

    /// The URL the viewers track for this item: playback URL for videos,
    /// display URL for images.
    pub fn viewer_url(&self) -> &str {
        match self.kind {
            MediaKind::Video => self
                .playback_url
                .as_deref()
                .unwrap_or(self.display_url.as_str()),
            MediaKind::Image => &self.display_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_extensions() {
        assert!(MediaKind::is_raster_extension("JPG"));
        assert!(MediaKind::is_raster_extension("webp"));
        assert!(!MediaKind::is_raster_extension("mp4"));
        assert!(!MediaKind::is_raster_extension("svgz"));
    }

    #[test]
    fn test_identity_ignores_source() {
        let a = MediaItem::image("https://cdn/a.jpg", SourceTag::Primary);
        let b = MediaItem::image("https://cdn/a.jpg", SourceTag::Secondary);
        assert_eq!(a.identity(), b.identity());

        let poster_only = MediaItem::video("https://cdn/a.jpg", "v.mp4", SourceTag::Primary);
        assert_ne!(a.identity(), poster_only.identity());
    }

    #[test]
    fn test_viewer_url() {
        let video = MediaItem::video("poster.jpg", "https://youtu.be/abc", SourceTag::Primary);
        assert!(video.is_video());
        assert_eq!(video.viewer_url(), "https://youtu.be/abc");
        assert_eq!(video.poster(), "poster.jpg");

        let image = MediaItem::image("a.jpg", SourceTag::Primary);
        assert_eq!(image.viewer_url(), "a.jpg");
    }
}
