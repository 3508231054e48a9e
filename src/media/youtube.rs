//! YouTube link handling: video id extraction, still-frame posters and the
//! embeddable player URL.

use std::borrow::Cow;

/// Link shapes that carry a video id, checked in order.
const ID_MARKERS: [&str; 3] = ["youtu.be/", "youtube.com/watch?v=", "youtube.com/embed/"];

const THUMBNAIL_HOST: &str = "https://img.youtube.com/vi";
const EMBED_PREFIX: &str = "https://www.youtube.com/embed/";

/// Extracts the video id from a recognised YouTube link.
///
/// The id runs up to the next `?` or `&`. Returns `None` for other hosts or
/// an empty id.
pub fn video_id(url: &str) -> Option<&str> {
    ID_MARKERS.iter().find_map(|marker| {
        let start = url.find(marker)? + marker.len();
        let rest = &url[start..];
        let end = rest.find(['?', '&']).unwrap_or(rest.len());
        let id = &rest[..end];
        (!id.is_empty()).then_some(id)
    })
}

/// Still-frame URL for a YouTube link, or `None` if the link is not one.
pub fn thumbnail_url(url: &str) -> Option<String> {
    video_id(url).map(|id| format!("{THUMBNAIL_HOST}/{id}/hqdefault.jpg"))
}

/// Rewrites watch and short links into the embeddable player form.
///
/// Only used when rendering a player; stored state keeps the original URL.
pub fn embed_url(url: &str) -> Cow<'_, str> {
    if url.contains("youtube.com/embed/") {
        return Cow::Borrowed(url);
    }
    match video_id(url) {
        Some(id) => Cow::Owned(format!("{EMBED_PREFIX}{id}")),
        None => Cow::Borrowed(url),
    }
}
