// Full-screen overlay for the product gallery
// Features:
// - Opens on whatever the inline viewer was showing
// - Position derived from content, never stored
// - Keyboard navigation (Escape / ArrowLeft / ArrowRight)
// - Page scroll suspended while open, restored on every exit path

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info};

use super::keybindings::{action_for, Key, OverlayAction, ViewMode};
use super::viewport::{PageScroll, ScrollGuard};
use crate::media::youtube;
use crate::models::{MediaCollection, MediaItem, MediaKind};

/// Content shown by the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayMedia {
    Image(String),
    Video(String),
}

impl OverlayMedia {
    /// Image items show their display URL, video items their playback URL.
    pub fn from_item(item: &MediaItem) -> Self {
        match item.kind {
            MediaKind::Image => OverlayMedia::Image(item.display_url.clone()),
            MediaKind::Video => OverlayMedia::Video(item.viewer_url().to_owned()),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            OverlayMedia::Image(_) => MediaKind::Image,
            OverlayMedia::Video(_) => MediaKind::Video,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            OverlayMedia::Image(url) | OverlayMedia::Video(url) => url,
        }
    }
}

/// Snapshot of the overlay state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    OpenImage(String),
    OpenVideo(String),
}

/// What the overlay renders right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayFrame<'a> {
    pub kind: MediaKind,
    /// Image URL, or the player URL (YouTube links in embed form) for videos.
    pub src: Cow<'a, str>,
    pub position: usize,
    pub len: usize,
}

/// State that only exists while the overlay is open.
#[derive(Debug)]
struct OverlaySession {
    displayed: OverlayMedia,
    _scroll: ScrollGuard,
}

/// Independently navigable full-screen view over the gallery collection.
pub struct Overlay {
    collection: Arc<MediaCollection>,
    session: Option<OverlaySession>,
    scroll: Rc<dyn PageScroll>,
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("items", &self.collection.len())
            .field("session", &self.session)
            .finish()
    }
}

impl Overlay {
    pub fn new(collection: Arc<MediaCollection>, scroll: Rc<dyn PageScroll>) -> Self {
        Self {
            collection,
            session: None,
            scroll,
        }
    }

    /// Opens on `media`, or switches content if already open.
    pub(crate) fn open(&mut self, media: OverlayMedia) {
        match &mut self.session {
            Some(session) => session.displayed = media,
            None => {
                info!(kind = ?media.kind(), url = media.url(), "Opening overlay");
                self.session = Some(OverlaySession {
                    displayed: media,
                    _scroll: ScrollGuard::acquire(Rc::clone(&self.scroll)),
                });
            }
        }
    }

    /// Closes the overlay; returns false if it was not open.
    pub fn close(&mut self) -> bool {
        if self.session.take().is_some() {
            info!("Closing overlay");
            true
        } else {
            false
        }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn displayed(&self) -> Option<&OverlayMedia> {
        self.session.as_ref().map(|s| &s.displayed)
    }

    pub fn state(&self) -> OverlayState {
        match self.displayed() {
            None => OverlayState::Closed,
            Some(OverlayMedia::Image(url)) => OverlayState::OpenImage(url.clone()),
            Some(OverlayMedia::Video(url)) => OverlayState::OpenVideo(url.clone()),
        }
    }

    /// Replaces the collection the overlay navigates. An open overlay keeps
    /// its content; position is re-derived on next use.
    pub fn set_collection(&mut self, collection: Arc<MediaCollection>) {
        self.collection = collection;
    }

    /// Position of the displayed content; a miss counts as position 0.
    pub fn position(&self) -> Option<usize> {
        let displayed = self.displayed()?;
        Some(
            self.collection
                .position_of(displayed.kind(), displayed.url())
                .unwrap_or(0),
        )
    }

    pub fn next(&mut self) -> bool {
        self.step(true)
    }

    pub fn previous(&mut self) -> bool {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> bool {
        let Some(position) = self.position() else {
            return false;
        };
        let Some(target) = self.collection.step(position, forward) else {
            return false;
        };
        let media = OverlayMedia::from_item(&self.collection[target]);
        debug!(from = position, to = target, "Overlay step");
        if let Some(session) = &mut self.session {
            session.displayed = media;
        }
        true
    }

    /// Handles a key press; returns true if the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        let mode = if self.is_open() {
            ViewMode::Overlay
        } else {
            ViewMode::Inline
        };

        match action_for(mode, key) {
            Some(OverlayAction::Close) => self.close(),
            Some(OverlayAction::Previous) => self.previous(),
            Some(OverlayAction::Next) => self.next(),
            None => false,
        }
    }

    /// Render description of the open overlay.
    pub fn frame(&self) -> Option<OverlayFrame<'_>> {
        let displayed = self.displayed()?;
        let src = match displayed {
            OverlayMedia::Image(url) => Cow::Borrowed(url.as_str()),
            OverlayMedia::Video(url) => youtube::embed_url(url),
        };
        Some(OverlayFrame {
            kind: displayed.kind(),
            src,
            position: self.position().unwrap_or(0),
            len: self.collection.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::compose;
    use crate::models::SourceTag;
    use crate::ui::viewport::ScrollState;

    fn five() -> Arc<MediaCollection> {
        Arc::new(compose(
            vec![
                MediaItem::image("0.jpg", SourceTag::Primary),
                MediaItem::image("1.jpg", SourceTag::Primary),
                MediaItem::image("2.jpg", SourceTag::Primary),
                MediaItem::video("0.jpg", "https://youtu.be/vid", SourceTag::Primary),
            ],
            vec![MediaItem::image("4.jpg", SourceTag::Secondary)],
        ))
    }

    fn overlay() -> (Overlay, Rc<ScrollState>) {
        let scroll = Rc::new(ScrollState::new());
        (Overlay::new(five(), scroll.clone()), scroll)
    }

    #[test]
    fn test_arrow_right_wraps() {
        let (mut overlay, _) = overlay();
        overlay.open(OverlayMedia::Image("2.jpg".into()));
        assert_eq!(overlay.position(), Some(2));

        for _ in 0..3 {
            assert!(overlay.handle_key(Key::ArrowRight));
        }
        assert_eq!(overlay.state(), OverlayState::OpenImage("0.jpg".into()));
        assert_eq!(overlay.position(), Some(0));
    }

    #[test]
    fn test_switches_kind_on_video_items() {
        let (mut overlay, _) = overlay();
        overlay.open(OverlayMedia::Image("2.jpg".into()));
        overlay.next();
        assert_eq!(
            overlay.state(),
            OverlayState::OpenVideo("https://youtu.be/vid".into())
        );
        let frame = overlay.frame().unwrap();
        assert_eq!(frame.kind, MediaKind::Video);
        assert_eq!(frame.src, "https://www.youtube.com/embed/vid");
        assert_eq!(frame.position, 3);

        overlay.handle_key(Key::ArrowLeft);
        assert_eq!(overlay.state(), OverlayState::OpenImage("2.jpg".into()));
    }

    #[test]
    fn test_image_match_ignores_video_posters() {
        let (mut overlay, _) = overlay();
        // "0.jpg" is also the video poster; an image lookup must land on item 0
        overlay.open(OverlayMedia::Image("0.jpg".into()));
        assert_eq!(overlay.position(), Some(0));
        overlay.previous();
        assert_eq!(overlay.state(), OverlayState::OpenImage("4.jpg".into()));
    }

    #[test]
    fn test_lookup_miss_is_position_zero() {
        let (mut overlay, _) = overlay();
        overlay.open(OverlayMedia::Image("gone.jpg".into()));
        assert_eq!(overlay.position(), Some(0));
        overlay.next();
        assert_eq!(overlay.state(), OverlayState::OpenImage("1.jpg".into()));
    }

    #[test]
    fn test_escape_closes_and_restores_scroll() {
        let (mut overlay, scroll) = overlay();
        overlay.open(OverlayMedia::Image("1.jpg".into()));
        assert!(scroll.is_suspended());

        assert!(overlay.handle_key(Key::Escape));
        assert!(!overlay.is_open());
        assert!(!scroll.is_suspended());
        assert_eq!(overlay.state(), OverlayState::Closed);

        // Keys are not consumed once closed
        assert!(!overlay.handle_key(Key::Escape));
        assert!(!overlay.handle_key(Key::ArrowRight));
    }

    #[test]
    fn test_drop_restores_scroll() {
        let (mut overlay, scroll) = overlay();
        overlay.open(OverlayMedia::Image("1.jpg".into()));
        drop(overlay);
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn test_reopen_keeps_single_suspension() {
        let (mut overlay, scroll) = overlay();
        overlay.open(OverlayMedia::Image("1.jpg".into()));
        overlay.open(OverlayMedia::Image("2.jpg".into()));
        assert_eq!(overlay.position(), Some(2));
        overlay.close();
        assert!(!scroll.is_suspended());
    }

    #[test]
    fn test_empty_collection_is_inert() {
        let scroll = Rc::new(ScrollState::new());
        let mut overlay = Overlay::new(Arc::new(MediaCollection::empty()), scroll);
        overlay.open(OverlayMedia::Image("x.jpg".into()));
        assert!(!overlay.next());
        assert!(!overlay.previous());
        assert_eq!(overlay.state(), OverlayState::OpenImage("x.jpg".into()));
    }

    #[test]
    fn test_collection_change_while_open() {
        let (mut overlay, _) = overlay();
        overlay.open(OverlayMedia::Image("4.jpg".into()));
        overlay.set_collection(Arc::new(compose(
            vec![
                MediaItem::image("a.jpg", SourceTag::Primary),
                MediaItem::image("b.jpg", SourceTag::Primary),
            ],
            vec![],
        )));
        assert_eq!(overlay.position(), Some(0));
        overlay.next();
        assert_eq!(overlay.state(), OverlayState::OpenImage("b.jpg".into()));
    }
}
