// Inline gallery viewer for the product page
// Features:
// - Main viewer showing the selected image or video
// - Desktop thumbnail rail and mobile dot strip, both bound to one index
// - Wrapping previous/next controls
// - Host mirroring of the active image through guarded observers
// - Overlay activation gated on the desktop breakpoint

use std::borrow::Cow;
use std::sync::Arc;

use tracing::{debug, warn};

use super::overlay::OverlayMedia;
use super::viewport::{Breakpoint, Viewport};
use crate::media::youtube;
use crate::models::{MediaCollection, MediaItem, MediaKind};

/// Default placeholder shown when there is nothing (or nothing loadable) to display.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Callback type for active image changes
pub type ActiveImageCallback = Box<dyn FnMut(&str)>;

/// Observers notified when the main image changes.
///
/// Dispatch is suppressed when the value equals the last one sent, so a host
/// that echoes the notification back as an override cannot start a loop.
#[derive(Default)]
pub struct ActiveImageObservers {
    last_notified: Option<String>,
    observers: Vec<ActiveImageCallback>,
}

impl std::fmt::Debug for ActiveImageObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveImageObservers")
            .field("last_notified", &self.last_notified)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl ActiveImageObservers {
    pub fn connect<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.observers.push(Box::new(callback));
    }

    /// Notifies observers unless `url` was the last value sent.
    /// Returns true if a notification went out.
    pub fn dispatch(&mut self, url: &str) -> bool {
        if self.last_notified.as_deref() == Some(url) {
            return false;
        }
        self.last_notified = Some(url.to_owned());
        for observer in &mut self.observers {
            observer(url);
        }
        true
    }

    /// Records `url` as already known to the host without notifying.
    fn prime(&mut self, url: Option<&str>) {
        self.last_notified = url.map(str::to_owned);
    }
}

/// Snapshot of the gallery's view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryViewState {
    pub current_index: usize,
    pub is_video_active: bool,
    pub active_video_url: Option<String>,
    pub main_image_src: Option<String>,
}

/// What the main viewer renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainView<'a> {
    Placeholder(&'a str),
    Image(&'a str),
    Video {
        /// Player URL; YouTube links in embed form.
        player_src: Cow<'a, str>,
        poster: Option<&'a str>,
    },
}

/// One entry of the desktop thumbnail rail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail<'a> {
    pub index: usize,
    pub kind: MediaKind,
    pub src: &'a str,
    pub active: bool,
}

/// One entry of the mobile dot strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot {
    pub index: usize,
    pub active: bool,
}

/// State machine behind the inline viewer, thumbnail rail and dot strip.
#[derive(Debug)]
pub struct GalleryView {
    collection: Arc<MediaCollection>,
    current_index: usize,
    is_video_active: bool,
    active_video_url: Option<String>,
    main_image_src: Option<String>,
    /// Host-designated preferred first image.
    canonical_image: Option<String>,
    /// Host override; beats the canonical image.
    override_image: Option<String>,
    /// Last computed main image, to detect changes of the computed value.
    last_computed: Option<String>,
    image_failed: bool,
    placeholder_image: String,
    breakpoint: Breakpoint,
    observers: ActiveImageObservers,
}

impl GalleryView {
    /// Creates a view over `collection`, showing the computed initial image.
    pub fn new(
        collection: Arc<MediaCollection>,
        canonical_image: Option<String>,
        override_image: Option<String>,
    ) -> Self {
        let mut view = Self {
            collection,
            current_index: 0,
            is_video_active: false,
            active_video_url: None,
            main_image_src: None,
            canonical_image,
            override_image,
            last_computed: None,
            image_failed: false,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            breakpoint: Breakpoint::default(),
            observers: ActiveImageObservers::default(),
        };

        let initial = view.computed_main_image().map(str::to_owned);
        if let Some(url) = initial.as_deref() {
            if let Some(index) = view.collection.position_of(MediaKind::Image, url) {
                view.current_index = index;
            }
        }
        view.observers.prime(initial.as_deref());
        view.main_image_src = initial.clone();
        view.last_computed = initial;
        view
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder_image = placeholder.into();
        self
    }

    pub fn with_breakpoint(mut self, breakpoint: Breakpoint) -> Self {
        self.breakpoint = breakpoint;
        self
    }

    /// Connect an observer for main image changes
    pub fn connect_active_image_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.observers.connect(callback);
    }

    pub fn collection(&self) -> &Arc<MediaCollection> {
        &self.collection
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Selected item, or `None` if the index no longer fits the collection.
    pub fn selected(&self) -> Option<&MediaItem> {
        self.collection.get(self.current_index)
    }

    pub fn is_video_active(&self) -> bool {
        self.is_video_active
    }

    pub fn state(&self) -> GalleryViewState {
        GalleryViewState {
            current_index: self.current_index,
            is_video_active: self.is_video_active,
            active_video_url: self.active_video_url.clone(),
            main_image_src: self.main_image_src.clone(),
        }
    }

    /// Main image by priority: override, canonical image, first item.
    /// An empty collection has no main image.
    pub fn computed_main_image(&self) -> Option<&str> {
        if self.collection.is_empty() {
            return None;
        }
        self.override_image
            .as_deref()
            .or(self.canonical_image.as_deref())
            .or_else(|| self.collection.first().map(|item| item.display_url.as_str()))
    }

    pub fn set_active_image_override(&mut self, url: Option<String>) {
        self.override_image = url;
        self.sync_main_image();
    }

    pub fn set_canonical_image(&mut self, url: Option<String>) {
        self.canonical_image = url;
        self.sync_main_image();
    }

    /// Swaps in a recomputed collection.
    ///
    /// The current selection follows its content: if the selected item is
    /// still present its new position becomes the index. Otherwise the index
    /// is left alone and may fall out of range, which renders as nothing
    /// selected.
    pub fn set_collection(&mut self, collection: Arc<MediaCollection>) {
        if Arc::ptr_eq(&self.collection, &collection) {
            return;
        }

        let moved_to = self
            .selected()
            .and_then(|item| collection.position_of_item(item));
        if let Some(index) = moved_to {
            if index != self.current_index {
                debug!(from = self.current_index, to = index, "Selection followed its item");
            }
            self.current_index = index;
        } else if self.current_index >= collection.len() && !collection.is_empty() {
            debug!(
                index = self.current_index,
                len = collection.len(),
                "Selected index out of range after recompute"
            );
        }

        self.collection = collection;
        self.sync_main_image();
    }

    /// Reacts to a change of the computed main image.
    ///
    /// Runs only when the computed value differs from the last computed one,
    /// and only resets the viewer when it also differs from what is shown.
    fn sync_main_image(&mut self) {
        let computed = self.computed_main_image().map(str::to_owned);
        if computed == self.last_computed {
            return;
        }
        self.last_computed = computed.clone();

        let Some(url) = computed else {
            debug!("Nothing left to show, falling back to placeholder");
            self.is_video_active = false;
            self.active_video_url = None;
            self.main_image_src = None;
            self.image_failed = false;
            return;
        };
        if self.main_image_src.as_deref() == Some(url.as_str()) && !self.is_video_active {
            return;
        }

        debug!(%url, "Computed main image changed");
        if let Some(index) = self.collection.position_of(MediaKind::Image, &url) {
            self.current_index = index;
        }
        self.show_image(url);
    }

    fn show_image(&mut self, url: String) {
        self.is_video_active = false;
        self.active_video_url = None;
        self.image_failed = false;
        self.observers.dispatch(&url);
        self.main_image_src = Some(url);
    }

    /// Selects item `index` from the rail or dot strip.
    ///
    /// Returns false for an index outside the collection.
    pub fn select(&mut self, index: usize) -> bool {
        let Some(item) = self.collection.get(index) else {
            return false;
        };

        self.current_index = index;
        match item.kind {
            MediaKind::Video => {
                self.is_video_active = true;
                self.active_video_url = Some(item.viewer_url().to_owned());
            }
            MediaKind::Image => {
                let url = item.display_url.clone();
                self.show_image(url);
            }
        }
        true
    }

    pub fn next(&mut self) -> bool {
        match self.collection.step(self.current_index, true) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    pub fn previous(&mut self) -> bool {
        match self.collection.step(self.current_index, false) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Reports a load failure of the main image.
    ///
    /// The first failure swaps to the placeholder; failures after that,
    /// including of the placeholder itself, are ignored, as are reports while
    /// a video is showing. Returns true if the swap happened.
    pub fn main_image_failed(&mut self) -> bool {
        if self.is_video_active || self.image_failed {
            return false;
        }
        if self.main_image_src.as_deref() == Some(self.placeholder_image.as_str()) {
            return false;
        }
        warn!(src = ?self.main_image_src, "Main image failed to load, using placeholder");
        self.image_failed = true;
        true
    }

    pub fn main_view(&self) -> MainView<'_> {
        if self.is_video_active {
            if let Some(url) = self.active_video_url.as_deref() {
                return MainView::Video {
                    player_src: youtube::embed_url(url),
                    poster: self
                        .selected()
                        .filter(|item| item.is_video())
                        .map(|item| item.poster()),
                };
            }
        }

        match self.main_image_src.as_deref() {
            Some(_) if self.image_failed => MainView::Placeholder(&self.placeholder_image),
            Some(src) => MainView::Image(src),
            None => MainView::Placeholder(&self.placeholder_image),
        }
    }

    /// Desktop thumbnail rail.
    pub fn thumbnail_rail(&self) -> Vec<Thumbnail<'_>> {
        self.collection
            .iter()
            .enumerate()
            .map(|(index, item)| Thumbnail {
                index,
                kind: item.kind,
                src: item.poster(),
                active: index == self.current_index,
            })
            .collect()
    }

    /// Mobile dot strip; same index as the rail.
    pub fn dot_strip(&self) -> Vec<Dot> {
        (0..self.collection.len())
            .map(|index| Dot {
                index,
                active: index == self.current_index,
            })
            .collect()
    }

    /// Handles a click on the main viewer or video surface.
    ///
    /// Returns the content to open in the overlay when the viewport is at
    /// least the desktop breakpoint wide; narrower viewports get `None`.
    pub fn click_main_viewer(&self, viewport: &dyn Viewport) -> Option<OverlayMedia> {
        if !self.breakpoint.admits(viewport) {
            debug!(
                width = viewport.width(),
                breakpoint = self.breakpoint.min_width,
                "Main viewer click below breakpoint"
            );
            return None;
        }

        match self.main_view() {
            MainView::Video { .. } => self.active_video_url.clone().map(OverlayMedia::Video),
            MainView::Image(src) => Some(OverlayMedia::Image(src.to_owned())),
            MainView::Placeholder(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::compose;
    use crate::models::SourceTag;
    use crate::ui::viewport::SharedViewport;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn four() -> Arc<MediaCollection> {
        Arc::new(compose(
            vec![
                MediaItem::image("a.jpg", SourceTag::Primary),
                MediaItem::image("b.jpg", SourceTag::Primary),
                MediaItem::video("a.jpg", "https://youtu.be/vid", SourceTag::Primary),
            ],
            vec![MediaItem::image("g.jpg", SourceTag::Secondary)],
        ))
    }

    fn recorder(view: &mut GalleryView) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        view.connect_active_image_changed(move |url| sink.borrow_mut().push(url.to_owned()));
        seen
    }

    #[test]
    fn test_initial_image_priority() {
        let view = GalleryView::new(four(), None, None);
        assert_eq!(view.main_view(), MainView::Image("a.jpg"));

        let view = GalleryView::new(four(), Some("b.jpg".into()), None);
        assert_eq!(view.main_view(), MainView::Image("b.jpg"));
        assert_eq!(view.current_index(), 1);

        let view = GalleryView::new(four(), Some("b.jpg".into()), Some("g.jpg".into()));
        assert_eq!(view.main_view(), MainView::Image("g.jpg"));
        assert_eq!(view.current_index(), 3);
    }

    #[test]
    fn test_previous_wraps_from_zero() {
        let mut view = GalleryView::new(four(), None, None);
        assert!(view.previous());
        assert_eq!(view.current_index(), 3);
        assert_eq!(view.main_view(), MainView::Image("g.jpg"));
    }

    #[test]
    fn test_next_cycles_back() {
        let mut view = GalleryView::new(four(), None, None);
        view.select(1);
        for _ in 0..4 {
            view.next();
        }
        assert_eq!(view.current_index(), 1);
    }

    #[test]
    fn test_select_video_enters_video_mode() {
        let mut view = GalleryView::new(four(), None, None);
        assert!(view.select(2));
        let state = view.state();
        assert!(state.is_video_active);
        assert_eq!(state.active_video_url.as_deref(), Some("https://youtu.be/vid"));
        assert_eq!(
            view.main_view(),
            MainView::Video {
                player_src: Cow::Owned("https://www.youtube.com/embed/vid".into()),
                poster: Some("a.jpg"),
            }
        );

        view.select(3);
        assert!(!view.is_video_active());
        assert_eq!(view.main_view(), MainView::Image("g.jpg"));
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut view = GalleryView::new(four(), None, None);
        assert!(!view.select(9));
        assert_eq!(view.current_index(), 0);
    }

    #[test]
    fn test_rail_and_dots_share_index() {
        let mut view = GalleryView::new(four(), None, None);
        view.select(2);
        let rail: Vec<bool> = view.thumbnail_rail().iter().map(|t| t.active).collect();
        let dots: Vec<bool> = view.dot_strip().iter().map(|d| d.active).collect();
        assert_eq!(rail, vec![false, false, true, false]);
        assert_eq!(rail, dots);
        assert_eq!(view.thumbnail_rail()[2].src, "a.jpg");
    }

    #[test]
    fn test_empty_collection() {
        let mut view = GalleryView::new(Arc::new(MediaCollection::empty()), None, None);
        assert_eq!(view.main_view(), MainView::Placeholder(DEFAULT_PLACEHOLDER_IMAGE));
        assert!(!view.next());
        assert!(!view.previous());
        assert!(view.thumbnail_rail().is_empty());
        assert!(view.dot_strip().is_empty());
        assert!(view.click_main_viewer(&SharedViewport::new(1920)).is_none());
    }

    #[test]
    fn test_image_failure_falls_back_once() {
        let mut view = GalleryView::new(four(), None, None).with_placeholder("/ph.png");
        assert!(view.main_image_failed());
        assert_eq!(view.main_view(), MainView::Placeholder("/ph.png"));
        // The placeholder failing too is not retried
        assert!(!view.main_image_failed());

        // A new image gets a fresh chance
        view.select(1);
        assert_eq!(view.main_view(), MainView::Image("b.jpg"));
        assert!(view.main_image_failed());
    }

    #[test]
    fn test_selection_notifies_host_once() {
        let mut view = GalleryView::new(four(), None, None);
        let seen = recorder(&mut view);

        view.select(1);
        view.select(1);
        assert_eq!(*seen.borrow(), vec!["b.jpg".to_string()]);

        // Host echoes the value back as the override: no loop, no reset
        view.set_active_image_override(Some("b.jpg".into()));
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(view.current_index(), 1);
    }

    #[test]
    fn test_override_change_resets_video_mode() {
        let mut view = GalleryView::new(four(), None, None);
        let seen = recorder(&mut view);
        view.select(2);
        assert!(view.is_video_active());

        view.set_active_image_override(Some("g.jpg".into()));
        assert!(!view.is_video_active());
        assert_eq!(view.current_index(), 3);
        assert_eq!(view.main_view(), MainView::Image("g.jpg"));
        assert_eq!(*seen.borrow(), vec!["g.jpg".to_string()]);
    }

    #[test]
    fn test_unchanged_computed_image_keeps_selection() {
        let mut view = GalleryView::new(four(), Some("a.jpg".into()), None);
        view.select(1);
        view.set_canonical_image(Some("a.jpg".into()));
        assert_eq!(view.main_view(), MainView::Image("b.jpg"));
    }

    #[test]
    fn test_late_collection_keeps_selection_by_content() {
        let small = Arc::new(compose(
            vec![
                MediaItem::image("a.jpg", SourceTag::Primary),
                MediaItem::image("b.jpg", SourceTag::Primary),
            ],
            vec![],
        ));
        let mut view = GalleryView::new(small, None, None);
        view.select(1);

        let reordered = Arc::new(compose(
            vec![
                MediaItem::image("a.jpg", SourceTag::Primary),
                MediaItem::image("n.jpg", SourceTag::Primary),
                MediaItem::image("b.jpg", SourceTag::Primary),
            ],
            vec![MediaItem::image("g.jpg", SourceTag::Secondary)],
        ));
        view.set_collection(reordered);
        assert_eq!(view.current_index(), 2);
        assert_eq!(view.selected().unwrap().display_url, "b.jpg");
        assert_eq!(view.main_view(), MainView::Image("b.jpg"));
    }

    #[test]
    fn test_shrunk_collection_degrades() {
        let mut view = GalleryView::new(four(), None, None);
        view.select(3);
        let shrunk = Arc::new(compose(
            vec![MediaItem::image("a.jpg", SourceTag::Primary)],
            vec![],
        ));
        view.set_collection(shrunk);
        assert_eq!(view.current_index(), 3);
        assert!(view.selected().is_none());
        assert!(view.dot_strip().iter().all(|d| !d.active));
        // Navigation recovers into range
        assert!(view.next());
        assert_eq!(view.current_index(), 0);
    }

    #[test]
    fn test_emptied_collection_shows_placeholder() {
        let viewport = SharedViewport::new(1920);
        let mut view = GalleryView::new(four(), None, None);
        view.set_collection(Arc::new(MediaCollection::empty()));

        assert_eq!(view.main_view(), MainView::Placeholder(DEFAULT_PLACEHOLDER_IMAGE));
        assert_eq!(view.state().main_image_src, None);
        assert!(view.click_main_viewer(&viewport).is_none());
        assert!(!view.next());
        assert!(view.dot_strip().is_empty());
    }

    #[test]
    fn test_emptied_collection_leaves_video_mode() {
        let viewport = SharedViewport::new(1920);
        let mut view = GalleryView::new(four(), None, None);
        view.select(2);
        assert!(view.is_video_active());

        view.set_collection(Arc::new(MediaCollection::empty()));
        assert!(!view.is_video_active());
        assert_eq!(view.state().active_video_url, None);
        assert_eq!(view.main_view(), MainView::Placeholder(DEFAULT_PLACEHOLDER_IMAGE));
        assert!(view.click_main_viewer(&viewport).is_none());
    }

    #[test]
    fn test_failure_ignored_while_video_shows() {
        let mut view = GalleryView::new(four(), None, None);
        view.select(2);
        assert!(!view.main_image_failed());

        // Back on an image, the first failure still falls back
        view.select(0);
        assert_eq!(view.main_view(), MainView::Image("a.jpg"));
        assert!(view.main_image_failed());
    }

    #[test]
    fn test_overlay_click_gated_by_breakpoint() {
        let mut view = GalleryView::new(four(), None, None).with_breakpoint(Breakpoint::new(1024));
        let viewport = SharedViewport::new(800);
        assert!(view.click_main_viewer(&viewport).is_none());

        viewport.resize(1440);
        assert_eq!(
            view.click_main_viewer(&viewport),
            Some(OverlayMedia::Image("a.jpg".into()))
        );

        view.select(2);
        assert_eq!(
            view.click_main_viewer(&viewport),
            Some(OverlayMedia::Video("https://youtu.be/vid".into()))
        );
    }
}
