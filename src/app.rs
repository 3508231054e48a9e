use std::rc::Rc;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::GalleryConfig;
use crate::media::{looks_like_image, CachedCollectionComputer, UrlResolver};
use crate::models::{MediaCollection, ProviderRecord, CANONICAL_IMAGE_FIELD};
use crate::ui::keybindings::Key;
use crate::ui::{Breakpoint, GalleryView, Overlay, PageScroll, Viewport};

/// One product page's gallery: provider inputs, the memoized collection, the
/// inline view and the overlay, wired together.
pub struct GallerySession {
    computer: CachedCollectionComputer,
    primary: ProviderRecord,
    secondary: Option<ProviderRecord>,
    gallery: GalleryView,
    overlay: Overlay,
    viewport: Rc<dyn Viewport>,
}

impl GallerySession {
    pub fn new(
        config: &GalleryConfig,
        primary: ProviderRecord,
        secondary: Option<ProviderRecord>,
        viewport: Rc<dyn Viewport>,
        scroll: Rc<dyn PageScroll>,
    ) -> Self {
        let computer = CachedCollectionComputer::new(
            UrlResolver::new(config.base_url.as_deref()),
            config.video_placeholder.clone(),
            config.collection_cache_entries,
        );
        let collection = computer.compute(&primary, secondary.as_ref());
        let canonical = canonical_image(&computer.resolver, &primary);

        let gallery = GalleryView::new(Arc::clone(&collection), canonical, None)
            .with_placeholder(config.placeholder_image.clone())
            .with_breakpoint(Breakpoint::new(config.desktop_breakpoint_px));
        let overlay = Overlay::new(collection, scroll);

        info!(
            items = gallery.collection().len(),
            has_secondary = secondary.is_some(),
            "Gallery session started"
        );

        Self {
            computer,
            primary,
            secondary,
            gallery,
            overlay,
            viewport,
        }
    }

    pub fn gallery(&self) -> &GalleryView {
        &self.gallery
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn collection(&self) -> &Arc<MediaCollection> {
        self.gallery.collection()
    }

    /// Connect an observer for main image changes
    pub fn connect_active_image_changed<F>(&mut self, callback: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.gallery.connect_active_image_changed(callback);
    }

    /// Replaces the product record.
    pub fn set_primary(&mut self, primary: ProviderRecord) {
        if primary == self.primary {
            return;
        }
        self.primary = primary;
        let canonical = canonical_image(&self.computer.resolver, &self.primary);
        self.refresh();
        self.gallery.set_canonical_image(canonical);
    }

    /// Hands in the group record, typically after first render.
    pub fn set_secondary(&mut self, secondary: ProviderRecord) {
        if self.secondary.as_ref() == Some(&secondary) {
            return;
        }
        self.secondary = Some(secondary);
        self.refresh();
    }

    pub fn clear_secondary(&mut self) {
        if self.secondary.take().is_some() {
            self.refresh();
        }
    }

    pub fn set_active_image_override(&mut self, url: Option<String>) {
        self.gallery.set_active_image_override(url);
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.gallery.select(index)
    }

    pub fn next(&mut self) -> bool {
        self.gallery.next()
    }

    pub fn previous(&mut self) -> bool {
        self.gallery.previous()
    }

    pub fn main_image_failed(&mut self) -> bool {
        self.gallery.main_image_failed()
    }

    /// Click on the main viewer or video surface. Opens the overlay on the
    /// displayed content when the viewport is wide enough.
    pub fn click_main_viewer(&mut self) -> bool {
        match self.gallery.click_main_viewer(self.viewport.as_ref()) {
            Some(media) => {
                self.overlay.open(media);
                true
            }
            None => false,
        }
    }

    /// Returns true if the key was consumed.
    pub fn key_pressed(&mut self, key: Key) -> bool {
        self.overlay.handle_key(key)
    }

    pub fn close_overlay(&mut self) -> bool {
        self.overlay.close()
    }

    /// Recomputes the collection from current inputs and hands it to both views.
    fn refresh(&mut self) {
        let collection = self
            .computer
            .compute(&self.primary, self.secondary.as_ref());
        debug!(items = collection.len(), "Refreshing gallery collection");
        self.overlay.set_collection(Arc::clone(&collection));
        self.gallery.set_collection(collection);
    }
}

impl std::fmt::Debug for GallerySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GallerySession")
            .field("gallery", &self.gallery)
            .field("overlay", &self.overlay)
            .field("viewport_width", &self.viewport.width())
            .finish()
    }
}

/// The product's canonical first image, resolved.
fn canonical_image(resolver: &UrlResolver, primary: &ProviderRecord) -> Option<String> {
    primary
        .get(CANONICAL_IMAGE_FIELD)
        .filter(|raw| looks_like_image(raw))
        .and_then(|raw| resolver.resolve(Some(raw)))
}
