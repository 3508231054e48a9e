// Host collaborators for the view layer
// - Viewport: current window width, read at the moment a click is handled
// - PageScroll: page scroll suspension while the overlay is open

use std::cell::Cell;
use std::rc::Rc;

use tracing::trace;

/// Default desktop breakpoint in CSS pixels.
pub const DEFAULT_DESKTOP_BREAKPOINT_PX: u32 = 1024;

/// Source of the current viewport width.
///
/// Never cached by the gallery; the window may be resized between renders.
pub trait Viewport {
    fn width(&self) -> u32;
}

impl<F> Viewport for F
where
    F: Fn() -> u32,
{
    fn width(&self) -> u32 {
        self()
    }
}

/// Viewport whose width is pushed by the host on resize.
#[derive(Debug, Clone, Default)]
pub struct SharedViewport {
    width: Rc<Cell<u32>>,
}

impl SharedViewport {
    pub fn new(width: u32) -> Self {
        Self {
            width: Rc::new(Cell::new(width)),
        }
    }

    pub fn resize(&self, width: u32) {
        self.width.set(width);
    }
}

impl Viewport for SharedViewport {
    fn width(&self) -> u32 {
        self.width.get()
    }
}

/// Minimum width at which the overlay may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    pub min_width: u32,
}

impl Breakpoint {
    pub fn new(min_width: u32) -> Self {
        Self { min_width }
    }

    pub fn admits(&self, viewport: &dyn Viewport) -> bool {
        viewport.width() >= self.min_width
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::new(DEFAULT_DESKTOP_BREAKPOINT_PX)
    }
}

/// Page scrolling controlled by the host.
pub trait PageScroll {
    fn suspend(&self);
    fn restore(&self);
}

/// Scroll suspension held for the lifetime of the guard.
///
/// Restores scrolling on drop, so every exit path releases it.
pub struct ScrollGuard {
    scroll: Rc<dyn PageScroll>,
}

impl ScrollGuard {
    pub fn acquire(scroll: Rc<dyn PageScroll>) -> Self {
        scroll.suspend();
        trace!("Page scroll suspended");
        Self { scroll }
    }
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.scroll.restore();
        trace!("Page scroll restored");
    }
}

impl std::fmt::Debug for ScrollGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollGuard")
            .field("scroll", &"<page scroll>")
            .finish()
    }
}

/// In-process scroll state; tracks suspension depth.
#[derive(Debug, Default)]
pub struct ScrollState {
    depth: Cell<u32>,
}

impl ScrollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_suspended(&self) -> bool {
        self.depth.get() > 0
    }
}

impl PageScroll for ScrollState {
    fn suspend(&self) {
        self.depth.set(self.depth.get() + 1);
    }

    fn restore(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
