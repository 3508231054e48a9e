pub mod gallery;
pub mod keybindings;
pub mod overlay;
pub mod viewport;

pub use gallery::{GalleryView, GalleryViewState, MainView};
pub use keybindings::Key;
pub use overlay::{Overlay, OverlayMedia, OverlayState};
pub use viewport::{Breakpoint, PageScroll, ScrollState, SharedViewport, Viewport};
