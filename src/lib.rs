//! Headless product media gallery.
//!
//! Normalizes media fields from a product record and an optional group
//! record into one deduplicated [`models::MediaCollection`], and drives the
//! inline viewer ([`ui::GalleryView`]) and the full-screen
//! [`ui::Overlay`] over it.

pub mod app;
pub mod config;
pub mod error;
pub mod fixture;
pub mod media;
pub mod models;
pub mod ui;

pub use app::GallerySession;
pub use config::GalleryConfig;
pub use error::{GalleryError, Result};
pub use fixture::GalleryFixture;
