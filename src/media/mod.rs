//! Media normalization pipeline for the product gallery.
//!
//! This module provides:
//! - `UrlResolver` - Rebases storage paths onto the media base URL
//! - `youtube` - Video id extraction, still-frame posters, embed URLs
//! - `Ingestor` - Reads provider records into item lists
//! - `compose` - Merges and deduplicates provider lists
//! - `CachedCollectionComputer` - Memoized ingestion + composition

pub mod collection_cache;
pub mod compose;
pub mod ingest;
pub mod url_resolver;
pub mod youtube;

pub use collection_cache::{CachedCollectionComputer, CollectionCache};
pub use compose::compose;
pub use ingest::Ingestor;
pub use url_resolver::{looks_like_image, RefKind, UrlResolver};
