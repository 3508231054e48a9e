use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::{debug, trace};
use xxhash_rust::xxh3::xxh3_64;

use super::compose::compose;
use super::ingest::Ingestor;
use super::url_resolver::UrlResolver;
use crate::models::{MediaCollection, MediaFieldSet, ProviderRecord, SourceTag};

/// Default number of composed collections kept in memory.
pub const DEFAULT_CACHE_ENTRIES: usize = 8;

/// Memo of composed collections keyed by an input fingerprint.
///
/// The fingerprint is a fast hash over every provider field the ingestion
/// reads plus the resolver base, so any change to what would be ingested
/// produces a new key. Hits hand back the same `Arc`.
pub struct CollectionCache {
    cache: Mutex<LruCache<u64, Arc<MediaCollection>>>,
}

impl CollectionCache {
    /// Creates a cache holding at most `entries` collections (minimum 1).
    pub fn new(entries: usize) -> Self {
        let capacity = NonZeroUsize::new(entries.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Computes the fingerprint of a pair of provider inputs.
    ///
    /// Field order is fixed by the field sets, so equal inputs always hash
    /// equally regardless of how the records were built.
    pub fn fingerprint(
        primary: &ProviderRecord,
        secondary: Option<&ProviderRecord>,
        resolver: &UrlResolver,
        video_placeholder: &str,
    ) -> u64 {
        let mut hasher_input = Vec::with_capacity(256);

        push_field(&mut hasher_input, resolver.base());
        push_field(&mut hasher_input, Some(video_placeholder));

        for (source, record) in [
            (SourceTag::Primary, Some(primary)),
            (SourceTag::Secondary, secondary),
        ] {
            hasher_input.push(source as u8);
            match record {
                Some(record) => {
                    hasher_input.push(1);
                    for name in MediaFieldSet::for_source(source).all_fields() {
                        push_field(&mut hasher_input, record.get(name));
                    }
                }
                None => hasher_input.push(0),
            }
        }

        xxh3_64(&hasher_input)
    }

    pub fn get(&self, fingerprint: u64) -> Option<Arc<MediaCollection>> {
        self.cache.lock().get(&fingerprint).cloned()
    }

    pub fn set(&self, fingerprint: u64, collection: Arc<MediaCollection>) {
        self.cache.lock().put(fingerprint, collection);
    }

    /// Returns the number of cached collections.
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl Default for CollectionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_ENTRIES)
    }
}

/// Length-prefixed so adjacent fields cannot alias.
fn push_field(buf: &mut Vec<u8>, value: Option<&str>) {
    match value {
        Some(v) => {
            buf.push(1);
            buf.extend_from_slice(&(v.len() as u64).to_le_bytes());
            buf.extend_from_slice(v.as_bytes());
        }
        None => buf.push(0),
    }
}

/// Ingestion plus composition with automatic memoization.
pub struct CachedCollectionComputer {
    pub resolver: UrlResolver,
    pub video_placeholder: String,
    pub cache: CollectionCache,
}

impl CachedCollectionComputer {
    pub fn new(resolver: UrlResolver, video_placeholder: impl Into<String>, entries: usize) -> Self {
        Self {
            resolver,
            video_placeholder: video_placeholder.into(),
            cache: CollectionCache::new(entries),
        }
    }

    /// Returns the collection for these inputs, computing it on a cache miss.
    pub fn compute(
        &self,
        primary: &ProviderRecord,
        secondary: Option<&ProviderRecord>,
    ) -> Arc<MediaCollection> {
        let fingerprint = CollectionCache::fingerprint(
            primary,
            secondary,
            &self.resolver,
            &self.video_placeholder,
        );

        if let Some(hit) = self.cache.get(fingerprint) {
            trace!(fingerprint, "Collection cache hit");
            return hit;
        }

        let ingestor = Ingestor::new(&self.resolver, &self.video_placeholder);
        let primary_items = ingestor.ingest_primary(primary);
        let secondary_items = ingestor.ingest_secondary(secondary, &primary_items);
        let collection = Arc::new(compose(primary_items, secondary_items));

        debug!(
            fingerprint,
            items = collection.len(),
            has_secondary = secondary.is_some(),
            "Composed media collection"
        );
        self.cache.set(fingerprint, Arc::clone(&collection));
        trace!(cached = self.cache.len(), "Collection cache updated");
        collection
    }
}
