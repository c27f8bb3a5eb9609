//! Caller-owned memoization of rendered images.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tracing::trace;

use crate::error::Result;
use crate::render::RenderedImage;
use crate::style::StyleConfig;

/// Default number of images kept by [`RenderCache::default`].
pub const DEFAULT_CAPACITY: usize = 64;

/// Hit/miss counters.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

/// An LRU of rendered images keyed on `(text, style)`.
///
/// Rendering is deterministic, so a cached image is always identical to a fresh render.
pub struct RenderCache {
    entries: LruCache<(String, StyleConfig), Arc<RenderedImage>>,
    stats: CacheStats,
}

impl RenderCache {
    /// A cache holding at most `capacity` images (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)),
            stats: CacheStats::default(),
        }
    }

    /// Returns the cached image for `(text, style)`, rendering and storing it on a miss.
    /// Failed renders are not cached.
    pub fn get_or_render(&mut self, text: &str, style: &StyleConfig) -> Result<Arc<RenderedImage>> {
        let key = (text.to_owned(), style.clone());
        if let Some(cached) = self.entries.get(&key) {
            self.stats.hits += 1;
            trace!(text, "render cache hit");
            return Ok(Arc::clone(cached));
        }
        self.stats.misses += 1;
        let image = Arc::new(crate::generate(text, style)?);
        if self.entries.len() == self.entries.cap().get() {
            self.stats.evictions += 1;
        }
        self.entries.put(key, Arc::clone(&image));
        Ok(image)
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for RenderCache {
    fn default() -> Self {
        RenderCache::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_return_the_same_image() {
        let mut cache = RenderCache::new(4);
        let style = StyleConfig::default().with_size(100);
        let first = cache.get_or_render("cached", &style).unwrap();
        let second = cache.get_or_render("cached", &style).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.stats().hits, 1);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_style_is_part_of_the_key() {
        let mut cache = RenderCache::new(4);
        let style = StyleConfig::default().with_size(100);
        let a = cache.get_or_render("same text", &style).unwrap();
        let b = cache
            .get_or_render("same text", &style.clone().with_body_shape(crate::ShapeSpec::Circle))
            .unwrap();
        assert_ne!(a.png(), b.png());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_least_recent_entry_is_evicted() {
        let mut cache = RenderCache::new(1);
        let style = StyleConfig::default().with_size(80);
        cache.get_or_render("one", &style).unwrap();
        cache.get_or_render("two", &style).unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 1);
        cache.get_or_render("one", &style).unwrap();
        assert_eq!(cache.stats().misses, 3);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let mut cache = RenderCache::new(2);
        let tiny = StyleConfig::default().with_size(5);
        assert!(cache.get_or_render("too small", &tiny).is_err());
        assert!(cache.is_empty());
    }
}
