//! Lazy, region-aware client caching.

use parking_lot::RwLock;

/// Single-slot cache holding at most one client per service type, keyed by
/// the region it was built for.
///
/// Client construction is comparatively expensive (connection pools,
/// credential resolution), so consecutive calls for the same region reuse
/// the cached instance. Asking for a different region replaces the slot.
pub(crate) struct RegionCache<C> {
    slot: RwLock<Option<(String, C)>>,
}

impl<C: Clone> RegionCache<C> {
    pub(crate) fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Return the cached client for `region`, building and caching one when
    /// the slot is empty or holds a client for another region.
    pub(crate) fn get_or_create(&self, region: &str, build: impl FnOnce() -> C) -> C {
        if let Some((cached_region, client)) = self.slot.read().as_ref() {
            if cached_region == region {
                return client.clone();
            }
        }

        let mut slot = self.slot.write();
        // Re-check under the write lock; another thread may have filled the
        // slot between the read and the upgrade.
        if let Some((cached_region, client)) = slot.as_ref() {
            if cached_region == region {
                return client.clone();
            }
        }

        let client = build();
        *slot = Some((region.to_string(), client.clone()));
        client
    }
}
