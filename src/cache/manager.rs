//! Icon cache keyed by URL
//!
//! Provides an `IconCache` that can be cloned into worker tasks; all clones
//! share one map guarded by a mutex.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use super::Icon;

/// State of one URL in the cache
#[derive(Debug, Clone)]
enum Slot {
    /// A download for this URL is in flight
    Loading,
    /// The decoded icon
    Ready(Arc<Icon>),
}

/// Outcome of [`IconCache::claim`]
#[derive(Debug, Clone)]
pub enum IconClaim {
    /// The icon is cached; no I/O needed
    Hit(Arc<Icon>),
    /// Another caller is already downloading this URL
    InFlight,
    /// The caller now owns the download and must call
    /// [`IconCache::insert`] or [`IconCache::release`] when done
    Claimed,
}

/// Shared, unbounded map from icon URL to decoded icon
///
/// Written at most once per URL; reads never block on I/O.
#[derive(Debug, Clone, Default)]
pub struct IconCache {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl IconCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached icon for `url`, if it has been downloaded
    pub fn get(&self, url: &str) -> Option<Arc<Icon>> {
        match self.slots.lock().get(url) {
            Some(Slot::Ready(icon)) => Some(Arc::clone(icon)),
            _ => None,
        }
    }

    /// Looks up `url` and, on a miss, marks it as loading in the same step
    ///
    /// Exactly one caller gets [`IconClaim::Claimed`] for a URL until that
    /// caller inserts the icon or releases the claim.
    pub fn claim(&self, url: &str) -> IconClaim {
        let mut slots = self.slots.lock();
        match slots.get(url) {
            Some(Slot::Ready(icon)) => IconClaim::Hit(Arc::clone(icon)),
            Some(Slot::Loading) => IconClaim::InFlight,
            None => {
                slots.insert(url.to_string(), Slot::Loading);
                IconClaim::Claimed
            }
        }
    }

    /// Stores a decoded icon for `url`
    ///
    /// The first icon stored for a URL wins; later inserts return the
    /// existing entry instead of replacing it.
    pub fn insert(&self, url: &str, icon: Icon) -> Arc<Icon> {
        let mut slots = self.slots.lock();
        if let Some(Slot::Ready(existing)) = slots.get(url) {
            return Arc::clone(existing);
        }
        let icon = Arc::new(icon);
        slots.insert(url.to_string(), Slot::Ready(Arc::clone(&icon)));
        icon
    }

    /// Drops an in-flight claim for `url` after a failed download
    ///
    /// Cached icons are left untouched.
    pub fn release(&self, url: &str) {
        let mut slots = self.slots.lock();
        if matches!(slots.get(url), Some(Slot::Loading)) {
            slots.remove(url);
        }
    }

    /// Returns true if a download for `url` is in flight
    pub fn is_loading(&self, url: &str) -> bool {
        matches!(self.slots.lock().get(url), Some(Slot::Loading))
    }

    /// Number of decoded icons held
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
