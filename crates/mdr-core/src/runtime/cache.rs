// crates/mdr-core/src/runtime/cache.rs
// ============================================================================
// Module: Template Cache
// Description: TTL cache decorator for template value lookups.
// Purpose: Avoid repeated current-template reads during bulk instantiation.
// Dependencies: crate::{core, interfaces}, time, tracing
// ============================================================================

//! ## Overview
//! [`CachedTemplateSource`] wraps any [`TemplateValueSource`] and caches
//! current FINAL values for a fixed time-to-live measured with the injected
//! [`Clock`]. Historical lookups (`find_value_at`) always pass through.
//! Publishing through the cache writes to the wrapped source and then drops
//! the cached entry, so readers of the same cache see the new version at
//! once. Writes that bypass the cache must call
//! [`CachedTemplateSource::invalidate`]. When the cache is full the oldest
//! entry is evicted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use time::Duration;
use time::OffsetDateTime;
use tracing::debug;

use crate::core::ItemUid;
use crate::core::PortError;
use crate::core::TemplateValue;
use crate::interfaces::Clock;
use crate::interfaces::TemplatePublisher;
use crate::interfaces::TemplateValueSource;

// ============================================================================
// SECTION: Settings
// ============================================================================

/// Cache sizing and expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Time an entry stays fresh.
    pub ttl: Duration,
    /// Maximum number of cached templates; at least 1.
    pub max_entries: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(1),
            max_entries: 1024,
        }
    }
}

// ============================================================================
// SECTION: Cache
// ============================================================================

/// One cached lookup result.
#[derive(Debug, Clone)]
struct CacheEntry {
    /// Time the entry was filled.
    stored_at: OffsetDateTime,
    /// Cached result, including "no final version".
    value: Option<TemplateValue>,
}

/// TTL cache in front of a template source.
#[derive(Debug)]
pub struct CachedTemplateSource<S, C> {
    /// Wrapped source.
    inner: S,
    /// Time source for expiry.
    clock: C,
    /// Sizing and expiry.
    settings: CacheSettings,
    /// Cached entries keyed by template uid.
    entries: Mutex<BTreeMap<ItemUid, CacheEntry>>,
}

impl<S: TemplateValueSource, C: Clock> CachedTemplateSource<S, C> {
    /// Wraps `inner` with a cache.
    #[must_use]
    pub fn new(inner: S, clock: C, settings: CacheSettings) -> Self {
        Self {
            inner,
            clock,
            settings: CacheSettings {
                max_entries: settings.max_entries.max(1),
                ..settings
            },
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    /// Returns the wrapped source.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Drops the cached value of one template.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the cache is unusable.
    pub fn invalidate(&self, uid: &ItemUid) -> Result<(), PortError> {
        self.lock()?.remove(uid);
        debug!(%uid, "template cache entry invalidated");
        Ok(())
    }

    /// Drops every cached value.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the cache is unusable.
    pub fn clear(&self) -> Result<(), PortError> {
        self.lock()?.clear();
        Ok(())
    }

    /// Returns the number of cached entries, fresh or not.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the cache is unusable.
    pub fn cached_entries(&self) -> Result<usize, PortError> {
        Ok(self.lock()?.len())
    }

    /// Locks the entry map.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<ItemUid, CacheEntry>>, PortError> {
        self.entries
            .lock()
            .map_err(|_| PortError::Unavailable("template cache mutex poisoned".to_string()))
    }
}

impl<S, C> TemplatePublisher for CachedTemplateSource<S, C>
where
    S: TemplateValueSource + TemplatePublisher,
    C: Clock,
{
    fn publish(
        &self,
        uid: &ItemUid,
        value: TemplateValue,
        effective: OffsetDateTime,
    ) -> Result<(), PortError> {
        self.inner.publish(uid, value, effective)?;
        self.invalidate(uid)
    }
}

impl<S: TemplateValueSource, C: Clock> TemplateValueSource for CachedTemplateSource<S, C> {
    fn find_final_value(&self, uid: &ItemUid) -> Result<Option<TemplateValue>, PortError> {
        let now = self.clock.now();
        {
            let guard = self.lock()?;
            if let Some(entry) = guard.get(uid)
                && now - entry.stored_at < self.settings.ttl
            {
                debug!(%uid, "template cache hit");
                return Ok(entry.value.clone());
            }
        }
        debug!(%uid, "template cache miss");
        let value = self.inner.find_final_value(uid)?;
        let mut guard = self.lock()?;
        if guard.len() >= self.settings.max_entries && !guard.contains_key(uid) {
            let oldest = guard
                .iter()
                .min_by_key(|(_, entry)| entry.stored_at)
                .map(|(key, _)| key.clone());
            if let Some(oldest) = oldest {
                guard.remove(&oldest);
            }
        }
        guard.insert(
            uid.clone(),
            CacheEntry {
                stored_at: now,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    fn find_value_at(
        &self,
        uid: &ItemUid,
        as_of: OffsetDateTime,
    ) -> Result<Option<TemplateValue>, PortError> {
        self.inner.find_value_at(uid, as_of)
    }
}
