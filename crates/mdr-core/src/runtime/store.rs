// crates/mdr-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Adapters
// Description: In-memory implementations of the kernel ports.
// Purpose: Back tests, the CLI, and embedded hosts without external storage.
// Dependencies: crate::{core, interfaces, runtime}, time
// ============================================================================

//! ## Overview
//! These adapters keep their state behind mutexes so clones share one store.
//! A poisoned mutex is reported as [`PortError::Unavailable`] rather than
//! propagated as a panic.
//!
//! [`InMemoryItemRepository`] checks writes optimistically: a saved item must
//! descend from the stored current record, otherwise the save fails with
//! [`PortError::Conflict`] and nothing is written.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use time::Duration;
use time::OffsetDateTime;

use crate::core::ItemMetadata;
use crate::core::ItemUid;
use crate::core::LibraryName;
use crate::core::LibraryPayload;
use crate::core::ParameterTerm;
use crate::core::PortError;
use crate::core::TemplateValue;
use crate::core::TermUid;
use crate::interfaces::Clock;
use crate::interfaces::ItemRepository;
use crate::interfaces::ParameterTermLookup;
use crate::interfaces::TemplatePublisher;
use crate::interfaces::TemplateValueSource;
use crate::interfaces::UidGenerator;
use crate::interfaces::UniquenessChecker;
use crate::interfaces::UsageGuard;
use crate::runtime::VersionedItem;

/// Locks a mutex, mapping poisoning to a port error.
fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> Result<MutexGuard<'a, T>, PortError> {
    mutex.lock().map_err(|_| PortError::Unavailable(format!("{what} mutex poisoned")))
}

// ============================================================================
// SECTION: Item Repository
// ============================================================================

/// Stored item plus its closed metadata records.
#[derive(Debug, Clone)]
struct StoredItem<P> {
    /// Latest saved state, without pending history.
    item: VersionedItem<P>,
    /// Closed records in transition order.
    closed: Vec<ItemMetadata>,
}

/// In-memory item repository that also answers uniqueness and usage queries.
#[derive(Debug, Clone)]
pub struct InMemoryItemRepository<P> {
    /// Items keyed by uid.
    items: Arc<Mutex<BTreeMap<ItemUid, StoredItem<P>>>>,
    /// Uids currently referenced by other items.
    in_use: Arc<Mutex<BTreeSet<ItemUid>>>,
}

impl<P> Default for InMemoryItemRepository<P> {
    fn default() -> Self {
        Self {
            items: Arc::new(Mutex::new(BTreeMap::new())),
            in_use: Arc::new(Mutex::new(BTreeSet::new())),
        }
    }
}

impl<P: LibraryPayload> InMemoryItemRepository<P> {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an item as referenced.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the store is unusable.
    pub fn mark_in_use(&self, uid: &ItemUid) -> Result<(), PortError> {
        lock(&self.in_use, "usage registry")?.insert(uid.clone());
        Ok(())
    }

    /// Removes the reference mark of an item.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the store is unusable.
    pub fn release(&self, uid: &ItemUid) -> Result<(), PortError> {
        lock(&self.in_use, "usage registry")?.remove(uid);
        Ok(())
    }

    /// Returns every metadata record of an item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`PortError`] when the store is unusable.
    pub fn versions(&self, uid: &ItemUid) -> Result<Vec<ItemMetadata>, PortError> {
        let guard = lock(&self.items, "item store")?;
        Ok(guard
            .get(uid)
            .map(|stored| {
                let mut records = stored.closed.clone();
                records.push(stored.item.metadata().clone());
                records
            })
            .unwrap_or_default())
    }
}

impl<P: LibraryPayload> ItemRepository<P> for InMemoryItemRepository<P> {
    fn find_by_uid(
        &self,
        uid: &ItemUid,
        _for_update: bool,
    ) -> Result<Option<VersionedItem<P>>, PortError> {
        Ok(lock(&self.items, "item store")?.get(uid).map(|stored| stored.item.clone()))
    }

    fn save(&self, item: &VersionedItem<P>) -> Result<(), PortError> {
        let mut item = item.clone();
        let mut pending = item.take_history();
        let mut guard = lock(&self.items, "item store")?;
        match guard.get_mut(item.uid()) {
            Some(stored) => {
                let current = stored.item.metadata();
                let position = pending
                    .iter()
                    .chain(std::iter::once(item.metadata()))
                    .position(|record| same_record(record, current));
                let Some(position) = position.filter(|_| !stored.item.is_deleted()) else {
                    return Err(PortError::Conflict(format!(
                        "item {} changed since it was loaded (stored {} {})",
                        item.uid(),
                        current.status(),
                        current.version()
                    )));
                };
                stored.closed.extend(pending.split_off(position));
                stored.item = item;
            }
            None => {
                guard.insert(
                    item.uid().clone(),
                    StoredItem {
                        item,
                        closed: pending,
                    },
                );
            }
        }
        Ok(())
    }
}

/// Returns true when two records describe the same version state.
///
/// Closing a record only sets its end date, so the end date is ignored.
fn same_record(left: &ItemMetadata, right: &ItemMetadata) -> bool {
    left.version() == right.version()
        && left.status() == right.status()
        && left.start_date() == right.start_date()
        && left.author_id() == right.author_id()
        && left.change_description() == right.change_description()
}

impl<P: LibraryPayload> UniquenessChecker for InMemoryItemRepository<P> {
    fn exists_by_name(
        &self,
        library: &LibraryName,
        name: &str,
        excluding: Option<&ItemUid>,
    ) -> Result<bool, PortError> {
        let guard = lock(&self.items, "item store")?;
        Ok(guard.values().map(|stored| &stored.item).any(|item| {
            !item.is_deleted()
                && item.library().name() == library
                && item.payload().name() == name
                && Some(item.uid()) != excluding
        }))
    }
}

impl<P: LibraryPayload> UsageGuard for InMemoryItemRepository<P> {
    fn is_in_use(&self, uid: &ItemUid) -> Result<bool, PortError> {
        Ok(lock(&self.in_use, "usage registry")?.contains(uid))
    }
}

// ============================================================================
// SECTION: Identifiers And Time
// ============================================================================

/// Allocates `<prefix>_000001`, `<prefix>_000002`, and so on.
#[derive(Debug)]
pub struct SequentialUidGenerator {
    /// Uid prefix.
    prefix: String,
    /// Next sequence number.
    next: AtomicU64,
}

impl SequentialUidGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl UidGenerator for SequentialUidGenerator {
    fn generate_uid(&self) -> Result<ItemUid, PortError> {
        let sequence = self.next.fetch_add(1, Ordering::Relaxed);
        Ok(ItemUid::new(format!("{}_{sequence:06}", self.prefix)))
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    /// Current time.
    now: Mutex<OffsetDateTime>,
}

impl FixedClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub const fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = guard.saturating_add(by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

// ============================================================================
// SECTION: Term Lookup
// ============================================================================

/// Terms registered per template parameter.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTermLookup {
    /// Terms keyed by parameter name and term uid.
    terms: BTreeMap<(String, TermUid), ParameterTerm>,
}

impl InMemoryTermLookup {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a term as legal for a parameter.
    #[must_use]
    pub fn with_term(mut self, parameter_name: impl Into<String>, term: ParameterTerm) -> Self {
        self.terms.insert((parameter_name.into(), term.uid().clone()), term);
        self
    }
}

impl ParameterTermLookup for InMemoryTermLookup {
    fn find_term(
        &self,
        parameter_name: &str,
        uid: &TermUid,
        value: Option<&str>,
    ) -> Result<Option<ParameterTerm>, PortError> {
        let Some(term) = self.terms.get(&(parameter_name.to_string(), uid.clone())) else {
            return Ok(None);
        };
        if let Some(expected) = value {
            let actual = term.value().map_err(|err| PortError::Invalid(err.to_string()))?;
            if actual != expected {
                return Ok(None);
            }
        }
        Ok(Some(term.clone()))
    }
}

// ============================================================================
// SECTION: Template Source
// ============================================================================

/// Published template values with the time each became final.
#[derive(Debug, Default)]
pub struct InMemoryTemplateSource {
    /// Published values per template, in publication order.
    published: Mutex<BTreeMap<ItemUid, Vec<(OffsetDateTime, TemplateValue)>>>,
    /// Number of lookups served.
    lookups: AtomicUsize,
}

impl InMemoryTemplateSource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many lookups were served.
    #[must_use]
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }
}

impl TemplatePublisher for InMemoryTemplateSource {
    fn publish(
        &self,
        uid: &ItemUid,
        value: TemplateValue,
        effective: OffsetDateTime,
    ) -> Result<(), PortError> {
        let mut guard = lock(&self.published, "template source")?;
        let versions = guard.entry(uid.clone()).or_default();
        versions.push((effective, value));
        versions.sort_by_key(|(effective, _)| *effective);
        Ok(())
    }
}

impl TemplateValueSource for InMemoryTemplateSource {
    fn find_final_value(&self, uid: &ItemUid) -> Result<Option<TemplateValue>, PortError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let guard = lock(&self.published, "template source")?;
        Ok(guard.get(uid).and_then(|versions| versions.last()).map(|(_, value)| value.clone()))
    }

    fn find_value_at(
        &self,
        uid: &ItemUid,
        as_of: OffsetDateTime,
    ) -> Result<Option<TemplateValue>, PortError> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let guard = lock(&self.published, "template source")?;
        Ok(guard.get(uid).and_then(|versions| {
            versions
                .iter()
                .rev()
                .find(|(effective, _)| *effective <= as_of)
                .map(|(_, value)| value.clone())
        }))
    }
}
