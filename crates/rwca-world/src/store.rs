//! Id-keyed entity storage with monotonically increasing id allocation.
//!
//! Every entity kind (agents, walls, wall vertices, obstacles) lives in an
//! [`EntityStore`].  The store owns the kind's id counter: ids are handed
//! out in ascending order and never reused, so a removed id stays dead.
//!
//! The backing map has no defined iteration order.  Everything observable
//! goes through [`EntityStore::list_ids`] or [`EntityStore::iter`], which sort
//! by id, so simulation runs and tests are reproducible.

use rwca_core::{EntityKey, WorldError, WorldResult};

#[cfg(feature = "fx-hash")]
pub(crate) type Map<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Map from id to owned entity plus the kind's next-id counter.
///
/// Invariant: every key is strictly below the counter.
#[derive(Debug, Clone)]
pub struct EntityStore<I: EntityKey, T> {
    entries: Map<I, T>,
    next_id: u32,
}

impl<I: EntityKey, T> EntityStore<I, T> {
    pub fn new() -> Self {
        Self {
            entries: Map::default(),
            next_id: 0,
        }
    }

    // ── Sizes ─────────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The id the next insertion will receive.
    pub fn next_id(&self) -> I {
        I::from_raw(self.next_id)
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, id: I) -> bool {
        self.entries.contains_key(&id)
    }

    #[inline]
    pub fn get(&self, id: I) -> Option<&T> {
        self.entries.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// All ids currently present, strictly ascending.
    pub fn list_ids(&self) -> Vec<I> {
        let mut ids: Vec<I> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// `(id, entity)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> + '_ {
        self.list_ids()
            .into_iter()
            .filter_map(move |id| self.entries.get(&id).map(|entity| (id, entity)))
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Allocate the next id, build the entity from it, and insert it.
    pub fn insert_with(&mut self, build: impl FnOnce(I) -> T) -> WorldResult<I> {
        let id = self.reserve(1)?;
        self.entries.insert(id, build(id));
        Ok(id)
    }

    /// Replace the entity at `id` only if `id` is already present.
    ///
    /// Returns the previous entity, or hands `entity` back untouched when
    /// `id` is absent.  `set` never creates new ids.
    pub fn set(&mut self, id: I, entity: T) -> Result<T, T> {
        match self.entries.get_mut(&id) {
            Some(slot) => Ok(std::mem::replace(slot, entity)),
            None => Err(entity),
        }
    }

    /// Erase the entity at `id`.  The id is not recycled.
    pub fn remove(&mut self, id: I) -> Option<T> {
        self.entries.remove(&id)
    }

    /// Keep only the entities for which `keep` returns `true`.
    pub fn retain(&mut self, mut keep: impl FnMut(I, &T) -> bool) {
        self.entries.retain(|&id, entity| keep(id, entity));
    }

    // ── Contiguous allocation ─────────────────────────────────────────────

    /// Fail unless `n` more ids can be allocated without reaching the
    /// `INVALID` sentinel.
    pub(crate) fn check_capacity(&self, n: u32) -> WorldResult<()> {
        // `next_id + n` fitting in a u32 keeps the last allocated id below
        // u32::MAX.
        self.next_id
            .checked_add(n)
            .map(|_| ())
            .ok_or(WorldError::IdSpaceExhausted(I::KIND))
    }

    /// Allocate `n` contiguous ids without inserting anything and return
    /// the first one.
    pub(crate) fn reserve(&mut self, n: u32) -> WorldResult<I> {
        self.check_capacity(n)?;
        let first = self.next_id;
        self.next_id += n;
        Ok(I::from_raw(first))
    }

    /// Insert an entity under an id previously handed out by
    /// [`reserve`](Self::reserve).
    pub(crate) fn insert_reserved(&mut self, id: I, entity: T) {
        debug_assert!(id.raw() < self.next_id, "{id} was never reserved");
        self.entries.insert(id, entity);
    }
}

impl<I: EntityKey, T> Default for EntityStore<I, T> {
    fn default() -> Self {
        Self::new()
    }
}
