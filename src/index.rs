//! FirstWinsIndex: the derived lookup structure shared by both container
//! shapes. It never owns entries; it maps hashed keys to positions in a raw
//! list owned by the container and remembers which positions are visible.

use core::borrow::Borrow;
use core::cell::Cell;
use core::hash::{BuildHasher, Hash};
use core::marker::PhantomData;
use hashbrown::hash_table::Entry;
use hashbrown::HashTable;
use std::collections::hash_map::RandomState;

#[derive(Copy, Clone, Debug)]
struct Slot {
    hash: u64,
    pos: usize,
}

/// Outcome of admitting a single raw position.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Admission {
    /// The entry's key is the first of its kind and is now visible.
    Visible,
    /// An earlier entry already owns this key; this one is shadowed.
    Shadowed,
    /// The entry has no key and cannot be indexed.
    Null,
}

/// Counts gathered while rebuilding the index from a raw list.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Reconciliation {
    pub visible: usize,
    pub shadowed: usize,
    pub nulls: usize,
}

impl Reconciliation {
    pub fn has_nulls(&self) -> bool {
        self.nulls > 0
    }

    pub fn has_duplicates(&self) -> bool {
        self.shadowed > 0
    }

    fn record(&mut self, admission: Admission) {
        match admission {
            Admission::Visible => self.visible += 1,
            Admission::Shadowed => self.shadowed += 1,
            Admission::Null => self.nulls += 1,
        }
    }
}

#[derive(Clone)]
struct View {
    table: HashTable<Slot>,
    order: Vec<usize>, // visible raw positions, first-seen order
}

impl View {
    fn new() -> Self {
        Self {
            table: HashTable::new(),
            order: Vec::new(),
        }
    }

    fn clear(&mut self) {
        self.table.clear();
        self.order.clear();
    }

    fn admit<'a, E, K, F, S>(
        &mut self,
        hasher: &S,
        entries: &'a [E],
        pos: usize,
        key_of: &F,
    ) -> Admission
    where
        K: Hash + Eq + 'a,
        F: Fn(&'a E) -> Option<&'a K>,
        S: BuildHasher,
    {
        let Some(key) = entries.get(pos).and_then(key_of) else {
            return Admission::Null;
        };
        let hash = hasher.hash_one(key);
        match self.table.entry(
            hash,
            |s| {
                entries
                    .get(s.pos)
                    .and_then(key_of)
                    .is_some_and(|k| k == key)
            },
            |s| s.hash,
        ) {
            Entry::Occupied(_) => Admission::Shadowed,
            Entry::Vacant(v) => {
                v.insert(Slot { hash, pos });
                self.order.push(pos);
                Admission::Visible
            }
        }
    }
}

/// Hashed positions into a raw list owned by the caller.
///
/// `Send` but not `Sync`: the containers built on it are single-threaded
/// and callers that share one across threads must lock it themselves.
#[derive(Clone)]
pub struct FirstWinsIndex<S = RandomState> {
    hasher: S,
    view: View,
    _nosync: PhantomData<Cell<()>>,
}

impl FirstWinsIndex {
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }
}

impl Default for FirstWinsIndex {
    fn default() -> Self {
        Self::new()
    }
}

// Read-only accessors; nothing here hashes.
impl<S> FirstWinsIndex<S> {
    /// Number of visible (first-seen, non-null) entries.
    pub fn len(&self) -> usize {
        self.view.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.order.is_empty()
    }

    /// Raw positions of the visible entries in first-seen order.
    pub fn positions(&self) -> &[usize] {
        &self.view.order
    }

    /// One flag per raw position, set where that position is visible.
    pub fn visible_mask(&self, raw_len: usize) -> Vec<bool> {
        let mut mask = vec![false; raw_len];
        for &pos in &self.view.order {
            if let Some(slot) = mask.get_mut(pos) {
                *slot = true;
            }
        }
        mask
    }
}

impl<S> FirstWinsIndex<S>
where
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            view: View::new(),
            _nosync: PhantomData,
        }
    }

    /// Discard the current table and fold `entries` left to right. The
    /// first entry for each key becomes visible; later ones are shadowed.
    pub fn rebuild<'a, E, K, F>(&mut self, entries: &'a [E], key_of: F) -> Reconciliation
    where
        K: Hash + Eq + 'a,
        F: Fn(&'a E) -> Option<&'a K>,
    {
        self.view.clear();
        let mut report = Reconciliation::default();
        for pos in 0..entries.len() {
            report.record(self.view.admit(&self.hasher, entries, pos, &key_of));
        }
        report
    }

    /// Admit a single position appended to `entries` since the last rebuild.
    /// Callers must not have reordered or removed earlier positions.
    pub fn append<'a, E, K, F>(&mut self, entries: &'a [E], pos: usize, key_of: F) -> Admission
    where
        K: Hash + Eq + 'a,
        F: Fn(&'a E) -> Option<&'a K>,
    {
        self.view.admit(&self.hasher, entries, pos, &key_of)
    }

    /// Raw position of the visible entry whose key equals `q`.
    pub fn find<'a, E, K, Q, F>(&self, entries: &'a [E], q: &Q, key_of: F) -> Option<usize>
    where
        K: Borrow<Q> + 'a,
        Q: ?Sized + Hash + Eq,
        F: Fn(&'a E) -> Option<&'a K>,
    {
        let hash = self.hasher.hash_one(q);
        self.view
            .table
            .find(hash, |s| {
                entries
                    .get(s.pos)
                    .and_then(&key_of)
                    .is_some_and(|k| <K as Borrow<Q>>::borrow(k) == q)
            })
            .map(|s| s.pos)
    }
}
