//! SerializableDictionary: a dictionary whose persisted form is an ordered
//! list of key/value entries.
//!
//! The raw list is the source of truth. It keeps insertion order and may
//! hold duplicate keys or `None` keys, both of which can appear after a
//! hand edit or a load from disk. The lookup view is rebuilt from the raw
//! list after every mutation: the first entry for a key wins, later ones are
//! shadowed, and `None` keys are skipped. Two advisory flags report whether
//! anything was shadowed or skipped.

use crate::error::{check_writable, CollectionError, Result};
use crate::hooks::{update_advisory, PersistHooks, ReloadOnDrop};
use crate::index::{Admission, FirstWinsIndex};
use crate::pair::PairEntry;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;

/// One element of the raw list. A `None` key is a null key.
pub type RawEntry<K, V> = PairEntry<Option<K>, V>;

fn raw_key<K, V>(entry: &RawEntry<K, V>) -> Option<&K> {
    entry.key().as_ref()
}

/// Dictionary that persists as a flat list of [`PairEntry`] values.
///
/// Not `Sync`. Share across threads only behind a lock.
#[derive(Clone)]
pub struct SerializableDictionary<K, V, S = RandomState> {
    entries: Vec<RawEntry<K, V>>,
    index: FirstWinsIndex<S>,
    has_null_keys: bool,
    has_duplicate_keys: bool,
    read_only: bool,
}

impl<K, V> SerializableDictionary<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Adopt a raw list as loaded from storage and reconcile it once.
    pub fn from_raw(entries: Vec<RawEntry<K, V>>) -> Self {
        Self::from_raw_with_hasher(entries, Default::default())
    }
}

impl<K, V, S> Default for SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            entries: Vec::new(),
            index: FirstWinsIndex::with_hasher(hasher),
            has_null_keys: false,
            has_duplicate_keys: false,
            read_only: false,
        }
    }

    pub fn from_raw_with_hasher(entries: Vec<RawEntry<K, V>>, hasher: S) -> Self {
        let mut dict = Self::with_hasher(hasher);
        dict.entries = entries;
        dict.on_after_load();
        dict
    }

    fn reconcile(&mut self) {
        let report = self.index.rebuild(&self.entries, raw_key);
        log::trace!(
            "reconciled dictionary: {} raw entries, {} visible, {} null, {} shadowed",
            self.entries.len(),
            report.visible,
            report.nulls,
            report.shadowed
        );
        update_advisory(
            &mut self.has_null_keys,
            report.has_nulls(),
            "dictionary contains null keys",
        );
        update_advisory(
            &mut self.has_duplicate_keys,
            report.has_duplicates(),
            "dictionary contains duplicate keys",
        );
    }

    fn find_pos<Q>(&self, q: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.find(&self.entries, q, raw_key)
    }

    /// Pull every raw entry whose key equals `q` out of the list and return
    /// the value that was visible. Leaves the index stale.
    fn drain_key<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let visible = self.find_pos(q)?;
        let old = core::mem::take(&mut self.entries);
        self.entries.reserve(old.len());
        let mut taken = None;
        for (pos, entry) in old.into_iter().enumerate() {
            let matches = raw_key(&entry).is_some_and(|k| <K as Borrow<Q>>::borrow(k) == q);
            if !matches {
                self.entries.push(entry);
            } else if pos == visible {
                taken = Some(entry.into_value());
            }
        }
        taken
    }

    /// Number of accessible keys. Shadowed and null-key entries are not counted.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of entries in the raw list, including inaccessible ones.
    pub fn raw_len(&self) -> usize {
        self.entries.len()
    }

    /// The raw list in insertion order, exactly as it is persisted.
    pub fn entries(&self) -> &[RawEntry<K, V>] {
        &self.entries
    }

    /// True iff some raw entry has a `None` key.
    pub fn has_null_keys(&self) -> bool {
        self.has_null_keys
    }

    /// True iff two or more raw entries share a key.
    pub fn has_duplicate_keys(&self) -> bool {
        self.has_duplicate_keys
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn into_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = self.find_pos(q)?;
        self.entries.get(pos).map(|e| e.value())
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let entry = self.entries.get(self.find_pos(q)?)?;
        raw_key(entry).map(|k| (k, entry.value()))
    }

    /// Like [`get`](Self::get), but absence is an error.
    pub fn lookup<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(CollectionError::KeyNotFound)
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_pos(q).is_some()
    }

    /// Mutable access to the visible value for `q`. Keys stay put, so the
    /// edit lands in the raw list without a rebuild.
    pub fn get_mut<Q>(&mut self, q: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        check_writable(self.read_only, "get_mut")?;
        Ok(match self.find_pos(q) {
            Some(pos) => self.entries.get_mut(pos).map(|e| e.value_mut()),
            None => None,
        })
    }

    /// Upsert. Every raw entry with this key is removed, collapsing any
    /// duplicates, and a single new entry is appended at the end. Returns
    /// the value that was visible before the call.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        check_writable(self.read_only, "insert")?;
        let previous = self.drain_key(&key);
        self.entries.push(PairEntry::new(Some(key), value));
        self.reconcile();
        Ok(previous)
    }

    /// Append without checking for an existing key. A repeated key is kept
    /// in the raw list, shadowed by the earlier entry, and flagged.
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        check_writable(self.read_only, "add")?;
        self.entries.push(PairEntry::new(Some(key), value));
        // Appending never disturbs earlier positions, so admit it in place.
        let pos = self.entries.len() - 1;
        if self.index.append(&self.entries, pos, raw_key) == Admission::Shadowed {
            update_advisory(
                &mut self.has_duplicate_keys,
                true,
                "dictionary contains duplicate keys",
            );
        }
        Ok(())
    }

    /// Remove every raw entry with this key. Returns the value that was
    /// visible, which is `Some` exactly when something was removed.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<Option<V>>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        check_writable(self.read_only, "remove")?;
        let taken = self.drain_key(q);
        if taken.is_some() {
            self.reconcile();
        }
        Ok(taken)
    }

    pub fn clear(&mut self) -> Result<()> {
        check_writable(self.read_only, "clear")?;
        self.entries.clear();
        self.reconcile();
        Ok(())
    }

    /// Keep only the keyed raw entries for which `f` returns true. Entries
    /// with a `None` key are left in place for a human to fix.
    pub fn retain<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        check_writable(self.read_only, "retain")?;
        let reload = ReloadOnDrop(self);
        reload.0.entries.retain_mut(|entry| match entry.split_mut() {
            (Some(k), v) => f(k, v),
            (None, _) => true,
        });
        Ok(())
    }

    /// Hand the raw list to `f` for arbitrary edits, then reconcile once.
    /// This is the path an inspector uses to apply row edits, including
    /// ones that introduce null or repeated keys.
    pub fn edit_raw<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<RawEntry<K, V>>) -> R,
    {
        check_writable(self.read_only, "edit_raw")?;
        let reload = ReloadOnDrop(self);
        Ok(f(&mut reload.0.entries))
    }

    /// Accessible pairs in first-seen order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            positions: self.index.positions().iter(),
            entries: &self.entries,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Convert to a plain map holding the accessible pairs.
    pub fn into_hash_map(self) -> HashMap<K, V> {
        let visible = self.index.visible_mask(self.entries.len());
        self.entries
            .into_iter()
            .zip(visible)
            .filter_map(|(entry, shown)| {
                let (key, value) = entry.into_tuple();
                key.filter(|_| shown).map(|k| (k, value))
            })
            .collect()
    }
}

impl<K, V, S> PersistHooks for SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn on_after_load(&mut self) {
        self.reconcile();
    }
}

/// Iterator over the accessible pairs of a [`SerializableDictionary`].
pub struct Iter<'a, K, V> {
    positions: core::slice::Iter<'a, usize>,
    entries: &'a [RawEntry<K, V>],
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries;
        for &pos in self.positions.by_ref() {
            if let Some(entry) = entries.get(pos) {
                if let Some(k) = raw_key(entry) {
                    return Some((k, entry.value()));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.positions.len();
        (n, Some(n))
    }
}

// Every indexed position holds a keyed entry.
impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Panics when the key is absent, like `HashMap`. Use
/// [`SerializableDictionary::lookup`] for a `Result`.
impl<K, V, S, Q> Index<&Q> for SerializableDictionary<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Hash + Eq,
    S: BuildHasher + Clone + Default,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("key not found in SerializableDictionary")
    }
}

impl<K, V, S> From<HashMap<K, V>> for SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from(map: HashMap<K, V>) -> Self {
        let entries = map
            .into_iter()
            .map(|(k, v)| PairEntry::new(Some(k), v))
            .collect();
        Self::from_raw_with_hasher(entries, S::default())
    }
}

impl<K, V, S> From<SerializableDictionary<K, V, S>> for HashMap<K, V>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from(dict: SerializableDictionary<K, V, S>) -> Self {
        dict.into_hash_map()
    }
}

/// Collects every pair into the raw list, like repeated [`add`] calls.
///
/// [`add`]: SerializableDictionary::add
impl<K, V, S> FromIterator<(K, V)> for SerializableDictionary<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let entries = iter
            .into_iter()
            .map(|(k, v)| PairEntry::new(Some(k), v))
            .collect();
        Self::from_raw_with_hasher(entries, S::default())
    }
}

impl<K, V, S> fmt::Debug for SerializableDictionary<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pairs = Iter {
            positions: self.index.positions().iter(),
            entries: &self.entries,
        };
        f.debug_map().entries(pairs).finish()
    }
}
