//! SerializableHashSet: a hash set whose persisted form is an ordered list
//! of values.
//!
//! Same shape as the dictionary with a single value channel: the raw list
//! may hold repeated values after a hand edit or a load, the first one wins,
//! and `has_duplicate_values` reports the rest. `insert` refuses values that
//! are already present, so duplicates only enter through `edit_raw` or a
//! load.
//!
//! Set algebra mutators (`union_with` and friends) rewrite the raw list and
//! reconcile like any other mutation, so their results survive a save/load
//! cycle.

use crate::error::{check_writable, Result};
use crate::hooks::{update_advisory, PersistHooks, ReloadOnDrop};
use crate::index::FirstWinsIndex;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::collections::HashSet;

fn raw_value<T>(value: &T) -> Option<&T> {
    Some(value)
}

/// How another collection relates to this set, gathered in one pass.
struct Survey {
    /// Per raw position: an element of `other` equals the visible value there.
    hit: Vec<bool>,
    /// Distinct visible values of this set found in `other`.
    shared: usize,
    /// `other` yielded a value this set does not contain.
    foreign: bool,
}

/// Hash set that persists as a flat list of values.
///
/// Not `Sync`. Share across threads only behind a lock.
#[derive(Clone)]
pub struct SerializableHashSet<T, S = RandomState> {
    entries: Vec<T>,
    index: FirstWinsIndex<S>,
    has_duplicate_values: bool,
    read_only: bool,
}

impl<T> SerializableHashSet<T>
where
    T: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Adopt a raw list as loaded from storage and reconcile it once.
    pub fn from_raw(entries: Vec<T>) -> Self {
        Self::from_raw_with_hasher(entries, Default::default())
    }
}

impl<T, S> Default for SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            entries: Vec::new(),
            index: FirstWinsIndex::with_hasher(hasher),
            has_duplicate_values: false,
            read_only: false,
        }
    }

    pub fn from_raw_with_hasher(entries: Vec<T>, hasher: S) -> Self {
        let mut set = Self::with_hasher(hasher);
        set.entries = entries;
        set.on_after_load();
        set
    }

    fn reconcile(&mut self) {
        let report = self.index.rebuild(&self.entries, raw_value);
        log::trace!(
            "reconciled set: {} raw entries, {} visible, {} shadowed",
            self.entries.len(),
            report.visible,
            report.shadowed
        );
        update_advisory(
            &mut self.has_duplicate_values,
            report.has_duplicates(),
            "set contains duplicate values",
        );
    }

    fn find_pos<Q>(&self, q: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.find(&self.entries, q, raw_value)
    }

    /// Append `value` if no equal value is present. Keeps the index current
    /// without a full rebuild, so callers can test membership mid-batch.
    fn push_new(&mut self, value: T) -> bool {
        if self.find_pos(&value).is_some() {
            return false;
        }
        self.entries.push(value);
        let pos = self.entries.len() - 1;
        self.index.append(&self.entries, pos, raw_value);
        true
    }

    /// Drop raw entries whose visible position is not marked in `keep`.
    fn retain_visible(&mut self, keep: impl Fn(usize) -> bool) {
        let mask: Vec<bool> = self
            .entries
            .iter()
            .map(|v| self.find_pos(v).is_some_and(&keep))
            .collect();
        let mut mask = mask.into_iter();
        self.entries.retain(|_| mask.next().unwrap_or(false));
    }

    fn survey<I>(&self, other: I) -> Survey
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let mut survey = Survey {
            hit: vec![false; self.entries.len()],
            shared: 0,
            foreign: false,
        };
        for item in other {
            let value: &T = Borrow::<T>::borrow(&item);
            match self.find_pos(value) {
                Some(pos) => {
                    if let Some(seen) = survey.hit.get_mut(pos) {
                        if !*seen {
                            *seen = true;
                            survey.shared += 1;
                        }
                    }
                }
                None => survey.foreign = true,
            }
        }
        survey
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of entries in the raw list, including repeats.
    pub fn raw_len(&self) -> usize {
        self.entries.len()
    }

    /// The raw list in insertion order, exactly as it is persisted.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// True iff two or more raw entries are equal.
    pub fn has_duplicate_values(&self) -> bool {
        self.has_duplicate_values
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

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find_pos(q).is_some()
    }

    /// The stored value equal to `q`.
    pub fn get<Q>(&self, q: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.entries.get(self.find_pos(q)?)
    }

    /// Returns `false` without touching the raw list when `value` is
    /// already present.
    pub fn insert(&mut self, value: T) -> Result<bool> {
        check_writable(self.read_only, "insert")?;
        Ok(self.push_new(value))
    }

    /// Remove every raw occurrence of `q`. Returns `false` if it was absent.
    pub fn remove<Q>(&mut self, q: &Q) -> Result<bool>
    where
        T: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        check_writable(self.read_only, "remove")?;
        if self.find_pos(q).is_none() {
            return Ok(false);
        }
        self.entries.retain(|v| <T as Borrow<Q>>::borrow(v) != q);
        self.reconcile();
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        check_writable(self.read_only, "clear")?;
        self.entries.clear();
        self.reconcile();
        Ok(())
    }

    /// Keep only the raw entries for which `f` returns true.
    pub fn retain<F>(&mut self, f: F) -> Result<()>
    where
        F: FnMut(&T) -> bool,
    {
        check_writable(self.read_only, "retain")?;
        let reload = ReloadOnDrop(self);
        reload.0.entries.retain(f);
        Ok(())
    }

    /// Hand the raw list to `f` for arbitrary edits, then reconcile once.
    pub fn edit_raw<R, F>(&mut self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        check_writable(self.read_only, "edit_raw")?;
        let reload = ReloadOnDrop(self);
        Ok(f(&mut reload.0.entries))
    }

    /// Append each value of `other` not already present.
    pub fn union_with<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        check_writable(self.read_only, "union_with")?;
        for value in other {
            self.push_new(value);
        }
        self.reconcile();
        Ok(())
    }

    /// Keep only values that also appear in `other`.
    pub fn intersect_with<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        check_writable(self.read_only, "intersect_with")?;
        let survey = self.survey(other);
        self.retain_visible(|pos| survey.hit.get(pos).copied().unwrap_or(false));
        self.reconcile();
        Ok(())
    }

    /// Remove every value that appears in `other`.
    pub fn difference_with<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        check_writable(self.read_only, "difference_with")?;
        let survey = self.survey(other);
        self.retain_visible(|pos| !survey.hit.get(pos).copied().unwrap_or(false));
        self.reconcile();
        Ok(())
    }

    /// Keep values in exactly one of `self` and `other`. Values only in
    /// `other` are appended in the order `other` yields them.
    pub fn symmetric_difference_with<I>(&mut self, other: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        check_writable(self.read_only, "symmetric_difference_with")?;
        let original = self.entries.len();
        let mut shared = vec![false; original];
        for value in other {
            match self.find_pos(&value) {
                Some(pos) if pos < original => shared[pos] = true,
                Some(_) => {}
                None => {
                    self.push_new(value);
                }
            }
        }
        // Appended positions have no slot in `shared` and are kept.
        self.retain_visible(|pos| !shared.get(pos).copied().unwrap_or(false));
        self.reconcile();
        Ok(())
    }

    /// Every value of this set appears in `other`.
    pub fn is_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.survey(other).shared == self.len()
    }

    /// Subset, and `other` holds at least one value this set lacks.
    pub fn is_proper_subset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let s = self.survey(other);
        s.shared == self.len() && s.foreign
    }

    /// Every value of `other` appears in this set.
    pub fn is_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        !self.survey(other).foreign
    }

    /// Superset, and this set holds at least one value `other` lacks.
    pub fn is_proper_superset_of<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let s = self.survey(other);
        !s.foreign && s.shared < self.len()
    }

    /// At least one value is shared.
    pub fn overlaps<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        other.into_iter().any(|item| {
            let value: &T = Borrow::<T>::borrow(&item);
            self.contains(value)
        })
    }

    /// Both hold the same distinct values, ignoring order and repeats.
    pub fn set_equals<I>(&self, other: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        let s = self.survey(other);
        !s.foreign && s.shared == self.len()
    }

    /// Distinct values in first-seen order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            positions: self.index.positions().iter(),
            entries: &self.entries,
        }
    }

    /// Convert to a plain set holding the distinct values.
    pub fn into_hash_set(self) -> HashSet<T> {
        let visible = self.index.visible_mask(self.entries.len());
        self.entries
            .into_iter()
            .zip(visible)
            .filter_map(|(value, shown)| shown.then_some(value))
            .collect()
    }
}

impl<T, S> PersistHooks for SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn on_after_load(&mut self) {
        self.reconcile();
    }
}

/// Iterator over the distinct values of a [`SerializableHashSet`].
pub struct Iter<'a, T> {
    positions: core::slice::Iter<'a, usize>,
    entries: &'a [T],
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let entries = self.entries;
        self.positions.by_ref().find_map(|&pos| entries.get(pos))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.positions.len();
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T, S> IntoIterator for &'a SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, S> From<HashSet<T>> for SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from(set: HashSet<T>) -> Self {
        Self::from_raw_with_hasher(set.into_iter().collect(), S::default())
    }
}

impl<T, S> From<SerializableHashSet<T, S>> for HashSet<T>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from(set: SerializableHashSet<T, S>) -> Self {
        set.into_hash_set()
    }
}

/// Collects distinct values in first-seen order; repeats are dropped,
/// matching [`insert`](SerializableHashSet::insert).
impl<T, S> FromIterator<T> for SerializableHashSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Clone + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        for value in iter {
            set.push_new(value);
        }
        set.reconcile();
        set
    }
}

impl<T, S> fmt::Debug for SerializableHashSet<T, S>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = Iter {
            positions: self.index.positions().iter(),
            entries: &self.entries,
        };
        f.debug_set().entries(values).finish()
    }
}
