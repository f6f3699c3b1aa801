//! serializable-collections: dictionary and hash set types that persist as
//! flat, ordered entry lists and can be shown and edited in an inspector.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a container that a generic structured-data serializer can write
//!   out as a plain list, and that still answers lookups like a hash map.
//! - Two representations per container:
//!   - Raw list: ordered, persisted, duplicate-tolerant. The only source
//!     of truth.
//!   - Lookup view: derived from the raw list, never edited directly.
//! - Layers:
//!   - FirstWinsIndex<S>: hashed positions into a raw list owned by someone
//!     else, plus the first-seen order. Lookups only read it, so a user
//!     `Hash`/`Eq` may itself query the container it is stored in.
//!   - SerializableDictionary<K, V, S> and SerializableHashSet<T, S>: own
//!     the raw list, gate mutation on read-only mode, and rebuild the index
//!     after each mutation.
//!   - CollectionDrawer: reads the raw list and advisory flags and paints
//!     them through a host `Canvas`.
//!
//! Reconciliation
//! - Rebuilding folds the raw list left to right. The first entry for a key
//!   (or value) becomes visible; later ones are shadowed; `None` dictionary
//!   keys are skipped. The fold is O(n) and runs once per mutating call,
//!   except that a plain append (`add`, set `insert`) admits the new entry
//!   into the existing index.
//! - Advisory flags (`has_null_keys`, `has_duplicate_keys`,
//!   `has_duplicate_values`) are recomputed by the same fold, so they are
//!   never stale relative to the last completed mutation.
//! - Null and duplicate entries are tolerated, not rejected. They stay in
//!   the raw list so a human can see and fix them.
//!
//! Host hooks
//! - `PersistHooks::on_after_load` runs a full reconciliation and is what
//!   serde deserialization calls. `on_before_persist` does nothing: the raw
//!   list already is the persisted form.
//!
//! Constraints
//! - Single-threaded: containers are `Send` but not `Sync`. Wrap them in a
//!   lock to share them.
//! - `edit_raw` and `retain` reconcile even if the caller's closure panics.
//! - Errors are `CollectionError::ReadOnly` for any mutation of a read-only
//!   container, and `CollectionError::KeyNotFound` for `lookup` misses.
//! - Set algebra mutators rewrite the raw list, so their results persist.
//!
//! Features
//! - `serde` (default): `Serialize`/`Deserialize` for both containers and
//!   `PairEntry`.
//! - `bench_internal`: exposes the `index` module for benches.

pub mod dictionary;
pub mod drawer;
mod error;
mod hooks;
#[cfg(feature = "bench_internal")]
pub mod index;
#[cfg(not(feature = "bench_internal"))]
mod index;
mod pair;
#[cfg(feature = "serde")]
mod persist;
pub mod set;
#[cfg(test)]
mod proptests;

// Public surface
pub use dictionary::{RawEntry, SerializableDictionary};
pub use drawer::{
    Advisory, Canvas, CollectionDrawer, DrawerStyle, Inspect, PropertyDrawer, Rect, Row, Severity,
};
pub use error::{CollectionError, Result};
pub use hooks::PersistHooks;
pub use pair::PairEntry;
pub use set::SerializableHashSet;
