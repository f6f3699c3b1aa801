// Property tests for both containers, kept inside the crate so they can
// reach private helpers without feature gates.
//
// Model: a plain Vec mirroring the raw list. After every operation:
// - the container's raw list equals the model;
// - the lookup view equals the first-wins fold of the model;
// - the advisory flags match what the model contains.

use crate::dictionary::SerializableDictionary;
use crate::pair::PairEntry;
use crate::set::SerializableHashSet;
use proptest::prelude::*;

fn fold_first_wins(model: &[(Option<u8>, i32)]) -> Vec<(u8, i32)> {
    let mut out: Vec<(u8, i32)> = Vec::new();
    for &(k, v) in model {
        if let Some(k) = k {
            if !out.iter().any(|(seen, _)| *seen == k) {
                out.push((k, v));
            }
        }
    }
    out
}

fn dedup_first_seen(model: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    for &v in model {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[derive(Clone, Debug)]
enum DictOp {
    Add(u8, i32),
    Insert(u8, i32),
    Remove(u8),
    PushNull(i32),
    Bump(u8),
    Clear,
    Reload,
}

fn arb_dict_op() -> impl Strategy<Value = DictOp> {
    prop_oneof![
        4 => (0u8..6, any::<i32>()).prop_map(|(k, v)| DictOp::Add(k, v)),
        3 => (0u8..6, any::<i32>()).prop_map(|(k, v)| DictOp::Insert(k, v)),
        2 => (0u8..6).prop_map(DictOp::Remove),
        1 => any::<i32>().prop_map(DictOp::PushNull),
        1 => (0u8..6).prop_map(DictOp::Bump),
        1 => Just(DictOp::Clear),
        1 => Just(DictOp::Reload),
    ]
}

#[derive(Clone, Debug)]
enum SetOp {
    Insert(u8),
    Remove(u8),
    PushRaw(u8),
    Union(Vec<u8>),
    Intersect(Vec<u8>),
    Difference(Vec<u8>),
    Symmetric(Vec<u8>),
}

fn arb_set_op() -> impl Strategy<Value = SetOp> {
    let values = || proptest::collection::vec(0u8..8, 0..6);
    prop_oneof![
        4 => (0u8..8).prop_map(SetOp::Insert),
        2 => (0u8..8).prop_map(SetOp::Remove),
        1 => (0u8..8).prop_map(SetOp::PushRaw),
        1 => values().prop_map(SetOp::Union),
        1 => values().prop_map(SetOp::Intersect),
        1 => values().prop_map(SetOp::Difference),
        1 => values().prop_map(SetOp::Symmetric),
    ]
}

proptest! {
    #[test]
    fn prop_dictionary_matches_model(ops in proptest::collection::vec(arb_dict_op(), 1..80)) {
        let mut d: SerializableDictionary<u8, i32> = SerializableDictionary::new();
        let mut model: Vec<(Option<u8>, i32)> = Vec::new();

        for op in ops {
            match op {
                DictOp::Add(k, v) => {
                    d.add(k, v).unwrap();
                    model.push((Some(k), v));
                }
                DictOp::Insert(k, v) => {
                    let expected = fold_first_wins(&model)
                        .into_iter()
                        .find(|(seen, _)| *seen == k)
                        .map(|(_, v)| v);
                    prop_assert_eq!(d.insert(k, v).unwrap(), expected);
                    model.retain(|(mk, _)| *mk != Some(k));
                    model.push((Some(k), v));
                }
                DictOp::Remove(k) => {
                    let had = model.iter().any(|(mk, _)| *mk == Some(k));
                    prop_assert_eq!(d.remove(&k).unwrap().is_some(), had);
                    model.retain(|(mk, _)| *mk != Some(k));
                }
                DictOp::PushNull(v) => {
                    d.edit_raw(|raw| raw.push(PairEntry::new(None, v))).unwrap();
                    model.push((None, v));
                }
                DictOp::Bump(k) => {
                    if let Some(v) = d.get_mut(&k).unwrap() {
                        *v = v.wrapping_add(1);
                        if let Some(slot) = model.iter_mut().find(|(mk, _)| *mk == Some(k)) {
                            slot.1 = slot.1.wrapping_add(1);
                        }
                    }
                }
                DictOp::Clear => {
                    d.clear().unwrap();
                    model.clear();
                }
                DictOp::Reload => {
                    crate::PersistHooks::on_after_load(&mut d);
                }
            }

            let raw: Vec<(Option<u8>, i32)> =
                d.entries().iter().map(|e| (*e.key(), *e.value())).collect();
            prop_assert_eq!(&raw, &model);

            let view: Vec<(u8, i32)> = d.iter().map(|(k, v)| (*k, *v)).collect();
            let expected = fold_first_wins(&model);
            prop_assert_eq!(&view, &expected);
            prop_assert_eq!(d.len(), expected.len());

            let keyed = model.iter().filter(|(k, _)| k.is_some()).count();
            prop_assert_eq!(d.has_null_keys(), model.iter().any(|(k, _)| k.is_none()));
            prop_assert_eq!(d.has_duplicate_keys(), keyed > expected.len());
        }
    }
}

proptest! {
    #[test]
    fn prop_set_matches_model(ops in proptest::collection::vec(arb_set_op(), 1..80)) {
        let mut s: SerializableHashSet<u8> = SerializableHashSet::new();
        let mut model: Vec<u8> = Vec::new();

        for op in ops {
            match op {
                SetOp::Insert(x) => {
                    let fresh = !model.contains(&x);
                    prop_assert_eq!(s.insert(x).unwrap(), fresh);
                    if fresh {
                        model.push(x);
                    }
                }
                SetOp::Remove(x) => {
                    prop_assert_eq!(s.remove(&x).unwrap(), model.contains(&x));
                    model.retain(|v| *v != x);
                }
                SetOp::PushRaw(x) => {
                    s.edit_raw(|raw| raw.push(x)).unwrap();
                    model.push(x);
                }
                SetOp::Union(vs) => {
                    s.union_with(vs.iter().copied()).unwrap();
                    for v in vs {
                        if !model.contains(&v) {
                            model.push(v);
                        }
                    }
                }
                SetOp::Intersect(vs) => {
                    s.intersect_with(&vs).unwrap();
                    model.retain(|v| vs.contains(v));
                }
                SetOp::Difference(vs) => {
                    s.difference_with(&vs).unwrap();
                    model.retain(|v| !vs.contains(v));
                }
                SetOp::Symmetric(vs) => {
                    s.symmetric_difference_with(vs.iter().copied()).unwrap();
                    let mut added: Vec<u8> = Vec::new();
                    for &v in &vs {
                        if !model.contains(&v) && !added.contains(&v) {
                            added.push(v);
                        }
                    }
                    model.retain(|v| !vs.contains(v));
                    model.extend(added);
                }
            }

            prop_assert_eq!(s.entries(), model.as_slice());
            let view: Vec<u8> = s.iter().copied().collect();
            let expected = dedup_first_seen(&model);
            prop_assert_eq!(&view, &expected);
            prop_assert_eq!(s.has_duplicate_values(), model.len() > expected.len());
        }
    }

    /// Subset/superset answers agree with std's HashSet on the distinct values.
    #[test]
    fn prop_set_relations_match_std(
        raw in proptest::collection::vec(0u8..8, 0..8),
        other in proptest::collection::vec(0u8..8, 0..8),
    ) {
        use std::collections::HashSet;
        let s = SerializableHashSet::from_raw(raw.clone());
        let a: HashSet<u8> = raw.into_iter().collect();
        let b: HashSet<u8> = other.iter().copied().collect();

        prop_assert_eq!(s.is_subset_of(&other), a.is_subset(&b));
        prop_assert_eq!(s.is_superset_of(&other), a.is_superset(&b));
        prop_assert_eq!(s.is_proper_subset_of(&other), a.is_subset(&b) && a != b);
        prop_assert_eq!(s.is_proper_superset_of(&other), a.is_superset(&b) && a != b);
        prop_assert_eq!(s.overlaps(&other), !a.is_disjoint(&b));
        prop_assert_eq!(s.set_equals(&other), a == b);
    }
}
