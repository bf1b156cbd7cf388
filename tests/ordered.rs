use std::collections::{BTreeMap, BTreeSet};

use keyed::{Error, Map, Set};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i32> {
    // Smaller than TEST_SIZE so that keys repeat
    -500i32..500i32
}

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i32, i32),
    TryInsert(i32, i32),
    Remove(i32),
    TryRemove(i32),
    Get(i32),
    ContainsKey(i32),
    First,
    Last,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        4 => (key_strategy(), any::<i32>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        1 => (key_strategy(), any::<i32>()).prop_map(|(k, v)| MapOp::TryInsert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::TryRemove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => Just(MapOp::First),
        1 => Just(MapOp::Last),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on both Map and BTreeMap. Inserting a
    /// present key must fail and keep the old value.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: Map<i32, i32> = Map::new();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    let expected = if model.contains_key(&k) {
                        Err(Error::DuplicateKey)
                    } else {
                        model.insert(k, v);
                        Ok(())
                    };
                    prop_assert_eq!(map.insert(k, v), expected, "insert({}, {})", k, v);
                }
                MapOp::TryInsert(k, v) => {
                    let expected = !model.contains_key(&k);
                    model.entry(k).or_insert(v);
                    prop_assert_eq!(map.try_insert(k, v), expected, "try_insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    let expected = model.remove(&k).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(map.remove(&k), expected, "remove({})", k);
                }
                MapOp::TryRemove(k) => {
                    let expected = model.remove(&k).is_some();
                    prop_assert_eq!(map.try_remove(&k), expected, "try_remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(&k), model.get(&k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(map.contains_key(&k), model.contains_key(&k), "contains_key({})", k);
                }
                MapOp::First => {
                    prop_assert_eq!(map.first(), model.first_key_value(), "first");
                }
                MapOp::Last => {
                    prop_assert_eq!(map.last(), model.last_key_value(), "last");
                }
            }
            prop_assert_eq!(map.len(), model.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(map.is_empty(), model.is_empty(), "is_empty mismatch after {:?}", op);
        }

        prop_assert!(map.iter().eq(model.iter()));
        prop_assert!(map.iter().rev().eq(model.iter().rev()));
    }

    /// Iteration visits every key exactly once in ascending order, from either end.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), any::<i32>()), 0..TEST_SIZE)) {
        let map: Map<i32, i32> = entries.iter().copied().collect();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();
        for (k, v) in &entries {
            model.entry(*k).or_insert(*v);
        }

        let iter = map.iter();
        prop_assert_eq!(iter.len(), model.len());
        prop_assert!(map.keys().eq(model.keys()));
        prop_assert!(map.values().rev().eq(model.values().rev()));

        let mut iter = map.iter();
        let mut model_iter = model.iter();
        loop {
            let front = iter.next();
            prop_assert_eq!(front, model_iter.next());
            let back = iter.next_back();
            prop_assert_eq!(back, model_iter.next_back());
            if front.is_none() || back.is_none() {
                break;
            }
        }

        let owned: Vec<(i32, i32)> = map.into_iter().collect();
        let expected: Vec<(i32, i32)> = model.into_iter().collect();
        prop_assert_eq!(owned, expected);
    }

    /// Set operations agree with BTreeSet.
    #[test]
    fn set_ops_match_btreeset(
        lhs in proptest::collection::vec(key_strategy(), 0..TEST_SIZE / 4),
        rhs in proptest::collection::vec(key_strategy(), 0..TEST_SIZE / 4),
    ) {
        let lhs_set: Set<i32> = lhs.iter().copied().collect();
        let rhs_set: Set<i32> = rhs.iter().copied().collect();
        let lhs_model: BTreeSet<i32> = lhs.iter().copied().collect();
        let rhs_model: BTreeSet<i32> = rhs.iter().copied().collect();

        prop_assert!(lhs_set.iter().eq(lhs_model.iter()));
        prop_assert!(lhs_set.union(&rhs_set).eq(lhs_model.union(&rhs_model)));
        prop_assert!(lhs_set.intersection(&rhs_set).eq(lhs_model.intersection(&rhs_model)));
        prop_assert_eq!(lhs_set.is_disjoint(&rhs_set), lhs_model.is_disjoint(&rhs_model));
        prop_assert_eq!(lhs_set.first(), lhs_model.first());
        prop_assert_eq!(lhs_set.last(), lhs_model.last());
    }
}

#[test]
fn level_order_visits_root_first() {
    let mut set = Set::new();
    for value in [5, 3, 8, 1, 4, 7, 9] {
        set.insert(value).unwrap();
    }
    set.remove(&5).unwrap();

    let mut visited = Vec::new();
    set.traverse_level_order(|value| visited.push(*value));
    assert_eq!(visited.len(), 6);
    // The successor of the removed root takes its place
    assert_eq!(visited[0], 7);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
}

#[test]
fn failed_operations_leave_map_unchanged() {
    let mut map: Map<&str, i32> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
    let before = map.clone();

    assert_eq!(map.insert("b", 20), Err(Error::DuplicateKey));
    assert!(!map.try_insert("c", 30));
    assert_eq!(map.remove("z"), Err(Error::KeyNotFound));
    assert!(!map.try_remove("y"));
    assert_eq!(map, before);
    assert_eq!(format!("{map:?}"), r#"{"a": 1, "b": 2, "c": 3}"#);
}

#[test]
fn take_leaves_empty_map() {
    let mut map: Map<i32, i32> = (0..10).map(|k| (k, k)).collect();
    let taken = std::mem::take(&mut map);
    assert!(map.is_empty());
    assert_eq!(taken.len(), 10);
    map.insert(1, 1).unwrap();
    assert_eq!(map.len(), 1);
}
