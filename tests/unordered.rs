use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasherDefault, Hasher};

use keyed::{Error, UnorderedMap, UnorderedSet, INITIAL_CAPACITY};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

fn key_strategy() -> impl Strategy<Value = i32> {
    // Smaller than TEST_SIZE so that keys repeat
    -500i32..500i32
}

/// Hashes every key to the same bucket.
#[derive(Default)]
struct ConstantHasher;

impl Hasher for ConstantHasher {
    fn finish(&self) -> u64 {
        7
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

type Colliding = BuildHasherDefault<ConstantHasher>;

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i32),
    TryInsert(i32),
    Remove(i32),
    TryRemove(i32),
    Contains(i32),
    Clear,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => key_strategy().prop_map(SetOp::Insert),
        1 => key_strategy().prop_map(SetOp::TryInsert),
        3 => key_strategy().prop_map(SetOp::Remove),
        1 => key_strategy().prop_map(SetOp::TryRemove),
        2 => key_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::Clear),
    ]
}

fn replay_set_ops<S>(set: &mut UnorderedSet<i32, S>, ops: &[SetOp]) -> Result<(), TestCaseError>
where
    S: std::hash::BuildHasher,
{
    let mut model: HashSet<i32> = HashSet::new();
    for op in ops {
        match *op {
            SetOp::Insert(k) => {
                let expected = if model.insert(k) {
                    Ok(())
                } else {
                    Err(Error::DuplicateKey)
                };
                prop_assert_eq!(set.insert(k), expected, "insert({})", k);
            }
            SetOp::TryInsert(k) => {
                prop_assert_eq!(set.try_insert(k), model.insert(k), "try_insert({})", k);
            }
            SetOp::Remove(k) => {
                let expected = if model.remove(&k) {
                    Ok(k)
                } else {
                    Err(Error::KeyNotFound)
                };
                prop_assert_eq!(set.remove(&k), expected, "remove({})", k);
            }
            SetOp::TryRemove(k) => {
                prop_assert_eq!(set.try_remove(&k), model.remove(&k), "try_remove({})", k);
            }
            SetOp::Contains(k) => {
                prop_assert_eq!(set.contains(&k), model.contains(&k), "contains({})", k);
            }
            SetOp::Clear => {
                set.clear();
                model.clear();
                prop_assert_eq!(set.capacity(), 0);
            }
        }
        prop_assert_eq!(set.len(), model.len(), "len mismatch after {:?}", op);
        prop_assert!(set.len() <= set.capacity() || set.is_empty());
    }

    let contents: HashSet<i32> = set.iter().copied().collect();
    prop_assert_eq!(contents, model);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on both UnorderedSet and HashSet.
    #[test]
    fn set_ops_match_hashset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut set = UnorderedSet::new();
        replay_set_ops(&mut set, &ops)?;
    }

    /// With every key in one chain, removed slots stay linked until growth
    /// and must never hide a live key or let a duplicate in.
    #[test]
    fn colliding_set_ops_match_hashset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE / 4)) {
        let mut set = UnorderedSet::with_hasher(Colliding::default());
        replay_set_ops(&mut set, &ops)?;
    }

    /// Map operations agree with HashMap, and the first value of a key wins.
    #[test]
    fn map_ops_match_hashmap(entries in proptest::collection::vec((key_strategy(), any::<i32>()), 0..TEST_SIZE)) {
        let mut map = UnorderedMap::new();
        let mut model: HashMap<i32, i32> = HashMap::new();
        for (k, v) in &entries {
            let inserted = map.try_insert(*k, *v);
            prop_assert_eq!(inserted, !model.contains_key(k));
            model.entry(*k).or_insert(*v);
        }
        prop_assert_eq!(map.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(map.get(k), Some(v));
        }

        for (k, _) in entries.iter().step_by(2) {
            prop_assert_eq!(map.remove(k).ok(), model.remove(k));
        }
        prop_assert_eq!(map.len(), model.len());

        let contents: HashMap<i32, i32> = map.into_iter().collect();
        prop_assert_eq!(contents, model);
    }
}

#[test]
fn capacity_doubles_past_load_factor() {
    let mut set = UnorderedSet::new();
    assert_eq!(set.capacity(), 0);

    set.insert(0).unwrap();
    assert_eq!(set.capacity(), INITIAL_CAPACITY);
    for value in 1..4 {
        set.insert(value).unwrap();
    }
    assert_eq!(set.capacity(), INITIAL_CAPACITY);

    set.insert(4).unwrap();
    assert_eq!(set.capacity(), 2 * INITIAL_CAPACITY);

    // A rejected insert never grows the table
    for value in 0..5 {
        assert_eq!(set.insert(value), Err(Error::DuplicateKey));
    }
    assert_eq!(set.capacity(), 2 * INITIAL_CAPACITY);
}

#[test]
fn removed_keys_are_not_found_in_shared_chain() {
    let mut map = UnorderedMap::with_hasher(Colliding::default());
    for key in 0..4 {
        map.insert(key, key * 10).unwrap();
    }
    assert_eq!(map.remove(&1), Ok(10));
    assert_eq!(map.get(&1), None);
    assert_eq!(map.get(&3), Some(&30));
    assert_eq!(map.insert(3, 0), Err(Error::DuplicateKey));

    map.insert(1, 11).unwrap();
    assert_eq!(map.len(), 4);
    let mut entries: Vec<(i32, i32)> = map.iter().map(|(k, v)| (*k, *v)).collect();
    entries.sort();
    assert_eq!(entries, [(0, 0), (1, 11), (2, 20), (3, 30)]);
}

#[test]
fn pair_keys_with_string_lookup() {
    let mut map: UnorderedMap<String, Vec<i32>> = UnorderedMap::with_capacity(8);
    assert_eq!(map.capacity(), 8);

    map.insert("even".to_string(), vec![]).unwrap();
    map.insert("odd".to_string(), vec![]).unwrap();
    for value in 0..10 {
        let key = if value % 2 == 0 { "even" } else { "odd" };
        map.get_mut(key).unwrap().push(value);
    }
    assert_eq!(map.get("even"), Some(&vec![0, 2, 4, 6, 8]));
    assert_eq!(map.get_key_value("odd").map(|(_, v)| v.len()), Some(5));
    assert!(map.contains_key("odd"));
    assert_eq!(map.remove("missing"), Err(Error::KeyNotFound));
}
