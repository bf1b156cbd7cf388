use keyed::{Map, Set, UnorderedMap, UnorderedSet};

fn main() {
    let mut map = Map::new();
    map.insert(0, "zero").unwrap();
    map.insert(1, "one").unwrap();
    map.insert(2, "two").unwrap();
    if let Err(err) = map.insert(2, "two") {
        println!("insert(2): {err}");
    }
    map.insert(3, "three").unwrap();
    map.insert(4, "four").unwrap();
    map.insert(5, "five").unwrap();
    assert_eq!(map.get(&1), Some(&"one"));
    map.remove(&1).unwrap();
    assert!(map.get(&1).is_none());

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    let mut set = Set::new();
    for x in 0..5 {
        set.insert(x).unwrap();
    }
    assert!(set.contains(&1));
    set.remove(&1).unwrap();
    assert!(!set.contains(&1));

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");

    let mut words = UnorderedMap::new();
    for word in "the quick brown fox jumps over the lazy dog".split(' ') {
        if !words.try_insert(word, 1) {
            if let Some(count) = words.get_mut(word) {
                *count += 1;
            }
        }
    }
    assert_eq!(words.get("the"), Some(&2));
    println!("{} distinct words in {} slots", words.len(), words.capacity());

    let mut seen = UnorderedSet::new();
    for x in [3, 1, 4, 1, 5, 9, 2, 6, 5, 3, 5] {
        seen.try_insert(x);
    }
    if let Err(err) = seen.remove(&7) {
        println!("remove(7): {err}");
    }
    println!("{seen:?}");
}
