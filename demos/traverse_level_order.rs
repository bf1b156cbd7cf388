use keyed::{Map, Set};

fn main() {
    let map: Map<i32, String> = (1..=6).map(|k| (k, format!("#{k}"))).collect();

    println!("Level-order traversal of the map:");
    map.traverse_level_order(|k, v| {
        println!("Key: {k}, Value: {v}");
    });

    let mut set: Set<i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    set.remove(&5).unwrap();

    let mut levels = Vec::new();
    set.traverse_level_order(|value| levels.push(*value));
    println!("Level-order after removing the root: {levels:?}");
}
