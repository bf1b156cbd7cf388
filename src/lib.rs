//! Ordered and unordered maps and sets.
//!
//! The ordered containers ([`Map`], [`Set`]) are backed by an AVL tree, the
//! unordered ones ([`UnorderedMap`], [`UnorderedSet`]) by a hash table whose
//! collision chains are linked by index through a flat slot array.
//!
//! Both engines store whole values and compare or hash only the key picked
//! out of each value by a [`KeySelector`]: sets use [`Identity`], maps store
//! `(key, value)` pairs and use [`PairFirst`].
//!
//! Inserting a key that is already present fails with
//! [`Error::DuplicateKey`] and leaves the container unchanged; removing an
//! absent key fails with [`Error::KeyNotFound`]. The `try_` variants report
//! the same outcomes as a `bool`.
//!
//! ```
//! use keyed::{Error, Map, UnorderedSet};
//!
//! let mut map = Map::new();
//! map.insert(2, "two").unwrap();
//! map.insert(1, "one").unwrap();
//! assert_eq!(map.insert(1, "uno"), Err(Error::DuplicateKey));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2]);
//!
//! let mut set = UnorderedSet::new();
//! assert!(set.try_insert("x"));
//! assert_eq!(set.remove("y"), Err(Error::KeyNotFound));
//! ```

mod error;
pub mod hash;
pub mod map;
mod selector;
pub mod set;
pub mod tree;
pub mod unordered_map;
pub mod unordered_set;

pub use error::Error;
pub use hash::{HashTable, INITIAL_CAPACITY};
pub use map::Map;
pub use selector::{Identity, KeySelector, PairFirst};
pub use set::Set;
pub use tree::AvlTree;
pub use unordered_map::UnorderedMap;
pub use unordered_set::UnorderedSet;
