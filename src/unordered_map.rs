//! An unordered map implemented with an index-chained hash table.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;

use crate::error::Error;
use crate::hash::{self, HashTable};
use crate::selector::PairFirst;

/// An unordered map implemented with an index-chained hash table.
///
/// ```
/// use keyed::UnorderedMap;
/// let mut map = UnorderedMap::new();
/// map.insert("one", 1).unwrap();
/// map.insert("two", 2).unwrap();
/// assert!(!map.try_insert("one", 11));
/// *map.get_mut("two").unwrap() += 20;
/// assert_eq!(map.get("two"), Some(&22));
/// assert_eq!(map.remove("one"), Ok(1));
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone)]
pub struct UnorderedMap<K, V, H = RandomState> {
    table: HashTable<(K, V), PairFirst, H>,
}

/// An iterator over the entries of a map in unspecified order.
pub struct Iter<'a, K, V> {
    table_iter: hash::Iter<'a, (K, V)>,
}

/// A mutable iterator over the entries of a map in unspecified order.
pub struct IterMut<'a, K, V> {
    table_iter: hash::IterMut<'a, (K, V)>,
}

/// An owning iterator over the entries of a map in unspecified order.
pub struct IntoIter<K, V> {
    table_into_iter: hash::IntoIter<(K, V)>,
}

/// An iterator over the keys of a map in unspecified order.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// An iterator over the values of a map in unspecified order.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a map in unspecified order.
pub struct ValuesMut<'a, K, V> {
    iter: IterMut<'a, K, V>,
}

impl<K, V> UnorderedMap<K, V, RandomState> {
    /// Creates an empty map.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Creates an empty map with room for `capacity` entries before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }
}

impl<K, V, H> UnorderedMap<K, V, H> {
    /// Creates an empty map hashing keys with `hash_builder`.
    pub fn with_hasher(hash_builder: H) -> Self {
        Self {
            table: HashTable::with_hasher(hash_builder),
        }
    }

    /// Creates an empty map with room for `capacity` entries,
    /// hashing keys with `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: H) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of slots of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Gets an iterator over the entries of the map.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table_iter: self.table.iter(),
        }
    }

    /// Gets a mutable iterator over the entries of the map.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            table_iter: self.table.iter_mut(),
        }
    }

    /// Gets an iterator over the keys of the map.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { iter: self.iter() }
    }

    /// Gets an iterator over the values of the map.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { iter: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            iter: self.iter_mut(),
        }
    }
}

impl<K, V, H> UnorderedMap<K, V, H>
where
    K: Hash + Eq,
    H: BuildHasher,
{
    /// Returns true if the map contains the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains(key)
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key).map(|(_, value)| value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get_mut(key).map(|(_, value)| value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(key).map(|(key, value)| (key, value))
    }

    /// Inserts a key-value pair into the map.
    /// Fails with [`Error::DuplicateKey`] if the key is already present.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), Error> {
        self.table.insert((key, value))
    }

    /// Inserts a key-value pair into the map.
    /// Fails with [`Error::DuplicateKey`] if the key is already present.
    pub fn insert_pair(&mut self, pair: (K, V)) -> Result<(), Error> {
        self.table.insert(pair)
    }

    /// Inserts a key-value pair into the map.
    /// Returns whether the pair was inserted, i.e. the key was not present.
    pub fn try_insert(&mut self, key: K, value: V) -> bool {
        self.table.try_insert((key, value))
    }

    /// Removes a key from the map and returns its value.
    /// Fails with [`Error::KeyNotFound`] if the key is not present.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(key).map(|(_, value)| value)
    }

    /// Removes a key from the map.
    /// Returns whether the key was previously in the map.
    pub fn try_remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.try_remove(key)
    }

    /// Asserts that the internal table structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.table.check_consistency()
    }
}

impl<K, V, H: Default> Default for UnorderedMap<K, V, H> {
    /// Creates an empty map.
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<K, V, H> PartialEq for UnorderedMap<K, V, H>
where
    K: Hash + Eq,
    V: PartialEq,
    H: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|other_value| value == other_value))
    }
}

impl<K: Hash + Eq, V: Eq, H: BuildHasher> Eq for UnorderedMap<K, V, H> {}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for UnorderedMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H> FromIterator<(K, V)> for UnorderedMap<K, V, H>
where
    K: Hash + Eq,
    H: BuildHasher + Default,
{
    /// Collects pairs into a map; later pairs with a duplicate key are dropped.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl<K, V, H> Extend<(K, V)> for UnorderedMap<K, V, H>
where
    K: Hash + Eq,
    H: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.table.extend(iter);
    }
}

impl<'a, K, V, H> IntoIterator for &'a UnorderedMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, H> IntoIterator for &'a mut UnorderedMap<K, V, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, H> IntoIterator for UnorderedMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            table_into_iter: self.table.into_iter(),
        }
    }
}

// Auto derived clone seems to have an invalid type bound of K, V: Clone
impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            table_iter: self.table_iter.clone(),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.table_iter.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.table_iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.table_iter.next().map(|(key, value)| (&*key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.table_iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.table_into_iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.table_into_iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            iter: self.iter.clone(),
        }
    }
}
