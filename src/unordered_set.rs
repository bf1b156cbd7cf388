//! An unordered set implemented with an index-chained hash table.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use crate::error::Error;
use crate::hash::HashTable;
use crate::selector::Identity;

pub use crate::hash::{IntoIter, Iter};

/// An unordered set implemented with an index-chained hash table.
///
/// ```
/// use keyed::UnorderedSet;
/// let mut set = UnorderedSet::new();
/// set.insert("a").unwrap();
/// set.insert("b").unwrap();
/// assert!(set.insert("a").is_err());
/// assert!(set.contains("a"));
/// assert!(set.try_remove("a"));
/// assert!(!set.contains("a"));
/// ```
#[derive(Clone)]
pub struct UnorderedSet<T, H = RandomState> {
    table: HashTable<T, Identity, H>,
}

impl<T> UnorderedSet<T, RandomState> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            table: HashTable::new(),
        }
    }

    /// Creates an empty set with room for `capacity` values before growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: HashTable::with_capacity(capacity),
        }
    }
}

impl<T, H> UnorderedSet<T, H> {
    /// Creates an empty set hashing values with `hash_builder`.
    pub fn with_hasher(hash_builder: H) -> Self {
        Self {
            table: HashTable::with_hasher(hash_builder),
        }
    }

    /// Creates an empty set with room for `capacity` values,
    /// hashing values with `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: H) -> Self {
        Self {
            table: HashTable::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns the number of slots of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Gets an iterator over the values of the set in unspecified order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.table.iter()
    }
}

impl<T, H> UnorderedSet<T, H>
where
    T: Hash + Eq,
    H: BuildHasher,
{
    /// Returns a reference to the value in the set that is equal to the given value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(value)
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.contains(value)
    }

    /// Inserts a value into the set.
    /// Fails with [`Error::DuplicateKey`] if an equal value is already present.
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        self.table.insert(value)
    }

    /// Inserts a value into the set.
    /// Returns whether the value was newly inserted.
    pub fn try_insert(&mut self, value: T) -> bool {
        self.table.try_insert(value)
    }

    /// Removes a value from the set and returns the stored value.
    /// Fails with [`Error::KeyNotFound`] if no equal value is present.
    pub fn remove<Q>(&mut self, value: &Q) -> Result<T, Error>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.remove(value)
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    pub fn try_remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.try_remove(value)
    }

    /// Asserts that the internal table structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.table.check_consistency()
    }
}

impl<T, H: Default> Default for UnorderedSet<T, H> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<T, H> PartialEq for UnorderedSet<T, H>
where
    T: Hash + Eq,
    H: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T: Hash + Eq, H: BuildHasher> Eq for UnorderedSet<T, H> {}

impl<T: fmt::Debug, H> fmt::Debug for UnorderedSet<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, H> FromIterator<T> for UnorderedSet<T, H>
where
    T: Hash + Eq,
    H: BuildHasher + Default,
{
    /// Collects values into a set; later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().collect(),
        }
    }
}

impl<T, H> Extend<T> for UnorderedSet<T, H>
where
    T: Hash + Eq,
    H: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.table.extend(iter);
    }
}

impl<'a, T, H> IntoIterator for &'a UnorderedSet<T, H> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, H> IntoIterator for UnorderedSet<T, H> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}
