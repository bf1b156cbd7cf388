//! A separate-chaining hash table whose chains are threaded through a flat
//! slot array by index.

use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::iter::FusedIterator;
use std::{mem, slice, vec};

use crate::error::Error;
use crate::selector::KeySelector;

/// Capacity allocated by the first insert into an empty table.
pub const INITIAL_CAPACITY: usize = 5;

// Maximum load factor of 3/4
const MAX_LOAD_NUMERATOR: usize = 3;
const MAX_LOAD_DENOMINATOR: usize = 4;

/// A hash table storing values by a selected key.
///
/// All storage lives in two arrays: a slot array holding the values, and a
/// bucket array holding the index of the first slot of each collision chain.
/// Slots link to the next slot of their chain by index.
///
/// Slots are only ever appended until the table grows. Removing a value
/// empties its slot but leaves the slot linked in its chain, where a later
/// insert into the same chain may reuse it. Growth doubles the capacity and
/// rebuilds both arrays from the live values only.
///
/// Growth is triggered by a full slot array as well as by the load factor,
/// even when the target chain still holds a vacated slot. Heavy churn of
/// inserts and removes of distinct keys therefore keeps doubling the
/// capacity although few values are live at any time.
///
/// ```
/// use keyed::{HashTable, Identity};
/// let mut table = HashTable::<i32, Identity>::new();
/// for value in 1..=20 {
///     table.insert(value).unwrap();
/// }
/// assert!(table.contains(&17));
/// assert_eq!(table.remove(&17), Ok(17));
/// assert!(!table.contains(&17));
/// assert_eq!(table.len(), 19);
/// ```
#[derive(Clone)]
pub struct HashTable<V, S, H = RandomState> {
    slots: Vec<Slot<V>>,
    buckets: Vec<Option<usize>>,
    len: usize,
    selector: S,
    hash_builder: H,
}

#[derive(Clone)]
struct Slot<V> {
    value: Option<V>,
    hash: u64,
    next: Option<usize>,
}

/// An iterator over the values of a table in slot order.
pub struct Iter<'a, V> {
    slots: slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

/// A mutable iterator over the values of a table in slot order.
///
/// Only handed out by adapters that cannot reach the key through it.
pub(crate) struct IterMut<'a, V> {
    slots: slice::IterMut<'a, Slot<V>>,
    remaining: usize,
}

/// An owning iterator over the values of a table in slot order.
pub struct IntoIter<V> {
    slots: vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V, S: Default> HashTable<V, S, RandomState> {
    /// Creates an empty table.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Creates an empty table with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }
}

impl<V, S: Default, H> HashTable<V, S, H> {
    /// Creates an empty table hashing keys with `hash_builder`.
    pub fn with_hasher(hash_builder: H) -> Self {
        Self::with_selector_and_hasher(S::default(), hash_builder)
    }

    /// Creates an empty table with room for `capacity` slots,
    /// hashing keys with `hash_builder`.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: H) -> Self {
        let mut table = Self::with_hasher(hash_builder);
        table.allocate(capacity);
        table
    }
}

impl<V, S, H> HashTable<V, S, H> {
    /// Creates an empty table using the given key selector and hasher.
    pub const fn with_selector_and_hasher(selector: S, hash_builder: H) -> Self {
        Self {
            slots: Vec::new(),
            buckets: Vec::new(),
            len: 0,
            selector,
            hash_builder,
        }
    }

    /// Returns true if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of slots, which is also the number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the key selector of the table.
    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Returns the hasher of the table.
    pub fn hasher(&self) -> &H {
        &self.hash_builder
    }

    /// Removes all values, deallocating both arrays.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.buckets = Vec::new();
        self.len = 0;
    }

    /// Gets an iterator over the values in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            slots: self.slots.iter_mut(),
            remaining: self.len,
        }
    }

    fn allocate(&mut self, capacity: usize) {
        self.slots = Vec::with_capacity(capacity);
        self.buckets = vec![None; capacity];
    }

    fn bucket_index(hash: u64, capacity: usize) -> usize {
        (hash % capacity as u64) as usize
    }
}

impl<V, S, H> HashTable<V, S, H>
where
    S: KeySelector<V>,
    S::Key: Hash + Eq,
    H: BuildHasher,
{
    /// Returns true if a value with the given key is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        S::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find_index(self.hash_builder.hash_one(key), key).is_some()
    }

    /// Returns a reference to the value stored under the given key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        S::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_index(self.hash_builder.hash_one(key), key)?;
        self.slots[index].value.as_ref()
    }

    // Callers must not change the key of the returned value.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        S::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self.find_index(self.hash_builder.hash_one(key), key)?;
        self.slots[index].value.as_mut()
    }

    /// Inserts a value.
    ///
    /// Fails with [`Error::DuplicateKey`] if a value with the same key is
    /// already stored; the table is left untouched in that case.
    pub fn insert(&mut self, value: V) -> Result<(), Error> {
        if self.try_insert(value) {
            Ok(())
        } else {
            Err(Error::DuplicateKey)
        }
    }

    /// Inserts a value.
    /// Returns whether the value was inserted, i.e. its key was not present.
    pub fn try_insert(&mut self, value: V) -> bool {
        let key = self.selector.select(&value);
        let hash = self.hash_builder.hash_one(key);
        if self.find_index(hash, key).is_some() {
            return false;
        }

        if self.needs_growth() {
            self.grow();
        }
        self.place(hash, value);
        self.len += 1;
        true
    }

    /// Removes the value stored under the given key and returns it.
    ///
    /// The vacated slot stays linked in its chain until the next growth.
    /// Fails with [`Error::KeyNotFound`] if no such value is stored.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        S::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = self
            .find_index(self.hash_builder.hash_one(key), key)
            .ok_or(Error::KeyNotFound)?;
        let value = self.slots[index].value.take().ok_or(Error::KeyNotFound)?;
        debug_assert!(self.len >= 1);
        self.len -= 1;
        Ok(value)
    }

    /// Removes the value stored under the given key.
    /// Returns whether the key was present.
    pub fn try_remove<Q>(&mut self, key: &Q) -> bool
    where
        S::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.remove(key).is_ok()
    }

    /// Asserts that every slot is linked into exactly one chain, the chain of
    /// its hash, and that live keys are unique and counted correctly.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let capacity = self.capacity();
        assert!(self.slots.len() <= capacity);
        if capacity == 0 {
            assert!(self.slots.is_empty());
            assert_eq!(self.len, 0);
            return;
        }

        // Check chains
        let mut visited = vec![false; self.slots.len()];
        for (bucket, head) in self.buckets.iter().enumerate() {
            let mut current = *head;
            while let Some(index) = current {
                assert!(index < self.slots.len());
                assert!(!visited[index], "slot {index} linked twice");
                visited[index] = true;
                let slot = &self.slots[index];
                assert_eq!(Self::bucket_index(slot.hash, capacity), bucket);
                current = slot.next;
            }
        }
        assert!(visited.iter().all(|&linked| linked), "unlinked slot");

        // Check live values
        let mut len = 0;
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(value) = &slot.value {
                let key = self.selector.select(value);
                assert_eq!(slot.hash, self.hash_builder.hash_one(key));
                assert_eq!(self.find_index(slot.hash, key), Some(index));
                len += 1;
            }
        }
        assert_eq!(len, self.len);
    }

    fn find_index<Q>(&self, hash: u64, key: &Q) -> Option<usize>
    where
        S::Key: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        if self.buckets.is_empty() {
            return None;
        }
        let mut current = self.buckets[Self::bucket_index(hash, self.capacity())];
        while let Some(index) = current {
            let slot = &self.slots[index];
            if let Some(value) = &slot.value {
                let stored: &Q = self.selector.select(value).borrow();
                if slot.hash == hash && stored == key {
                    return Some(index);
                }
            }
            current = slot.next;
        }
        None
    }

    fn needs_growth(&self) -> bool {
        self.slots.len() >= self.capacity()
            || self.len * MAX_LOAD_DENOMINATOR > self.capacity() * MAX_LOAD_NUMERATOR
    }

    fn grow(&mut self) {
        let new_capacity = (self.capacity() * 2).max(INITIAL_CAPACITY);
        self.rehash(new_capacity);
    }

    // Compacts live values into fresh arrays and relinks every chain.
    fn rehash(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        let old_slots = mem::take(&mut self.slots);
        self.allocate(new_capacity);

        let mut tails: Vec<Option<usize>> = vec![None; new_capacity];
        for slot in old_slots {
            let Some(value) = slot.value else {
                continue;
            };
            let index = self.push_slot(value, slot.hash);
            let bucket = Self::bucket_index(slot.hash, new_capacity);
            match tails[bucket] {
                None => self.buckets[bucket] = Some(index),
                Some(tail) => self.slots[tail].next = Some(index),
            }
            tails[bucket] = Some(index);
        }
    }

    // Stores a value whose key is known to be absent.
    // Reuses the first vacated slot of the chain, else appends a new slot.
    fn place(&mut self, hash: u64, value: V) {
        let bucket = Self::bucket_index(hash, self.capacity());
        let Some(mut index) = self.buckets[bucket] else {
            let index = self.push_slot(value, hash);
            self.buckets[bucket] = Some(index);
            return;
        };

        loop {
            let slot = &mut self.slots[index];
            if slot.value.is_none() {
                slot.value = Some(value);
                slot.hash = hash;
                return;
            }
            match slot.next {
                Some(next) => index = next,
                None => break,
            }
        }

        let tail = index;
        let index = self.push_slot(value, hash);
        self.slots[tail].next = Some(index);
    }

    fn push_slot(&mut self, value: V, hash: u64) -> usize {
        let index = self.slots.len();
        debug_assert!(index < self.capacity());
        self.slots.push(Slot {
            value: Some(value),
            hash,
            next: None,
        });
        index
    }
}

impl<V, S: Default, H: Default> Default for HashTable<V, S, H> {
    fn default() -> Self {
        Self::with_hasher(H::default())
    }
}

impl<V: fmt::Debug, S, H> fmt::Debug for HashTable<V, S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<V, S, H> FromIterator<V> for HashTable<V, S, H>
where
    S: KeySelector<V> + Default,
    S::Key: Hash + Eq,
    H: BuildHasher + Default,
{
    /// Collects values into a table; later duplicates of a key are dropped.
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

impl<V, S, H> Extend<V> for HashTable<V, S, H>
where
    S: KeySelector<V>,
    S::Key: Hash + Eq,
    H: BuildHasher,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.try_insert(value);
        }
    }
}

impl<'a, V, S, H> IntoIterator for &'a HashTable<V, S, H> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, S, H> IntoIterator for HashTable<V, S, H> {
    type Item = V;
    type IntoIter = IntoIter<V>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            slots: self.slots.into_iter(),
            remaining: self.len,
        }
    }
}

// Auto derived clone seems to have an invalid type bound of V: Clone
impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            remaining: self.remaining,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value.as_ref())?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(|slot| slot.value.as_ref())?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value.as_mut())?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.slots.find_map(|slot| slot.value)?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for IntoIter<V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.slots.by_ref().rev().find_map(|slot| slot.value)?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}
