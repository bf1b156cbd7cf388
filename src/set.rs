//! An ordered set implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::fmt;
use std::iter::{FusedIterator, Peekable};

use crate::error::Error;
use crate::selector::Identity;
use crate::tree::AvlTree;

pub use crate::tree::{IntoIter, Iter};

/// An ordered set implemented with an AVL tree.
///
/// ```
/// use keyed::Set;
/// let mut set = Set::new();
/// set.insert(0).unwrap();
/// set.insert(1).unwrap();
/// set.insert(2).unwrap();
/// assert_eq!(set.get(&1), Some(&1));
/// set.remove(&1).unwrap();
/// assert!(set.get(&1).is_none());
/// ```
#[derive(Clone)]
pub struct Set<T> {
    tree: AvlTree<T, Identity>,
}

/// A lazy iterator over the values in `self` or `other`, in ascending order.
///
/// Created by [`Set::union`].
pub struct Union<'a, T> {
    merge: Merge<'a, T>,
}

/// A lazy iterator over the values in both `self` and `other`, in ascending order.
///
/// Created by [`Set::intersection`].
pub struct Intersection<'a, T> {
    merge: Merge<'a, T>,
}

// Walks two ascending sequences side by side.
struct Merge<'a, T> {
    lhs: Peekable<Iter<'a, T>>,
    rhs: Peekable<Iter<'a, T>>,
}

impl<T: Ord> Set<T> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            tree: AvlTree::new(),
        }
    }

    /// Returns a reference to the value in the set that is equal to the given value.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.get(value)
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.contains(value)
    }

    /// Inserts a value into the set.
    /// Fails with [`Error::DuplicateKey`] if an equal value is already present.
    pub fn insert(&mut self, value: T) -> Result<(), Error> {
        self.tree.insert(value)
    }

    /// Inserts a value into the set.
    /// Returns whether the value was newly inserted.
    pub fn try_insert(&mut self, value: T) -> bool {
        self.tree.try_insert(value)
    }

    /// Removes a value from the set and returns the stored value.
    /// Fails with [`Error::KeyNotFound`] if no equal value is present.
    pub fn remove<Q>(&mut self, value: &Q) -> Result<T, Error>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.remove(value)
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    pub fn try_remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.tree.try_remove(value)
    }

    /// Gets an iterator over the values of the union set,
    /// i.e., all values in `self` or `other`, without duplicates,
    /// in ascending order.
    pub fn union<'a>(&'a self, other: &'a Self) -> Union<'a, T> {
        Union {
            merge: Merge::new(self, other),
        }
    }

    /// Gets an iterator over the values of the intersection set,
    /// i.e., all values that are both in `self` and `other`,
    /// in ascending order.
    pub fn intersection<'a>(&'a self, other: &'a Self) -> Intersection<'a, T> {
        Intersection {
            merge: Merge::new(self, other),
        }
    }

    /// Returns `true` if `self` has no elements in common with `other`.
    /// This is equivalent to checking for an empty intersection.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.intersection(other).next().is_none()
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.tree.check_consistency()
    }
}

impl<T> Set<T> {
    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the smallest value in the set.
    pub fn first(&self) -> Option<&T> {
        self.tree.first()
    }

    /// Returns the largest value in the set.
    pub fn last(&self) -> Option<&T> {
        self.tree.last()
    }

    /// Gets an iterator over the values of the set in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.tree.iter()
    }

    /// Calls `f` for each value, level by level from the root of the tree down.
    pub fn traverse_level_order<F: FnMut(&T)>(&self, f: F) {
        self.tree.traverse_level_order(f);
    }
}

impl<T: Ord> Default for Set<T> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Set<T> {}

impl<T: fmt::Debug> fmt::Debug for Set<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for Set<T> {
    /// Collects values into a set; later duplicates are dropped.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tree: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.tree.extend(iter);
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for Set<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a Set<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        self.tree.into_iter()
    }
}

impl<'a, T: Ord> Merge<'a, T> {
    fn new(lhs: &'a Set<T>, rhs: &'a Set<T>) -> Self {
        Self {
            lhs: lhs.iter().peekable(),
            rhs: rhs.iter().peekable(),
        }
    }

    // Advances past the smaller head, or past both heads if they are equal.
    // Returns the consumed value and which side(s) it was found on.
    fn step(&mut self) -> Option<(&'a T, Ordering)> {
        let order = match (self.lhs.peek(), self.rhs.peek()) {
            (None, None) => return None,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(lhs), Some(rhs)) => lhs.cmp(rhs),
        };
        let value = match order {
            Ordering::Less => self.lhs.next()?,
            Ordering::Greater => self.rhs.next()?,
            Ordering::Equal => {
                self.rhs.next();
                self.lhs.next()?
            }
        };
        Some((value, order))
    }

    fn both_pending(&mut self) -> bool {
        self.lhs.peek().is_some() && self.rhs.peek().is_some()
    }

    fn lengths(&self) -> (usize, usize) {
        (self.lhs.len(), self.rhs.len())
    }
}

// Auto derived clone seems to have an invalid type bound of T: Clone
impl<T> Clone for Merge<'_, T> {
    fn clone(&self) -> Self {
        Self {
            lhs: self.lhs.clone(),
            rhs: self.rhs.clone(),
        }
    }
}

impl<T> Clone for Union<'_, T> {
    fn clone(&self) -> Self {
        Self {
            merge: self.merge.clone(),
        }
    }
}

impl<T> Clone for Intersection<'_, T> {
    fn clone(&self) -> Self {
        Self {
            merge: self.merge.clone(),
        }
    }
}

impl<'a, T: Ord> Iterator for Union<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.merge.step().map(|(value, _)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lhs, rhs) = self.merge.lengths();
        (cmp::max(lhs, rhs), Some(lhs + rhs))
    }
}

impl<T: Ord> FusedIterator for Union<'_, T> {}

impl<T: Ord + fmt::Debug> fmt::Debug for Union<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T: Ord> Iterator for Intersection<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        // Either side running dry ends the intersection
        while self.merge.both_pending() {
            if let Some((value, Ordering::Equal)) = self.merge.step() {
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (lhs, rhs) = self.merge.lengths();
        (0, Some(cmp::min(lhs, rhs)))
    }
}

impl<T: Ord> FusedIterator for Intersection<'_, T> {}

impl<T: Ord + fmt::Debug> fmt::Debug for Intersection<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
