//! An AVL tree storing values ordered by a selected key.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FusedIterator;
use std::mem;

use crate::error::Error;
use crate::selector::KeySelector;

/// A height-balanced binary search tree.
///
/// Values are ordered by the key `S` selects from them. Keys are unique.
/// Nodes own their children and carry no parent link; every mutation descends
/// from the root and restores balance on the way back up.
///
/// ```
/// use keyed::{AvlTree, Identity};
/// let mut tree = AvlTree::<i32, Identity>::new();
/// for value in [5, 3, 8, 1, 4, 7, 9] {
///     tree.insert(value).unwrap();
/// }
/// assert!(tree.contains(&4));
/// assert_eq!(tree.remove(&5), Ok(5));
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
/// ```
#[derive(Clone)]
pub struct AvlTree<V, S> {
    root: Link<V>,
    num_nodes: usize,
    selector: S,
}

type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
struct Node<V> {
    value: V,
    left: Link<V>,
    right: Link<V>,
    height: usize,
}

// Direction a value took when passing a node on its way down.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Here,
}

/// An iterator over the values of a tree in ascending key order.
pub struct Iter<'a, V> {
    front: Vec<&'a Node<V>>,
    back: Vec<&'a Node<V>>,
    remaining: usize,
}

/// A mutable iterator over the values of a tree in ascending key order.
///
/// Only handed out by adapters that cannot reach the key through it.
pub(crate) struct IterMut<'a, V> {
    stack: Vec<(&'a mut V, Option<&'a mut Node<V>>)>,
    remaining: usize,
}

/// An owning iterator over the values of a tree in ascending key order.
pub struct IntoIter<V> {
    stack: Vec<Box<Node<V>>>,
    remaining: usize,
}

/// An iterator over the values of a tree in pre-order (node, left, right).
pub struct Preorder<'a, V> {
    stack: Vec<&'a Node<V>>,
}

impl<V, S> AvlTree<V, S> {
    /// Creates an empty tree using the given key selector.
    /// No memory is allocated until the first value is inserted.
    pub const fn with_selector(selector: S) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            selector,
        }
    }

    /// Returns true if the tree contains no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of values in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        Node::link_height(&self.root)
    }

    /// Removes all values, deallocating every node.
    pub fn clear(&mut self) {
        // Boxed children drop after their parent's value, i.e. post-order.
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the value with the smallest key.
    pub fn first(&self) -> Option<&V> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(&node.value)
    }

    /// Returns the value with the largest key.
    pub fn last(&self) -> Option<&V> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(&node.value)
    }

    /// Gets an iterator over the values in ascending key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }

    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(self.root.as_deref_mut(), self.num_nodes)
    }

    /// Gets an iterator visiting every node before its subtrees.
    pub fn preorder(&self) -> Preorder<'_, V> {
        Preorder {
            stack: self.root.as_deref().into_iter().collect(),
        }
    }

    /// Calls `f` for each value, level by level from the root down,
    /// left to right within a level.
    pub fn traverse_level_order<F: FnMut(&V)>(&self, mut f: F) {
        let mut queue = VecDeque::new();
        queue.extend(self.root.as_deref());
        while let Some(node) = queue.pop_front() {
            f(&node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }
}

impl<V, S> AvlTree<V, S>
where
    S: KeySelector<V> + Default,
    S::Key: Ord,
{
    /// Creates an empty tree.
    /// No memory is allocated until the first value is inserted.
    pub fn new() -> Self {
        Self::with_selector(S::default())
    }
}

impl<V, S> AvlTree<V, S>
where
    S: KeySelector<V>,
    S::Key: Ord,
{
    /// Returns the key selector of the tree.
    pub fn selector(&self) -> &S {
        &self.selector
    }

    /// Returns true if a value with the given key is stored.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Returns a reference to the value stored under the given key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node| &node.value)
    }

    // Callers must not change the key of the returned value.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(self.selector.select(&node.value).borrow()) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    /// Inserts a value.
    ///
    /// Fails with [`Error::DuplicateKey`] if a value with the same key is
    /// already stored; the tree is left untouched in that case.
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
        match Self::insert_at(&self.selector, &mut self.root, value) {
            Ok(_) => {
                self.num_nodes += 1;
                true
            }
            Err(_) => false,
        }
    }

    /// Removes the value stored under the given key and returns it.
    ///
    /// Fails with [`Error::KeyNotFound`] if no such value is stored.
    pub fn remove<Q>(&mut self, key: &Q) -> Result<V, Error>
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let value = Self::remove_at(&self.selector, &mut self.root, key).ok_or(Error::KeyNotFound)?;
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
        Ok(value)
    }

    /// Removes the value stored under the given key.
    /// Returns whether the key was present.
    pub fn try_remove<Q>(&mut self, key: &Q) -> bool
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove(key).is_ok()
    }

    /// Asserts that the tree is ordered, balanced and that cached heights
    /// and the node count are accurate.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        Self::check_node(&self.selector, self.root.as_deref(), &mut num_nodes);
        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.iter().count(), self.num_nodes);

        // In-order traversal must be strictly ascending
        let mut iter = self.iter();
        if let Some(mut prev) = iter.next() {
            for value in iter {
                assert!(self.selector.select(prev) < self.selector.select(value));
                prev = value;
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn check_node(selector: &S, node: Option<&Node<V>>, num_nodes: &mut usize) -> usize {
        let Some(node) = node else {
            return 0;
        };
        *num_nodes += 1;
        let key = selector.select(&node.value);
        if let Some(left) = node.left.as_deref() {
            assert!(selector.select(&left.value) < key);
        }
        if let Some(right) = node.right.as_deref() {
            assert!(selector.select(&right.value) > key);
        }

        let left_height = Self::check_node(selector, node.left.as_deref(), num_nodes);
        let right_height = Self::check_node(selector, node.right.as_deref(), num_nodes);

        // Check AVL condition (nearly balance)
        assert!(left_height <= right_height + 1);
        assert!(right_height <= left_height + 1);

        let height = cmp::max(left_height, right_height) + 1;
        assert_eq!(node.height, height);
        height
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<V>>
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(self.selector.select(&node.value).borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        None
    }

    // Inserts below `link` and rebalances on the way back up.
    // Returns the side taken at this level, or the value back on a duplicate.
    fn insert_at(selector: &S, link: &mut Link<V>, value: V) -> Result<Side, V> {
        let Some(node) = link.as_mut() else {
            *link = Some(Node::create(value));
            return Ok(Side::Here);
        };

        let (side, below) = match selector.select(&value).cmp(selector.select(&node.value)) {
            Ordering::Equal => return Err(value),
            Ordering::Less => (Side::Left, Self::insert_at(selector, &mut node.left, value)?),
            Ordering::Greater => (Side::Right, Self::insert_at(selector, &mut node.right, value)?),
        };
        Self::rebalance_inserted(node, side, below);
        Ok(side)
    }

    // Removes the value with `key` below `link` and rebalances on the way back up.
    fn remove_at<Q>(selector: &S, link: &mut Link<V>, key: &Q) -> Option<V>
    where
        S::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let ordering = key.cmp(selector.select(&link.as_ref()?.value).borrow());
        if ordering == Ordering::Equal {
            return Self::unlink_node(link);
        }
        let node = link.as_mut()?;
        let removed = match ordering {
            Ordering::Less => Self::remove_at(selector, &mut node.left, key)?,
            _ => Self::remove_at(selector, &mut node.right, key)?,
        };
        Self::rebalance_node(node);
        Some(removed)
    }

    // Unlinks the node at `link` and returns its value.
    fn unlink_node(link: &mut Link<V>) -> Option<V> {
        let mut node = link.take()?;
        match (node.left.is_some(), node.right.is_some()) {
            (true, true) => {
                // Take over the in-order successor's value,
                // then drop the successor from the right subtree
                let successor = Self::remove_min(&mut node.right)?;
                let value = mem::replace(&mut node.value, successor);
                Self::rebalance_node(&mut node);
                *link = Some(node);
                Some(value)
            }
            (true, false) => {
                let Node { value, left, .. } = *node;
                *link = left;
                Some(value)
            }
            (false, _) => {
                let Node { value, right, .. } = *node;
                *link = right;
                Some(value)
            }
        }
    }

    fn remove_min(link: &mut Link<V>) -> Option<V> {
        let node = link.as_mut()?;
        if node.left.is_some() {
            let value = Self::remove_min(&mut node.left);
            Self::rebalance_node(node);
            value
        } else {
            let Node { value, right, .. } = *link.take()?;
            *link = right;
            Some(value)
        }
    }

    /// Restores balance after an insert passed through `node` towards `side`
    /// and then towards `below` at the child.
    /// The rotation case follows from the path of the inserted key,
    /// which is only valid right after a single insert.
    fn rebalance_inserted(node: &mut Box<Node<V>>, side: Side, below: Side) {
        let balance = node.balance();
        match side {
            Side::Left if balance > 1 => {
                // Left-right case needs the child rotated first
                if below == Side::Right {
                    if let Some(left) = node.left.as_mut() {
                        Node::rotate_left(left);
                    }
                }
                Node::rotate_right(node);
            }
            Side::Right if balance < -1 => {
                // Right-left case needs the child rotated first
                if below == Side::Left {
                    if let Some(right) = node.right.as_mut() {
                        Node::rotate_right(right);
                    }
                }
                Node::rotate_left(node);
            }
            _ => node.adjust_height(),
        }
    }

    /// Restores AVL condition (balance) at given node if necessary and adjusts height.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    fn rebalance_node(node: &mut Box<Node<V>>) {
        let balance = node.balance();
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            if let Some(left) = node.left.as_mut() {
                if left.balance() < 0 {
                    Node::rotate_left(left);
                }
            }
            Node::rotate_right(node);
        } else if balance < -1 {
            if let Some(right) = node.right.as_mut() {
                if right.balance() > 0 {
                    Node::rotate_right(right);
                }
            }
            Node::rotate_left(node);
        } else {
            node.adjust_height();
        }
    }
}

impl<V, S> Default for AvlTree<V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_selector(S::default())
    }
}

impl<V: fmt::Debug, S> fmt::Debug for AvlTree<V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<V, S> FromIterator<V> for AvlTree<V, S>
where
    S: KeySelector<V> + Default,
    S::Key: Ord,
{
    /// Collects values into a tree; later duplicates of a key are dropped.
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<V, S> Extend<V> for AvlTree<V, S>
where
    S: KeySelector<V>,
    S::Key: Ord,
{
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        for value in iter {
            self.try_insert(value);
        }
    }
}

impl<'a, V, S> IntoIterator for &'a AvlTree<V, S> {
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V, S> IntoIterator for AvlTree<V, S> {
    type Item = V;
    type IntoIter = IntoIter<V>;
    fn into_iter(mut self) -> Self::IntoIter {
        let mut into_iter = IntoIter {
            stack: Vec::new(),
            remaining: self.num_nodes,
        };
        into_iter.push_left(self.root.take());
        into_iter
    }
}

impl<V> Node<V> {
    fn create(value: V) -> Box<Self> {
        Box::new(Node {
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    fn link_height(link: &Link<V>) -> usize {
        link.as_ref().map_or(0, |node| node.height)
    }

    fn adjust_height(&mut self) {
        self.height = cmp::max(Self::link_height(&self.left), Self::link_height(&self.right)) + 1;
    }

    fn balance(&self) -> isize {
        Self::link_height(&self.left) as isize - Self::link_height(&self.right) as isize
    }

    //   n          r
    //  / \        / \
    // a   r  ->  n   c
    //    / \    / \
    //   b   c  a   b
    fn rotate_left(node: &mut Box<Self>) {
        if let Some(mut right) = node.right.take() {
            node.right = right.left.take();
            node.adjust_height();
            mem::swap(node, &mut right);
            node.left = Some(right);
            node.adjust_height();
        }
    }

    //     n      l
    //    / \    / \
    //   l   c  a   n
    //  / \        / \
    // a   b      b   c
    fn rotate_right(node: &mut Box<Self>) {
        if let Some(mut left) = node.left.take() {
            node.left = left.right.take();
            node.adjust_height();
            mem::swap(node, &mut left);
            node.right = Some(left);
            node.adjust_height();
        }
    }
}

impl<'a, V> Iter<'a, V> {
    fn new(root: Option<&'a Node<V>>, len: usize) -> Self {
        let mut iter = Self {
            front: Vec::new(),
            back: Vec::new(),
            remaining: len,
        };
        iter.push_left(root);
        iter.push_right(root);
        iter
    }

    fn push_left(&mut self, mut link: Option<&'a Node<V>>) {
        while let Some(node) = link {
            self.front.push(node);
            link = node.left.as_deref();
        }
    }

    fn push_right(&mut self, mut link: Option<&'a Node<V>>) {
        while let Some(node) = link {
            self.back.push(node);
            link = node.right.as_deref();
        }
    }
}

// Auto derived clone seems to have an invalid type bound of V: Clone
impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
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
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.push_left(node.right.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.push_right(node.left.as_deref());
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IterMut<'a, V> {
    fn new(root: Option<&'a mut Node<V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: Option<&'a mut Node<V>>) {
        while let Some(node) = link {
            let Node {
                value, left, right, ..
            } = node;
            self.stack.push((value, right.as_deref_mut()));
            link = left.as_deref_mut();
        }
    }
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let (value, right) = self.stack.pop()?;
        self.push_left(right);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

impl<V> IntoIter<V> {
    fn push_left(&mut self, mut link: Link<V>) {
        while let Some(mut node) = link {
            link = node.left.take();
            self.stack.push(node);
        }
    }
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let mut node = self.stack.pop()?;
        self.push_left(node.right.take());
        self.remaining -= 1;
        Some(node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> FusedIterator for IntoIter<V> {}

impl<'a, V> Iterator for Preorder<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right.as_deref());
        self.stack.extend(node.left.as_deref());
        Some(&node.value)
    }
}

impl<V> FusedIterator for Preorder<'_, V> {}

#[cfg(test)]
mod tests {
    use super::AvlTree;
    use crate::error::Error;
    use crate::selector::{Identity, PairFirst};

    type Tree<T> = AvlTree<T, Identity>;

    const N: i32 = 1_000;

    #[test]
    fn test_new() {
        let tree_i32 = Tree::<i32>::new();
        assert!(tree_i32.is_empty());
        assert_eq!(tree_i32.height(), 0);
        tree_i32.check_consistency();

        let tree_string = Tree::<String>::new();
        assert!(tree_string.is_empty());
        tree_string.check_consistency();
    }

    #[test]
    fn test_rebalance() {
        // Left-left, left-right, right-right and right-left cases after insert
        for order in [[3, 2, 1], [3, 1, 2], [1, 2, 3], [1, 3, 2]] {
            let mut tree = Tree::new();
            for value in order {
                tree.insert(value).unwrap();
                tree.check_consistency();
            }
            assert_eq!(tree.height(), 2);
            assert_eq!(tree.preorder().copied().collect::<Vec<_>>(), [2, 1, 3]);
        }

        // Same four cases triggered by a remove on the short side
        for (order, removed) in [
            ([3, 2, 4, 1], 4),
            ([3, 1, 4, 2], 4),
            ([1, 0, 2, 3], 0),
            ([1, 0, 3, 2], 0),
        ] {
            let mut tree = Tree::new();
            for value in order {
                tree.insert(value).unwrap();
            }
            tree.check_consistency();
            assert_eq!(tree.height(), 3);
            assert_eq!(tree.remove(&removed), Ok(removed));
            tree.check_consistency();
            assert_eq!(tree.height(), 2);
        }
    }

    #[test]
    fn test_scenario_remove_root() {
        let mut tree = Tree::new();
        for value in [5, 3, 8, 1, 4, 7, 9] {
            tree.insert(value).unwrap();
            tree.check_consistency();
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);

        assert_eq!(tree.remove(&5), Ok(5));
        tree.check_consistency();
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 7, 8, 9]);
    }

    #[test]
    fn test_remove_beside_balanced_child() {
        //   2                 4
        //  / \               / \
        // 1   4     =>      2   5
        //    / \             \
        //   3   5             3
        let mut tree = Tree::new();
        for value in [2, 1, 4, 3, 5] {
            tree.insert(value).unwrap();
        }
        tree.remove(&1).unwrap();
        tree.check_consistency();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.preorder().copied().collect::<Vec<_>>(), [4, 2, 3, 5]);

        // Mirrored
        let mut tree = Tree::new();
        for value in [4, 5, 2, 1, 3] {
            tree.insert(value).unwrap();
        }
        tree.remove(&5).unwrap();
        tree.check_consistency();
        assert_eq!(tree.height(), 3);
        assert_eq!(tree.preorder().copied().collect::<Vec<_>>(), [2, 1, 4, 3]);
    }

    #[test]
    fn test_insert() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0);
        let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
        values.sort();
        values.dedup();

        let mut tree = Tree::new();
        for value in &values {
            assert!(tree.try_insert(*value));
            tree.check_consistency();
        }
        assert_eq!(tree.len(), values.len());

        for value in &values {
            assert_eq!(tree.insert(*value), Err(Error::DuplicateKey));
            assert!(!tree.try_insert(*value));
        }
        assert_eq!(tree.len(), values.len());
        tree.check_consistency();
    }

    #[test]
    fn test_insert_sorted_range() {
        let mut tree = Tree::new();
        for value in 0..N {
            assert!(tree.try_insert(value));
            tree.check_consistency();
        }
        assert_eq!(tree.len(), N as usize);
        // 1.44 * log2(n) bound of AVL trees
        assert!(tree.height() <= 15);
        assert_eq!(tree.first(), Some(&0));
        assert_eq!(tree.last(), Some(&(N - 1)));
    }

    #[test]
    fn test_remove() {
        use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0);
        let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
        values.sort();
        values.dedup();

        let mut tree: Tree<i32> = values.iter().copied().collect();

        values.shuffle(&mut rng);
        for value in &values {
            assert!(tree.contains(value));
            assert_eq!(tree.remove(value), Ok(*value));
            assert!(!tree.contains(value));
            assert_eq!(tree.remove(value), Err(Error::KeyNotFound));
            assert!(!tree.try_remove(value));
            tree.check_consistency();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn test_clear() {
        let mut tree: Tree<i32> = (0..N).collect();
        assert_eq!(tree.len(), N as usize);
        tree.clear();
        assert!(tree.is_empty());
        tree.clear();
        assert!(tree.is_empty());
        tree.check_consistency();

        for value in 0..N {
            assert!(tree.try_insert(value));
        }
        assert_eq!(tree.len(), N as usize);
        tree.check_consistency();
    }

    #[test]
    fn test_iter_both_ends() {
        let tree: Tree<i32> = (0..100).rev().collect();
        let forward: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(forward, (0..100).collect::<Vec<_>>());
        let backward: Vec<i32> = tree.iter().rev().copied().collect();
        assert_eq!(backward, (0..100).rev().collect::<Vec<_>>());

        let mut iter = tree.iter();
        assert_eq!(iter.len(), 100);
        for step in 0..50 {
            assert_eq!(iter.next(), Some(&step));
            assert_eq!(iter.next_back(), Some(&(99 - step)));
        }
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_into_iter() {
        let tree: Tree<String> = ["d", "b", "a", "c", "e"].iter().map(|s| s.to_string()).collect();
        let mut into_iter = tree.into_iter();
        assert_eq!(into_iter.len(), 5);
        assert_eq!(into_iter.next().as_deref(), Some("a"));
        assert_eq!(into_iter.collect::<Vec<_>>(), ["b", "c", "d", "e"]);
    }

    #[test]
    fn test_iter_mut() {
        let mut tree = AvlTree::<(i32, i32), PairFirst>::new();
        for key in 0..10 {
            tree.insert((key, 0)).unwrap();
        }
        for (key, mapped) in tree.iter_mut() {
            *mapped = *key * 2;
        }
        assert_eq!(tree.get(&7), Some(&(7, 14)));
        *tree.get_mut(&3).unwrap() = (3, -1);
        assert_eq!(tree.get(&3), Some(&(3, -1)));
        assert!(tree.get_mut(&10).is_none());
    }

    #[test]
    fn test_level_order() {
        let tree: Tree<i32> = (1..=7).collect();
        let mut levels = Vec::new();
        tree.traverse_level_order(|value| levels.push(*value));
        assert_eq!(levels, [4, 2, 6, 1, 3, 5, 7]);
        assert_eq!(tree.preorder().copied().collect::<Vec<_>>(), [4, 2, 1, 3, 6, 5, 7]);
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut tree = Tree::<String>::new();
        tree.insert("foo".to_string()).unwrap();
        tree.insert("bar".to_string()).unwrap();
        assert!(tree.contains("foo"));
        assert_eq!(tree.get("bar").map(String::as_str), Some("bar"));
        assert_eq!(tree.remove("foo").as_deref(), Ok("foo"));
        assert!(!tree.contains("foo"));
    }

    #[test]
    fn test_interleaved_operations() {
        use std::collections::BTreeSet;

        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0);
        let mut tree = Tree::new();
        let mut model = BTreeSet::new();
        for _ in 0..20_000 {
            let key = rng.gen_range(0..300);
            if rng.gen_bool(0.5) {
                assert_eq!(tree.try_insert(key), model.insert(key), "insert {key}");
            } else {
                assert_eq!(tree.try_remove(&key), model.remove(&key), "remove {key}");
            }
            tree.check_consistency();
            assert_eq!(tree.len(), model.len());
        }
        assert!(tree.iter().eq(model.iter()));
    }

    #[test]
    fn test_take_leaves_empty_tree() {
        let mut tree: Tree<i32> = (0..10).collect();
        let taken = std::mem::take(&mut tree);
        assert_eq!(taken.len(), 10);
        assert!(tree.is_empty());
        assert!(tree.try_insert(1));
        tree.check_consistency();
    }
}
