//! Key extraction strategies shared by both index engines.

/// Extracts the ordering/hashing key from a stored value.
///
/// The selector must be a pure function: selecting the key of the same value
/// twice has to yield equal keys, otherwise the engines lose track of their
/// elements.
pub trait KeySelector<V> {
    /// The key type used for comparison and hashing.
    type Key: ?Sized;

    /// Returns the key of `value`.
    fn select<'a>(&self, value: &'a V) -> &'a Self::Key;
}

/// Selector whose key is the value itself. Used by sets.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Identity;

/// Selector whose key is the first element of a `(key, mapped)` pair.
/// Used by maps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PairFirst;

impl<T> KeySelector<T> for Identity {
    type Key = T;

    #[inline]
    fn select<'a>(&self, value: &'a T) -> &'a T {
        value
    }
}

impl<K, M> KeySelector<(K, M)> for PairFirst {
    type Key = K;

    #[inline]
    fn select<'a>(&self, value: &'a (K, M)) -> &'a K {
        &value.0
    }
}
