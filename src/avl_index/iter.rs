use core::iter::FusedIterator;

use smallvec::SmallVec;

use super::AvlIndex;
use crate::raw::Handle;
use crate::Entry;

// A supported `smallvec::Array` length, above the height of any AVL tree
// that fits in the arena.
const STACK_DEPTH: usize = 64;

/// A stack-based walk over the tree in key order, in either direction.
///
/// The stack holds the nodes whose entry has not been yielded yet but whose
/// subtree on the near side already has been.
pub(crate) struct Cursor<'a> {
    index: &'a AvlIndex,
    stack: SmallVec<[Handle; STACK_DEPTH]>,
    ascending: bool,
}

impl<'a> Cursor<'a> {
    /// Ascending from the smallest key.
    pub(crate) fn first(index: &'a AvlIndex) -> Self {
        let mut cursor = Self::empty(index, true);
        cursor.push_spine(index.root);
        cursor
    }

    /// Ascending from the smallest key `>= key`.
    pub(crate) fn at_or_after(index: &'a AvlIndex, key: i64) -> Self {
        let mut cursor = Self::empty(index, true);
        let mut slot = index.root;
        while let Some(handle) = slot {
            let node = index.node(handle);
            if node.key() >= key {
                cursor.stack.push(handle);
                slot = node.left;
            } else {
                slot = node.right;
            }
        }
        cursor
    }

    /// Descending from the largest key `< key`.
    pub(crate) fn before(index: &'a AvlIndex, key: i64) -> Self {
        let mut cursor = Self::empty(index, false);
        let mut slot = index.root;
        while let Some(handle) = slot {
            let node = index.node(handle);
            if node.key() < key {
                cursor.stack.push(handle);
                slot = node.right;
            } else {
                slot = node.left;
            }
        }
        cursor
    }

    fn empty(index: &'a AvlIndex, ascending: bool) -> Self {
        Self {
            index,
            stack: SmallVec::new(),
            ascending,
        }
    }

    fn push_spine(&mut self, mut slot: Option<Handle>) {
        while let Some(handle) = slot {
            self.stack.push(handle);
            slot = self.index.node(handle).child(self.ascending);
        }
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        let handle = self.stack.pop()?;
        let index = self.index;
        let node = index.node(handle);
        self.push_spine(node.child(!self.ascending));
        Some(&node.entry)
    }
}

impl FusedIterator for Cursor<'_> {}

/// An iterator over the entries of an [`AvlIndex`] in ascending key order.
///
/// This `struct` is created by the [`iter`](AvlIndex::iter) method on
/// [`AvlIndex`].
///
/// # Examples
///
/// ```
/// use avl_store::{AvlIndex, Entry};
///
/// let index: AvlIndex = [("c", 3), ("a", 1), ("b", 2)].into_iter().map(Entry::from).collect();
/// let labels: Vec<&str> = index.iter().map(Entry::label).collect();
/// assert_eq!(labels, ["a", "b", "c"]);
/// ```
pub struct Iter<'a> {
    cursor: Cursor<'a>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(index: &'a AvlIndex) -> Self {
        Self {
            cursor: Cursor::first(index),
            remaining: index.len(),
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        let entry = self.cursor.next()?;
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn index_of(keys: &[i64]) -> AvlIndex {
        keys.iter().map(|&key| Entry::new("k", key)).collect()
    }

    fn keys<'a>(entries: impl Iterator<Item = &'a Entry>) -> Vec<i64> {
        entries.map(Entry::key).collect()
    }

    #[test]
    fn iter_is_ascending_and_exact_size() {
        let index = index_of(&[40, 20, 70, 10, 50]);
        let mut iter = index.iter();
        assert_eq!(iter.len(), 5);
        let _ = iter.next();
        assert_eq!(iter.len(), 4);
        assert_eq!(keys(iter), [20, 40, 50, 70]);
    }

    #[test]
    fn iter_over_empty_index() {
        let index = AvlIndex::new();
        assert_eq!(index.iter().next(), None);
    }

    #[test]
    fn deep_tree_walks_in_order() {
        let index: AvlIndex = (0..50_000).map(|key| Entry::new("k", key)).collect();
        assert!(index.height() < STACK_DEPTH);

        let mut cursor = Cursor::first(&index);
        assert!(!cursor.stack.spilled());
        assert!((0..50_000i64).eq(cursor.by_ref().map(Entry::key)));
        assert_eq!(cursor.next(), None);

        assert!((0..25_000i64).rev().eq(Cursor::before(&index, 25_000).map(Entry::key)));
    }

    #[test]
    fn seek_ascending_from_key() {
        let index = index_of(&[40, 20, 70, 10, 50]);
        assert_eq!(keys(Cursor::at_or_after(&index, 20)), [20, 40, 50, 70]);
        assert_eq!(keys(Cursor::at_or_after(&index, 41)), [50, 70]);
        assert_eq!(keys(Cursor::at_or_after(&index, 71)), [] as [i64; 0]);
    }

    #[test]
    fn seek_descending_below_key() {
        let index = index_of(&[40, 20, 70, 10, 50]);
        assert_eq!(keys(Cursor::before(&index, 50)), [40, 20, 10]);
        assert_eq!(keys(Cursor::before(&index, 100)), [70, 50, 40, 20, 10]);
        assert_eq!(keys(Cursor::before(&index, 10)), [] as [i64; 0]);
    }
}
