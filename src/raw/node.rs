use super::handle::Handle;
use crate::Entry;

/// A single tree node: one entry, two child slots, and the cached height of
/// the subtree rooted here.
#[derive(Clone, Debug)]
pub(crate) struct AvlNode {
    pub(crate) entry: Entry,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    // Leaf = 1. An absent child counts as 0.
    pub(crate) height: u8,
}

impl AvlNode {
    /// Creates a detached leaf.
    pub(crate) const fn leaf(entry: Entry) -> Self {
        Self {
            entry,
            left: None,
            right: None,
            height: 1,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> i64 {
        self.entry.key()
    }

    /// Returns the left child when `left` is true, the right child otherwise.
    #[inline]
    pub(crate) const fn child(&self, left: bool) -> Option<Handle> {
        if left { self.left } else { self.right }
    }
}
