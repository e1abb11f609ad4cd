//! Invariant-violation reports.

use thiserror::Error;

/// Result type alias using [`IndexError`].
pub type Result<T> = core::result::Result<T, IndexError>;

/// A broken structural invariant, found by
/// [`AvlIndex::check_invariants`](crate::AvlIndex::check_invariants).
///
/// None of these can arise through the public API; seeing one means the tree
/// logic itself is wrong.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum IndexError {
    #[error("key {key} is out of order: must lie strictly inside ({lower:?}, {upper:?})")]
    Unordered {
        /// Key of the misplaced node.
        key: i64,
        /// Exclusive lower bound set by the node's ancestors, if any.
        lower: Option<i64>,
        /// Exclusive upper bound set by the node's ancestors, if any.
        upper: Option<i64>,
    },

    #[error("node with key {key} is unbalanced: balance factor {balance}")]
    Unbalanced {
        /// Key of the unbalanced node.
        key: i64,
        /// Left subtree height minus right subtree height.
        balance: i32,
    },

    #[error("node with key {key} caches height {cached}, actual height is {actual}")]
    StaleHeight {
        /// Key of the node with the stale height.
        key: i64,
        /// Height stored in the node.
        cached: u8,
        /// Height computed from its subtrees.
        actual: u8,
    },

    #[error("index records {recorded} entries but {reachable} are reachable from the root")]
    CountMismatch {
        /// Live count kept by the index.
        recorded: usize,
        /// Nodes found by walking from the root.
        reachable: usize,
    },
}
