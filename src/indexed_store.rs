use alloc::vec::Vec;
use core::fmt;

use tracing::debug;

use crate::avl_index::{AvlIndex, Cursor, InsertOutcome, SearchOutcome};
use crate::config::IndexConfig;
use crate::raw::Handle;
use crate::Entry;

/// A record store over an [`AvlIndex`].
///
/// Point operations go straight to the index. Scans (range queries,
/// traversal, nearest-key lookup, clearing and the height check) walk the
/// index's nodes directly.
///
/// # Examples
///
/// ```
/// use avl_store::{Entry, IndexedStore};
///
/// let mut store = IndexedStore::new();
/// let _ = store.insert(Entry::new("1984", 40));
/// let _ = store.insert(Entry::new("Pride and Prejudice", 20));
/// let _ = store.insert(Entry::new("War and Peace", 70));
///
/// let keys: Vec<i64> = store.range_query(20, 40).into_iter().map(Entry::key).collect();
/// assert_eq!(keys, [20, 40]);
///
/// store.delete_record("1984", 40);
/// assert_eq!(store.count_records(), 2);
/// ```
#[derive(Clone, Default)]
pub struct IndexedStore {
    index: AvlIndex,
}

impl IndexedStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { index: AvlIndex::new() }
    }

    /// Creates an empty store from a config.
    #[must_use]
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            index: AvlIndex::with_config(config),
        }
    }

    /// Returns the underlying index.
    #[must_use]
    pub const fn index(&self) -> &AvlIndex {
        &self.index
    }

    /// Inserts a record. See [`AvlIndex::insert`].
    pub fn insert(&mut self, entry: Entry) -> InsertOutcome {
        self.index.insert(entry)
    }

    /// Looks up a record. See [`AvlIndex::search`].
    #[must_use]
    pub fn search(&self, label: &str, key: i64) -> SearchOutcome<'_> {
        self.index.search(label, key)
    }

    /// Deletes the record with this label and key, if present. See
    /// [`AvlIndex::remove`].
    pub fn delete_record(&mut self, label: &str, key: i64) -> Option<Entry> {
        self.index.remove(label, key)
    }

    /// Returns the number of records. O(1).
    #[must_use]
    pub const fn count_records(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns every record with `start <= key <= end`, in ascending key
    /// order. An inverted window yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_store::{Entry, IndexedStore};
    ///
    /// let store: IndexedStore = (1..=9).map(|key| Entry::new("vol", key)).collect();
    /// assert_eq!(store.range_query(3, 5).len(), 3);
    /// assert!(store.range_query(5, 3).is_empty());
    /// assert!(store.range_query(10, 20).is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k) for k results.
    #[must_use]
    pub fn range_query(&self, start: i64, end: i64) -> Vec<&Entry> {
        let mut found = Vec::new();
        self.collect_range(self.index.root(), start, end, &mut found);
        found
    }

    fn collect_range<'a>(&'a self, slot: Option<Handle>, start: i64, end: i64, found: &mut Vec<&'a Entry>) {
        let Some(handle) = slot else {
            return;
        };
        let node = self.index.node(handle);
        let key = node.key();

        if start <= key {
            self.collect_range(node.left, start, end, found);
        }
        if start <= key && key <= end {
            found.push(&node.entry);
        }
        if key <= end {
            self.collect_range(node.right, start, end, found);
        }
    }

    /// Returns every record in ascending key order.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn inorder_traversal(&self) -> Vec<&Entry> {
        self.index.iter().collect()
    }

    /// Returns up to `k` records whose keys lie closest to `key`, nearest
    /// first. Of two keys equally far away the smaller comes first.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_store::{Entry, IndexedStore};
    ///
    /// let store: IndexedStore = [10, 20, 30, 40].into_iter().map(|key| Entry::new("k", key)).collect();
    /// let keys: Vec<i64> = store.find_k_nearest_keys(26, 3).into_iter().map(Entry::key).collect();
    /// assert_eq!(keys, [30, 20, 40]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n + k)
    #[must_use]
    pub fn find_k_nearest_keys(&self, key: i64, k: usize) -> Vec<&Entry> {
        let mut below = Cursor::before(&self.index, key).peekable();
        let mut above = Cursor::at_or_after(&self.index, key).peekable();
        let mut nearest = Vec::with_capacity(k.min(self.index.len()));

        while nearest.len() < k {
            let take_below = match (below.peek(), above.peek()) {
                (Some(lower), Some(upper)) => key.abs_diff(lower.key()) <= key.abs_diff(upper.key()),
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            nearest.extend(if take_below { below.next() } else { above.next() });
        }
        nearest
    }

    /// Releases every record, children before parents, and leaves the store
    /// empty. Returns how many records were released.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn clear_database(&mut self) -> usize {
        let root = self.index.detach_root();
        let released = self.release_subtree(root);
        debug!(released, "cleared store");
        released
    }

    fn release_subtree(&mut self, slot: Option<Handle>) -> usize {
        let Some(handle) = slot else {
            return 0;
        };
        let (left, right) = {
            let node = self.index.node(handle);
            (node.left, node.right)
        };

        let released = self.release_subtree(left) + self.release_subtree(right);
        drop(self.index.release(handle));
        released + 1
    }

    /// Computes the tree height by walking every node, ignoring the heights
    /// cached in the nodes. An empty store has height 0.
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn tree_height(&self) -> usize {
        self.subtree_height(self.index.root())
    }

    fn subtree_height(&self, slot: Option<Handle>) -> usize {
        slot.map_or(0, |handle| {
            let node = self.index.node(handle);
            1 + self.subtree_height(node.left).max(self.subtree_height(node.right))
        })
    }

    /// Runs a search and returns only the number of node slots it probed.
    /// Every call runs the search again.
    #[must_use]
    pub fn search_comparisons(&self, label: &str, key: i64) -> usize {
        self.search(label, key).comparisons
    }
}

impl fmt::Debug for IndexedStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexedStore").field("records", &self.index).finish()
    }
}

impl FromIterator<Entry> for IndexedStore {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        Self {
            index: iter.into_iter().collect(),
        }
    }
}

impl Extend<Entry> for IndexedStore {
    fn extend<T: IntoIterator<Item = Entry>>(&mut self, iter: T) {
        self.index.extend(iter);
    }
}

impl From<AvlIndex> for IndexedStore {
    fn from(index: AvlIndex) -> Self {
        Self { index }
    }
}
