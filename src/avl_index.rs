use core::cmp::Ordering;
use core::fmt;
use core::mem;

use tracing::debug;

use crate::config::{IndexConfig, OnDuplicate};
use crate::raw::{Arena, AvlNode, Handle};
use crate::Entry;

mod invariants;
mod iter;
mod rebalance;

pub(crate) use iter::Cursor;
pub use iter::Iter;

/// What happened to an entry handed to [`AvlIndex::insert`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum InsertOutcome {
    /// The key was new; a node now holds the entry.
    Inserted,
    /// The key was taken and the index kept its entry. The rejected entry is
    /// returned.
    Rejected(Entry),
    /// The key was taken and the new entry took its place (only under
    /// [`OnDuplicate::Replace`]). The displaced entry is returned.
    Replaced(Entry),
}

impl InsertOutcome {
    /// Returns true if a new node was created.
    #[must_use]
    pub const fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

/// The result of [`AvlIndex::search`]: the entry, if any, and how many node
/// slots the lookup probed to get there.
///
/// A probe of an empty child slot counts, so a miss costs one more than the
/// depth of the path it followed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchOutcome<'a> {
    /// The stored entry whose label and key both matched, if any.
    pub entry: Option<&'a Entry>,
    /// Node slots probed, counting the empty slot a miss ends on.
    pub comparisons: usize,
}

impl SearchOutcome<'_> {
    /// Returns true if the lookup matched an entry.
    #[must_use]
    pub const fn found(&self) -> bool {
        self.entry.is_some()
    }
}

/// A height-balanced (AVL) binary search tree of [`Entry`] values ordered by
/// key.
///
/// After every insert or removal each node's subtrees differ in height by at
/// most one, which keeps lookups, inserts and removals at O(log n). Nodes live
/// in an arena and refer to their children by handle; nothing points back up
/// the tree.
///
/// # Examples
///
/// ```
/// use avl_store::{AvlIndex, Entry};
///
/// let mut index = AvlIndex::new();
/// for key in 1..=7 {
///     let _ = index.insert(Entry::new("vol", key));
/// }
///
/// // Ascending inserts would make a plain BST a linked list; here the tree
/// // stays perfectly balanced.
/// assert_eq!(index.height(), 3);
///
/// let hit = index.search("vol", 4);
/// assert_eq!(hit.entry.map(Entry::key), Some(4));
/// assert_eq!(hit.comparisons, 1);
/// ```
#[derive(Clone)]
pub struct AvlIndex {
    nodes: Arena<AvlNode>,
    root: Option<Handle>,
    len: usize,
    on_duplicate: OnDuplicate,
}

impl AvlIndex {
    /// Creates an empty index with the default config.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            on_duplicate: OnDuplicate::KeepFirst,
        }
    }

    /// Creates an empty index with room for at least `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(IndexConfig::with_capacity(capacity))
    }

    /// Creates an empty index from a config.
    #[must_use]
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            nodes: Arena::with_capacity(config.capacity),
            root: None,
            len: 0,
            on_duplicate: config.on_duplicate,
        }
    }

    /// Returns the number of entries the index can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Returns the duplicate-key policy in effect.
    #[must_use]
    pub const fn on_duplicate(&self) -> OnDuplicate {
        self.on_duplicate
    }

    /// Returns the number of live entries. O(1).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the height of the tree from the root's cached height. An empty
    /// index has height 0, a single entry height 1.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.height_of(self.root))
    }

    /// Inserts an entry, placing it by key.
    ///
    /// A key that is already present leaves the tree's shape untouched; what
    /// happens to the entries depends on [`OnDuplicate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_store::{AvlIndex, Entry, InsertOutcome};
    ///
    /// let mut index = AvlIndex::new();
    /// assert_eq!(index.insert(Entry::new("Emma", 1)), InsertOutcome::Inserted);
    /// assert_eq!(
    ///     index.insert(Entry::new("Persuasion", 1)),
    ///     InsertOutcome::Rejected(Entry::new("Persuasion", 1)),
    /// );
    /// assert_eq!(index.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn insert(&mut self, entry: Entry) -> InsertOutcome {
        let (root, outcome) = self.insert_at(self.root, entry);
        self.root = Some(root);
        outcome
    }

    fn insert_at(&mut self, slot: Option<Handle>, entry: Entry) -> (Handle, InsertOutcome) {
        let Some(handle) = slot else {
            self.len += 1;
            return (self.nodes.alloc(AvlNode::leaf(entry)), InsertOutcome::Inserted);
        };

        let key = entry.key();
        let (node_key, left, right) = {
            let node = self.nodes.get(handle);
            (node.key(), node.left, node.right)
        };

        let outcome = match key.cmp(&node_key) {
            Ordering::Less => {
                let (child, outcome) = self.insert_at(left, entry);
                self.nodes.get_mut(handle).left = Some(child);
                outcome
            }
            Ordering::Greater => {
                let (child, outcome) = self.insert_at(right, entry);
                self.nodes.get_mut(handle).right = Some(child);
                outcome
            }
            Ordering::Equal => match self.on_duplicate {
                OnDuplicate::KeepFirst => {
                    debug!(key, "duplicate key rejected");
                    InsertOutcome::Rejected(entry)
                }
                OnDuplicate::Replace => {
                    debug!(key, "duplicate key replaced");
                    InsertOutcome::Replaced(mem::replace(&mut self.nodes.get_mut(handle).entry, entry))
                }
            },
        };

        if !outcome.is_inserted() {
            return (handle, outcome);
        }
        (self.rebalance_after_insert(handle, key), outcome)
    }

    /// Removes the entry with this key, provided its label also matches, and
    /// returns it.
    ///
    /// An absent key, or a key held under a different label, leaves the index
    /// unchanged and returns `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_store::{AvlIndex, Entry};
    ///
    /// let mut index: AvlIndex = [("1984", 40), ("Emma", 20)].into_iter().map(Entry::from).collect();
    /// assert_eq!(index.remove("Animal Farm", 40), None);
    /// assert_eq!(index.remove("1984", 40), Some(Entry::new("1984", 40)));
    /// assert_eq!(index.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn remove(&mut self, label: &str, key: i64) -> Option<Entry> {
        let (root, removed) = self.remove_at(self.root, label, key);
        self.root = root;
        removed
    }

    fn remove_at(&mut self, slot: Option<Handle>, label: &str, key: i64) -> (Option<Handle>, Option<Entry>) {
        let Some(handle) = slot else {
            return (None, None);
        };

        let (node_key, left, right) = {
            let node = self.nodes.get(handle);
            (node.key(), node.left, node.right)
        };

        let removed = match key.cmp(&node_key) {
            Ordering::Less => {
                let (child, removed) = self.remove_at(left, label, key);
                self.nodes.get_mut(handle).left = child;
                removed
            }
            Ordering::Greater => {
                let (child, removed) = self.remove_at(right, label, key);
                self.nodes.get_mut(handle).right = child;
                removed
            }
            Ordering::Equal => {
                if self.nodes.get(handle).entry.label() != label {
                    debug!(key, label, "key held under another label, nothing removed");
                    return (Some(handle), None);
                }
                self.len -= 1;
                match (left, right) {
                    (None, None) => return (None, Some(self.nodes.take(handle).entry)),
                    (Some(child), None) | (None, Some(child)) => {
                        let orphan = self.nodes.take(child);
                        Some(mem::replace(self.nodes.get_mut(handle), orphan).entry)
                    }
                    (Some(_), Some(right)) => {
                        let (child, successor) = self.remove_min(right);
                        let node = self.nodes.get_mut(handle);
                        node.right = child;
                        Some(mem::replace(&mut node.entry, successor))
                    }
                }
            }
        };

        if removed.is_none() {
            return (Some(handle), None);
        }
        (Some(self.rebalance_after_remove(handle)), removed)
    }

    /// Detaches the leftmost node of a subtree, rebalancing on the way back
    /// up, and returns the new subtree root with the detached entry.
    fn remove_min(&mut self, handle: Handle) -> (Option<Handle>, Entry) {
        let (left, right) = {
            let node = self.nodes.get(handle);
            (node.left, node.right)
        };

        match left {
            None => (right, self.nodes.take(handle).entry),
            Some(left) => {
                let (child, min) = self.remove_min(left);
                self.nodes.get_mut(handle).left = child;
                (Some(self.rebalance_after_remove(handle)), min)
            }
        }
    }

    /// Looks up the entry with this label and key.
    ///
    /// The descent compares keys only; the label is checked once at the
    /// key-equal node. Every node visited, and the empty slot a miss ends on,
    /// adds one to [`SearchOutcome::comparisons`]. A label mismatch ends the
    /// search at the key-equal node; nothing below it is probed.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_store::{AvlIndex, Entry};
    ///
    /// let index: AvlIndex = [("b", 2), ("a", 1), ("c", 3)].into_iter().map(Entry::from).collect();
    ///
    /// let hit = index.search("c", 3);
    /// assert!(hit.found());
    /// assert_eq!(hit.comparisons, 2);
    ///
    /// let miss = index.search("d", 4);
    /// assert_eq!(miss.entry, None);
    /// assert_eq!(miss.comparisons, 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn search(&self, label: &str, key: i64) -> SearchOutcome<'_> {
        let mut comparisons = 0;
        let mut slot = self.root;

        loop {
            comparisons += 1;
            let Some(handle) = slot else {
                return SearchOutcome {
                    entry: None,
                    comparisons,
                };
            };

            let node = self.nodes.get(handle);
            match key.cmp(&node.key()) {
                Ordering::Less => slot = node.left,
                Ordering::Greater => slot = node.right,
                Ordering::Equal => {
                    let entry = Some(&node.entry).filter(|entry| entry.label() == label);
                    return SearchOutcome { entry, comparisons };
                }
            }
        }
    }

    /// Returns the entry stored under `key`, whatever its label.
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn get(&self, key: i64) -> Option<&Entry> {
        let mut slot = self.root;
        while let Some(handle) = slot {
            let node = self.nodes.get(handle);
            match key.cmp(&node.key()) {
                Ordering::Less => slot = node.left,
                Ordering::Greater => slot = node.right,
                Ordering::Equal => return Some(&node.entry),
            }
        }
        None
    }

    /// Returns true if an entry is stored under `key`.
    #[must_use]
    pub fn contains_key(&self, key: i64) -> bool {
        self.get(key).is_some()
    }

    /// Gets an iterator over the entries in ascending key order.
    ///
    /// # Complexity
    ///
    /// O(log n) to create the iterator; amortized O(1) per step.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    pub(crate) fn node(&self, handle: Handle) -> &AvlNode {
        self.nodes.get(handle)
    }

    /// Unhooks the whole tree from the index, leaving it rooted nowhere. The
    /// nodes stay allocated until each is [`release`](Self::release)d.
    pub(crate) fn detach_root(&mut self) -> Option<Handle> {
        self.root.take()
    }

    /// Frees one detached node and returns its entry. Child slots are not
    /// followed; the caller releases those first.
    pub(crate) fn release(&mut self, handle: Handle) -> Entry {
        self.len -= 1;
        self.nodes.take(handle).entry
    }
}

impl fmt::Debug for AvlIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl Default for AvlIndex {
    fn default() -> Self {
        AvlIndex::new()
    }
}

impl FromIterator<Entry> for AvlIndex {
    fn from_iter<T: IntoIterator<Item = Entry>>(iter: T) -> Self {
        let mut index = AvlIndex::new();
        index.extend(iter);
        index
    }
}

impl Extend<Entry> for AvlIndex {
    fn extend<T: IntoIterator<Item = Entry>>(&mut self, iter: T) {
        for entry in iter {
            let _ = self.insert(entry);
        }
    }
}

impl<'a> IntoIterator for &'a AvlIndex {
    type Item = &'a Entry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
