use super::AvlIndex;
use crate::error::{IndexError, Result};
use crate::raw::Handle;

impl AvlIndex {
    /// Walks the whole tree and reports the first broken structural
    /// invariant: key ordering, a balance factor outside `-1..=1`, a cached
    /// height that disagrees with the real one, or a live count that disagrees
    /// with the nodes reachable from the root.
    ///
    /// # Errors
    ///
    /// Returns the violation found. A tree built through the public API never
    /// fails this check.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn check_invariants(&self) -> Result<()> {
        let (_, reachable) = self.check_subtree(self.root, None, None)?;
        if reachable != self.len || self.nodes.len() != self.len {
            return Err(IndexError::CountMismatch {
                recorded: self.len,
                reachable,
            });
        }
        Ok(())
    }

    /// Returns the verified height and node count of a subtree whose keys must
    /// lie strictly between `lower` and `upper`.
    fn check_subtree(&self, slot: Option<Handle>, lower: Option<i64>, upper: Option<i64>) -> Result<(u8, usize)> {
        let Some(handle) = slot else {
            return Ok((0, 0));
        };
        let node = self.nodes.get(handle);
        let key = node.key();

        if lower.is_some_and(|lower| key <= lower) || upper.is_some_and(|upper| key >= upper) {
            return Err(IndexError::Unordered { key, lower, upper });
        }

        let (left_height, left_count) = self.check_subtree(node.left, lower, Some(key))?;
        let (right_height, right_count) = self.check_subtree(node.right, Some(key), upper)?;

        let actual = 1 + left_height.max(right_height);
        if node.height != actual {
            return Err(IndexError::StaleHeight {
                key,
                cached: node.height,
                actual,
            });
        }

        let balance = i32::from(left_height) - i32::from(right_height);
        if balance.abs() > 1 {
            return Err(IndexError::Unbalanced { key, balance });
        }

        Ok((actual, left_count + right_count + 1))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::raw::AvlNode;
    use crate::{AvlIndex, Entry, IndexError};

    fn index_of(keys: &[i64]) -> AvlIndex {
        keys.iter().map(|&key| Entry::new("k", key)).collect()
    }

    #[test]
    fn empty_index_is_valid() {
        assert_eq!(AvlIndex::new().check_invariants(), Ok(()));
    }

    #[test]
    fn detects_out_of_order_key() {
        let mut index = index_of(&[2, 1, 3]);
        let left = index.node(index.root().unwrap()).left.unwrap();
        index.nodes.get_mut(left).entry = Entry::new("k", 5);
        assert_eq!(
            index.check_invariants(),
            Err(IndexError::Unordered {
                key: 5,
                lower: None,
                upper: Some(2),
            })
        );
    }

    #[test]
    fn detects_stale_height() {
        let mut index = index_of(&[2, 1, 3]);
        let root = index.root().unwrap();
        index.nodes.get_mut(root).height = 7;
        assert_eq!(
            index.check_invariants(),
            Err(IndexError::StaleHeight {
                key: 2,
                cached: 7,
                actual: 2,
            })
        );
    }

    #[test]
    fn detects_imbalance() {
        // Hand-build a right-leaning chain 1 -> 2 -> 3 with correct heights.
        let mut index = AvlIndex::new();
        let three = index.nodes.alloc(AvlNode::leaf(Entry::new("k", 3)));
        let mut two = AvlNode::leaf(Entry::new("k", 2));
        two.right = Some(three);
        two.height = 2;
        let two = index.nodes.alloc(two);
        let mut one = AvlNode::leaf(Entry::new("k", 1));
        one.right = Some(two);
        one.height = 3;
        index.root = Some(index.nodes.alloc(one));
        index.len = 3;

        assert_eq!(index.check_invariants(), Err(IndexError::Unbalanced { key: 1, balance: -2 }));
    }

    #[test]
    fn detects_count_drift() {
        let mut index = index_of(&[2, 1, 3]);
        index.len = 4;
        assert_eq!(
            index.check_invariants(),
            Err(IndexError::CountMismatch {
                recorded: 4,
                reachable: 3,
            })
        );
    }
}
