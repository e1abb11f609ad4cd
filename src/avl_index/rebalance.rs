use tracing::trace;

use super::AvlIndex;
use crate::raw::Handle;

impl AvlIndex {
    #[inline]
    pub(super) fn height_of(&self, slot: Option<Handle>) -> u8 {
        slot.map_or(0, |handle| self.nodes.get(handle).height)
    }

    /// Left height minus right height.
    pub(super) fn balance_of(&self, handle: Handle) -> i32 {
        let node = self.nodes.get(handle);
        i32::from(self.height_of(node.left)) - i32::from(self.height_of(node.right))
    }

    fn update_height(&mut self, handle: Handle) {
        let node = self.nodes.get(handle);
        let height = 1 + self.height_of(node.left).max(self.height_of(node.right));
        self.nodes.get_mut(handle).height = height;
    }

    //       y            x
    //      / \          / \
    //     x   c  ==>   a   y
    //    / \              / \
    //   a   b            b   c
    fn rotate_right(&mut self, y: Handle) -> Handle {
        let Some(x) = self.nodes.get(y).left else {
            return y;
        };
        let b = self.nodes.get(x).right;

        self.nodes.get_mut(y).left = b;
        self.nodes.get_mut(x).right = Some(y);

        self.update_height(y);
        self.update_height(x);

        trace!(pivot = self.nodes.get(y).key(), root = self.nodes.get(x).key(), "rotated right");
        x
    }

    //     x                y
    //    / \              / \
    //   a   y     ==>    x   c
    //      / \          / \
    //     b   c        a   b
    fn rotate_left(&mut self, x: Handle) -> Handle {
        let Some(y) = self.nodes.get(x).right else {
            return x;
        };
        let b = self.nodes.get(y).left;

        self.nodes.get_mut(x).right = b;
        self.nodes.get_mut(y).left = Some(x);

        self.update_height(x);
        self.update_height(y);

        trace!(pivot = self.nodes.get(x).key(), root = self.nodes.get(y).key(), "rotated left");
        y
    }

    /// Restores balance at `handle` after `key` was inserted somewhere below
    /// it, returning the subtree's new root.
    ///
    /// The side the new key went down picks the case: outside (left-left,
    /// right-right) takes one rotation, inside (left-right, right-left) two.
    pub(super) fn rebalance_after_insert(&mut self, handle: Handle, key: i64) -> Handle {
        self.update_height(handle);
        let balance = self.balance_of(handle);

        if balance > 1 {
            let Some(left) = self.nodes.get(handle).left else {
                return handle;
            };
            if key > self.nodes.get(left).key() {
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).left = Some(left);
            }
            return self.rotate_right(handle);
        }

        if balance < -1 {
            let Some(right) = self.nodes.get(handle).right else {
                return handle;
            };
            if key < self.nodes.get(right).key() {
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).right = Some(right);
            }
            return self.rotate_left(handle);
        }

        handle
    }

    /// Restores balance at `handle` after a removal somewhere below it,
    /// returning the subtree's new root.
    ///
    /// The removed key is gone, so the case is read off the heavier child's
    /// own balance instead.
    pub(super) fn rebalance_after_remove(&mut self, handle: Handle) -> Handle {
        self.update_height(handle);
        let balance = self.balance_of(handle);

        if balance > 1 {
            let Some(left) = self.nodes.get(handle).left else {
                return handle;
            };
            if self.balance_of(left) < 0 {
                let left = self.rotate_left(left);
                self.nodes.get_mut(handle).left = Some(left);
            }
            return self.rotate_right(handle);
        }

        if balance < -1 {
            let Some(right) = self.nodes.get(handle).right else {
                return handle;
            };
            if self.balance_of(right) > 0 {
                let right = self.rotate_right(right);
                self.nodes.get_mut(handle).right = Some(right);
            }
            return self.rotate_left(handle);
        }

        handle
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use crate::{AvlIndex, Entry};

    fn index_of(keys: &[i64]) -> AvlIndex {
        keys.iter().map(|&key| Entry::new("k", key)).collect()
    }

    #[test]
    fn rotation_keeps_cached_heights_exact() {
        let index = index_of(&[1, 2, 3, 4, 5, 6]);
        let root = index.root().unwrap();
        assert_eq!(index.node(root).key(), 4);
        assert_eq!(index.node(root).height, 3);
        assert_eq!(index.balance_of(root), 0);
        index.check_invariants().unwrap();
    }

    #[test]
    fn removal_with_balanced_heavy_child_takes_single_rotation() {
        // After removing 10, the right child 30 has balance 0.
        let mut index = index_of(&[20, 10, 30, 25, 35]);
        let _ = index.remove("k", 10);
        let root = index.root().unwrap();
        assert_eq!(index.node(root).key(), 30);
        assert_eq!(index.balance_of(root), 1);
        index.check_invariants().unwrap();
    }

    #[test]
    fn removal_with_left_heavy_left_child_takes_single_rotation() {
        let mut index = index_of(&[30, 20, 40, 10]);
        let _ = index.remove("k", 40);
        assert_eq!(index.node(index.root().unwrap()).key(), 20);
        index.check_invariants().unwrap();
    }

    #[test]
    fn removal_with_right_heavy_left_child_takes_double_rotation() {
        let mut index = index_of(&[30, 10, 40, 20]);
        let _ = index.remove("k", 40);
        assert_eq!(index.node(index.root().unwrap()).key(), 20);
        index.check_invariants().unwrap();
    }
}
