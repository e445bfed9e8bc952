use ahash::RandomState;
use alloc::vec::Vec;
use core::fmt::Debug;
use hashbrown::HashSet;
use num_traits::PrimInt;
use thiserror::Error;

use crate::rb_tree::{NIL, RbTree};

/// The first broken property found by [`RbTree::verify`] or
/// [`RbTree::verify_structure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation<K> {
    /// The root node still points at a parent
    #[error("root {key:?} has a parent link")]
    RootHasParent {
        /// Key of the root node
        key: K,
    },
    /// A child does not point back at the node that holds it
    #[error("child {child:?} of {parent:?} points at a different parent")]
    BrokenParentLink {
        /// Key of the node holding the child
        parent: K,
        /// Key of the child with the stale parent link
        child: K,
    },
    /// A key lies on the wrong side of one of its ancestors
    #[error("key {key:?} is out of order relative to ancestor {bound:?}")]
    OutOfOrder {
        /// The misplaced key
        key: K,
        /// The ancestor key it should be strictly above or below
        bound: K,
    },
    /// The same node was reached twice while walking from the root
    #[error("node {key:?} is reachable more than once")]
    NodeRevisited {
        /// Key of the node reached twice
        key: K,
    },
    /// Some live nodes cannot be reached from the root
    #[error("{reachable} nodes reachable from the root, {live} live")]
    UnreachableNodes {
        /// Nodes found by walking from the root
        reachable: usize,
        /// Nodes allocated and not released
        live: usize,
    },
    /// The root is red
    #[error("root {key:?} is red")]
    RedRoot {
        /// Key of the root node
        key: K,
    },
    /// A red node has a red child
    #[error("red node {parent:?} has red child {child:?}")]
    RedRed {
        /// Key of the red parent
        parent: K,
        /// Key of the red child
        child: K,
    },
    /// The two sides of a node reach their nil leaves through different
    /// numbers of black nodes
    #[error("black heights below {key:?} differ: left {left}, right {right}")]
    BlackHeightMismatch {
        /// Key of the node whose subtrees disagree
        key: K,
        /// Black nodes on any path down the left side, nil leaf included
        left: usize,
        /// Black nodes on any path down the right side, nil leaf included
        right: usize,
    },
}

impl<K: PrimInt + Debug> RbTree<K> {
    /// Checks the properties every operation keeps regardless of the delete
    /// policy: strict BST order, consistent parent links, and every live node
    /// reachable from the root exactly once.
    ///
    /// # Returns
    ///
    /// * `Result<(), InvariantViolation<K>>` - The first violation found
    pub fn verify_structure(&self) -> Result<(), InvariantViolation<K>> {
        let live = self.len();
        let root = self.root_slot();
        if root == NIL {
            return match live {
                0 => Ok(()),
                _ => Err(InvariantViolation::UnreachableNodes { reachable: 0, live }),
            };
        }

        let root_node = self.node_at(root);
        if root_node.parent != NIL {
            return Err(InvariantViolation::RootHasParent { key: root_node.key });
        }

        let mut visited = HashSet::with_capacity_and_hasher(live, RandomState::new());
        // (slot, exclusive lower bound, exclusive upper bound)
        let mut stack: Vec<(usize, Option<K>, Option<K>)> = vec![(root, None, None)];

        while let Some((slot, lower, upper)) = stack.pop() {
            let node = self.node_at(slot);
            if !visited.insert(slot) {
                return Err(InvariantViolation::NodeRevisited { key: node.key });
            }

            let below_lower = lower.filter(|&bound| node.key <= bound);
            let above_upper = upper.filter(|&bound| node.key >= bound);
            if let Some(bound) = below_lower.or(above_upper) {
                return Err(InvariantViolation::OutOfOrder {
                    key: node.key,
                    bound,
                });
            }

            let children = [
                (node.left, lower, Some(node.key)),
                (node.right, Some(node.key), upper),
            ];
            for (child, child_lower, child_upper) in children {
                if child == NIL {
                    continue;
                }
                let child_node = self.node_at(child);
                if child_node.parent != slot {
                    return Err(InvariantViolation::BrokenParentLink {
                        parent: node.key,
                        child: child_node.key,
                    });
                }
                stack.push((child, child_lower, child_upper));
            }
        }

        if visited.len() != live {
            return Err(InvariantViolation::UnreachableNodes {
                reachable: visited.len(),
                live,
            });
        }
        Ok(())
    }

    /// Checks the structural properties and then the red-black ones: black
    /// root, no red node with a red child, and equal black-height on both
    /// sides of every node.
    ///
    /// Always passes under [`DeletePolicy::Rebalance`](crate::DeletePolicy).
    ///
    /// ```
    /// use rb_engine::{DeletePolicy, InvariantViolation, RbTree};
    ///
    /// let mut tree = RbTree::with_delete_policy(DeletePolicy::Splice);
    /// tree.insert(10);
    /// tree.insert(20);
    /// assert_eq!(tree.verify(), Ok(()));
    ///
    /// tree.delete(10);
    /// assert_eq!(tree.verify(), Err(InvariantViolation::RedRoot { key: 20 }));
    /// ```
    pub fn verify(&self) -> Result<(), InvariantViolation<K>> {
        self.verify_structure()?;

        let root = self.root_slot();
        if root == NIL {
            return Ok(());
        }
        if self.get_color(root).is_red() {
            return Err(InvariantViolation::RedRoot {
                key: self.node_at(root).key,
            });
        }

        self.verify_black_height(root).map(|_| ())
    }

    fn verify_black_height(&self, node: usize) -> Result<usize, InvariantViolation<K>> {
        if node == NIL {
            return Ok(1);
        }

        let node_ref = self.node_at(node);

        if node_ref.color.is_red() {
            for child in [node_ref.left, node_ref.right] {
                if self.get_color(child).is_red() {
                    return Err(InvariantViolation::RedRed {
                        parent: node_ref.key,
                        child: self.node_at(child).key,
                    });
                }
            }
        }

        let left_height = self.verify_black_height(node_ref.left)?;
        let right_height = self.verify_black_height(node_ref.right)?;

        if left_height != right_height {
            return Err(InvariantViolation::BlackHeightMismatch {
                key: node_ref.key,
                left: left_height,
                right: right_height,
            });
        }

        Ok(left_height + usize::from(node_ref.color.is_black()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rb_tree::Color;
    use alloc::string::ToString;
    use pretty_assertions::assert_eq;

    fn build(keys: &[i32]) -> RbTree<i32> {
        let mut tree = RbTree::new();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    fn slot_of(tree: &RbTree<i32>, key: i32) -> usize {
        match tree.find_node(key) {
            Some(idx) => idx,
            None => panic!("key {key} not found"),
        }
    }

    fn recolor(tree: &mut RbTree<i32>, key: i32, color: Color) {
        let slot = slot_of(tree, key);
        tree.node_at_mut(slot).color = color;
    }

    fn rekey(tree: &mut RbTree<i32>, key: i32, new_key: i32) {
        let slot = slot_of(tree, key);
        tree.node_at_mut(slot).key = new_key;
    }

    #[test]
    fn test_valid_trees_pass() {
        assert_eq!(RbTree::<i32>::new().verify(), Ok(()));
        assert_eq!(build(&[1]).verify(), Ok(()));
        assert_eq!(build(&[5, 2, 8, 1, 3, 7, 9, 4, 6]).verify(), Ok(()));
    }

    #[test]
    fn test_detects_red_red() {
        let mut tree = build(&[20, 10, 30, 5]);

        recolor(&mut tree, 10, Color::Red);

        assert_eq!(tree.verify_structure(), Ok(()));
        assert_eq!(
            tree.verify(),
            Err(InvariantViolation::RedRed {
                parent: 10,
                child: 5
            })
        );
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let mut tree = build(&[20, 10, 30, 5]);

        recolor(&mut tree, 5, Color::Black);

        assert_eq!(
            tree.verify(),
            Err(InvariantViolation::BlackHeightMismatch {
                key: 10,
                left: 2,
                right: 1
            })
        );
    }

    #[test]
    fn test_detects_red_root() {
        let mut tree = build(&[20]);

        recolor(&mut tree, 20, Color::Red);

        assert_eq!(tree.verify(), Err(InvariantViolation::RedRoot { key: 20 }));
    }

    #[test]
    fn test_detects_out_of_order_key() {
        let mut tree = build(&[20, 10, 30, 5]);

        rekey(&mut tree, 5, 25);

        assert_eq!(
            tree.verify_structure(),
            Err(InvariantViolation::OutOfOrder { key: 25, bound: 10 })
        );
    }

    #[test]
    fn test_error_messages() {
        let violation = InvariantViolation::BlackHeightMismatch {
            key: 7,
            left: 3,
            right: 2,
        };
        assert_eq!(
            violation.to_string(),
            "black heights below 7 differ: left 3, right 2"
        );
        assert_eq!(
            InvariantViolation::RedRoot { key: -4 }.to_string(),
            "root -4 is red"
        );
    }
}
