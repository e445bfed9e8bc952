use alloc::vec::Vec;
use core::fmt::Debug;
use num_traits::PrimInt;

use crate::rb_tree::{Color, NIL, RbTree};
use crate::utils::SlotQueue;

/// The order in which [`RbTree::traverse`] visits nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree
    Preorder,
    /// Left subtree, node, right subtree; keys come out ascending
    Inorder,
    /// Left subtree, right subtree, then node
    Postorder,
    /// Breadth-first from the root, children left before right
    LevelOrder,
}

impl Order {
    /// Every traversal order, in the order a menu would list them
    pub const ALL: [Order; 4] = [
        Order::Preorder,
        Order::Postorder,
        Order::LevelOrder,
        Order::Inorder,
    ];
}

/// A copied snapshot of one node: its key and its color at the time of the
/// traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Visit<K> {
    /// The node's key
    pub key: K,
    /// The node's color
    pub color: Color,
}

/// Which side of its parent a rendered node hangs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// The root has no parent
    Root,
    /// Left child of its parent
    Left,
    /// Right child of its parent
    Right,
}

/// One line of a tree diagram.
///
/// Rows come in preorder, so a row's parent is the closest earlier row whose
/// depth is one less. Drawing connectors from `depth` and `branch` is left to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderRow<K> {
    /// The node's key
    pub key: K,
    /// The node's color
    pub color: Color,
    /// Distance from the root, which sits at depth 0
    pub depth: usize,
    /// Side of the parent this node is attached to
    pub branch: Branch,
}

impl<K: PrimInt + Debug> RbTree<K> {
    /// Walks the tree in `order` and returns a `(key, color)` snapshot of
    /// every node.
    ///
    /// The walk never mutates the tree; calling it again yields the same
    /// sequence until the next insert or delete. An empty tree yields an empty
    /// vector.
    ///
    /// # Arguments
    ///
    /// * `order` - The traversal order
    ///
    /// ```
    /// use rb_engine::{Order, RbTree};
    ///
    /// let mut tree = RbTree::new();
    /// for key in [8, 3, 10, 1, 6] {
    ///     tree.insert(key);
    /// }
    ///
    /// let keys = |order| -> Vec<i32> {
    ///     tree.traverse(order).into_iter().map(|visit| visit.key).collect()
    /// };
    /// assert_eq!(keys(Order::Inorder), [1, 3, 6, 8, 10]);
    /// assert_eq!(keys(Order::LevelOrder), [8, 3, 10, 1, 6]);
    /// ```
    pub fn traverse(&self, order: Order) -> Vec<Visit<K>> {
        let mut out = Vec::with_capacity(self.len());
        if self.root_slot() == NIL {
            return out;
        }

        match order {
            Order::Preorder => self.walk_preorder(&mut out),
            Order::Inorder => self.walk_inorder(&mut out),
            Order::Postorder => self.walk_postorder(&mut out),
            Order::LevelOrder => self.walk_level_order(&mut out),
        }
        out
    }

    /// Describes the tree's shape as preorder rows of key, color, depth and
    /// branch side.
    ///
    /// ```
    /// use rb_engine::{Branch, RbTree};
    ///
    /// let mut tree = RbTree::new();
    /// for key in [1, 2, 3] {
    ///     tree.insert(key);
    /// }
    ///
    /// let rows: Vec<_> = tree
    ///     .render()
    ///     .into_iter()
    ///     .map(|row| (row.key, row.depth, row.branch))
    ///     .collect();
    /// assert_eq!(
    ///     rows,
    ///     [(2, 0, Branch::Root), (1, 1, Branch::Left), (3, 1, Branch::Right)]
    /// );
    /// ```
    pub fn render(&self) -> Vec<RenderRow<K>> {
        let mut rows = Vec::with_capacity(self.len());
        if self.root_slot() == NIL {
            return rows;
        }

        let mut stack = vec![(self.root_slot(), 0, Branch::Root)];
        while let Some((slot, depth, branch)) = stack.pop() {
            let node = self.node_at(slot);
            rows.push(RenderRow {
                key: node.key,
                color: node.color,
                depth,
                branch,
            });

            if node.right != NIL {
                stack.push((node.right, depth + 1, Branch::Right));
            }
            if node.left != NIL {
                stack.push((node.left, depth + 1, Branch::Left));
            }
        }
        rows
    }

    fn walk_preorder(&self, out: &mut Vec<Visit<K>>) {
        let mut stack = vec![self.root_slot()];
        while let Some(slot) = stack.pop() {
            out.push(self.visit(slot));

            let node = self.node_at(slot);
            if node.right != NIL {
                stack.push(node.right);
            }
            if node.left != NIL {
                stack.push(node.left);
            }
        }
    }

    fn walk_inorder(&self, out: &mut Vec<Visit<K>>) {
        let mut stack = Vec::new();
        let mut current = self.root_slot();

        loop {
            while current != NIL {
                stack.push(current);
                current = self.node_at(current).left;
            }

            let Some(slot) = stack.pop() else {
                break;
            };
            out.push(self.visit(slot));
            current = self.node_at(slot).right;
        }
    }

    /// Node-right-left preorder, reversed.
    fn walk_postorder(&self, out: &mut Vec<Visit<K>>) {
        let start = out.len();
        let mut stack = vec![self.root_slot()];
        while let Some(slot) = stack.pop() {
            out.push(self.visit(slot));

            let node = self.node_at(slot);
            if node.left != NIL {
                stack.push(node.left);
            }
            if node.right != NIL {
                stack.push(node.right);
            }
        }
        out[start..].reverse();
    }

    fn walk_level_order(&self, out: &mut Vec<Visit<K>>) {
        let mut queue = SlotQueue::new(self.len());
        queue.push_back(self.root_slot());

        while let Some(slot) = queue.pop_front() {
            out.push(self.visit(slot));

            let node = self.node_at(slot);
            if node.left != NIL {
                queue.push_back(node.left);
            }
            if node.right != NIL {
                queue.push_back(node.right);
            }
        }
    }
}
