use alloc::vec::Vec;
use core::fmt::Debug;
use log::{debug, trace};
use num_traits::PrimInt;

use crate::policy::DeletePolicy;
use crate::traversal::Visit;

/// Sentinel slot standing in for every nil leaf
pub(crate) const NIL: usize = usize::MAX;

/// Red-Black tree node colors used to maintain tree balance properties.
///
/// Red-Black trees maintain balance by ensuring:
/// - Red nodes have black children
/// - All paths from a node to its nil leaves have equal black node counts
///
/// Nil leaves are always black.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Red node - cannot be adjacent to other red nodes
    Red,
    /// Black node - can have children of any color, contributes to black height
    Black,
}

impl Color {
    /// Returns `true` for [`Color::Red`]
    #[inline]
    pub const fn is_red(self) -> bool {
        matches!(self, Self::Red)
    }

    /// Returns `true` for [`Color::Black`]
    #[inline]
    pub const fn is_black(self) -> bool {
        matches!(self, Self::Black)
    }
}

/// A node in the arena holding its key, color and tree relationships.
#[derive(Debug, Clone)]
pub(crate) struct Node<K> {
    /// The ordering key, overwritten in place when deletion copies a successor
    pub(crate) key: K,

    /// Index of parent node in the arena (NIL if this is root)
    pub(crate) parent: usize,

    /// Index of left child node in the arena (NIL if no left child)
    pub(crate) left: usize,

    /// Index of right child node in the arena (NIL if no right child)
    pub(crate) right: usize,

    /// Color of this node (Red or Black) used for Red-Black tree balancing
    pub(crate) color: Color,
}

/// An ordered set of integer keys stored in a red-black tree.
///
/// Nodes live in an arena and refer to each other by index, so parent links
/// are plain back references rather than owning pointers. Slots of removed
/// nodes are kept on a free list and handed out again by later insertions.
///
/// Every operation is total: inserting a present key or deleting an absent
/// one does nothing.
///
/// ```
/// use rb_engine::{Color, Order, RbTree};
///
/// let mut tree = RbTree::new();
/// for key in [10, 20, 30] {
///     tree.insert(key);
/// }
///
/// let preorder: Vec<_> = tree
///     .traverse(Order::Preorder)
///     .iter()
///     .map(|visit| (visit.key, visit.color))
///     .collect();
/// assert_eq!(
///     preorder,
///     [(20, Color::Black), (10, Color::Red), (30, Color::Red)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RbTree<K = i64> {
    /// Node storage; released slots keep stale contents until reused
    nodes: Vec<Node<K>>,

    /// Stack of released slot indices available for allocation
    free_list: Vec<usize>,

    /// Index of the root node in the arena, NIL when the tree is empty
    root: usize,

    /// What deletion does after splicing a node out
    policy: DeletePolicy,
}

impl<K: PrimInt + Debug> Default for RbTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PrimInt + Debug> RbTree<K> {
    /// Creates an empty tree that rebalances on deletion.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tree with room for `capacity` nodes before the arena
    /// reallocates.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The number of nodes to preallocate
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            root: NIL,
            policy: DeletePolicy::default(),
        }
    }

    /// Creates an empty tree whose deletions follow `policy`.
    ///
    /// # Arguments
    ///
    /// * `policy` - Whether deletion restores the color invariants
    ///
    /// ```
    /// use rb_engine::{DeletePolicy, RbTree};
    ///
    /// let tree = RbTree::<i32>::with_delete_policy(DeletePolicy::Splice);
    /// assert_eq!(tree.delete_policy(), DeletePolicy::Splice);
    /// ```
    pub fn with_delete_policy(policy: DeletePolicy) -> Self {
        debug!("creating red-black tree with {policy:?} deletion");
        Self {
            policy,
            ..Self::new()
        }
    }

    /// Returns the deletion policy chosen at construction
    #[inline]
    pub const fn delete_policy(&self) -> DeletePolicy {
        self.policy
    }

    /// Returns the number of keys in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if the tree holds no keys
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Returns `true` if `key` is stored in the tree
    pub fn contains(&self, key: K) -> bool {
        self.find_node(key).is_some()
    }

    /// Returns the smallest key, if any
    pub fn min(&self) -> Option<K> {
        if self.root == NIL {
            return None;
        }
        Some(self.node_at(self.find_minimum(self.root)).key)
    }

    /// Returns the largest key, if any
    pub fn max(&self) -> Option<K> {
        if self.root == NIL {
            return None;
        }
        Some(self.node_at(self.find_maximum(self.root)).key)
    }

    /// Returns the key and color of the root node, if any
    pub fn root(&self) -> Option<Visit<K>> {
        (self.root != NIL).then(|| self.visit(self.root))
    }

    /// Removes every key while keeping the arena's allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.root = NIL;
    }

    /// Inserts `key`, rebalancing the tree afterwards.
    ///
    /// The new node starts RED at the nil slot where the search ended. If the
    /// key is already present nothing changes.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to insert
    pub fn insert(&mut self, key: K) {
        let Some(parent_idx) = self.find_insertion_parent(key) else {
            trace!("ignoring duplicate key {key:?}");
            return;
        };

        let new_idx = self.allocate_node(key, parent_idx);
        self.link_to_parent(new_idx, parent_idx, key);
        self.fix_insertion_violations(new_idx);

        if self.policy.rebalances() {
            debug_assert!(
                self.verify().is_ok(),
                "RB tree invariants violated after insertion"
            );
        }
    }

    /// Deletes `key` if present.
    ///
    /// A node with two children takes over its in-order successor's key and
    /// the successor node is removed instead. Under
    /// [`DeletePolicy::Rebalance`] the removal fix-up runs whenever a black
    /// node left the tree.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to delete
    pub fn delete(&mut self, key: K) {
        let Some(target) = self.find_node(key) else {
            trace!("ignoring delete of missing key {key:?}");
            return;
        };

        let left = self.node_at(target).left;
        let right = self.node_at(target).right;

        let doomed = if left != NIL && right != NIL {
            let successor = self.find_minimum(right);
            let successor_key = self.node_at(successor).key;
            trace!("replacing {key:?} with successor {successor_key:?}");
            self.node_at_mut(target).key = successor_key;
            successor
        } else {
            target
        };

        let doomed_node = self.node_at(doomed);
        let child = if doomed_node.left != NIL {
            doomed_node.left
        } else {
            doomed_node.right
        };
        let parent = doomed_node.parent;
        let removed_color = doomed_node.color;

        self.transplant(doomed, child);
        self.deallocate_node(doomed);

        if self.policy.rebalances() {
            if removed_color == Color::Black {
                self.fix_removal_violations(child, parent);
            }
            debug_assert!(
                self.verify().is_ok(),
                "RB tree invariants violated after removal"
            );
        }
    }

    #[inline]
    pub(crate) const fn root_slot(&self) -> usize {
        self.root
    }

    #[inline]
    pub(crate) fn node_at(&self, idx: usize) -> &Node<K> {
        debug_assert!(idx < self.nodes.len());
        &self.nodes[idx]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, idx: usize) -> &mut Node<K> {
        debug_assert!(idx < self.nodes.len());
        &mut self.nodes[idx]
    }

    #[inline]
    pub(crate) fn visit(&self, idx: usize) -> Visit<K> {
        let node = self.node_at(idx);
        Visit {
            key: node.key,
            color: node.color,
        }
    }

    fn allocate_node(&mut self, key: K, parent: usize) -> usize {
        let node = Node {
            key,
            parent,
            left: NIL,
            right: NIL,
            color: Color::Red,
        };

        match self.free_list.pop() {
            Some(idx) => {
                self.nodes[idx] = node;
                idx
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    #[inline]
    fn deallocate_node(&mut self, node_idx: usize) {
        debug_assert!(node_idx < self.nodes.len());
        self.free_list.push(node_idx);
    }

    fn link_to_parent(&mut self, node_idx: usize, parent_idx: usize, key: K) {
        if parent_idx == NIL {
            self.root = node_idx;
        } else if key < self.node_at(parent_idx).key {
            self.node_at_mut(parent_idx).left = node_idx;
        } else {
            self.node_at_mut(parent_idx).right = node_idx;
        }
    }

    pub(crate) fn find_node(&self, key: K) -> Option<usize> {
        let mut current = self.root;

        while current != NIL {
            let node = self.node_at(current);
            match key.cmp(&node.key) {
                core::cmp::Ordering::Equal => return Some(current),
                core::cmp::Ordering::Less => current = node.left,
                core::cmp::Ordering::Greater => current = node.right,
            }
        }
        None
    }

    /// `None` when the key is already present, `Some(NIL)` for an empty tree.
    fn find_insertion_parent(&self, key: K) -> Option<usize> {
        let mut current = self.root;
        let mut parent = NIL;

        while current != NIL {
            parent = current;
            let node = self.node_at(current);
            current = match key.cmp(&node.key) {
                core::cmp::Ordering::Equal => return None,
                core::cmp::Ordering::Less => node.left,
                core::cmp::Ordering::Greater => node.right,
            };
        }
        Some(parent)
    }

    fn find_minimum(&self, mut node: usize) -> usize {
        while node != NIL {
            let left = self.node_at(node).left;
            if left == NIL {
                break;
            }
            node = left;
        }
        node
    }

    fn find_maximum(&self, mut node: usize) -> usize {
        while node != NIL {
            let right = self.node_at(node).right;
            if right == NIL {
                break;
            }
            node = right;
        }
        node
    }

    #[inline]
    pub(crate) fn get_color(&self, node_idx: usize) -> Color {
        if node_idx == NIL {
            Color::Black
        } else {
            self.node_at(node_idx).color
        }
    }

    #[inline]
    fn set_color(&mut self, node_idx: usize, color: Color) {
        if node_idx != NIL {
            self.node_at_mut(node_idx).color = color;
        }
    }

    #[inline]
    fn is_red(&self, node_idx: usize) -> bool {
        self.get_color(node_idx).is_red()
    }

    #[inline]
    fn is_black(&self, node_idx: usize) -> bool {
        self.get_color(node_idx).is_black()
    }

    fn swap_colors(&mut self, a: usize, b: usize) {
        let color_a = self.get_color(a);
        let color_b = self.get_color(b);
        self.set_color(a, color_b);
        self.set_color(b, color_a);
    }

    #[inline]
    fn get_parent(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).parent
        }
    }

    #[inline]
    fn get_left(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).left
        }
    }

    #[inline]
    fn get_right(&self, node: usize) -> usize {
        if node == NIL {
            NIL
        } else {
            self.node_at(node).right
        }
    }

    fn rotate_left(&mut self, x: usize) {
        let y = self.node_at(x).right;
        debug_assert!(y != NIL, "rotate_left requires a right child");
        trace!("rotating left at {:?}", self.node_at(x).key);

        let y_left = self.node_at(y).left;
        self.node_at_mut(x).right = y_left;
        if y_left != NIL {
            self.node_at_mut(y_left).parent = x;
        }

        let x_parent = self.node_at(x).parent;
        self.node_at_mut(y).parent = x_parent;

        if x_parent == NIL {
            self.root = y;
        } else if x == self.node_at(x_parent).left {
            self.node_at_mut(x_parent).left = y;
        } else {
            self.node_at_mut(x_parent).right = y;
        }

        self.node_at_mut(y).left = x;
        self.node_at_mut(x).parent = y;
    }

    fn rotate_right(&mut self, y: usize) {
        let x = self.node_at(y).left;
        debug_assert!(x != NIL, "rotate_right requires a left child");
        trace!("rotating right at {:?}", self.node_at(y).key);

        let x_right = self.node_at(x).right;
        self.node_at_mut(y).left = x_right;
        if x_right != NIL {
            self.node_at_mut(x_right).parent = y;
        }

        let y_parent = self.node_at(y).parent;
        self.node_at_mut(x).parent = y_parent;

        if y_parent == NIL {
            self.root = x;
        } else if y == self.node_at(y_parent).left {
            self.node_at_mut(y_parent).left = x;
        } else {
            self.node_at_mut(y_parent).right = x;
        }

        self.node_at_mut(x).right = y;
        self.node_at_mut(y).parent = x;
    }

    // The loop only runs while `node` itself is red: after a rotation `node`
    // is the black subtree top and must not be treated as a violation.
    fn fix_insertion_violations(&mut self, mut node: usize) {
        while node != self.root && self.is_red(node) && self.is_red(self.get_parent(node)) {
            let mut parent = self.get_parent(node);
            let grandparent = self.get_parent(parent);
            if grandparent == NIL {
                break;
            }

            if parent == self.get_left(grandparent) {
                let uncle = self.get_right(grandparent);

                if self.is_red(uncle) {
                    trace!("recoloring below {:?}", self.node_at(grandparent).key);
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_right(parent) {
                        self.rotate_left(parent);
                        node = parent;
                        parent = self.get_parent(node);
                    }
                    self.rotate_right(grandparent);
                    self.swap_colors(parent, grandparent);
                    node = parent;
                }
            } else {
                let uncle = self.get_left(grandparent);

                if self.is_red(uncle) {
                    trace!("recoloring below {:?}", self.node_at(grandparent).key);
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.get_left(parent) {
                        self.rotate_right(parent);
                        node = parent;
                        parent = self.get_parent(node);
                    }
                    self.rotate_left(grandparent);
                    self.swap_colors(parent, grandparent);
                    node = parent;
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    /// Replaces the subtree rooted at `old_node` with the one at `new_node`.
    fn transplant(&mut self, old_node: usize, new_node: usize) {
        let parent = self.node_at(old_node).parent;

        if parent == NIL {
            self.root = new_node;
        } else if old_node == self.node_at(parent).left {
            self.node_at_mut(parent).left = new_node;
        } else {
            self.node_at_mut(parent).right = new_node;
        }

        if new_node != NIL {
            self.node_at_mut(new_node).parent = parent;
        }
    }

    /// `fixup_node` carries an extra black; `fixup_parent` tracks its parent
    /// because a nil leaf has no parent link of its own.
    fn fix_removal_violations(&mut self, mut fixup_node: usize, mut fixup_parent: usize) {
        while fixup_node != self.root && self.is_black(fixup_node) {
            if fixup_parent == NIL {
                break;
            }

            if fixup_node == self.get_left(fixup_parent) {
                let mut sibling = self.get_right(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_left(fixup_parent);
                    sibling = self.get_right(fixup_parent);
                }

                if self.is_black(self.get_left(sibling)) && self.is_black(self.get_right(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_right(sibling)) {
                        self.set_color(self.get_left(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.get_right(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_right(sibling), Color::Black);
                    self.rotate_left(fixup_parent);
                    fixup_node = self.root;
                    fixup_parent = NIL;
                }
            } else {
                let mut sibling = self.get_left(fixup_parent);

                if self.is_red(sibling) {
                    self.set_color(sibling, Color::Black);
                    self.set_color(fixup_parent, Color::Red);
                    self.rotate_right(fixup_parent);
                    sibling = self.get_left(fixup_parent);
                }

                if self.is_black(self.get_right(sibling)) && self.is_black(self.get_left(sibling)) {
                    self.set_color(sibling, Color::Red);
                    fixup_node = fixup_parent;
                    fixup_parent = self.get_parent(fixup_node);
                } else {
                    if self.is_black(self.get_left(sibling)) {
                        self.set_color(self.get_right(sibling), Color::Black);
                        self.set_color(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.get_left(fixup_parent);
                    }

                    self.set_color(sibling, self.get_color(fixup_parent));
                    self.set_color(fixup_parent, Color::Black);
                    self.set_color(self.get_left(sibling), Color::Black);
                    self.rotate_right(fixup_parent);
                    fixup_node = self.root;
                    fixup_parent = NIL;
                }
            }
        }

        self.set_color(fixup_node, Color::Black);
    }
}
