/// Selects what [`RbTree::delete`](crate::RbTree::delete) does after it has
/// spliced a node out of the tree.
///
/// Insertion always rebalances. Deletion can either restore the red-black
/// invariants or leave the colors exactly as the plain BST splice left them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Run the removal fix-up whenever a BLACK node was physically removed.
    ///
    /// Every red-black invariant holds after every operation.
    #[default]
    Rebalance,
    /// Only splice the node out, without recoloring or rotating afterwards.
    ///
    /// BST order and parent/child links stay consistent, but the root may be
    /// left RED and black-heights may diverge. Traversal output matches the
    /// classic "BST delete on a red-black tree" behavior node for node.
    Splice,
}

impl DeletePolicy {
    /// Returns `true` if deletions restore the color invariants
    ///
    /// # Returns
    ///
    /// * `bool` - True for [`DeletePolicy::Rebalance`]
    #[inline]
    pub const fn rebalances(self) -> bool {
        matches!(self, Self::Rebalance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_rebalances() {
        assert_eq!(DeletePolicy::default(), DeletePolicy::Rebalance);
        assert!(DeletePolicy::default().rebalances());
        assert!(!DeletePolicy::Splice.rebalances());
    }
}
