//! Depth-first traversal over parsed markup trees.

use ego_tree::NodeRef;

/// Visit `root` and its descendants in document order (pre-order, left to right).
///
/// Traversal stops as soon as `visitor` returns `false`; no other node is
/// visited afterwards. Uses an explicit stack, so tree depth is unbounded.
pub fn depth_first<'a, T: 'a>(root: NodeRef<'a, T>, mut visitor: impl FnMut(NodeRef<'a, T>) -> bool) {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if !visitor(node) {
            break;
        }

        // Reversed so the leftmost child is popped first
        stack.extend(node.children().rev());
    }
}
