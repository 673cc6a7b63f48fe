//! Upward reconciliation of the `vacant`/`hidden` flags: a leaf's vacancy is
//! a direct function of its client (or lack of one), but an internal node's
//! vacancy is derived from its children and must be recomputed whenever a
//! descendant leaf's flag changes.

use crate::id::{Arena, NodeId};
use crate::node::Node;
use crate::tree::MAX_TRAVERSAL_DEPTH;

/// Walks from `start` up to the root, setting each internal ancestor's
/// `vacant` flag to the AND of its two children's, and `hidden` the same
/// way. Stops early once a node's flags are already correct, since nothing
/// above it can change either.
pub fn propagate_flags(arena: &mut Arena<Node>, start: NodeId) {
    let mut current = match arena.get(start.raw()).and_then(|n| n.parent) {
        Some(p) => p,
        None => return,
    };
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %current, "propagate_flags: depth limit reached");
            return;
        }
        let Some(node) = arena.get(current.raw()) else {
            return;
        };
        let (first, second) = (node.first_child, node.second_child);
        let vacant = first
            .and_then(|f| arena.get(f.raw()))
            .map(|n| n.flags.vacant || n.leaf_is_vacant())
            .unwrap_or(true)
            && second
                .and_then(|s| arena.get(s.raw()))
                .map(|n| n.flags.vacant || n.leaf_is_vacant())
                .unwrap_or(true);
        let hidden = first
            .and_then(|f| arena.get(f.raw()))
            .map(|n| n.flags.hidden)
            .unwrap_or(false)
            && second
                .and_then(|s| arena.get(s.raw()))
                .map(|n| n.flags.hidden)
                .unwrap_or(false);

        let changed = node.flags.vacant != vacant || node.flags.hidden != hidden;
        if let Some(node) = arena.get_mut(current.raw()) {
            node.flags.vacant = vacant;
            node.flags.hidden = hidden;
        }
        if !changed {
            return;
        }
        match arena.get(current.raw()).and_then(|n| n.parent) {
            Some(parent) => {
                current = parent;
                depth += 1;
            }
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::{Client, Node, SplitType};

    #[test]
    fn internal_node_becomes_vacant_when_both_children_are() {
        let mut arena = Arena::new();
        let rect = Rect::new(0, 0, 100, 100);
        let a = NodeId(arena.insert(Node::new_leaf(rect)));
        let b = NodeId(arena.insert(Node::new_leaf(rect)));
        let root = NodeId(arena.insert(Node::new_leaf(rect)));
        arena.get_mut(a.raw()).unwrap().parent = Some(root);
        arena.get_mut(b.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(a);
            r.second_child = Some(b);
            r.split_type = SplitType::Vertical;
        }

        propagate_flags(&mut arena, a);
        assert!(arena.get(root.raw()).unwrap().flags.vacant);

        arena.get_mut(b.raw()).unwrap().client = Some(Client::new(1, 1, rect));
        propagate_flags(&mut arena, b);
        assert!(!arena.get(root.raw()).unwrap().flags.vacant);
    }
}
