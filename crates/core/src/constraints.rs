//! Minimum-size constraint propagation: every internal node's min extent is
//! the combination of its children's, split-axis aware, so `layout::arrange`
//! can refuse a ratio that would squeeze a descendant leaf under
//! `node::{MIN_WIDTH, MIN_HEIGHT}`.
//!
//! Grounded in the teacher's `window_manager::tree::TreeNode::rebalance`
//! (bottom-up recomputation after a structural change), generalized from a
//! ratio nudge to a full min-size aggregate.

use crate::id::{Arena, NodeId};
use crate::node::{Node, MIN_HEIGHT, MIN_WIDTH};
use crate::tree::MAX_TRAVERSAL_DEPTH;

/// Recomputes `min_width`/`min_height` for every node under `start`,
/// bottom-up: a leaf's minimum is the constant floor; an internal node's is
/// its children's combined along the split axis, untouched across the other.
pub fn rebuild_from_leaves(arena: &mut Arena<Node>, start: NodeId) {
    rebuild_inner(arena, start, 0);
}

fn rebuild_inner(arena: &mut Arena<Node>, id: NodeId, depth: usize) -> (u16, u16) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "rebuild_from_leaves: depth limit reached");
        return (MIN_WIDTH, MIN_HEIGHT);
    }
    let (first, second, is_leaf, split_is_vertical) = match arena.get(id.raw()) {
        Some(n) if n.is_internal() => (
            n.first_child,
            n.second_child,
            false,
            n.split_type == crate::node::SplitType::Vertical,
        ),
        Some(_) => (None, None, true, false),
        None => return (MIN_WIDTH, MIN_HEIGHT),
    };

    if is_leaf {
        if let Some(node) = arena.get_mut(id.raw()) {
            node.min_width = MIN_WIDTH;
            node.min_height = MIN_HEIGHT;
        }
        return (MIN_WIDTH, MIN_HEIGHT);
    }

    let (fw, fh) = first
        .map(|f| rebuild_inner(arena, f, depth + 1))
        .unwrap_or((MIN_WIDTH, MIN_HEIGHT));
    let (sw, sh) = second
        .map(|s| rebuild_inner(arena, s, depth + 1))
        .unwrap_or((MIN_WIDTH, MIN_HEIGHT));

    let (min_width, min_height) = if split_is_vertical {
        (fw.saturating_add(sw), fh.max(sh))
    } else {
        (fw.max(sw), fh.saturating_add(sh))
    };

    if let Some(node) = arena.get_mut(id.raw()) {
        node.min_width = min_width;
        node.min_height = min_height;
    }
    (min_width, min_height)
}

/// Walks from `start` up to the root, recomputing each ancestor's aggregate
/// from its (already up to date) two children. Cheaper than
/// `rebuild_from_leaves` when only one leaf's subtree changed.
pub fn rebuild_towards_root(arena: &mut Arena<Node>, start: NodeId) {
    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "rebuild_towards_root: depth limit reached");
            return;
        }
        let Some(node) = arena.get(current.raw()) else {
            return;
        };
        if node.is_internal() {
            let (first, second, split_is_vertical) =
                (node.first_child, node.second_child, node.split_type == crate::node::SplitType::Vertical);
            let (fw, fh) = first
                .and_then(|f| arena.get(f.raw()))
                .map(|n| (n.min_width, n.min_height))
                .unwrap_or((MIN_WIDTH, MIN_HEIGHT));
            let (sw, sh) = second
                .and_then(|s| arena.get(s.raw()))
                .map(|n| (n.min_width, n.min_height))
                .unwrap_or((MIN_WIDTH, MIN_HEIGHT));
            let (min_width, min_height) = if split_is_vertical {
                (fw.saturating_add(sw), fh.max(sh))
            } else {
                (fw.max(sw), fh.saturating_add(sh))
            };
            if let Some(node) = arena.get_mut(current.raw()) {
                node.min_width = min_width;
                node.min_height = min_height;
            }
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

/// Whether `ratio` can be applied to a node of `split_is_vertical` axis with
/// the given children minimums, without squeezing either side below its
/// floor, given the parent's total extent along that axis.
pub fn ratio_respects_minimums(
    total_extent: u16,
    ratio: f64,
    split_is_vertical: bool,
    first_min: u16,
    second_min: u16,
) -> bool {
    let _ = split_is_vertical;
    let ratio = ratio.clamp(0.0, 1.0);
    let first_share = (total_extent as f64 * ratio).round() as i64;
    let second_share = total_extent as i64 - first_share;
    first_share >= first_min as i64 && second_share >= second_min as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::SplitType;

    fn leaf(arena: &mut Arena<Node>) -> NodeId {
        NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 100, 100))))
    }

    #[test]
    fn leaf_has_floor_minimum() {
        let mut arena = Arena::new();
        let a = leaf(&mut arena);
        rebuild_from_leaves(&mut arena, a);
        let node = arena.get(a.raw()).unwrap();
        assert_eq!(node.min_width, MIN_WIDTH);
        assert_eq!(node.min_height, MIN_HEIGHT);
    }

    #[test]
    fn vertical_split_sums_width_and_maxes_height() {
        let mut arena = Arena::new();
        let a = leaf(&mut arena);
        let b = leaf(&mut arena);
        let root = leaf(&mut arena);
        arena.get_mut(a.raw()).unwrap().parent = Some(root);
        arena.get_mut(b.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(a);
            r.second_child = Some(b);
            r.split_type = SplitType::Vertical;
        }
        rebuild_from_leaves(&mut arena, root);
        let root_node = arena.get(root.raw()).unwrap();
        assert_eq!(root_node.min_width, MIN_WIDTH * 2);
        assert_eq!(root_node.min_height, MIN_HEIGHT);
    }

    #[test]
    fn ratio_rejected_when_it_starves_a_side() {
        assert!(!ratio_respects_minimums(50, 0.9, true, 32, 32));
        assert!(ratio_respects_minimums(100, 0.5, true, 32, 32));
    }
}
