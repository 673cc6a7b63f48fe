//! Tree-shape primitives: traversal order, fences, rotation, mirroring, and
//! ratio redistribution. These operate purely on shape and parent/child
//! links; geometry assignment lives in `layout.rs` and constraint
//! propagation in `constraints.rs`.
//!
//! Grounded in the teacher's `window_manager::tree::TreeNode::{rebalance,
//! collect_recursive}` for the recursive-descent shape, generalized to the
//! spec's full (non-leaf-only) binary tree and its named shape operations.

use crate::geometry::Direction;
use crate::id::{Arena, NodeId};
use crate::node::{Node, SplitType};
use crate::settings::Settings;

/// Recursive tree walks bail out past this depth rather than risk a stack
/// overflow on a malformed or adversarially deep tree.
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

fn is_first_child(arena: &Arena<Node>, parent: NodeId, child: NodeId) -> bool {
    arena
        .get(parent.raw())
        .map(|p| p.first_child == Some(child))
        .unwrap_or(false)
}

/// Walks down `first_child` links to the leftmost/topmost leaf.
pub fn first_extrema(arena: &Arena<Node>, start: NodeId) -> NodeId {
    let mut current = start;
    let mut depth = 0;
    while let Some(node) = arena.get(current.raw()) {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %current, "first_extrema: depth limit reached");
            break;
        }
        match node.first_child {
            Some(child) => {
                current = child;
                depth += 1;
            }
            None => break,
        }
    }
    current
}

/// Walks down `second_child` links to the rightmost/bottommost leaf.
pub fn last_extrema(arena: &Arena<Node>, start: NodeId) -> NodeId {
    let mut current = start;
    let mut depth = 0;
    while let Some(node) = arena.get(current.raw()) {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %current, "last_extrema: depth limit reached");
            break;
        }
        match node.second_child {
            Some(child) => {
                current = child;
                depth += 1;
            }
            None => break,
        }
    }
    current
}

/// In-order successor among *all* nodes (internal and leaf), or `None` if
/// `start` is the rightmost node in the tree.
pub fn next_node(arena: &Arena<Node>, start: NodeId) -> Option<NodeId> {
    let node = arena.get(start.raw())?;
    if let Some(second) = node.second_child {
        return Some(second);
    }
    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "next_node: depth limit reached");
            return None;
        }
        let parent_id = arena.get(current.raw())?.parent?;
        if is_first_child(arena, parent_id, current) {
            return Some(parent_id);
        }
        current = parent_id;
        depth += 1;
    }
}

/// In-order predecessor among all nodes.
pub fn prev_node(arena: &Arena<Node>, start: NodeId) -> Option<NodeId> {
    let node = arena.get(start.raw())?;
    if let Some(first) = node.first_child {
        return Some(first);
    }
    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "prev_node: depth limit reached");
            return None;
        }
        let parent_id = arena.get(current.raw())?.parent?;
        if !is_first_child(arena, parent_id, current) {
            return Some(parent_id);
        }
        current = parent_id;
        depth += 1;
    }
}

/// Next leaf in tree order after `start`, skipping internal nodes.
pub fn next_leaf(arena: &Arena<Node>, start: NodeId) -> Option<NodeId> {
    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "next_leaf: depth limit reached");
            return None;
        }
        let parent_id = arena.get(current.raw())?.parent?;
        if is_first_child(arena, parent_id, current) {
            let sibling = arena.get(parent_id.raw())?.second_child?;
            return Some(first_extrema(arena, sibling));
        }
        current = parent_id;
        depth += 1;
    }
}

/// Previous leaf in tree order before `start`.
pub fn prev_leaf(arena: &Arena<Node>, start: NodeId) -> Option<NodeId> {
    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "prev_leaf: depth limit reached");
            return None;
        }
        let parent_id = arena.get(current.raw())?.parent?;
        if !is_first_child(arena, parent_id, current) {
            let sibling = arena.get(parent_id.raw())?.first_child?;
            return Some(last_extrema(arena, sibling));
        }
        current = parent_id;
        depth += 1;
    }
}

/// Collects every leaf under `start`, in tree order.
pub fn collect_leaves(arena: &Arena<Node>, start: NodeId) -> Vec<NodeId> {
    let mut leaves = Vec::new();
    collect_leaves_inner(arena, start, &mut leaves, 0);
    leaves
}

fn collect_leaves_inner(arena: &Arena<Node>, id: NodeId, out: &mut Vec<NodeId>, depth: usize) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "collect_leaves: depth limit reached");
        return;
    }
    let Some(node) = arena.get(id.raw()) else {
        return;
    };
    if node.is_leaf() {
        out.push(id);
        return;
    }
    if let Some(f) = node.first_child {
        collect_leaves_inner(arena, f, out, depth + 1);
    }
    if let Some(s) = node.second_child {
        collect_leaves_inner(arena, s, out, depth + 1);
    }
}

/// The nearest ancestor whose split separates `start` from whatever lies in
/// `dir`; `None` if `start` is already at the edge of the tree in that
/// direction.
pub fn find_fence(arena: &Arena<Node>, start: NodeId, dir: Direction) -> Option<NodeId> {
    let wants_vertical_split = dir.axis_is_vertical();
    let wants_first_child_side = matches!(dir, Direction::East | Direction::South);

    let mut current = start;
    let mut depth = 0;
    loop {
        if depth >= MAX_TRAVERSAL_DEPTH {
            tracing::warn!(node = %start, "find_fence: depth limit reached");
            return None;
        }
        let parent_id = arena.get(current.raw())?.parent?;
        let parent = arena.get(parent_id.raw())?;
        let split_matches = matches!(parent.split_type, SplitType::Vertical) == wants_vertical_split;
        let side_matches = is_first_child(arena, parent_id, current) == wants_first_child_side;
        if split_matches && side_matches {
            return Some(parent_id);
        }
        current = parent_id;
        depth += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
    Full,
}

/// Rotates the subtree rooted at `start` in place: clockwise/counter-
/// clockwise swap the split axis and child order, `Full` (180°) keeps the
/// axis but reflects the ratio.
pub fn rotate_tree(arena: &mut Arena<Node>, start: NodeId, rotation: Rotation) {
    rotate_tree_inner(arena, start, rotation, 0);
}

fn rotate_tree_inner(arena: &mut Arena<Node>, id: NodeId, rotation: Rotation, depth: usize) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "rotate_tree: depth limit reached");
        return;
    }
    let (first, second, split_type) = match arena.get(id.raw()) {
        Some(n) if n.is_internal() => (n.first_child, n.second_child, n.split_type),
        _ => return,
    };

    if let Some(node) = arena.get_mut(id.raw()) {
        let flips_ratio = match rotation {
            Rotation::Clockwise => matches!(split_type, SplitType::Horizontal),
            Rotation::CounterClockwise => matches!(split_type, SplitType::Vertical),
            Rotation::Full => true,
        };
        if flips_ratio {
            node.split_ratio = 1.0 - node.split_ratio;
        }
        if rotation != Rotation::Full {
            node.split_type = split_type.opposite();
        }
        if rotation != Rotation::Full {
            node.first_child = second;
            node.second_child = first;
        }
    }

    if let Some(f) = first {
        rotate_tree_inner(arena, f, rotation, depth + 1);
    }
    if let Some(s) = second {
        rotate_tree_inner(arena, s, rotation, depth + 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    Horizontal,
    Vertical,
}

/// Mirrors the subtree across `axis`: swaps children (and complements the
/// ratio) at every node whose split type matches the axis, recursively.
pub fn flip_tree(arena: &mut Arena<Node>, start: NodeId, axis: FlipAxis) {
    flip_tree_inner(arena, start, axis, 0);
}

fn flip_tree_inner(arena: &mut Arena<Node>, id: NodeId, axis: FlipAxis, depth: usize) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "flip_tree: depth limit reached");
        return;
    }
    let (first, second) = match arena.get(id.raw()) {
        Some(n) if n.is_internal() => (n.first_child, n.second_child),
        _ => return,
    };

    if let Some(node) = arena.get_mut(id.raw()) {
        let matches = (axis == FlipAxis::Horizontal && node.split_type == SplitType::Horizontal)
            || (axis == FlipAxis::Vertical && node.split_type == SplitType::Vertical);
        if matches {
            node.first_child = second;
            node.second_child = first;
            node.split_ratio = 1.0 - node.split_ratio;
        }
    }

    if let Some(f) = first {
        flip_tree_inner(arena, f, axis, depth + 1);
    }
    if let Some(s) = second {
        flip_tree_inner(arena, s, axis, depth + 1);
    }
}

/// Resets every non-vacant internal node's split ratio under `start` to
/// `settings.split_ratio`. A vacant node's entire subtree is vacant too (see
/// `flags::propagate_flags`), so vacant subtrees are skipped rather than
/// descended into.
pub fn equalize_tree(arena: &mut Arena<Node>, start: NodeId, settings: &Settings) {
    equalize_tree_inner(arena, start, settings, 0);
}

fn equalize_tree_inner(arena: &mut Arena<Node>, id: NodeId, settings: &Settings, depth: usize) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "equalize_tree: depth limit reached");
        return;
    }
    let (first, second) = match arena.get_mut(id.raw()) {
        Some(n) if n.is_internal() && !n.flags.vacant => {
            n.split_ratio = settings.split_ratio;
            (n.first_child, n.second_child)
        }
        _ => return,
    };
    if let Some(f) = first {
        equalize_tree_inner(arena, f, settings, depth + 1);
    }
    if let Some(s) = second {
        equalize_tree_inner(arena, s, settings, depth + 1);
    }
}

/// Sets each internal node's ratio proportionally to the leaf counts on
/// either side, so every leaf ends up with roughly the same share of space.
/// Returns the number of leaves under `start`.
pub fn balance_tree(arena: &mut Arena<Node>, start: NodeId) -> usize {
    balance_tree_inner(arena, start, 0)
}

fn balance_tree_inner(arena: &mut Arena<Node>, id: NodeId, depth: usize) -> usize {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "balance_tree: depth limit reached");
        return 1;
    }
    let (first, second) = match arena.get(id.raw()) {
        Some(n) if n.is_internal() => (n.first_child, n.second_child),
        Some(_) => return 1,
        None => return 0,
    };
    let first_count = first
        .map(|f| balance_tree_inner(arena, f, depth + 1))
        .unwrap_or(0);
    let second_count = second
        .map(|s| balance_tree_inner(arena, s, depth + 1))
        .unwrap_or(0);
    let total = first_count + second_count;
    if total > 0 {
        if let Some(node) = arena.get_mut(id.raw()) {
            node.split_ratio = first_count as f64 / total as f64;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;

    fn leaf(arena: &mut Arena<Node>) -> NodeId {
        let rect = Rect::new(0, 0, 100, 100);
        NodeId(arena.insert(Node::new_leaf(rect)))
    }

    fn link(arena: &mut Arena<Node>, parent: NodeId, first: NodeId, second: NodeId, split: SplitType) {
        if let Some(f) = arena.get_mut(first.raw()) {
            f.parent = Some(parent);
        }
        if let Some(s) = arena.get_mut(second.raw()) {
            s.parent = Some(parent);
        }
        if let Some(p) = arena.get_mut(parent.raw()) {
            p.first_child = Some(first);
            p.second_child = Some(second);
            p.split_type = split;
        }
    }

    fn small_tree() -> (Arena<Node>, NodeId, NodeId, NodeId) {
        let mut arena = Arena::new();
        let a = leaf(&mut arena);
        let b = leaf(&mut arena);
        let root = leaf(&mut arena);
        link(&mut arena, root, a, b, SplitType::Vertical);
        (arena, root, a, b)
    }

    #[test]
    fn first_and_last_extrema() {
        let (arena, root, a, b) = small_tree();
        assert_eq!(first_extrema(&arena, root), a);
        assert_eq!(last_extrema(&arena, root), b);
    }

    #[test]
    fn next_leaf_walks_across_tree() {
        let (arena, _root, a, b) = small_tree();
        assert_eq!(next_leaf(&arena, a), Some(b));
        assert_eq!(prev_leaf(&arena, b), Some(a));
        assert_eq!(next_leaf(&arena, b), None);
    }

    #[test]
    fn find_fence_locates_split_parent() {
        let (arena, root, a, b) = small_tree();
        assert_eq!(find_fence(&arena, a, Direction::East), Some(root));
        assert_eq!(find_fence(&arena, b, Direction::West), Some(root));
        assert_eq!(find_fence(&arena, a, Direction::South), None);
    }

    #[test]
    fn rotate_clockwise_swaps_children_and_axis() {
        let (mut arena, root, a, b) = small_tree();
        rotate_tree(&mut arena, root, Rotation::Clockwise);
        let node = arena.get(root.raw()).unwrap();
        assert_eq!(node.split_type, SplitType::Horizontal);
        assert_eq!(node.first_child, Some(b));
        assert_eq!(node.second_child, Some(a));
    }

    #[test]
    fn equalize_resets_ratio_to_settings_default() {
        let (mut arena, root, _a, _b) = small_tree();
        arena.get_mut(root.raw()).unwrap().split_ratio = 0.8;
        let settings = Settings {
            split_ratio: 0.5,
            ..Settings::default()
        };
        equalize_tree(&mut arena, root, &settings);
        assert_eq!(arena.get(root.raw()).unwrap().split_ratio, 0.5);
    }

    #[test]
    fn equalize_skips_vacant_subtree() {
        let (mut arena, root, _a, _b) = small_tree();
        arena.get_mut(root.raw()).unwrap().split_ratio = 0.8;
        arena.get_mut(root.raw()).unwrap().flags.vacant = true;
        equalize_tree(&mut arena, root, &Settings::default());
        assert_eq!(arena.get(root.raw()).unwrap().split_ratio, 0.8);
    }

    #[test]
    fn balance_tree_counts_leaves() {
        let (mut arena, root, _a, _b) = small_tree();
        let count = balance_tree(&mut arena, root);
        assert_eq!(count, 2);
        assert_eq!(arena.get(root.raw()).unwrap().split_ratio, 0.5);
    }
}
