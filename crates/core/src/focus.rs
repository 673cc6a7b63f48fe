//! Focus history and directional-focus candidate search.
//!
//! Grounded directly in the teacher's `window_manager::focus::{FocusManager,
//! DirectionalFocus}`, generalized from HWND-keyed history entries to
//! `NodeId` ones and from Euclidean nearest-neighbor search to the spec's
//! side-test-plus-boundary-distance ranking.

use std::collections::VecDeque;

use crate::geometry::{boundary_distance, on_dir_side, Direction, Tightness};
use crate::id::{Arena, NodeId};
use crate::node::Node;
use crate::tree::collect_leaves;

const DEFAULT_HISTORY_SIZE: usize = 64;

/// Most-recently-focused-first history of focused nodes.
#[derive(Debug, Clone)]
pub struct FocusHistory {
    entries: VecDeque<NodeId>,
    capacity: usize,
}

impl Default for FocusHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }
}

impl FocusHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn current(&self) -> Option<NodeId> {
        self.entries.front().copied()
    }

    /// Records `id` as the newly focused node, moving it to the front if it
    /// was already present.
    pub fn push(&mut self, id: NodeId) {
        self.entries.retain(|&n| n != id);
        self.entries.push_front(id);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Drops `id` from the history entirely, e.g. when its node is removed.
    pub fn remove(&mut self, id: NodeId) {
        self.entries.retain(|&n| n != id);
    }

    /// The node focused immediately before the current one, if any.
    pub fn previous(&self) -> Option<NodeId> {
        self.entries.get(1).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Searches the leaves under `root` for the best focus candidate lying in
/// `dir` from `source`'s rectangle, excluding `source` itself. Ties are
/// broken by whichever candidate `boundary_distance` ranks closer.
pub fn find_directional_neighbor(
    arena: &Arena<Node>,
    root: NodeId,
    source: NodeId,
    dir: Direction,
    tightness: Tightness,
) -> Option<NodeId> {
    let source_rect = arena.get(source.raw())?.rectangle;
    collect_leaves(arena, root)
        .into_iter()
        .filter(|&id| id != source)
        .filter_map(|id| {
            let node = arena.get(id.raw())?;
            if !node.is_focusable() {
                return None;
            }
            if !on_dir_side(&source_rect, &node.rectangle, dir, tightness) {
                return None;
            }
            Some((id, boundary_distance(&source_rect, &node.rectangle, dir)))
        })
        .min_by_key(|&(_, dist)| dist)
        .map(|(id, _)| id)
}

/// Marks `id` as focused: updates the history. Whether the backend is
/// actually told to raise/focus the window is the caller's (`Engine`)
/// responsibility, since that crosses the `WindowBackend` seam.
pub fn focus_node(history: &mut FocusHistory, id: NodeId) {
    history.push(id);
}

/// True if `id` is eligible to receive focus at all: has a client, isn't
/// hidden, and (when `sticky_only` is set, e.g. while switching desktops
/// with `hide_sticky`) is marked sticky.
pub fn is_focus_candidate(arena: &Arena<Node>, id: NodeId, sticky_only: bool) -> bool {
    match arena.get(id.raw()) {
        Some(node) => node.is_focusable() && (!sticky_only || node.flags.sticky),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::{Client, Node, SplitType};

    fn leaf_with_client(arena: &mut Arena<Node>, rect: Rect) -> NodeId {
        let mut node = Node::new_leaf(rect);
        node.client = Some(Client::new(1, 1, rect));
        NodeId(arena.insert(node))
    }

    #[test]
    fn history_push_moves_existing_entry_to_front() {
        let mut history = FocusHistory::default();
        history.push(NodeId(1));
        history.push(NodeId(2));
        history.push(NodeId(1));
        assert_eq!(history.current(), Some(NodeId(1)));
        assert_eq!(history.previous(), Some(NodeId(2)));
    }

    #[test]
    fn finds_east_neighbor_over_further_candidate() {
        let mut arena = Arena::new();
        let source = leaf_with_client(&mut arena, Rect::new(0, 0, 100, 100));
        let near = leaf_with_client(&mut arena, Rect::new(150, 0, 100, 100));
        let far = leaf_with_client(&mut arena, Rect::new(400, 0, 100, 100));
        let root = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(source);
            r.second_child = Some(near);
            r.split_type = SplitType::Vertical;
        }
        arena.get_mut(source.raw()).unwrap().parent = Some(root);
        arena.get_mut(near.raw()).unwrap().parent = Some(root);
        let _ = far;

        let found = find_directional_neighbor(&arena, root, source, Direction::East, Tightness::High);
        assert_eq!(found, Some(near));
    }
}
