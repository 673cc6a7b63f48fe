//! Global front-to-back window order, independent of tree shape.
//!
//! Grounded in the teacher's `window_manager::focus::FocusManager`'s
//! history-ordered `VecDeque`, generalized from a pure focus history to a
//! layer-aware stacking order keyed by `StackLayer::stack_level`.

use crate::id::{Arena, NodeId};
use crate::node::Node;

fn stack_level(arena: &Arena<Node>, id: NodeId) -> u32 {
    arena
        .get(id.raw())
        .and_then(|n| n.client.as_ref())
        .map(|c| c.stack_level())
        .unwrap_or(0)
}

/// Bottom-to-top window order. Membership here is independent of which
/// desktop a node belongs to; hidden/unmapped nodes are simply skipped by
/// the backend when it replays the list.
#[derive(Debug, Clone, Default)]
pub struct StackingList {
    order: Vec<NodeId>,
}

impl StackingList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the list from an explicit bottom-to-top order, used when
    /// restoring a persisted snapshot.
    pub fn from_order(order: Vec<NodeId>) -> Self {
        Self { order }
    }

    pub fn to_vec(&self) -> Vec<NodeId> {
        self.order.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn remove(&mut self, id: NodeId) {
        self.order.retain(|&n| n != id);
    }

    /// Inserts (or re-inserts) `id` directly above the topmost existing
    /// entry whose stack level is no greater than `id`'s, so windows stay
    /// ordered by layer while the most recently stacked one within a layer
    /// ends up on top.
    pub fn stack(&mut self, arena: &Arena<Node>, id: NodeId) {
        self.order.retain(|&n| n != id);
        let level = stack_level(arena, id);
        let pos = self
            .order
            .iter()
            .rposition(|&n| stack_level(arena, n) <= level)
            .map(|p| p + 1)
            .unwrap_or(0);
        self.order.insert(pos, id);
    }

    /// Moves `id` below every other node sharing its stack level, without
    /// disturbing nodes at other levels.
    pub fn lower_within_level(&mut self, arena: &Arena<Node>, id: NodeId) {
        let level = stack_level(arena, id);
        self.order.retain(|&n| n != id);
        let pos = self
            .order
            .iter()
            .position(|&n| stack_level(arena, n) >= level)
            .unwrap_or(self.order.len());
        self.order.insert(pos, id);
    }

    /// When `id` becomes fullscreen (or otherwise needs to own its level),
    /// pushes every sibling-level node that currently sits above it back
    /// down, so nothing at the same layer keeps occluding it after a
    /// restack.
    pub fn neutralize_occluding_windows(&mut self, arena: &Arena<Node>, id: NodeId) {
        self.stack(arena, id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::node::{Client, Node, StackLayer};

    fn node_with_layer(arena: &mut Arena<Node>, layer: StackLayer) -> NodeId {
        let rect = Rect::new(0, 0, 10, 10);
        let mut node = Node::new_leaf(rect);
        let mut client = Client::new(1, 1, rect);
        client.layer = layer;
        node.client = Some(client);
        NodeId(arena.insert(node))
    }

    #[test]
    fn stack_orders_by_level_then_recency() {
        let mut arena = Arena::new();
        let below = node_with_layer(&mut arena, StackLayer::Below);
        let normal = node_with_layer(&mut arena, StackLayer::Normal);
        let above = node_with_layer(&mut arena, StackLayer::Above);

        let mut stack = StackingList::new();
        stack.stack(&arena, normal);
        stack.stack(&arena, below);
        stack.stack(&arena, above);

        let order: Vec<_> = stack.iter().collect();
        assert_eq!(order, vec![below, normal, above]);
    }

    #[test]
    fn restacking_moves_to_top_of_its_level() {
        let mut arena = Arena::new();
        let a = node_with_layer(&mut arena, StackLayer::Normal);
        let b = node_with_layer(&mut arena, StackLayer::Normal);

        let mut stack = StackingList::new();
        stack.stack(&arena, a);
        stack.stack(&arena, b);
        stack.stack(&arena, a);

        let order: Vec<_> = stack.iter().collect();
        assert_eq!(order, vec![b, a]);
    }
}
