//! Turns tree shape plus `Settings` into concrete rectangles: the tiled
//! split layout and the monocle (full-area, stacked) layout.
//!
//! Grounded in the teacher's `window_manager::tree::TreeNode::{apply_layout,
//! rect.split_horizontal/split_vertical}`, generalized from a fixed
//! half-and-half split to ratio-driven splits with inter-window gaps and
//! constraint-aware clamping via `constraints::ratio_respects_minimums`.

use crate::constraints::ratio_respects_minimums;
use crate::geometry::Rect;
use crate::id::{Arena, NodeId};
use crate::node::{ClientState, Node, SplitType};
use crate::settings::Settings;
use crate::tree::{collect_leaves, MAX_TRAVERSAL_DEPTH};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    Tiled,
    Monocle,
}

/// Assigns `node.rectangle` (and, for leaves with a tiled/pseudo-tiled
/// client, `client.tiled_rect`) for every node under `root`, within `area`.
///
/// `area` is expected to already have desktop-level padding applied by the
/// caller; this function only introduces the inter-window gap.
pub fn arrange(arena: &mut Arena<Node>, root: NodeId, area: Rect, settings: &Settings, mode: LayoutMode) {
    let singleton = collect_leaves(arena, root).len() == 1;
    match mode {
        LayoutMode::Tiled => apply_tiled(arena, root, area, settings, mode, singleton, 0),
        LayoutMode::Monocle => apply_monocle(arena, root, area, settings, singleton),
    }
}

/// Whether `id`'s subtree is entirely vacant: leaves consult `leaf_is_vacant`
/// directly (their own `flags.vacant` is never populated, only ancestors'
/// are), internal nodes read the flag `propagate_flags` maintains for them.
fn node_is_vacant(arena: &Arena<Node>, id: NodeId) -> bool {
    match arena.get(id.raw()) {
        Some(n) if n.is_leaf() => n.leaf_is_vacant(),
        Some(n) => n.flags.vacant,
        None => true,
    }
}

fn apply_tiled(arena: &mut Arena<Node>, id: NodeId, area: Rect, settings: &Settings, mode: LayoutMode, singleton: bool, depth: usize) {
    if depth >= MAX_TRAVERSAL_DEPTH {
        tracing::warn!(node = %id, "apply_tiled: depth limit reached");
        return;
    }
    let Some(node) = arena.get_mut(id.raw()) else {
        return;
    };
    node.rectangle = area;

    if node.is_leaf() {
        assign_leaf_rect(node, area, settings, mode, singleton);
        return;
    }

    let (first, second, split_type, mut ratio, first_min, second_min) = {
        let n = arena.get(id.raw()).unwrap();
        let (fw, fh) = n
            .first_child
            .and_then(|f| arena.get(f.raw()))
            .map(|c| (c.min_width, c.min_height))
            .unwrap_or((0, 0));
        let (sw, sh) = n
            .second_child
            .and_then(|s| arena.get(s.raw()))
            .map(|c| (c.min_width, c.min_height))
            .unwrap_or((0, 0));
        let (first_min, second_min) = if n.split_type == SplitType::Vertical {
            (fw, sw)
        } else {
            (fh, sh)
        };
        (n.first_child, n.second_child, n.split_type, n.split_ratio, first_min, second_min)
    };

    // Either child being vacant (floating/hidden/receptacle) means it
    // shouldn't consume a tiling slot; both children then stack on the
    // parent's full rectangle instead of splitting it.
    let either_vacant = first.map(|f| node_is_vacant(arena, f)).unwrap_or(true)
        || second.map(|s| node_is_vacant(arena, s)).unwrap_or(true);

    let (first_rect, second_rect) = if either_vacant {
        (area, area)
    } else {
        let gap = settings.window_gap;
        match split_type {
            SplitType::Vertical => {
                let total = area.width;
                let usable = total.saturating_sub(gap);
                if !ratio_respects_minimums(usable, ratio, true, first_min, second_min) {
                    ratio = 0.5;
                }
                let first_width = ((usable as f64) * ratio).round() as u16;
                let second_width = usable.saturating_sub(first_width);
                let first_rect = Rect::new(area.x, area.y, first_width.max(1), area.height);
                let second_x = area.x.saturating_add((first_width as i16).saturating_add(gap as i16));
                let second_rect = Rect::new(second_x, area.y, second_width.max(1), area.height);
                (first_rect, second_rect)
            }
            SplitType::Horizontal => {
                let total = area.height;
                let usable = total.saturating_sub(gap);
                if !ratio_respects_minimums(usable, ratio, false, first_min, second_min) {
                    ratio = 0.5;
                }
                let first_height = ((usable as f64) * ratio).round() as u16;
                let second_height = usable.saturating_sub(first_height);
                let first_rect = Rect::new(area.x, area.y, area.width, first_height.max(1));
                let second_y = area.y.saturating_add((first_height as i16).saturating_add(gap as i16));
                let second_rect = Rect::new(area.x, second_y, area.width, second_height.max(1));
                (first_rect, second_rect)
            }
        }
    };

    if let Some(f) = first {
        apply_tiled(arena, f, first_rect, settings, mode, singleton, depth + 1);
    }
    if let Some(s) = second {
        apply_tiled(arena, s, second_rect, settings, mode, singleton, depth + 1);
    }
}

fn apply_monocle(arena: &mut Arena<Node>, root: NodeId, area: Rect, settings: &Settings, singleton: bool) {
    let leaves = collect_leaves(arena, root);
    let (top, right, bottom, left) = settings.monocle_padding;
    let padded = if settings.gapless_monocle {
        area
    } else {
        area.shrink_edges(top, right, bottom, left)
    };
    for leaf in leaves {
        if let Some(node) = arena.get_mut(leaf.raw()) {
            node.rectangle = padded;
            assign_leaf_rect(node, padded, settings, LayoutMode::Monocle, singleton);
        }
    }
}

/// Border-suppression rule: zero the border under `borderless_monocle` for a
/// tiled leaf while the desktop is in monocle, under `borderless_singleton`
/// when this is the only managed window, or whenever the client is
/// fullscreen; otherwise the client keeps its own border width.
fn assign_leaf_rect(node: &mut Node, area: Rect, settings: &Settings, mode: LayoutMode, singleton: bool) {
    let Some(client) = node.client.as_mut() else {
        return;
    };
    let borderless = (settings.borderless_monocle && mode == LayoutMode::Monocle && client.state.is_tiled_like())
        || (settings.borderless_singleton && singleton)
        || client.state == ClientState::Fullscreen;
    let border = if borderless { 0 } else { client.border_width };
    client.tiled_rect = area.shrink(border);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Client;

    fn leaf_with_client(arena: &mut Arena<Node>) -> NodeId {
        let rect = Rect::new(0, 0, 1, 1);
        let mut node = Node::new_leaf(rect);
        node.client = Some(Client::new(1, 1, rect));
        NodeId(arena.insert(node))
    }

    #[test]
    fn single_leaf_fills_area() {
        let mut arena = Arena::new();
        let leaf = leaf_with_client(&mut arena);
        let settings = Settings::default();
        let area = Rect::new(0, 0, 1920, 1080);
        arrange(&mut arena, leaf, area, &settings, LayoutMode::Tiled);
        assert_eq!(arena.get(leaf.raw()).unwrap().rectangle, area);
    }

    #[test]
    fn vertical_split_respects_gap() {
        let mut arena = Arena::new();
        let a = leaf_with_client(&mut arena);
        let b = leaf_with_client(&mut arena);
        let root = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        arena.get_mut(a.raw()).unwrap().parent = Some(root);
        arena.get_mut(b.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(a);
            r.second_child = Some(b);
            r.split_type = SplitType::Vertical;
            r.split_ratio = 0.5;
        }
        let settings = Settings {
            window_gap: 10,
            ..Settings::default()
        };
        let area = Rect::new(0, 0, 210, 100);
        arrange(&mut arena, root, area, &settings, LayoutMode::Tiled);
        let a_rect = arena.get(a.raw()).unwrap().rectangle;
        let b_rect = arena.get(b.raw()).unwrap().rectangle;
        assert_eq!(a_rect.width, 100);
        assert_eq!(b_rect.width, 100);
        assert_eq!(b_rect.x, a_rect.x + a_rect.width as i16 + 10);
    }

    #[test]
    fn monocle_stacks_all_leaves_on_full_area() {
        let mut arena = Arena::new();
        let a = leaf_with_client(&mut arena);
        let b = leaf_with_client(&mut arena);
        let root = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        arena.get_mut(a.raw()).unwrap().parent = Some(root);
        arena.get_mut(b.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(a);
            r.second_child = Some(b);
        }
        let settings = Settings {
            gapless_monocle: true,
            ..Settings::default()
        };
        let area = Rect::new(0, 0, 800, 600);
        arrange(&mut arena, root, area, &settings, LayoutMode::Monocle);
        assert_eq!(arena.get(a.raw()).unwrap().rectangle, area);
        assert_eq!(arena.get(b.raw()).unwrap().rectangle, area);
    }

    #[test]
    fn vacant_sibling_gives_both_children_the_full_rect() {
        let mut arena = Arena::new();
        let occupied = leaf_with_client(&mut arena);
        let receptacle = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        let root = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        arena.get_mut(occupied.raw()).unwrap().parent = Some(root);
        arena.get_mut(receptacle.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(occupied);
            r.second_child = Some(receptacle);
            r.split_type = SplitType::Vertical;
            r.split_ratio = 0.5;
        }
        let settings = Settings {
            window_gap: 10,
            ..Settings::default()
        };
        let area = Rect::new(0, 0, 200, 100);
        arrange(&mut arena, root, area, &settings, LayoutMode::Tiled);
        assert_eq!(arena.get(occupied.raw()).unwrap().rectangle, area);
        assert_eq!(arena.get(receptacle.raw()).unwrap().rectangle, area);
    }

    #[test]
    fn fullscreen_client_gets_no_border() {
        let mut arena = Arena::new();
        let leaf = leaf_with_client(&mut arena);
        arena.get_mut(leaf.raw()).unwrap().client.as_mut().unwrap().state = ClientState::Fullscreen;
        arena.get_mut(leaf.raw()).unwrap().client.as_mut().unwrap().border_width = 2;
        let settings = Settings::default();
        let area = Rect::new(0, 0, 1920, 1080);
        arrange(&mut arena, leaf, area, &settings, LayoutMode::Tiled);
        assert_eq!(arena.get(leaf.raw()).unwrap().client.as_ref().unwrap().tiled_rect, area);
    }

    #[test]
    fn borderless_singleton_suppresses_border_on_lone_leaf() {
        let mut arena = Arena::new();
        let leaf = leaf_with_client(&mut arena);
        arena.get_mut(leaf.raw()).unwrap().client.as_mut().unwrap().border_width = 2;
        let settings = Settings {
            borderless_singleton: true,
            ..Settings::default()
        };
        let area = Rect::new(0, 0, 1920, 1080);
        arrange(&mut arena, leaf, area, &settings, LayoutMode::Tiled);
        assert_eq!(arena.get(leaf.raw()).unwrap().client.as_ref().unwrap().tiled_rect, area);
    }

    #[test]
    fn borderless_monocle_suppresses_border_only_in_monocle_mode() {
        let mut arena = Arena::new();
        let a = leaf_with_client(&mut arena);
        let b = leaf_with_client(&mut arena);
        arena.get_mut(a.raw()).unwrap().client.as_mut().unwrap().border_width = 2;
        arena.get_mut(b.raw()).unwrap().client.as_mut().unwrap().border_width = 2;
        let root = NodeId(arena.insert(Node::new_leaf(Rect::new(0, 0, 1, 1))));
        arena.get_mut(a.raw()).unwrap().parent = Some(root);
        arena.get_mut(b.raw()).unwrap().parent = Some(root);
        {
            let r = arena.get_mut(root.raw()).unwrap();
            r.first_child = Some(a);
            r.second_child = Some(b);
        }
        let settings = Settings {
            borderless_monocle: true,
            ..Settings::default()
        };
        let area = Rect::new(0, 0, 800, 600);
        arrange(&mut arena, root, area, &settings, LayoutMode::Monocle);
        assert_eq!(arena.get(a.raw()).unwrap().client.as_ref().unwrap().tiled_rect, area);
        assert_eq!(arena.get(b.raw()).unwrap().client.as_ref().unwrap().tiled_rect, area);

        arrange(&mut arena, root, area, &settings, LayoutMode::Tiled);
        let a_rect = arena.get(a.raw()).unwrap().client.as_ref().unwrap().tiled_rect;
        assert_ne!(a_rect, area);
    }
}
