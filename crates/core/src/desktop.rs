//! A desktop: one binary tree plus the bookkeeping (layout mode, focus,
//! name) that doesn't belong in the tree itself.
//!
//! Grounded in the teacher's `workspace::core::{Workspace, WorkspaceManager}`,
//! generalized from a flat `HashMap<usize, Workspace>` keyed by an integer
//! index to an arena-backed `DesktopId` and from a single global layout
//! toggle to a per-desktop one.

use serde::{Deserialize, Serialize};

use crate::focus::FocusHistory;
use crate::id::NodeId;
use crate::layout::LayoutMode;

/// Caps how many tiled leaves a desktop may hold; insertion beyond `max`
/// forces the new client to float instead, per spec §4.4.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TileLimit {
    pub enabled: bool,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Desktop {
    pub name: String,
    pub root: Option<NodeId>,
    /// The layout `single_monocle` may have temporarily overridden;
    /// `layout_mode` is what's actually rendered, `user_layout` is what the
    /// user last asked for and what's restored once more than one tiled
    /// leaf exists again.
    pub layout_mode: LayoutMode,
    pub user_layout: LayoutMode,
    #[serde(skip)]
    pub focus_history: FocusHistory,
    pub padding: (u16, u16, u16, u16),
    /// Per-desktop overrides of `Settings::window_gap`/`border_width`;
    /// `None` defers to the process-wide setting.
    pub gap: Option<u16>,
    pub border_width: Option<u16>,
    pub urgent_count: u32,
    pub tile_limit: TileLimit,
}

impl Desktop {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: None,
            layout_mode: LayoutMode::Tiled,
            user_layout: LayoutMode::Tiled,
            focus_history: FocusHistory::default(),
            padding: (0, 0, 0, 0),
            gap: None,
            border_width: None,
            urgent_count: 0,
            tile_limit: TileLimit::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Flips the user's own layout preference and applies it immediately.
    /// Distinct from `single_monocle`'s automatic override, which only ever
    /// touches `layout_mode`.
    pub fn toggle_layout(&mut self) {
        self.user_layout = match self.user_layout {
            LayoutMode::Tiled => LayoutMode::Monocle,
            LayoutMode::Monocle => LayoutMode::Tiled,
        };
        self.layout_mode = self.user_layout;
    }
}

impl Default for Desktop {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_layout_flips_mode() {
        let mut d = Desktop::new("I");
        assert_eq!(d.layout_mode, LayoutMode::Tiled);
        d.toggle_layout();
        assert_eq!(d.layout_mode, LayoutMode::Monocle);
    }

    #[test]
    fn fresh_desktop_is_empty() {
        assert!(Desktop::new("I").is_empty());
    }
}
