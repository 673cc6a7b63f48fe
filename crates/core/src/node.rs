//! The tree cell (`Node`) and the managed-window state (`Client`) it may
//! carry, plus the small closed enums the spec names (`SplitType`,
//! `ClientState`, `StackLayer`).
//!
//! Grounded in the teacher's `window_manager::window::{ManagedWindow,
//! WindowState}` for the client-state shape and `window_manager::tree::Split`
//! for the split axis, generalized from the teacher's HWND-keyed leaf-only
//! design to the full internal/leaf node the spec's binary partition tree
//! requires.

use crate::backend::WindowHandle;
use crate::geometry::Rect;
use crate::id::NodeId;
use serde::{Deserialize, Serialize};

pub const MIN_WIDTH: u16 = 32;
pub const MIN_HEIGHT: u16 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitType {
    Vertical,
    Horizontal,
}

impl SplitType {
    pub fn opposite(self) -> SplitType {
        match self {
            SplitType::Vertical => SplitType::Horizontal,
            SplitType::Horizontal => SplitType::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientState {
    Tiled,
    PseudoTiled,
    Floating,
    Fullscreen,
}

impl ClientState {
    pub fn is_tiled_like(self) -> bool {
        matches!(self, ClientState::Tiled | ClientState::PseudoTiled)
    }

    /// `state_class` from spec §4.6: tiled/pseudo-tiled → 0, floating → 1,
    /// fullscreen → 2.
    pub fn state_class(self) -> u32 {
        match self {
            ClientState::Tiled | ClientState::PseudoTiled => 0,
            ClientState::Floating => 1,
            ClientState::Fullscreen => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackLayer {
    Below,
    Normal,
    Above,
}

impl StackLayer {
    fn ordinal(self) -> u32 {
        match self {
            StackLayer::Below => 0,
            StackLayer::Normal => 1,
            StackLayer::Above => 2,
        }
    }

    /// `3 * layer + state_class` from spec §4.6.
    pub fn stack_level(self, state: ClientState) -> u32 {
        3 * self.ordinal() + state.state_class()
    }
}

/// ICCCM size hints honored by `apply_size_hints` in the backend interface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SizeHints {
    pub min_width: Option<u16>,
    pub min_height: Option<u16>,
    pub max_width: Option<u16>,
    pub max_height: Option<u16>,
    pub width_inc: Option<u16>,
    pub height_inc: Option<u16>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct IcccmProtocols {
    pub input_hint: bool,
    pub take_focus: bool,
    pub delete_window: bool,
}

/// A managed window carried by a leaf node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub handle: WindowHandle,
    pub state: ClientState,
    pub last_state: ClientState,
    pub layer: StackLayer,
    pub last_layer: StackLayer,
    pub floating_rect: Rect,
    pub tiled_rect: Rect,
    pub border_width: u16,
    pub urgent: bool,
    pub shown: bool,
    pub class_name: String,
    pub instance_name: String,
    pub wm_flags: u32,
    pub icccm: IcccmProtocols,
    pub size_hints: SizeHints,
    pub honor_size_hints: bool,
}

impl Client {
    pub fn new(handle: WindowHandle, border_width: u16, floating_rect: Rect) -> Self {
        Self {
            handle,
            state: ClientState::Tiled,
            last_state: ClientState::Tiled,
            layer: StackLayer::Normal,
            last_layer: StackLayer::Normal,
            floating_rect,
            tiled_rect: floating_rect,
            border_width,
            urgent: false,
            shown: true,
            class_name: String::new(),
            instance_name: String::new(),
            wm_flags: 0,
            icccm: IcccmProtocols::default(),
            size_hints: SizeHints::default(),
            honor_size_hints: false,
        }
    }

    pub fn stack_level(&self) -> u32 {
        self.layer.stack_level(self.state)
    }
}

/// A pending split preselection: the next insertion at this leaf takes the
/// given direction and ratio instead of running the automatic scheme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Presel {
    pub split_type: SplitType,
    pub ratio: f64,
    /// Opaque backend handle for the visual feedback window, if any.
    pub feedback: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NodeFlags {
    pub vacant: bool,
    pub hidden: bool,
    pub sticky: bool,
    pub private: bool,
    pub locked: bool,
    pub marked: bool,
}

/// A full binary tree cell: internal iff both children are `Some`, leaf iff
/// both are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub second_child: Option<NodeId>,
    pub split_type: SplitType,
    pub split_ratio: f64,
    pub rectangle: Rect,
    pub min_width: u16,
    pub min_height: u16,
    pub flags: NodeFlags,
    pub presel: Option<Presel>,
    pub client: Option<Client>,
    /// Placeholder leaf a future window can be spliced into; mutually
    /// exclusive with `client`.
    pub is_receptacle: bool,
}

impl Node {
    pub fn new_leaf(rectangle: Rect) -> Self {
        Self {
            parent: None,
            first_child: None,
            second_child: None,
            split_type: SplitType::Vertical,
            split_ratio: 0.5,
            rectangle,
            min_width: MIN_WIDTH,
            min_height: MIN_HEIGHT,
            flags: NodeFlags::default(),
            presel: None,
            client: None,
            is_receptacle: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none() && self.second_child.is_none()
    }

    pub fn is_internal(&self) -> bool {
        !self.is_leaf()
    }

    /// A leaf is vacant iff it has no client, is hidden, or isn't
    /// tiled/pseudo-tiled; receptacles are always vacant. Internal-node
    /// vacancy is reconciled separately by `propagate_flags`.
    pub fn leaf_is_vacant(&self) -> bool {
        match &self.client {
            None => true,
            Some(c) => self.flags.hidden || !c.state.is_tiled_like(),
        }
    }

    pub fn is_focusable(&self) -> bool {
        self.client.is_some() && !self.flags.hidden
    }
}
