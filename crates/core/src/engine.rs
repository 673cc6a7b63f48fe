//! The top-level engine: owns every arena, the monitor/desktop hierarchy,
//! settings, stacking order, and the backend/sink seams, and exposes the
//! mutating operations a front end (CLI, IPC socket, key-binder) drives.
//!
//! Grounded in the teacher's `window_manager::core::WindowManager`,
//! generalized from a single global `HashMap<(usize,usize), TreeNode>` plus
//! scattered singletons (current monitor, registry, focus manager) into one
//! struct whose fields replace every one of those globals.

use std::collections::HashMap;

use crate::backend::{WindowBackend, WindowHandle};
use crate::constraints::{rebuild_from_leaves, rebuild_towards_root};
use crate::desktop::Desktop;
use crate::error::{EngineError, EngineResult};
use crate::events::{StatusEvent, StatusSink};
use crate::flags::propagate_flags;
use crate::focus::find_directional_neighbor;
use crate::geometry::{Direction, Rect};
use crate::id::{Arena, DesktopId, MonitorId, NodeId};
use crate::layout::{arrange, LayoutMode};
use crate::monitor::Monitor;
use crate::mutations::{insert_node, remove_node, swap_nodes, transfer_node};
use crate::node::{Client, ClientState, Node, Presel, SplitType, StackLayer};
use crate::settings::Settings;
use crate::stacking::StackingList;
use crate::tree::{self, FlipAxis, Rotation};

/// Count of leaves under `root` carrying a tiled or pseudo-tiled client,
/// used by the tile-limit check and `single_monocle`.
fn tiled_leaf_count(nodes: &Arena<Node>, root: NodeId) -> u32 {
    tree::collect_leaves(nodes, root)
        .into_iter()
        .filter(|&leaf| {
            nodes
                .get(leaf.raw())
                .and_then(|n| n.client.as_ref())
                .map(|c| c.state.is_tiled_like())
                .unwrap_or(false)
        })
        .count() as u32
}

pub struct Engine<B: WindowBackend, S: StatusSink> {
    nodes: Arena<Node>,
    monitors: Arena<Monitor>,
    desktops: Arena<Desktop>,
    monitor_order: Vec<MonitorId>,
    current_monitor: Option<MonitorId>,
    node_desktop: HashMap<u32, DesktopId>,
    stacking: StackingList,
    pub settings: Settings,
    backend: B,
    sink: S,
}

impl<B: WindowBackend, S: StatusSink> Engine<B, S> {
    pub fn new(backend: B, sink: S, settings: Settings) -> Self {
        Self {
            nodes: Arena::new(),
            monitors: Arena::new(),
            desktops: Arena::new(),
            monitor_order: Vec::new(),
            current_monitor: None,
            node_desktop: HashMap::new(),
            stacking: StackingList::new(),
            settings,
            backend,
            sink,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn nodes(&self) -> &Arena<Node> {
        &self.nodes
    }

    pub fn current_monitor(&self) -> Option<MonitorId> {
        self.current_monitor
    }

    pub fn monitor(&self, id: MonitorId) -> Option<&Monitor> {
        self.monitors.get(id.raw())
    }

    pub fn desktop(&self, id: DesktopId) -> Option<&Desktop> {
        self.desktops.get(id.raw())
    }

    fn emit(&mut self, event: StatusEvent) {
        self.sink.emit(event);
    }

    // --- State access for `persistence` ----------------------------------

    pub(crate) fn nodes_arena_clone(&self) -> Arena<Node> {
        self.nodes.clone()
    }

    pub(crate) fn monitors_arena_clone(&self) -> Arena<Monitor> {
        self.monitors.clone()
    }

    pub(crate) fn desktops_arena_clone(&self) -> Arena<Desktop> {
        self.desktops.clone()
    }

    pub(crate) fn monitor_order_clone(&self) -> Vec<MonitorId> {
        self.monitor_order.clone()
    }

    pub(crate) fn node_desktop_clone(&self) -> HashMap<u32, DesktopId> {
        self.node_desktop.clone()
    }

    pub(crate) fn replace_state(&mut self, snapshot: crate::persistence::EngineSnapshot) {
        self.nodes = snapshot.nodes;
        self.monitors = snapshot.monitors;
        self.desktops = snapshot.desktops;
        self.monitor_order = snapshot.monitor_order;
        self.current_monitor = snapshot.current_monitor;
        self.node_desktop = snapshot.node_desktop;
        self.stacking = StackingList::from_order(snapshot.stacking_order);
        self.settings = snapshot.settings;
    }

    // --- Monitors -------------------------------------------------------

    pub fn add_monitor(&mut self, name: impl Into<String>, rectangle: Rect) -> MonitorId {
        let id = MonitorId(self.monitors.insert(Monitor::new(name, rectangle)));
        self.monitor_order.push(id);
        if self.current_monitor.is_none() {
            self.current_monitor = Some(id);
        }
        self.emit(StatusEvent::MonitorAdd { monitor: id });
        id
    }

    pub fn remove_monitor(&mut self, id: MonitorId) -> EngineResult<()> {
        let monitor = self.monitors.get(id.raw()).ok_or(EngineError::MonitorNotFound(id))?;
        for &desktop_id in monitor.desktops.clone().iter() {
            self.desktops.remove(desktop_id.raw());
        }
        self.monitors.remove(id.raw());
        self.monitor_order.retain(|&m| m != id);
        if self.current_monitor == Some(id) {
            self.current_monitor = self.monitor_order.first().copied();
        }
        self.emit(StatusEvent::MonitorRemove { monitor: id });
        Ok(())
    }

    pub fn rename_monitor(&mut self, id: MonitorId, name: impl Into<String>) -> EngineResult<()> {
        let name = name.into();
        let m = self.monitors.get_mut(id.raw()).ok_or(EngineError::MonitorNotFound(id))?;
        m.rename(name.clone());
        self.emit(StatusEvent::MonitorRename { monitor: id, name });
        Ok(())
    }

    pub fn focus_monitor(&mut self, id: MonitorId) -> EngineResult<()> {
        let active_desktop = self.monitors.get(id.raw()).ok_or(EngineError::MonitorNotFound(id))?.active_desktop;
        self.current_monitor = Some(id);
        self.emit(StatusEvent::MonitorFocus { monitor: id });
        if let Some(desktop) = active_desktop {
            self.emit(StatusEvent::DesktopFocus { monitor: id, desktop });
        }
        Ok(())
    }

    /// Updates a monitor's display rectangle (e.g. a backend reporting a
    /// reconfigured output) and re-arranges every desktop on it.
    pub fn set_monitor_geometry(&mut self, id: MonitorId, rectangle: Rect) -> EngineResult<()> {
        let m = self.monitors.get_mut(id.raw()).ok_or(EngineError::MonitorNotFound(id))?;
        m.rectangle = rectangle;
        let desktops = m.desktops.clone();
        self.emit(StatusEvent::MonitorGeometry { monitor: id, rectangle });
        for desktop in desktops {
            self.arrange_desktop(desktop)?;
        }
        Ok(())
    }

    /// Swaps the positions of two monitors in the global monitor order.
    pub fn swap_monitors(&mut self, a: MonitorId, b: MonitorId) -> EngineResult<()> {
        let (Some(ia), Some(ib)) = (
            self.monitor_order.iter().position(|&m| m == a),
            self.monitor_order.iter().position(|&m| m == b),
        ) else {
            return Err(EngineError::MonitorNotFound(a));
        };
        self.monitor_order.swap(ia, ib);
        self.emit(StatusEvent::MonitorSwap { a, b });
        Ok(())
    }

    /// Merges monitors whose rectangles overlap, per `settings.merge_overlapping_monitors`:
    /// folds the later monitor's desktops onto the earlier one and removes it.
    pub fn merge_overlapping_monitors(&mut self) {
        if !self.settings.merge_overlapping_monitors {
            return;
        }
        let mut i = 0;
        while i < self.monitor_order.len() {
            let mut j = i + 1;
            while j < self.monitor_order.len() {
                let (a, b) = (self.monitor_order[i], self.monitor_order[j]);
                let overlap = match (self.monitors.get(a.raw()), self.monitors.get(b.raw())) {
                    (Some(ma), Some(mb)) => crate::monitor::overlaps(ma, mb),
                    _ => false,
                };
                if overlap {
                    if let Some(desktops) = self.monitors.get(b.raw()).map(|m| m.desktops.clone()) {
                        if let Some(ma) = self.monitors.get_mut(a.raw()) {
                            for d in desktops {
                                ma.add_desktop(d);
                            }
                        }
                    }
                    self.monitors.remove(b.raw());
                    self.monitor_order.remove(j);
                    if self.current_monitor == Some(b) {
                        self.current_monitor = Some(a);
                    }
                } else {
                    j += 1;
                }
            }
            i += 1;
        }
    }

    /// Drops disconnected monitors per `settings.remove_disabled_monitors` /
    /// `remove_unplugged_monitors`; the distinction between the two is left
    /// to the caller driving `Monitor::connected` — this just acts on it.
    pub fn sweep_disconnected_monitors(&mut self) {
        if !(self.settings.remove_disabled_monitors || self.settings.remove_unplugged_monitors) {
            return;
        }
        let doomed: Vec<MonitorId> = self
            .monitor_order
            .iter()
            .copied()
            .filter(|&id| self.monitors.get(id.raw()).map(|m| !m.connected).unwrap_or(false))
            .collect();
        for id in doomed {
            let _ = self.remove_monitor(id);
        }
    }

    // --- Desktops ---------------------------------------------------------

    pub fn add_desktop(&mut self, monitor: MonitorId, name: impl Into<String>) -> EngineResult<DesktopId> {
        let desktop_id = DesktopId(self.desktops.insert(Desktop::new(name)));
        let m = self.monitors.get_mut(monitor.raw()).ok_or(EngineError::MonitorNotFound(monitor))?;
        m.add_desktop(desktop_id);
        self.emit(StatusEvent::DesktopAdd { monitor, desktop: desktop_id });
        Ok(desktop_id)
    }

    fn monitor_of_desktop(&self, desktop: DesktopId) -> Option<MonitorId> {
        self.monitor_order
            .iter()
            .copied()
            .find(|&m| self.monitors.get(m.raw()).map(|mon| mon.desktops.contains(&desktop)).unwrap_or(false))
    }

    pub fn remove_desktop(&mut self, desktop: DesktopId) -> EngineResult<()> {
        let d = self.desktops.get(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        if !d.is_empty() {
            return Err(EngineError::DesktopNotEmpty(desktop));
        }
        let monitor = self.monitor_of_desktop(desktop).ok_or(EngineError::DesktopNotFound(desktop))?;
        let m = self.monitors.get(monitor.raw()).ok_or(EngineError::MonitorNotFound(monitor))?;
        if m.desktops.len() <= 1 {
            return Err(EngineError::LastDesktopOnMonitor(monitor));
        }
        if let Some(m) = self.monitors.get_mut(monitor.raw()) {
            m.remove_desktop(desktop);
        }
        self.desktops.remove(desktop.raw());
        self.emit(StatusEvent::DesktopRemove { monitor, desktop });
        Ok(())
    }

    pub fn rename_desktop(&mut self, desktop: DesktopId, name: impl Into<String>) -> EngineResult<()> {
        let name = name.into();
        let d = self.desktops.get_mut(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        d.name = name.clone();
        self.emit(StatusEvent::DesktopRename { desktop, name });
        Ok(())
    }

    pub fn activate_desktop(&mut self, monitor: MonitorId, desktop: DesktopId) -> EngineResult<()> {
        let m = self.monitors.get_mut(monitor.raw()).ok_or(EngineError::MonitorNotFound(monitor))?;
        if !m.activate_desktop(desktop) {
            return Err(EngineError::DesktopNotFound(desktop));
        }
        self.current_monitor = Some(monitor);
        self.emit(StatusEvent::DesktopActivate { monitor, desktop });
        if let Some(node) = self.desktops.get(desktop.raw()).and_then(|d| d.focus_history.current()) {
            self.emit(StatusEvent::NodeActivate { desktop, node });
        }
        self.arrange_desktop(desktop)?;
        Ok(())
    }

    pub fn swap_desktops(&mut self, monitor: MonitorId, a: DesktopId, b: DesktopId) -> EngineResult<()> {
        let m = self.monitors.get_mut(monitor.raw()).ok_or(EngineError::MonitorNotFound(monitor))?;
        m.swap_desktops(a, b);
        self.emit(StatusEvent::DesktopSwap { monitor, a, b });
        Ok(())
    }

    pub fn transfer_desktop(&mut self, from: MonitorId, to: MonitorId, desktop: DesktopId) -> EngineResult<()> {
        {
            let src = self.monitors.get_mut(from.raw()).ok_or(EngineError::MonitorNotFound(from))?;
            src.remove_desktop(desktop);
        }
        let dst = self.monitors.get_mut(to.raw()).ok_or(EngineError::MonitorNotFound(to))?;
        dst.add_desktop(desktop);
        self.emit(StatusEvent::DesktopTransfer { from, to, desktop });
        Ok(())
    }

    pub fn set_layout_mode(&mut self, desktop: DesktopId, mode: LayoutMode) -> EngineResult<()> {
        let d = self.desktops.get_mut(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        d.layout_mode = mode;
        self.emit(StatusEvent::DesktopLayout { desktop, mode });
        self.arrange_desktop(desktop)?;
        Ok(())
    }

    // --- Windows ------------------------------------------------------

    pub fn insert_window(&mut self, desktop: DesktopId, handle: WindowHandle, initial_rect: Rect) -> EngineResult<NodeId> {
        let d = self.desktops.get(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        let target = d.focus_history.current();
        let was_empty = d.is_empty();
        let tile_limit = d.tile_limit;
        let border_width = d.border_width.unwrap_or(self.settings.border_width);
        let existing_tiled = d.root.map(|root| tiled_leaf_count(&self.nodes, root)).unwrap_or(0);

        let mut node = Node::new_leaf(initial_rect);
        let mut client = Client::new(handle, border_width, initial_rect);
        if tile_limit.enabled && existing_tiled + 1 > tile_limit.max {
            client.state = ClientState::Floating;
        }
        node.client = Some(client);
        let new_id = NodeId(self.nodes.insert(node));
        self.node_desktop.insert(new_id.raw(), desktop);

        let d = self.desktops.get_mut(desktop.raw()).unwrap();
        insert_node(&mut self.nodes, &mut d.root, target, new_id, &self.settings);
        if let Some(root) = d.root {
            rebuild_from_leaves(&mut self.nodes, root);
        }
        d.focus_history.push(new_id);

        propagate_flags(&mut self.nodes, new_id);
        self.stacking.stack(&self.nodes, new_id);
        self.emit(StatusEvent::NodeStack { node: new_id });
        self.emit(StatusEvent::NodeAdd { desktop, node: new_id });
        self.apply_single_monocle(desktop);
        self.arrange_desktop(desktop)?;
        if was_empty {
            self.emit(StatusEvent::Report);
        }
        self.backend.show(handle);
        Ok(new_id)
    }

    pub fn remove_window(&mut self, node: NodeId) -> EngineResult<()> {
        let desktop = *self.node_desktop.get(&node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        let handle = self
            .nodes
            .get(node.raw())
            .and_then(|n| n.client.as_ref())
            .map(|c| c.handle);
        let became_empty;
        {
            let d = self.desktops.get_mut(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
            remove_node(&mut self.nodes, &mut d.root, node);
            d.focus_history.remove(node);
            if let Some(root) = d.root {
                rebuild_from_leaves(&mut self.nodes, root);
            }
            became_empty = d.root.is_none();
        }
        self.stacking.remove(node);
        self.node_desktop.remove(&node.raw());
        self.emit(StatusEvent::NodeRemove { desktop, node });
        self.apply_single_monocle(desktop);
        self.arrange_desktop(desktop)?;
        if became_empty {
            self.emit(StatusEvent::Report);
        }
        if let Some(handle) = handle {
            self.backend.hide(handle);
        }
        Ok(())
    }

    /// Switches `desktop` to monocle while `settings.single_monocle` is on
    /// and at most one tiled leaf remains, and restores the user's own
    /// layout choice once a second tiled leaf reappears.
    fn apply_single_monocle(&mut self, desktop: DesktopId) {
        if !self.settings.single_monocle {
            return;
        }
        let Some(d) = self.desktops.get(desktop.raw()) else {
            return;
        };
        let count = d.root.map(|root| tiled_leaf_count(&self.nodes, root)).unwrap_or(0);
        let desired = if count <= 1 { LayoutMode::Monocle } else { d.user_layout };
        if d.layout_mode == desired {
            return;
        }
        if let Some(d) = self.desktops.get_mut(desktop.raw()) {
            d.layout_mode = desired;
        }
        self.emit(StatusEvent::DesktopLayout { desktop, mode: desired });
    }

    pub fn transfer_window(&mut self, node: NodeId, to_desktop: DesktopId) -> EngineResult<()> {
        let from_desktop = *self.node_desktop.get(&node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        if from_desktop == to_desktop {
            return Ok(());
        }
        let target = self
            .desktops
            .get(to_desktop.raw())
            .ok_or(EngineError::DesktopNotFound(to_desktop))?
            .focus_history
            .current();

        let mut src_root = self.desktops.get(from_desktop.raw()).and_then(|d| d.root);
        let mut dst_root = self.desktops.get(to_desktop.raw()).and_then(|d| d.root);
        transfer_node(&mut self.nodes, &mut src_root, &mut dst_root, node, target, &self.settings);
        if let Some(d) = self.desktops.get_mut(from_desktop.raw()) {
            d.root = src_root;
            d.focus_history.remove(node);
        }
        if let Some(d) = self.desktops.get_mut(to_desktop.raw()) {
            d.root = dst_root;
            d.focus_history.push(node);
        }
        self.node_desktop.insert(node.raw(), to_desktop);

        if let Some(root) = src_root {
            rebuild_from_leaves(&mut self.nodes, root);
        }
        if let Some(root) = dst_root {
            rebuild_from_leaves(&mut self.nodes, root);
        }
        self.emit(StatusEvent::NodeTransfer { from: from_desktop, to: to_desktop, node });
        self.arrange_desktop(from_desktop)?;
        self.arrange_desktop(to_desktop)?;
        Ok(())
    }

    // --- Focus --------------------------------------------------------

    pub fn focus_node(&mut self, desktop: DesktopId, node: NodeId) -> EngineResult<()> {
        let d = self.desktops.get_mut(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        d.focus_history.push(node);
        self.stacking.stack(&self.nodes, node);
        self.emit(StatusEvent::NodeStack { node });
        let monitor = self.monitor_of_desktop(desktop).unwrap_or(MonitorId(0));
        self.emit(StatusEvent::NodeFocus { monitor, desktop, node: Some(node) });
        let was_urgent = self
            .nodes
            .get(node.raw())
            .and_then(|n| n.client.as_ref())
            .map(|c| c.urgent)
            .unwrap_or(false);
        if was_urgent {
            self.set_urgent(node, false)?;
        }
        Ok(())
    }

    /// Sets or clears a client's urgency hint, keeping its desktop's urgent
    /// counter in sync. Focusing an urgent node clears it automatically (see
    /// `focus_node`).
    pub fn set_urgent(&mut self, node: NodeId, urgent: bool) -> EngineResult<()> {
        let desktop = *self.node_desktop.get(&node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        let client = n.client.as_mut().ok_or(EngineError::NodeNotFound(node))?;
        if client.urgent == urgent {
            return Ok(());
        }
        client.urgent = urgent;
        if let Some(d) = self.desktops.get_mut(desktop.raw()) {
            d.urgent_count = if urgent {
                d.urgent_count.saturating_add(1)
            } else {
                d.urgent_count.saturating_sub(1)
            };
        }
        self.emit(StatusEvent::NodeFlag { node, flag: "urgent", value: urgent });
        Ok(())
    }

    pub fn focus_direction(&mut self, desktop: DesktopId, dir: Direction) -> EngineResult<Option<NodeId>> {
        let d = self.desktops.get(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        let (root, source) = match (d.root, d.focus_history.current()) {
            (Some(root), Some(source)) => (root, source),
            _ => return Ok(None),
        };
        let candidate = find_directional_neighbor(&self.nodes, root, source, dir, self.settings.directional_focus_tightness);
        if let Some(id) = candidate {
            self.focus_node(desktop, id)?;
        }
        Ok(candidate)
    }

    pub fn move_direction(&mut self, desktop: DesktopId, dir: Direction) -> EngineResult<Option<NodeId>> {
        let d = self.desktops.get(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
        let (root, source) = match (d.root, d.focus_history.current()) {
            (Some(root), Some(source)) => (root, source),
            _ => return Ok(None),
        };
        let candidate = find_directional_neighbor(&self.nodes, root, source, dir, self.settings.directional_focus_tightness);
        if let Some(target) = candidate {
            let mut root_opt = Some(root);
            swap_nodes(&mut self.nodes, &mut root_opt, source, target);
            if let Some(d) = self.desktops.get_mut(desktop.raw()) {
                d.root = root_opt;
            }
            if let Some(r) = root_opt {
                rebuild_from_leaves(&mut self.nodes, r);
            }
            self.emit(StatusEvent::NodeSwap { a: source, b: target });
            self.arrange_desktop(desktop)?;
        }
        Ok(candidate)
    }

    // --- Node state -----------------------------------------------------

    pub fn set_client_state(&mut self, node: NodeId, state: ClientState) -> EngineResult<()> {
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        let client = n.client.as_mut().ok_or(EngineError::NodeNotFound(node))?;
        client.last_state = client.state;
        client.state = state;
        self.emit(StatusEvent::NodeState { node });
        propagate_flags(&mut self.nodes, node);
        if let Some(&desktop) = self.node_desktop.get(&node.raw()) {
            self.arrange_desktop(desktop)?;
        }
        Ok(())
    }

    /// Moves a client between the below/normal/above stacking layers,
    /// re-sorting its position in the stacking list accordingly.
    pub fn set_client_layer(&mut self, node: NodeId, layer: StackLayer) -> EngineResult<()> {
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        let client = n.client.as_mut().ok_or(EngineError::NodeNotFound(node))?;
        client.last_layer = client.layer;
        client.layer = layer;
        self.emit(StatusEvent::NodeLayer { node });
        self.stacking.stack(&self.nodes, node);
        self.emit(StatusEvent::NodeStack { node });
        Ok(())
    }

    pub fn toggle_flag(&mut self, node: NodeId, flag: &'static str, value: bool) -> EngineResult<()> {
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        match flag {
            "hidden" => n.flags.hidden = value,
            "sticky" => n.flags.sticky = value,
            "private" => n.flags.private = value,
            "locked" => n.flags.locked = value,
            "marked" => n.flags.marked = value,
            _ => return Ok(()),
        }
        propagate_flags(&mut self.nodes, node);
        self.emit(StatusEvent::NodeFlag { node, flag, value });
        if let Some(&desktop) = self.node_desktop.get(&node.raw()) {
            self.arrange_desktop(desktop)?;
        }
        Ok(())
    }

    pub fn preselect(&mut self, node: NodeId, split_type: SplitType, ratio: f64) -> EngineResult<()> {
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        if !n.is_leaf() {
            return Err(EngineError::NotALeaf(node));
        }
        n.presel = Some(Presel { split_type, ratio, feedback: None });
        self.emit(StatusEvent::NodePresel { node });
        Ok(())
    }

    pub fn cancel_presel(&mut self, node: NodeId) -> EngineResult<()> {
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        n.presel = None;
        self.emit(StatusEvent::NodePresel { node });
        Ok(())
    }

    pub fn set_split_ratio(&mut self, node: NodeId, ratio: f64) -> EngineResult<()> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(EngineError::InvalidSplitRatio(ratio));
        }
        let n = self.nodes.get_mut(node.raw()).ok_or(EngineError::NodeNotFound(node))?;
        n.split_ratio = ratio;
        let rectangle = n.rectangle;
        self.emit(StatusEvent::NodeGeometry { node, rectangle });
        if let Some(&desktop) = self.node_desktop.get(&node.raw()) {
            self.arrange_desktop(desktop)?;
        }
        Ok(())
    }

    // --- Shape operations ----------------------------------------------

    pub fn rotate(&mut self, desktop: DesktopId, node: NodeId, rotation: Rotation) -> EngineResult<()> {
        tree::rotate_tree(&mut self.nodes, node, rotation);
        self.arrange_desktop(desktop)
    }

    pub fn flip(&mut self, desktop: DesktopId, node: NodeId, axis: FlipAxis) -> EngineResult<()> {
        tree::flip_tree(&mut self.nodes, node, axis);
        self.arrange_desktop(desktop)
    }

    pub fn equalize(&mut self, desktop: DesktopId, node: NodeId) -> EngineResult<()> {
        tree::equalize_tree(&mut self.nodes, node, &self.settings);
        self.arrange_desktop(desktop)
    }

    pub fn balance(&mut self, desktop: DesktopId, node: NodeId) -> EngineResult<()> {
        tree::balance_tree(&mut self.nodes, node);
        self.arrange_desktop(desktop)
    }

    // --- Layout application ----------------------------------------------

    /// Recomputes rectangles for `desktop` and pushes every leaf's resulting
    /// position to the backend, raising/lowering per the stacking order.
    pub fn arrange_desktop(&mut self, desktop: DesktopId) -> EngineResult<()> {
        let (root, mode, padding, gap) = {
            let d = self.desktops.get(desktop.raw()).ok_or(EngineError::DesktopNotFound(desktop))?;
            (d.root, d.layout_mode, d.padding, d.gap)
        };
        let Some(root) = root else {
            return Ok(());
        };
        let monitor = self.monitor_of_desktop(desktop);
        let area = monitor
            .and_then(|m| self.monitors.get(m.raw()))
            .map(|m| m.rectangle)
            .unwrap_or(Rect::new(0, 0, 1920, 1080));
        let (top, right, bottom, left) = padding;
        let padded = area.shrink_edges(
            top.saturating_add(self.settings.top_padding),
            right.saturating_add(self.settings.right_padding),
            bottom.saturating_add(self.settings.bottom_padding),
            left.saturating_add(self.settings.left_padding),
        );
        let effective_settings = Settings {
            window_gap: gap.unwrap_or(self.settings.window_gap),
            ..self.settings.clone()
        };

        rebuild_towards_root(&mut self.nodes, root);
        arrange(&mut self.nodes, root, padded, &effective_settings, mode);

        for leaf in tree::collect_leaves(&self.nodes, root) {
            let Some(node) = self.nodes.get(leaf.raw()) else {
                continue;
            };
            let Some(client) = &node.client else {
                continue;
            };
            let rect = match client.state {
                ClientState::Floating => client.floating_rect,
                _ => client.tiled_rect,
            };
            let handle = client.handle;
            let hidden = node.flags.hidden;
            self.backend.move_resize(handle, rect);
            self.backend.set_border_width(handle, client.border_width);
            if hidden {
                self.backend.hide(handle);
            } else {
                self.backend.show(handle);
            }
        }
        Ok(())
    }

    pub fn dump_stacking_order(&self) -> Vec<NodeId> {
        self.stacking.to_vec()
    }

    pub fn restore_stacking_order(&mut self, order: Vec<NodeId>) {
        self.stacking = StackingList::from_order(order);
    }
}
