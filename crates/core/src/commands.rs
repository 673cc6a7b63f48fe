//! The closed set of user-facing actions a key-binder or IPC front end can
//! ask the engine to perform, and the executor that dispatches them.
//!
//! Grounded in the teacher's `commands::{Command, CommandExecutor}`,
//! generalized from the teacher's dwindle/master-stack vocabulary (swap with
//! master, increase master count) to the spec's binary-tree vocabulary
//! (rotate, flip, presel, directional move).

use crate::backend::WindowBackend;
use crate::error::EngineResult;
use crate::events::StatusSink;
use crate::geometry::Direction;
use crate::id::{DesktopId, MonitorId, NodeId};
use crate::layout::LayoutMode;
use crate::node::{ClientState, SplitType, StackLayer};
use crate::tree::{FlipAxis, Rotation};
use crate::Engine;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    FocusDirection(Direction),
    MoveDirection(Direction),
    Close(NodeId),
    Kill(NodeId),
    ToggleFloating(NodeId),
    ToggleFullscreen(NodeId),
    TogglePseudoTiled(NodeId),
    ToggleFlag(NodeId, &'static str, bool),
    SetClientLayer(NodeId, StackLayer),
    Rotate(DesktopId, NodeId, Rotation),
    Flip(DesktopId, NodeId, FlipAxis),
    Equalize(DesktopId, NodeId),
    Balance(DesktopId, NodeId),
    Preselect(NodeId, SplitType, f64),
    CancelPreselect(NodeId),
    SetSplitRatio(NodeId, f64),
    SetLayoutMode(DesktopId, LayoutMode),
    ActivateDesktop(MonitorId, DesktopId),
    SwapDesktops(MonitorId, DesktopId, DesktopId),
    RenameMonitor(MonitorId, &'static str),
    FocusMonitor(MonitorId),
    SwapMonitors(MonitorId, MonitorId),
}

/// Dispatches `Command`s onto an `Engine`. Kept as its own type (rather than
/// a free function) so a front end can wrap it to add logging, macro
/// replay, or permission checks around every dispatched command.
#[derive(Debug, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute<B: WindowBackend, S: StatusSink>(
        &self,
        engine: &mut Engine<B, S>,
        command: Command,
    ) -> EngineResult<()> {
        match command {
            Command::FocusDirection(dir) => {
                if let Some(desktop) = self.active_desktop(engine) {
                    engine.focus_direction(desktop, dir)?;
                }
                Ok(())
            }
            Command::MoveDirection(dir) => {
                if let Some(desktop) = self.active_desktop(engine) {
                    engine.move_direction(desktop, dir)?;
                }
                Ok(())
            }
            Command::Close(node) => {
                engine.backend_mut().close(self.handle_of(engine, node));
                Ok(())
            }
            Command::Kill(node) => {
                engine.backend_mut().kill(self.handle_of(engine, node));
                engine.remove_window(node)
            }
            Command::ToggleFloating(node) => {
                let current = self.state_of(engine, node);
                let next = if current == ClientState::Floating {
                    ClientState::Tiled
                } else {
                    ClientState::Floating
                };
                engine.set_client_state(node, next)
            }
            Command::ToggleFullscreen(node) => {
                let current = self.state_of(engine, node);
                let next = if current == ClientState::Fullscreen {
                    ClientState::Tiled
                } else {
                    ClientState::Fullscreen
                };
                engine.set_client_state(node, next)
            }
            Command::TogglePseudoTiled(node) => {
                let current = self.state_of(engine, node);
                let next = if current == ClientState::PseudoTiled {
                    ClientState::Tiled
                } else {
                    ClientState::PseudoTiled
                };
                engine.set_client_state(node, next)
            }
            Command::ToggleFlag(node, flag, value) => engine.toggle_flag(node, flag, value),
            Command::SetClientLayer(node, layer) => engine.set_client_layer(node, layer),
            Command::Rotate(desktop, node, rotation) => engine.rotate(desktop, node, rotation),
            Command::Flip(desktop, node, axis) => engine.flip(desktop, node, axis),
            Command::Equalize(desktop, node) => engine.equalize(desktop, node),
            Command::Balance(desktop, node) => engine.balance(desktop, node),
            Command::Preselect(node, split_type, ratio) => engine.preselect(node, split_type, ratio),
            Command::CancelPreselect(node) => engine.cancel_presel(node),
            Command::SetSplitRatio(node, ratio) => engine.set_split_ratio(node, ratio),
            Command::SetLayoutMode(desktop, mode) => engine.set_layout_mode(desktop, mode),
            Command::ActivateDesktop(monitor, desktop) => engine.activate_desktop(monitor, desktop),
            Command::SwapDesktops(monitor, a, b) => engine.swap_desktops(monitor, a, b),
            Command::RenameMonitor(monitor, name) => engine.rename_monitor(monitor, name),
            Command::FocusMonitor(monitor) => engine.focus_monitor(monitor),
            Command::SwapMonitors(a, b) => engine.swap_monitors(a, b),
        }
    }

    fn active_desktop<B: WindowBackend, S: StatusSink>(&self, engine: &Engine<B, S>) -> Option<DesktopId> {
        let monitor = engine.current_monitor()?;
        engine.monitor(monitor)?.active_desktop
    }

    fn state_of<B: WindowBackend, S: StatusSink>(&self, engine: &Engine<B, S>, node: NodeId) -> ClientState {
        engine
            .nodes()
            .get(node.raw())
            .and_then(|n| n.client.as_ref())
            .map(|c| c.state)
            .unwrap_or(ClientState::Tiled)
    }

    fn handle_of<B: WindowBackend, S: StatusSink>(&self, engine: &Engine<B, S>, node: NodeId) -> crate::backend::WindowHandle {
        engine
            .nodes()
            .get(node.raw())
            .and_then(|n| n.client.as_ref())
            .map(|c| c.handle)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::events::RecordingSink;
    use crate::geometry::Rect;
    use crate::settings::Settings;

    fn engine_with_one_window() -> (Engine<RecordingBackend, RecordingSink>, NodeId, DesktopId, MonitorId) {
        let mut engine = Engine::new(RecordingBackend::new(), RecordingSink::default(), Settings::default());
        let monitor = engine.add_monitor("DP-1", Rect::new(0, 0, 1920, 1080));
        let desktop = engine.add_desktop(monitor, "I").unwrap();
        engine.activate_desktop(monitor, desktop).unwrap();
        let node = engine.insert_window(desktop, 7, Rect::new(0, 0, 800, 600)).unwrap();
        (engine, node, desktop, monitor)
    }

    #[test]
    fn toggle_floating_flips_state_twice_back_to_tiled() {
        let (mut engine, node, _desktop, _monitor) = engine_with_one_window();
        let executor = CommandExecutor::new();
        executor.execute(&mut engine, Command::ToggleFloating(node)).unwrap();
        assert_eq!(executor.state_of(&engine, node), ClientState::Floating);
        executor.execute(&mut engine, Command::ToggleFloating(node)).unwrap();
        assert_eq!(executor.state_of(&engine, node), ClientState::Tiled);
    }

    #[test]
    fn kill_removes_the_window() {
        let (mut engine, node, _desktop, _monitor) = engine_with_one_window();
        let executor = CommandExecutor::new();
        executor.execute(&mut engine, Command::Kill(node)).unwrap();
        assert!(engine.nodes().get(node.raw()).is_none());
    }

    #[test]
    fn set_client_layer_moves_node_in_stacking_order() {
        let (mut engine, node, _desktop, _monitor) = engine_with_one_window();
        let executor = CommandExecutor::new();
        executor.execute(&mut engine, Command::SetClientLayer(node, StackLayer::Above)).unwrap();
        assert_eq!(engine.nodes().get(node.raw()).unwrap().client.as_ref().unwrap().layer, StackLayer::Above);
    }

    #[test]
    fn rename_and_focus_monitor_round_trip() {
        let (mut engine, _node, _desktop, monitor) = engine_with_one_window();
        let executor = CommandExecutor::new();
        executor.execute(&mut engine, Command::RenameMonitor(monitor, "DP-2")).unwrap();
        assert_eq!(engine.monitor(monitor).unwrap().name, "DP-2");
        executor.execute(&mut engine, Command::FocusMonitor(monitor)).unwrap();
        assert_eq!(engine.current_monitor(), Some(monitor));
    }
}
