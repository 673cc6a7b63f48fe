//! Status events the engine emits as it mutates state, and the sinks that
//! can receive them.
//!
//! Grounded in the teacher's `ipc::events::{Event, EventBroadcaster}`,
//! generalized from the teacher's fixed `tokio::sync::broadcast` fan-out to
//! a `StatusSink` trait so tests can assert on emitted events with a
//! `RecordingSink` instead of subscribing to a channel.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::geometry::Rect;
use crate::id::{DesktopId, MonitorId, NodeId};
use crate::layout::LayoutMode;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    NodeAdd { desktop: DesktopId, node: NodeId },
    NodeRemove { desktop: DesktopId, node: NodeId },
    NodeSwap { a: NodeId, b: NodeId },
    NodeTransfer { from: DesktopId, to: DesktopId, node: NodeId },
    NodeFocus { monitor: MonitorId, desktop: DesktopId, node: Option<NodeId> },
    NodeActivate { desktop: DesktopId, node: NodeId },
    NodeState { node: NodeId },
    NodeLayer { node: NodeId },
    NodeFlag { node: NodeId, flag: &'static str, value: bool },
    NodeGeometry { node: NodeId, rectangle: Rect },
    NodePresel { node: NodeId },
    NodeStack { node: NodeId },
    DesktopFocus { monitor: MonitorId, desktop: DesktopId },
    DesktopAdd { monitor: MonitorId, desktop: DesktopId },
    DesktopRemove { monitor: MonitorId, desktop: DesktopId },
    DesktopRename { desktop: DesktopId, name: String },
    DesktopSwap { monitor: MonitorId, a: DesktopId, b: DesktopId },
    DesktopTransfer { from: MonitorId, to: MonitorId, desktop: DesktopId },
    DesktopActivate { monitor: MonitorId, desktop: DesktopId },
    DesktopLayout { desktop: DesktopId, mode: LayoutMode },
    MonitorAdd { monitor: MonitorId },
    MonitorRemove { monitor: MonitorId },
    MonitorRename { monitor: MonitorId, name: String },
    MonitorSwap { a: MonitorId, b: MonitorId },
    MonitorFocus { monitor: MonitorId },
    MonitorGeometry { monitor: MonitorId, rectangle: Rect },
    Report,
}

impl StatusEvent {
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::NodeAdd { .. } => "node_add",
            StatusEvent::NodeRemove { .. } => "node_remove",
            StatusEvent::NodeSwap { .. } => "node_swap",
            StatusEvent::NodeTransfer { .. } => "node_transfer",
            StatusEvent::NodeFocus { .. } => "node_focus",
            StatusEvent::NodeActivate { .. } => "node_activate",
            StatusEvent::NodeState { .. } => "node_state",
            StatusEvent::NodeLayer { .. } => "node_layer",
            StatusEvent::NodeFlag { .. } => "node_flag",
            StatusEvent::NodeGeometry { .. } => "node_geometry",
            StatusEvent::NodePresel { .. } => "node_presel",
            StatusEvent::NodeStack { .. } => "node_stack",
            StatusEvent::DesktopFocus { .. } => "desktop_focus",
            StatusEvent::DesktopAdd { .. } => "desktop_add",
            StatusEvent::DesktopRemove { .. } => "desktop_remove",
            StatusEvent::DesktopRename { .. } => "desktop_rename",
            StatusEvent::DesktopSwap { .. } => "desktop_swap",
            StatusEvent::DesktopTransfer { .. } => "desktop_transfer",
            StatusEvent::DesktopActivate { .. } => "desktop_activate",
            StatusEvent::DesktopLayout { .. } => "desktop_layout",
            StatusEvent::MonitorAdd { .. } => "monitor_add",
            StatusEvent::MonitorRemove { .. } => "monitor_remove",
            StatusEvent::MonitorRename { .. } => "monitor_rename",
            StatusEvent::MonitorSwap { .. } => "monitor_swap",
            StatusEvent::MonitorFocus { .. } => "monitor_focus",
            StatusEvent::MonitorGeometry { .. } => "monitor_geometry",
            StatusEvent::Report => "report",
        }
    }
}

/// Where the engine sends `StatusEvent`s as it works. Implementors must not
/// block the engine's call thread for long; a real front end should forward
/// onto its own channel rather than do I/O inline.
pub trait StatusSink {
    fn emit(&mut self, event: StatusEvent);
}

/// Drops every event. The default for engines that don't need a status
/// feed at all.
#[derive(Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn emit(&mut self, _event: StatusEvent) {}
}

/// Fans events out over a `tokio::sync::broadcast` channel, the way the
/// teacher's `EventBroadcaster` does, for a long-lived front end (a status
/// bar, a socket server) to subscribe to.
pub struct BroadcastSink {
    sender: broadcast::Sender<StatusEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl StatusSink for BroadcastSink {
    fn emit(&mut self, event: StatusEvent) {
        // No active subscribers is not an error; the event is simply unheard.
        let _ = self.sender.send(event);
    }
}

/// Records every emitted event in order, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<StatusEvent>,
}

impl StatusSink for RecordingSink {
    fn emit(&mut self, event: StatusEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_preserves_order() {
        let mut sink = RecordingSink::default();
        sink.emit(StatusEvent::DesktopAdd {
            monitor: MonitorId(0),
            desktop: DesktopId(0),
        });
        sink.emit(StatusEvent::Report);
        assert_eq!(sink.events.len(), 2);
        assert_eq!(sink.events[1].name(), "report");
    }

    #[tokio::test]
    async fn broadcast_sink_delivers_to_subscriber() {
        let mut sink = BroadcastSink::new(16);
        let mut rx = sink.subscribe();
        sink.emit(StatusEvent::Report);
        let received = rx.recv().await.unwrap();
        assert_eq!(received.name(), "report");
    }
}
