//! Save/restore of engine state to JSON, independent of any backend or
//! sink (neither is serializable, nor should a saved snapshot reconnect to
//! a stale display-server session on its own).
//!
//! Grounded in the teacher's `config::schema` serde round-trip style,
//! applied here to runtime state rather than a static config file.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::WindowBackend;
use crate::desktop::Desktop;
use crate::error::EngineResult;
use crate::events::StatusSink;
use crate::id::{Arena, DesktopId, MonitorId, NodeId};
use crate::monitor::Monitor;
use crate::node::Node;
use crate::settings::Settings;
use crate::Engine;

#[derive(Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub nodes: Arena<Node>,
    pub monitors: Arena<Monitor>,
    pub desktops: Arena<Desktop>,
    pub monitor_order: Vec<MonitorId>,
    pub current_monitor: Option<MonitorId>,
    pub node_desktop: HashMap<u32, DesktopId>,
    pub stacking_order: Vec<NodeId>,
    pub settings: Settings,
}

impl<B: WindowBackend, S: StatusSink> Engine<B, S> {
    pub fn dump(&self) -> EngineSnapshot {
        EngineSnapshot {
            nodes: self.nodes_arena_clone(),
            monitors: self.monitors_arena_clone(),
            desktops: self.desktops_arena_clone(),
            monitor_order: self.monitor_order_clone(),
            current_monitor: self.current_monitor(),
            node_desktop: self.node_desktop_clone(),
            stacking_order: self.dump_stacking_order(),
            settings: self.settings.clone(),
        }
    }

    pub fn dump_to_writer<W: Write>(&self, writer: W) -> EngineResult<()> {
        serde_json::to_writer_pretty(writer, &self.dump())?;
        Ok(())
    }

    pub fn dump_to_file(&self, path: impl AsRef<Path>) -> EngineResult<()> {
        let file = std::fs::File::create(path)?;
        self.dump_to_writer(file)
    }

    pub fn load(&mut self, snapshot: EngineSnapshot) {
        self.replace_state(snapshot);
    }

    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> EngineResult<()> {
        let file = std::fs::File::open(path)?;
        let snapshot: EngineSnapshot = serde_json::from_reader(file)?;
        self.load(snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordingBackend;
    use crate::events::NullSink;
    use crate::geometry::Rect;

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut engine = Engine::new(RecordingBackend::new(), NullSink, Settings::default());
        let monitor = engine.add_monitor("DP-1", Rect::new(0, 0, 1920, 1080));
        let desktop = engine.add_desktop(monitor, "I").unwrap();
        engine.activate_desktop(monitor, desktop).unwrap();
        engine.insert_window(desktop, 1, Rect::new(0, 0, 800, 600)).unwrap();

        engine.dump_to_file(&path).unwrap();

        let mut restored = Engine::new(RecordingBackend::new(), NullSink, Settings::default());
        restored.load_from_file(&path).unwrap();

        assert_eq!(restored.nodes().len(), engine.nodes().len());
        assert_eq!(restored.current_monitor(), engine.current_monitor());
    }
}
