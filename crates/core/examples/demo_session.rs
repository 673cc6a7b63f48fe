//! Drives a small window-tree session end to end using the in-memory
//! `RecordingBackend`, the way a real front end would drive a live
//! connection, and prints the resulting layout.

use bintree_wm_core::backend::RecordingBackend;
use bintree_wm_core::commands::{Command, CommandExecutor};
use bintree_wm_core::events::RecordingSink;
use bintree_wm_core::geometry::{Direction, Rect};
use bintree_wm_core::settings::Settings;
use bintree_wm_core::Engine;

use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut engine = Engine::new(RecordingBackend::new(), RecordingSink::default(), Settings::default());
    let monitor = engine.add_monitor("DP-1", Rect::new(0, 0, 1920, 1080));
    let desktop = engine.add_desktop(monitor, "I")?;
    engine.activate_desktop(monitor, desktop)?;

    let first = engine.insert_window(desktop, 1, Rect::new(0, 0, 1, 1))?;
    let _second = engine.insert_window(desktop, 2, Rect::new(0, 0, 1, 1))?;

    let executor = CommandExecutor::new();
    executor.execute(&mut engine, Command::FocusDirection(Direction::West))?;
    executor.execute(&mut engine, Command::ToggleFullscreen(first))?;

    for (raw, node) in engine.nodes().iter() {
        println!("node {raw}: rect={:?} client={:?}", node.rectangle, node.client);
    }
    Ok(())
}
