//! A monitor: the physical (or virtual, in the `RecordingBackend` case)
//! output a set of desktops is displayed on.
//!
//! Grounded in the teacher's `window_manager::monitor::{MonitorInfo,
//! MonitorManager}`, generalized from a flat `Vec<usize>` of workspace
//! indices to an ordered `Vec<DesktopId>` and from `HMONITOR`-keyed identity
//! to the arena's own `MonitorId`.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::id::DesktopId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monitor {
    pub name: String,
    pub rectangle: Rect,
    pub desktops: Vec<DesktopId>,
    pub active_desktop: Option<DesktopId>,
    /// Whether the backend currently reports this output as connected; a
    /// monitor can still exist (and hold desktops) after going `false` when
    /// `remove_unplugged_monitors` is off.
    pub connected: bool,
}

impl Monitor {
    pub fn new(name: impl Into<String>, rectangle: Rect) -> Self {
        Self {
            name: name.into(),
            rectangle,
            desktops: Vec::new(),
            active_desktop: None,
            connected: true,
        }
    }

    pub fn add_desktop(&mut self, id: DesktopId) {
        self.desktops.push(id);
        if self.active_desktop.is_none() {
            self.active_desktop = Some(id);
        }
    }

    /// Removes `id` from this monitor's desktop list. If it was the active
    /// desktop, activates its former neighbor (preferring the one that took
    /// its slot) so the monitor is never left without an active desktop
    /// while it still has any.
    pub fn remove_desktop(&mut self, id: DesktopId) {
        let Some(pos) = self.desktops.iter().position(|&d| d == id) else {
            return;
        };
        self.desktops.remove(pos);
        if self.active_desktop == Some(id) {
            self.active_desktop = self
                .desktops
                .get(pos)
                .or_else(|| self.desktops.get(pos.saturating_sub(1)))
                .copied();
        }
    }

    pub fn activate_desktop(&mut self, id: DesktopId) -> bool {
        if self.desktops.contains(&id) {
            self.active_desktop = Some(id);
            true
        } else {
            false
        }
    }

    /// Swaps the positions of two desktops within this monitor's ordering.
    pub fn swap_desktops(&mut self, a: DesktopId, b: DesktopId) {
        let (Some(ia), Some(ib)) = (
            self.desktops.iter().position(|&d| d == a),
            self.desktops.iter().position(|&d| d == b),
        ) else {
            return;
        };
        self.desktops.swap(ia, ib);
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }
}

/// Whether `a` and `b` overlap closely enough that `merge_overlapping_monitors`
/// should fold `b`'s desktops into `a`.
pub fn overlaps(a: &Monitor, b: &Monitor) -> bool {
    a.rectangle.intersects(&b.rectangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_desktop_becomes_active() {
        let mut m = Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080));
        m.add_desktop(DesktopId(1));
        assert_eq!(m.active_desktop, Some(DesktopId(1)));
    }

    #[test]
    fn removing_active_desktop_activates_neighbor() {
        let mut m = Monitor::new("DP-1", Rect::new(0, 0, 1920, 1080));
        m.add_desktop(DesktopId(1));
        m.add_desktop(DesktopId(2));
        m.activate_desktop(DesktopId(1));
        m.remove_desktop(DesktopId(1));
        assert_eq!(m.active_desktop, Some(DesktopId(2)));
    }

    #[test]
    fn overlapping_monitors_detected() {
        let a = Monitor::new("A", Rect::new(0, 0, 1000, 1000));
        let b = Monitor::new("B", Rect::new(500, 500, 1000, 1000));
        assert!(overlaps(&a, &b));
    }
}
