//! The seam between the engine and a real display server. Everything the
//! engine needs to *do* to the outside world — move a window, raise it,
//! change its border, ask where the pointer is — goes through this trait,
//! so the engine itself never depends on a concrete protocol.
//!
//! Grounded in the teacher's `cfg(windows)`-gated `SetWindowPos`/
//! `SetForegroundWindow` calls in `window_manager::tree`/`focus`,
//! generalized into a trait so the engine can be driven by
//! `RecordingBackend` in tests instead of a live display connection.

use crate::geometry::Rect;
use crate::node::SizeHints;

/// An opaque handle to a window as the backend understands it. The engine
/// never interprets this value, only threads it through.
pub type WindowHandle = u32;

/// What the engine asks a display-server connection to do. Every method
/// takes `&mut self` since a real implementation owns a socket/connection;
/// none are expected to block indefinitely.
pub trait WindowBackend {
    fn move_resize(&mut self, window: WindowHandle, rect: Rect);
    fn set_border_width(&mut self, window: WindowHandle, width: u16);
    fn set_border_color(&mut self, window: WindowHandle, urgent: bool, focused: bool);
    fn show(&mut self, window: WindowHandle);
    fn hide(&mut self, window: WindowHandle);
    fn raise(&mut self, window: WindowHandle);
    fn lower(&mut self, window: WindowHandle);
    fn set_input_focus(&mut self, window: WindowHandle);
    fn set_fullscreen(&mut self, window: WindowHandle, fullscreen: bool);
    fn close(&mut self, window: WindowHandle);
    fn kill(&mut self, window: WindowHandle);
    fn query_size_hints(&mut self, window: WindowHandle) -> SizeHints;
    fn query_pointer_position(&mut self) -> (i16, i16);
    fn warp_pointer(&mut self, x: i16, y: i16);
}

/// Every call a `RecordingBackend` observed, for assertions in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    MoveResize(WindowHandle, Rect),
    SetBorderWidth(WindowHandle, u16),
    SetBorderColor(WindowHandle, bool, bool),
    Show(WindowHandle),
    Hide(WindowHandle),
    Raise(WindowHandle),
    Lower(WindowHandle),
    SetInputFocus(WindowHandle),
    SetFullscreen(WindowHandle, bool),
    Close(WindowHandle),
    Kill(WindowHandle),
    WarpPointer(i16, i16),
}

/// A no-op backend that records every call instead of driving a display
/// server, used by engine-level tests so they can assert on the sequence of
/// side effects without a real window system.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
    pub pointer: (i16, i16),
    pub next_size_hints: SizeHints,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowBackend for RecordingBackend {
    fn move_resize(&mut self, window: WindowHandle, rect: Rect) {
        self.calls.push(BackendCall::MoveResize(window, rect));
    }

    fn set_border_width(&mut self, window: WindowHandle, width: u16) {
        self.calls.push(BackendCall::SetBorderWidth(window, width));
    }

    fn set_border_color(&mut self, window: WindowHandle, urgent: bool, focused: bool) {
        self.calls.push(BackendCall::SetBorderColor(window, urgent, focused));
    }

    fn show(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Show(window));
    }

    fn hide(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Hide(window));
    }

    fn raise(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Raise(window));
    }

    fn lower(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Lower(window));
    }

    fn set_input_focus(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::SetInputFocus(window));
    }

    fn set_fullscreen(&mut self, window: WindowHandle, fullscreen: bool) {
        self.calls.push(BackendCall::SetFullscreen(window, fullscreen));
    }

    fn close(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Close(window));
    }

    fn kill(&mut self, window: WindowHandle) {
        self.calls.push(BackendCall::Kill(window));
    }

    fn query_size_hints(&mut self, _window: WindowHandle) -> SizeHints {
        self.next_size_hints
    }

    fn query_pointer_position(&mut self) -> (i16, i16) {
        self.pointer
    }

    fn warp_pointer(&mut self, x: i16, y: i16) {
        self.pointer = (x, y);
        self.calls.push(BackendCall::WarpPointer(x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_backend_captures_calls_in_order() {
        let mut backend = RecordingBackend::new();
        backend.show(1);
        backend.move_resize(1, Rect::new(0, 0, 100, 100));
        backend.raise(1);
        assert_eq!(
            backend.calls,
            vec![
                BackendCall::Show(1),
                BackendCall::MoveResize(1, Rect::new(0, 0, 100, 100)),
                BackendCall::Raise(1),
            ]
        );
    }
}
