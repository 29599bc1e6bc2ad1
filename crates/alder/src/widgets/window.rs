//! The top-level window widget.

use std::rc::Rc;

use alder_geom::Point;

use crate::{
    control::Control,
    handler::{Backend, ControlKind, WindowHandler},
};

/// A top-level window: a control whose handler carries the window
/// capability. Operations on backends without the capability are soft
/// no-ops.
#[derive(Clone)]
pub struct Window {
    /// The underlying control.
    ctrl: Control,
}

impl Window {
    /// Construct a regular top-level window.
    pub fn new(backend: Rc<dyn Backend>) -> Self {
        Self {
            ctrl: Control::new(backend, ControlKind::Window),
        }
    }

    /// Construct a transient popup window.
    pub fn new_popup(backend: Rc<dyn Backend>) -> Self {
        Self {
            ctrl: Control::new(backend, ControlKind::Popup),
        }
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.ctrl
    }

    /// Run a closure against the window capability, if present.
    fn with_window<R>(&self, f: impl FnOnce(&mut dyn WindowHandler) -> R) -> Option<R> {
        self.ctrl.with_handler(|h, _| h.window().map(f)).flatten()
    }

    /// Set the window title.
    pub fn set_title(&self, title: &str) {
        self.with_window(|w| w.set_title(title));
    }

    /// The window's top-left corner in screen coordinates.
    pub fn screen_position(&self) -> Point {
        self.with_window(|w| w.screen_position()).unwrap_or_default()
    }

    /// Move the window on screen.
    pub fn set_screen_position(&self, position: Point) {
        self.with_window(|w| w.set_screen_position(position));
    }

    /// Bring the window to the foreground. Soft failure.
    pub fn activate(&self) -> bool {
        self.with_window(|w| w.activate()).unwrap_or(false)
    }

    /// Show the window.
    pub fn show(&self) {
        self.ctrl.set_visible(true);
    }

    /// Hide the window.
    pub fn hide(&self) {
        self.ctrl.set_visible(false);
    }

    /// True while the window is shown.
    pub fn is_visible(&self) -> bool {
        self.ctrl.visible()
    }

    /// Enter transient popup presentation.
    pub(crate) fn begin_popup(&self) {
        self.with_window(|w| w.begin_popup());
    }

    /// Leave transient popup presentation.
    pub(crate) fn end_popup(&self) {
        self.with_window(|w| w.end_popup());
    }

    /// True while in popup presentation.
    pub fn is_popup_shown(&self) -> bool {
        self.with_window(|w| w.is_popup_shown()).unwrap_or(false)
    }

    /// The control in this window holding keyboard focus, if any.
    pub fn focused_child(&self) -> Option<Control> {
        self.with_window(|w| w.focused_child()).flatten()
    }
}
