//! The handler abstraction: per-capability contracts a backend implements.
//!
//! Every control delegates its behavior to exactly one handler. The handler
//! mirrors a subset of the control's state, performs operations with side
//! effects on the backend, and raises platform events back into the owning
//! control through single-subscriber callback slots. Handlers are never
//! shared between controls and are disposed together with their control.

/// Backend factory seam and environment queries.
mod backend;
/// Single-subscriber callback slots.
mod callback;
/// Widget-family capability traits.
mod capability;

use alder_geom::{Point, Rect};
pub use backend::{Backend, ControlKind, Display, NativeHandle};
pub use callback::Callback;
pub use capability::{CalendarHandler, ListViewHandler, TreeViewHandler, WindowHandler};

use crate::{
    control::Control,
    drawing::{Color, DrawContext},
    event::{key::KeyEvent, mouse::MouseEvent},
};

/// The result of a successful focus transfer.
#[derive(Debug, Clone, Default)]
pub struct FocusChange {
    /// The control that held focus before the transfer, if any.
    pub previous: Option<Control>,
}

/// The callback slots a handler raises into its owning control.
///
/// Each slot holds at most one subscriber; the owning control registers
/// multiplexing closures for the slots it consumes exactly once, when the
/// handler is created.
/// Slots are taken out of the struct for the duration of an invocation, so a
/// subscriber may safely re-enter the control (and thus the handler) while
/// running.
#[derive(Debug, Default)]
pub struct HandlerCallbacks {
    /// The control must paint itself into the provided surface.
    pub paint: Callback<dyn DrawContext>,
    /// Mouse button pressed.
    pub mouse_down: Callback<MouseEvent>,
    /// Mouse button released.
    pub mouse_up: Callback<MouseEvent>,
    /// Pointer moved.
    pub mouse_moved: Callback<MouseEvent>,
    /// Pointer entered the control.
    pub mouse_enter: Callback<MouseEvent>,
    /// Pointer left the control.
    pub mouse_leave: Callback<MouseEvent>,
    /// Wheel scrolled.
    pub mouse_wheel: Callback<MouseEvent>,
    /// Key pressed.
    pub key_down: Callback<KeyEvent>,
    /// Key released.
    pub key_up: Callback<KeyEvent>,
    /// The control gained keyboard focus.
    pub got_focus: Callback<()>,
    /// The control lost keyboard focus.
    pub lost_focus: Callback<()>,
    /// The backend changed the control's bounds.
    pub bounds_changed: Callback<Rect>,
    /// The backend changed the control's visibility.
    pub visibility_changed: Callback<bool>,
    /// A widget-level selection changed (lists, trees, calendars).
    pub selection_changed: Callback<()>,
    /// The backend destroyed the underlying native object.
    pub destroyed: Callback<()>,
}

/// The behavior contract between a control and one backend.
///
/// Tree-dependent operations take the owning control so implementations can
/// walk the parent chain explicitly; the headless implementation relies on
/// this to delegate to the nearest native-backed ancestor.
///
/// Operations that a backend cannot support are soft failures: they return
/// `false`, `None` or do nothing. They never panic and never error.
pub trait ControlHandler {
    /// Called once when the handler is bound to its control.
    fn attach(&mut self, _ctrl: &Control) {}

    /// Called when the control is disposed, before the handler is dropped.
    fn detach(&mut self, _ctrl: &Control) {}

    /// The handler's callback slots.
    fn callbacks(&mut self) -> &mut HandlerCallbacks;

    /// The bounds the backend believes the control has.
    fn bounds(&self) -> Rect;

    /// Mirror a bounds change into the backend.
    fn set_bounds(&mut self, ctrl: &Control, bounds: Rect);

    /// Mirror a visibility change into the backend.
    fn set_visible(&mut self, _ctrl: &Control, _visible: bool) {}

    /// Mirror an enabled-state change into the backend.
    fn set_enabled(&mut self, _ctrl: &Control, _enabled: bool) {}

    /// Mirror effective colors into the backend.
    fn apply_colors(
        &mut self,
        _ctrl: &Control,
        _background: Option<Color>,
        _foreground: Option<Color>,
    ) {
    }

    /// Request a repaint of the whole control.
    fn invalidate(&mut self, ctrl: &Control) {
        let rect = ctrl.bounds().size.rect();
        self.invalidate_rect(ctrl, rect);
    }

    /// Request a repaint of a client-space rectangle.
    fn invalidate_rect(&mut self, ctrl: &Control, rect: Rect);

    /// Transfer keyboard focus to the control. `None` means the backend
    /// refused or cannot represent focus.
    fn set_focus(&mut self, _ctrl: &Control) -> Option<FocusChange> {
        None
    }

    /// Begin routing all mouse input to the control. Soft failure.
    fn capture_mouse(&mut self, _ctrl: &Control) -> bool {
        false
    }

    /// Stop routing all mouse input to the control.
    fn release_mouse(&mut self, _ctrl: &Control) {}

    /// Convert a client-space point to screen coordinates.
    fn client_to_screen(&self, ctrl: &Control, point: Point) -> Point;

    /// Convert a screen-space point to client coordinates.
    fn screen_to_client(&self, ctrl: &Control, point: Point) -> Point;

    /// Pixels per device-independent unit for the control's display.
    fn scale_factor(&self, ctrl: &Control) -> f32;

    /// The native handle, for controls realized as actual native objects.
    ///
    /// This is the predicate that terminates headless parent-chain
    /// delegation: a control whose handler returns `Some` performs OS-level
    /// conversions itself.
    fn native_handle(&self) -> Option<NativeHandle> {
        None
    }

    /// Whether visual children of this control must realize native controls
    /// of their own, rather than delegating rendering and hit-testing here.
    fn visual_child_needs_native_control(&self) -> bool {
        false
    }

    /// The list-view capability surface, if this handler provides one.
    fn list_view(&mut self) -> Option<&mut dyn ListViewHandler> {
        None
    }

    /// The tree-view capability surface, if this handler provides one.
    fn tree_view(&mut self) -> Option<&mut dyn TreeViewHandler> {
        None
    }

    /// The calendar capability surface, if this handler provides one.
    fn calendar(&mut self) -> Option<&mut dyn CalendarHandler> {
        None
    }

    /// The window capability surface, if this handler provides one.
    fn window(&mut self) -> Option<&mut dyn WindowHandler> {
        None
    }
}
