//! The Pless native-backed window handler.

use std::rc::Rc;

use alder_geom::{Point, Rect};

use super::PlessEnv;
use crate::{
    control::{Control, WeakControl},
    handler::{ControlHandler, HandlerCallbacks, NativeHandle, WindowHandler},
};

/// The native-backed terminus of a Pless tree.
///
/// Owns a synthetic native handle, a screen origin, the focus record for the
/// window's subtree and the popup presentation flag. Damage arriving from
/// descendants is recorded in the environment log.
pub struct PlessWindowHandler {
    /// Shared environment.
    env: Rc<PlessEnv>,
    /// Callback slots raised into the owning control.
    callbacks: HandlerCallbacks,
    /// Mirrored bounds.
    bounds: Rect,
    /// Synthetic native handle.
    handle: NativeHandle,
    /// Top-left corner in screen coordinates.
    screen_position: Point,
    /// Window title.
    title: String,
    /// True while in popup presentation.
    popup_shown: bool,
    /// The descendant holding keyboard focus, if any.
    focused: Option<WeakControl>,
}

impl PlessWindowHandler {
    /// Construct a window handler with a fresh synthetic handle.
    pub(crate) fn new(env: Rc<PlessEnv>) -> Self {
        let handle = env.next_handle();
        Self {
            env,
            callbacks: HandlerCallbacks::default(),
            bounds: Rect::zero(),
            handle,
            screen_position: Point::zero(),
            title: String::new(),
            popup_shown: false,
            focused: None,
        }
    }

    /// The window title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl ControlHandler for PlessWindowHandler {
    fn callbacks(&mut self) -> &mut HandlerCallbacks {
        &mut self.callbacks
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, _ctrl: &Control, bounds: Rect) {
        self.bounds = bounds;
    }

    fn invalidate_rect(&mut self, _ctrl: &Control, rect: Rect) {
        self.env.log(format!(
            "window: invalidate {},{} {}x{}",
            rect.origin.x, rect.origin.y, rect.size.w, rect.size.h
        ));
    }

    fn client_to_screen(&self, _ctrl: &Control, point: Point) -> Point {
        point + self.screen_position.to_vector()
    }

    fn screen_to_client(&self, _ctrl: &Control, point: Point) -> Point {
        point - self.screen_position.to_vector()
    }

    fn scale_factor(&self, _ctrl: &Control) -> f32 {
        self.env.display().scale_factor()
    }

    fn native_handle(&self) -> Option<NativeHandle> {
        Some(self.handle)
    }

    fn window(&mut self) -> Option<&mut dyn WindowHandler> {
        Some(self)
    }
}

impl WindowHandler for PlessWindowHandler {
    fn set_title(&mut self, title: &str) {
        self.title = title.into();
        self.env.log(format!("window: title {title}"));
    }

    fn screen_position(&self) -> Point {
        self.screen_position
    }

    fn set_screen_position(&mut self, position: Point) {
        self.screen_position = position;
        self.env.log(format!(
            "window: moved to {},{}",
            position.x, position.y
        ));
    }

    fn activate(&mut self) -> bool {
        self.env.log("window: activated");
        true
    }

    fn begin_popup(&mut self) {
        self.popup_shown = true;
        self.env.log("window: begin_popup");
    }

    fn end_popup(&mut self) {
        self.popup_shown = false;
        self.env.log("window: end_popup");
    }

    fn is_popup_shown(&self) -> bool {
        self.popup_shown
    }

    fn set_focused_child(&mut self, ctrl: &Control) -> Option<Control> {
        let previous = self.focused_child();
        self.focused = Some(ctrl.downgrade());
        previous
    }

    fn focused_child(&self) -> Option<Control> {
        self.focused
            .as_ref()
            .and_then(WeakControl::upgrade)
            .filter(|c| !c.is_disposed())
    }
}
