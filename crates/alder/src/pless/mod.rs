//! The Pless backend: a platformless handler implementation.
//!
//! Pless handlers have no native windows. OS-dependent operations walk the
//! parent chain and resolve at the nearest native-backed ancestor; in a
//! fully Pless tree that ancestor is a [`PlessWindowHandler`], which owns a
//! synthetic native handle, a screen origin and the focus record. Pless
//! doubles as the test backend: every backend-visible effect is appended to
//! a shared log on the [`PlessEnv`].

/// The delegating control handler and capability states.
mod handler;
/// The native-backed window handler.
mod window;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

pub use handler::PlessControlHandler;
pub use window::PlessWindowHandler;

use crate::handler::{Backend, ControlHandler, ControlKind, Display, NativeHandle};

/// Shared environment for one Pless backend instance: display information,
/// synthetic handle allocation and the effect log.
pub struct PlessEnv {
    /// The primary display.
    display: RefCell<Display>,
    /// Backend-visible effects, in order.
    log: RefCell<Vec<String>>,
    /// Next synthetic native handle value.
    next_handle: Cell<u64>,
}

impl PlessEnv {
    /// Construct an environment for a display.
    fn new(display: Display) -> Rc<Self> {
        Rc::new(Self {
            display: RefCell::new(display),
            log: RefCell::new(Vec::new()),
            next_handle: Cell::new(1),
        })
    }

    /// The primary display.
    pub fn display(&self) -> Display {
        *self.display.borrow()
    }

    /// Replace the primary display.
    pub fn set_display(&self, display: Display) {
        *self.display.borrow_mut() = display;
    }

    /// Append a line to the effect log.
    pub(crate) fn log(&self, line: impl Into<String>) {
        self.log.borrow_mut().push(line.into());
    }

    /// Drain and return the effect log.
    pub fn take_log(&self) -> Vec<String> {
        std::mem::take(&mut self.log.borrow_mut())
    }

    /// Allocate a synthetic native handle.
    pub(crate) fn next_handle(&self) -> NativeHandle {
        let h = self.next_handle.get();
        self.next_handle.set(h + 1);
        NativeHandle(h)
    }
}

/// The Pless [`Backend`]: realizes window kinds as native-backed
/// [`PlessWindowHandler`]s and everything else as delegating
/// [`PlessControlHandler`]s.
pub struct PlessBackend {
    /// Shared environment.
    env: Rc<PlessEnv>,
}

impl PlessBackend {
    /// Construct a backend with the default display.
    pub fn new() -> Rc<Self> {
        Self::with_display(Display::default())
    }

    /// Construct a backend with a specific display.
    pub fn with_display(display: Display) -> Rc<Self> {
        Rc::new(Self {
            env: PlessEnv::new(display),
        })
    }

    /// The shared environment, for inspection in tests.
    pub fn env(&self) -> Rc<PlessEnv> {
        self.env.clone()
    }
}

impl Backend for PlessBackend {
    fn create_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler> {
        match kind {
            ControlKind::Window | ControlKind::Popup => {
                Box::new(PlessWindowHandler::new(self.env.clone()))
            }
            _ => Box::new(PlessControlHandler::new(self.env.clone(), kind)),
        }
    }

    fn create_delegated_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler> {
        Box::new(PlessControlHandler::new(self.env.clone(), kind))
    }

    fn display(&self) -> Display {
        self.env.display()
    }
}

#[cfg(test)]
mod tests {
    use alder_geom::{Point, Rect};

    use super::*;
    use crate::control::Control;

    fn backend() -> (Rc<PlessBackend>, Rc<dyn Backend>) {
        let b = PlessBackend::new();
        let dyn_b: Rc<dyn Backend> = b.clone();
        (b, dyn_b)
    }

    fn window_at(b: &Rc<dyn Backend>, pos: Point) -> Control {
        let w = Control::new(b.clone(), ControlKind::Window);
        w.with_handler(|h, _| {
            if let Some(win) = h.window() {
                win.set_screen_position(pos);
            }
        });
        w
    }

    #[test]
    fn client_to_screen_sums_origins_to_native_root() {
        let (_b, b) = backend();
        let window = window_at(&b, Point::new(100.0, 200.0));
        let a = Control::new(b.clone(), ControlKind::Panel);
        let c = Control::new(b.clone(), ControlKind::Generic);
        window.add_child(&a).unwrap();
        a.add_child(&c).unwrap();
        a.set_bounds(Rect::new(10.0, 10.0, 50.0, 50.0));
        c.set_bounds(Rect::new(5.0, 5.0, 20.0, 20.0));

        let screen = c.client_to_screen(Point::new(1.0, 1.0));
        assert_eq!(screen, Point::new(116.0, 216.0));
        assert_eq!(c.screen_to_client(screen), Point::new(1.0, 1.0));
    }

    #[test]
    fn unparented_control_converts_relative_to_origin() {
        let (_b, b) = backend();
        let c = Control::new(b, ControlKind::Generic);
        c.set_bounds(Rect::new(7.0, 8.0, 10.0, 10.0));
        assert_eq!(c.client_to_screen(Point::new(1.0, 1.0)), Point::new(8.0, 9.0));
    }

    #[test]
    fn native_handles_only_on_windows() {
        let (_b, b) = backend();
        let window = Control::new(b.clone(), ControlKind::Window);
        let panel = Control::new(b, ControlKind::Panel);
        window.add_child(&panel).unwrap();
        assert!(window.native_handle().is_some());
        assert!(panel.native_handle().is_none());
    }

    #[test]
    fn damage_terminates_at_window() {
        let (pb, b) = backend();
        let window = window_at(&b, Point::zero());
        let panel = Control::new(b, ControlKind::Panel);
        window.add_child(&panel).unwrap();
        panel.set_bounds(Rect::new(10.0, 20.0, 100.0, 100.0));
        pb.env().take_log();

        panel.invalidate_rect(Rect::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(
            pb.env().take_log(),
            vec!["window: invalidate 11,22 3x4".to_string()]
        );
    }

    #[test]
    fn focus_transfers_through_window() {
        let (_pb, b) = backend();
        let window = window_at(&b, Point::zero());
        let first = Control::new(b.clone(), ControlKind::Button);
        let second = Control::new(b, ControlKind::Button);
        window.add_child(&first).unwrap();
        window.add_child(&second).unwrap();

        assert!(first.set_focus());
        assert!(first.is_focused());

        assert!(second.set_focus());
        assert!(second.is_focused());
        assert!(!first.is_focused());
    }

    #[test]
    fn focus_without_window_refused() {
        let (_pb, b) = backend();
        let lone = Control::new(b, ControlKind::Button);
        assert!(!lone.set_focus());
        assert!(!lone.is_focused());
    }

    #[test]
    fn capture_mouse_is_soft() {
        let (_pb, b) = backend();
        let c = Control::new(b, ControlKind::Generic);
        assert!(!c.capture_mouse());
        c.release_mouse();
    }

    #[test]
    fn scale_factor_comes_from_environment() {
        let pb = PlessBackend::with_display(
            Display::try_new(2.0, Rect::new(0.0, 0.0, 640.0, 480.0)).unwrap(),
        );
        let b: Rc<dyn Backend> = pb.clone();
        let window = Control::new(b.clone(), ControlKind::Window);
        let panel = Control::new(b, ControlKind::Panel);
        window.add_child(&panel).unwrap();
        assert_eq!(panel.scale_factor(), 2.0);
    }
}
