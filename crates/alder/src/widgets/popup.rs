//! Transient popup windows anchored to an owning control.
//!
//! A popup is a borderless top-level window holding a border chrome and a
//! lazily created main control. Showing and hiding are asynchronous: both
//! defer their work through the dispatcher, so they are safe to call from
//! inside input callbacks of the owner or of the popup itself.

use std::{
    cell::{Cell, OnceCell, RefCell},
    rc::Rc,
};

use alder_geom::{Point, Size};
use tracing::debug;

use crate::{
    control::{Control, WeakControl},
    dispatch::Dispatcher,
    event::key::KeyCode,
    handler::Backend,
    widgets::{Border, Window},
};

/// How a popup was dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupResult {
    /// Not dismissed yet, or reset by a new show.
    #[default]
    None,
    /// Dismissed by acceptance (Enter, or an explicit accept).
    Accepted,
    /// Dismissed by cancellation (Escape, or an explicit cancel).
    Canceled,
}

/// The main control a popup presents.
pub trait PopupContent {
    /// Build the content on a backend.
    fn create(backend: &Rc<dyn Backend>) -> Self;

    /// The content's root control.
    fn control(&self) -> &Control;
}

/// Mutable popup state.
struct PopupState {
    /// How the popup was last dismissed.
    result: PopupResult,
    /// The control the popup is anchored to, while shown.
    owner: Option<WeakControl>,
    /// Escape dismisses with `Canceled`.
    hide_on_escape: bool,
    /// Enter dismisses with `Accepted`.
    hide_on_enter: bool,
    /// Focus returns to the owner after hiding.
    focus_owner_on_hide: bool,
    /// The popup has been shown at least once; sizing is done on first show.
    was_shown: bool,
}

/// Shared popup storage.
struct PopupInner<T> {
    /// Handler factory, used to create the main control lazily.
    backend: Rc<dyn Backend>,
    /// Deferred-execution queue.
    dispatcher: Rc<Dispatcher>,
    /// The top-level popup window.
    window: Window,
    /// The chrome around the main control.
    border: Border,
    /// The lazily created main control.
    main: OnceCell<T>,
    /// The content's natural size, captured before chrome layout reshapes
    /// it. Drives first-show window sizing.
    content_size: Cell<Size>,
    /// Result, owner and behavior flags.
    state: RefCell<PopupState>,
}

/// A transient popup window presenting a `T`.
pub struct Popup<T: PopupContent + 'static> {
    /// Shared storage.
    inner: Rc<PopupInner<T>>,
}

impl<T: PopupContent + 'static> Clone for Popup<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: PopupContent + 'static> Popup<T> {
    /// Construct a hidden popup.
    pub fn new(backend: Rc<dyn Backend>, dispatcher: Rc<Dispatcher>) -> Self {
        let window = Window::new_popup(backend.clone());
        window.control().set_visible(false);
        let border = Border::new(backend.clone());
        let popup = Self {
            inner: Rc::new(PopupInner {
                backend,
                dispatcher,
                window,
                border,
                main: OnceCell::new(),
                content_size: Cell::new(Size::zero()),
                state: RefCell::new(PopupState {
                    result: PopupResult::None,
                    owner: None,
                    hide_on_escape: true,
                    hide_on_enter: true,
                    focus_owner_on_hide: true,
                    was_shown: false,
                }),
            }),
        };
        popup.wire();
        popup
    }

    /// Subscribe the window's slots. Called once from the constructor.
    fn wire(&self) {
        if let Err(err) = self
            .inner
            .window
            .control()
            .add_child(self.inner.border.control())
        {
            debug!(%err, "popup chrome attach failed");
        }
        // The border fills the window.
        let weak = Rc::downgrade(&self.inner);
        self.inner.window.control().set_on_bounds_changed(move |_| {
            if let Some(inner) = weak.upgrade() {
                let size = inner.window.control().size();
                inner.border.control().set_bounds(size.rect());
            }
        });
        let weak = Rc::downgrade(&self.inner);
        self.inner.window.control().set_on_key_down(move |ev| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if ev.handled || !ev.key.mods.is_empty() {
                return;
            }
            let (esc, enter) = {
                let st = inner.state.borrow();
                (st.hide_on_escape, st.hide_on_enter)
            };
            let popup = Self { inner };
            match ev.key.key {
                KeyCode::Esc if esc => {
                    ev.handled = true;
                    popup.hide_popup(PopupResult::Canceled);
                }
                KeyCode::Enter if enter => {
                    ev.handled = true;
                    popup.hide_popup(PopupResult::Accepted);
                }
                _ => {}
            }
        });
    }

    /// The popup window.
    pub fn window(&self) -> &Window {
        &self.inner.window
    }

    /// The chrome border.
    pub fn border(&self) -> &Border {
        &self.inner.border
    }

    /// The main control, created on first access.
    pub fn main_control(&self) -> &T {
        self.inner.main.get_or_init(|| {
            let content = T::create(&self.inner.backend);
            self.inner.content_size.set(content.control().size());
            if let Err(err) = self.inner.border.set_child(content.control()) {
                debug!(%err, "popup content attach failed");
            }
            content
        })
    }

    /// How the popup was last dismissed.
    pub fn result(&self) -> PopupResult {
        self.inner.state.borrow().result
    }

    /// The anchoring control, while shown.
    pub fn owner(&self) -> Option<Control> {
        self.inner
            .state
            .borrow()
            .owner
            .as_ref()
            .and_then(WeakControl::upgrade)
    }

    /// Escape dismisses with `Canceled`.
    pub fn hide_on_escape(&self) -> bool {
        self.inner.state.borrow().hide_on_escape
    }

    /// Set whether Escape dismisses the popup.
    pub fn set_hide_on_escape(&self, value: bool) {
        self.inner.state.borrow_mut().hide_on_escape = value;
    }

    /// Enter dismisses with `Accepted`.
    pub fn hide_on_enter(&self) -> bool {
        self.inner.state.borrow().hide_on_enter
    }

    /// Set whether Enter dismisses the popup.
    pub fn set_hide_on_enter(&self, value: bool) {
        self.inner.state.borrow_mut().hide_on_enter = value;
    }

    /// Focus returns to the owner after hiding.
    pub fn focus_owner_on_hide(&self) -> bool {
        self.inner.state.borrow().focus_owner_on_hide
    }

    /// Set whether focus returns to the owner after hiding.
    pub fn set_focus_owner_on_hide(&self, value: bool) {
        self.inner.state.borrow_mut().focus_owner_on_hide = value;
    }

    /// Show the popup anchored below `owner`. The actual show runs on the
    /// next dispatcher pump, so the owner's input handling finishes first.
    pub fn show_popup(&self, owner: &Control) {
        self.inner.state.borrow_mut().owner = Some(owner.downgrade());
        let anchor = owner.client_to_screen(Point::new(0.0, owner.size().h));
        let anchor_size = owner.size();
        let weak = Rc::downgrade(&self.inner);
        self.inner.dispatcher.begin_invoke(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.window.control().is_disposed() {
                return;
            }
            (Self { inner }).show_popup_at(anchor, anchor_size);
        });
        debug!("popup show queued");
    }

    /// Show the popup at a screen position, flipping above the anchor when
    /// the display would clip it below.
    pub fn show_popup_at(&self, origin: Point, anchor_size: Size) {
        self.inner.state.borrow_mut().result = PopupResult::None;
        self.size_on_first_show();
        let size = self.inner.window.control().size();
        let area = self.inner.backend.display().client_area();

        let mut pos = origin;
        let fits_below = pos.y + size.h <= area.bottom();
        let room_above = origin.y - anchor_size.h - size.h >= area.top();
        if !fits_below && room_above {
            pos.y = origin.y - anchor_size.h - size.h;
        }
        if pos.x + size.w > area.right() {
            pos.x = area.right() - size.w;
        }
        if pos.x < area.left() {
            pos.x = area.left();
        }

        self.inner.window.set_screen_position(pos);
        self.inner.window.show();
        self.inner.window.begin_popup();
        self.inner.window.activate();
        let main = self.main_control().control().clone();
        if main.focus_first_child().is_none() {
            main.set_focus();
        }
        debug!(x = pos.x, y = pos.y, "popup shown");
    }

    /// Size the window to its main control, once.
    fn size_on_first_show(&self) {
        {
            let mut st = self.inner.state.borrow_mut();
            if st.was_shown {
                return;
            }
            st.was_shown = true;
        }
        self.main_control();
        let content = self.inner.content_size.get();
        let chrome = self.inner.border.settings().width * 2.0;
        self.inner
            .window
            .control()
            .set_size(Size::new(content.w + chrome, content.h + chrome));
    }

    /// Dismiss the popup with a result. A no-op while not shown. The result
    /// is recorded immediately; hiding, owner reactivation and focus
    /// restoration run on the next dispatcher pump.
    pub fn hide_popup(&self, result: PopupResult) {
        if !self.inner.window.is_visible() {
            return;
        }
        self.inner.state.borrow_mut().result = result;
        let weak = Rc::downgrade(&self.inner);
        self.inner.dispatcher.begin_invoke(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.window.control().is_disposed() {
                return;
            }
            let popup = Self { inner };
            popup.inner.window.end_popup();
            popup.inner.window.hide();
            popup.inner.dispatcher.process_pending();

            let owner = popup.owner();
            if let Some(owner) = owner {
                if !owner.is_disposed() {
                    // Reactivate the window the owner lives in, then give
                    // focus back.
                    let mut root = owner.clone();
                    while let Some(parent) = root.parent() {
                        root = parent;
                    }
                    root.with_handler(|h, _| {
                        if let Some(w) = h.window() {
                            w.activate();
                        }
                    });
                    if popup.inner.state.borrow().focus_owner_on_hide
                        && owner.can_accept_focus()
                    {
                        owner.set_focus();
                    }
                }
            }
            popup.inner.state.borrow_mut().owner = None;
            debug!(result = ?popup.result(), "popup hidden");
        });
        debug!(?result, "popup hide queued");
    }
}

#[cfg(test)]
mod tests {
    use alder_geom::Rect;

    use super::*;
    use crate::{
        event::key::{Ctrl, KeyEvent},
        handler::{ControlKind, Display},
        pless::PlessBackend,
    };

    /// A panel with one focusable button, standing in for picker content.
    struct PickerContent {
        panel: Control,
        button: Control,
    }

    impl PopupContent for PickerContent {
        fn create(backend: &Rc<dyn Backend>) -> Self {
            let panel = Control::new(backend.clone(), ControlKind::Panel);
            panel.set_bounds(Rect::new(0.0, 0.0, 100.0, 60.0));
            let button = Control::new(backend.clone(), ControlKind::Button);
            button.set_bounds(Rect::new(2.0, 2.0, 40.0, 16.0));
            panel.add_child(&button).unwrap();
            Self { panel, button }
        }

        fn control(&self) -> &Control {
            &self.panel
        }
    }

    struct Fixture {
        backend: Rc<PlessBackend>,
        dispatcher: Rc<Dispatcher>,
        popup: Popup<PickerContent>,
        owner_window: Window,
        owner: Control,
    }

    fn fixture() -> Fixture {
        fixture_with_display(Display::default())
    }

    fn fixture_with_display(display: Display) -> Fixture {
        let backend = PlessBackend::with_display(display);
        let dispatcher = Dispatcher::new();
        let popup = Popup::new(backend.clone(), dispatcher.clone());
        let owner_window = Window::new(backend.clone());
        owner_window.set_screen_position(Point::new(10.0, 10.0));
        let owner = Control::new(backend.clone(), ControlKind::Button);
        owner.set_bounds(Rect::new(20.0, 30.0, 80.0, 24.0));
        owner_window.control().add_child(&owner).unwrap();
        Fixture {
            backend,
            dispatcher,
            popup,
            owner_window,
            owner,
        }
    }

    #[test]
    fn show_is_deferred_and_positions_below_anchor() {
        let f = fixture();
        f.popup.show_popup(&f.owner);
        assert!(!f.popup.window().is_visible());

        f.dispatcher.process_pending();
        assert!(f.popup.window().is_visible());
        assert!(f.popup.window().is_popup_shown());
        assert_eq!(f.popup.result(), PopupResult::None);
        // Owner bottom-left: window 10,10 + owner 20,30 + height 24.
        assert_eq!(
            f.popup.window().screen_position(),
            Point::new(30.0, 64.0)
        );
        // First show sizes the window to content plus chrome.
        assert_eq!(
            f.popup.window().control().size(),
            alder_geom::Size::new(102.0, 62.0)
        );
    }

    #[test]
    fn shown_popup_focuses_first_focusable_child() {
        let f = fixture();
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        assert!(f.popup.main_control().button.is_focused());
    }

    #[test]
    fn hide_records_result_then_restores_owner_on_pump() {
        let f = fixture();
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        f.backend.env().take_log();

        f.popup.hide_popup(PopupResult::Accepted);
        // Result is visible immediately; the rest is deferred.
        assert_eq!(f.popup.result(), PopupResult::Accepted);
        assert!(f.popup.window().is_visible());

        f.dispatcher.process_pending();
        assert!(!f.popup.window().is_visible());
        assert!(!f.popup.window().is_popup_shown());
        assert!(f.owner.is_focused());
        assert_eq!(f.owner_window.focused_child(), Some(f.owner.clone()));
        assert!(f.popup.owner().is_none());
        // The owner's window was reactivated.
        assert!(
            f.backend
                .env()
                .take_log()
                .contains(&"window: activated".to_string())
        );
    }

    #[test]
    fn hide_while_hidden_is_a_no_op() {
        let f = fixture();
        f.popup.hide_popup(PopupResult::Canceled);
        f.dispatcher.process_pending();
        assert_eq!(f.popup.result(), PopupResult::None);
    }

    #[test]
    fn reshow_resets_result() {
        let f = fixture();
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        f.popup.hide_popup(PopupResult::Canceled);
        f.dispatcher.process_pending();
        assert_eq!(f.popup.result(), PopupResult::Canceled);

        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        assert_eq!(f.popup.result(), PopupResult::None);
    }

    #[test]
    fn escape_and_enter_dismiss() {
        let f = fixture();
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();

        let mut ev = KeyEvent::new(KeyCode::Esc);
        f.popup.window().control().feed_key_down(&mut ev);
        assert!(ev.handled);
        assert_eq!(f.popup.result(), PopupResult::Canceled);
        f.dispatcher.process_pending();
        assert!(!f.popup.window().is_visible());

        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        let mut ev = KeyEvent::new(KeyCode::Enter);
        f.popup.window().control().feed_key_down(&mut ev);
        assert_eq!(f.popup.result(), PopupResult::Accepted);
    }

    #[test]
    fn dismissal_keys_gated_on_flags_and_mods() {
        let f = fixture();
        f.popup.set_hide_on_escape(false);
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();

        let mut ev = KeyEvent::new(KeyCode::Esc);
        f.popup.window().control().feed_key_down(&mut ev);
        assert!(!ev.handled);
        assert_eq!(f.popup.result(), PopupResult::None);

        let mut ev = KeyEvent::new(Ctrl + KeyCode::Enter);
        f.popup.window().control().feed_key_down(&mut ev);
        assert!(!ev.handled);
        assert_eq!(f.popup.result(), PopupResult::None);
        assert!(f.popup.window().is_visible());
    }

    #[test]
    fn flips_above_anchor_when_clipped_below() {
        let display = Display::try_new(1.0, Rect::new(0.0, 0.0, 400.0, 120.0)).unwrap();
        let f = fixture_with_display(display);
        // Anchor bottom at y=64, popup is 62 tall: below would end at 126,
        // clipped; above fits (64 - 24 - 62 = -22 < 0? no; use lower owner).
        f.owner.set_bounds(Rect::new(20.0, 80.0, 80.0, 24.0));
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        // Anchor bottom-left y: 10 + 80 + 24 = 114. Below ends at 176 > 120.
        // Above: 114 - 24 - 62 = 28 >= 0, so the popup flips up.
        assert_eq!(
            f.popup.window().screen_position(),
            Point::new(30.0, 28.0)
        );
    }

    #[test]
    fn clamped_horizontally_to_display() {
        let display = Display::try_new(1.0, Rect::new(0.0, 0.0, 120.0, 800.0)).unwrap();
        let f = fixture_with_display(display);
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        // Popup is 102 wide; anchored x=30 would end at 132 > 120.
        assert_eq!(f.popup.window().screen_position().x, 18.0);
    }

    #[test]
    fn hide_skips_focus_restore_when_disabled() {
        let f = fixture();
        f.popup.set_focus_owner_on_hide(false);
        f.popup.show_popup(&f.owner);
        f.dispatcher.process_pending();
        f.popup.hide_popup(PopupResult::Accepted);
        f.dispatcher.process_pending();
        assert!(!f.owner.is_focused());
    }
}
