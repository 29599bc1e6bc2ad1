//! The portable control object model.
//!
//! A [`Control`] is a cheaply-cloneable handle to a widget entity. The
//! control owns its children exclusively; children hold a non-owning
//! back-reference to their parent. All behavior is delegated to a lazily
//! created, exclusively owned handler supplied by the control's backend.

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use alder_geom::{Point, Rect, Size};
use tracing::{debug, trace};

use crate::{
    drawing::{Brush, Color, DrawContext, Font, SystemColors},
    error::{Error, Result},
    event::{
        key::KeyEvent,
        mouse::{Action, MouseEvent},
    },
    handler::{Backend, Callback, ControlHandler, ControlKind, HandlerCallbacks, NativeHandle},
    name::ControlName,
    state::VisualState,
};

/// Whether a widget family participates in focus by default.
fn kind_can_select(kind: ControlKind) -> bool {
    matches!(
        kind,
        ControlKind::Button | ControlKind::ListView | ControlKind::TreeView | ControlKind::Calendar
    )
}

/// Portable control state, independent of any backend.
struct ControlState {
    /// Bounds relative to the parent's client origin, in DIPs.
    bounds: Rect,
    /// Control visibility.
    visible: bool,
    /// Control enabled state.
    enabled: bool,
    /// Explicit background color; falls back along the parent chain.
    background: Option<Color>,
    /// Explicit foreground color; falls back along the parent chain.
    foreground: Option<Color>,
    /// Explicit font; falls back along the parent chain.
    font: Option<Font>,
    /// Whether the control can receive focus at all.
    can_select: bool,
    /// Whether the control participates in tab traversal.
    tab_stop: bool,
    /// Whether focus-first searches descend into this control's children.
    accepts_focus_recursively: bool,
    /// Pointer is currently over the control.
    hovered: bool,
    /// A button press started on the control and has not been released.
    pressed: bool,
    /// The control holds keyboard focus.
    focused: bool,
    /// The control has been torn down.
    disposed: bool,
}

/// The callback slots a control raises into application code.
///
/// Like handler slots, each holds at most one subscriber; widgets built on a
/// control (buttons, popups) are usually that subscriber.
#[derive(Default)]
struct ControlEvents {
    /// The control should paint its own content.
    paint: Callback<dyn DrawContext>,
    /// Mouse button pressed.
    mouse_down: Callback<MouseEvent>,
    /// Mouse button released.
    mouse_up: Callback<MouseEvent>,
    /// Pointer moved.
    mouse_moved: Callback<MouseEvent>,
    /// Pointer entered the control.
    mouse_enter: Callback<MouseEvent>,
    /// Pointer left the control.
    mouse_leave: Callback<MouseEvent>,
    /// Wheel scrolled.
    mouse_wheel: Callback<MouseEvent>,
    /// Key pressed.
    key_down: Callback<KeyEvent>,
    /// Key released.
    key_up: Callback<KeyEvent>,
    /// The control gained keyboard focus.
    got_focus: Callback<()>,
    /// The control lost keyboard focus.
    lost_focus: Callback<()>,
    /// The control's bounds changed.
    bounds_changed: Callback<Rect>,
    /// The control's visibility changed.
    visibility_changed: Callback<bool>,
    /// The backend reported a selection change (lists, trees, calendars).
    selection_changed: Callback<()>,
}

/// Shared control storage behind the [`Control`] handle.
struct ControlInner {
    /// Diagnostic name.
    name: RefCell<ControlName>,
    /// Widget family, fixed at construction.
    kind: ControlKind,
    /// Handler factory and environment queries.
    backend: Rc<dyn Backend>,
    /// Non-owning back-reference to the parent.
    parent: RefCell<Weak<ControlInner>>,
    /// Exclusively owned children.
    children: RefCell<Vec<Control>>,
    /// The lazily created handler. At most one per control, ever.
    handler: RefCell<Option<Box<dyn ControlHandler>>>,
    /// Application-facing callback slots.
    events: RefCell<ControlEvents>,
    /// Portable state.
    state: RefCell<ControlState>,
}

/// A handle to a control. Clones refer to the same control; equality is
/// identity.
#[derive(Clone)]
pub struct Control {
    /// Shared storage.
    inner: Rc<ControlInner>,
}

/// A non-owning handle to a control, for deferred closures and
/// back-references.
#[derive(Clone, Default)]
pub struct WeakControl {
    /// Weak shared storage.
    inner: Weak<ControlInner>,
}

impl WeakControl {
    /// Upgrade to a strong handle if the control is still alive.
    pub fn upgrade(&self) -> Option<Control> {
        self.inner.upgrade().map(|inner| Control { inner })
    }
}

impl PartialEq for Control {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Control")
            .field("name", &self.inner.name.borrow().to_string())
            .field("kind", &self.inner.kind)
            .finish()
    }
}

impl Control {
    /// Construct a control of the given widget family on a backend.
    pub fn new(backend: Rc<dyn Backend>, kind: ControlKind) -> Self {
        Self {
            inner: Rc::new(ControlInner {
                name: RefCell::new(ControlName::for_kind(kind)),
                kind,
                backend,
                parent: RefCell::new(Weak::new()),
                children: RefCell::new(Vec::new()),
                handler: RefCell::new(None),
                events: RefCell::new(ControlEvents::default()),
                state: RefCell::new(ControlState {
                    bounds: Rect::zero(),
                    visible: true,
                    enabled: true,
                    background: None,
                    foreground: None,
                    font: None,
                    can_select: kind_can_select(kind),
                    tab_stop: true,
                    accepts_focus_recursively: true,
                    hovered: false,
                    pressed: false,
                    focused: false,
                    disposed: false,
                }),
            }),
        }
    }

    /// The control's diagnostic name.
    pub fn name(&self) -> ControlName {
        self.inner.name.borrow().clone()
    }

    /// Replace the control's diagnostic name.
    pub fn set_name(&self, name: ControlName) {
        *self.inner.name.borrow_mut() = name;
    }

    /// The control's widget family.
    pub fn kind(&self) -> ControlKind {
        self.inner.kind
    }

    /// The backend this control realizes its handler on.
    pub fn backend(&self) -> Rc<dyn Backend> {
        self.inner.backend.clone()
    }

    /// A non-owning handle to this control.
    pub fn downgrade(&self) -> WeakControl {
        WeakControl {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // ------------------------------------------------------------------
    // Tree
    // ------------------------------------------------------------------

    /// The parent control, if attached.
    pub fn parent(&self) -> Option<Self> {
        self.inner
            .parent
            .borrow()
            .upgrade()
            .map(|inner| Self { inner })
    }

    /// Snapshot of the child handles, in z-order (last on top).
    pub fn children(&self) -> Vec<Self> {
        self.inner.children.borrow().clone()
    }

    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.inner.children.borrow().len()
    }

    /// Append a child, detaching it from any previous parent first.
    ///
    /// Errors if either control is disposed, or if the operation would
    /// create a cycle.
    pub fn add_child(&self, child: &Self) -> Result<()> {
        if self.is_disposed() || child.is_disposed() {
            return Err(Error::Disposed("add_child on disposed control".into()));
        }
        if child == self {
            return Err(Error::Invalid("control cannot parent itself".into()));
        }
        let mut ancestor = self.parent();
        while let Some(a) = ancestor {
            if &a == child {
                return Err(Error::Invalid("add_child would create a cycle".into()));
            }
            ancestor = a.parent();
        }
        child.detach_from_parent();
        self.inner.children.borrow_mut().push(child.clone());
        *child.inner.parent.borrow_mut() = Rc::downgrade(&self.inner);
        trace!(parent = %self.name(), child = %child.name(), "child attached");
        Ok(())
    }

    /// Remove a child, clearing its parent back-reference. Returns false if
    /// the control was not a child.
    pub fn remove_child(&self, child: &Self) -> bool {
        let mut children = self.inner.children.borrow_mut();
        let Some(pos) = children.iter().position(|c| c == child) else {
            return false;
        };
        children.remove(pos);
        drop(children);
        *child.inner.parent.borrow_mut() = Weak::new();
        trace!(parent = %self.name(), child = %child.name(), "child detached");
        true
    }

    /// Detach this control from its parent, if any.
    pub fn detach_from_parent(&self) {
        if let Some(parent) = self.parent() {
            parent.remove_child(self);
        }
    }

    // ------------------------------------------------------------------
    // Portable state
    // ------------------------------------------------------------------

    /// Bounds relative to the parent's client origin.
    pub fn bounds(&self) -> Rect {
        self.inner.state.borrow().bounds
    }

    /// Set the bounds, mirroring into the handler (if one exists) and
    /// raising the bounds-changed slot.
    pub fn set_bounds(&self, bounds: Rect) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.bounds == bounds {
                false
            } else {
                st.bounds = bounds;
                true
            }
        };
        if changed {
            if self.handler_created() {
                self.with_handler(|h, c| h.set_bounds(c, bounds));
            }
            let mut arg = bounds;
            self.raise_event(|e| &mut e.bounds_changed, &mut arg);
        }
    }

    /// The control's location within its parent.
    pub fn location(&self) -> Point {
        self.bounds().origin
    }

    /// Move the control within its parent, keeping its size.
    pub fn set_location(&self, location: Point) {
        let bounds = self.bounds();
        self.set_bounds(Rect::from_origin_size(location, bounds.size));
    }

    /// The control's size.
    pub fn size(&self) -> Size {
        self.bounds().size
    }

    /// Resize the control, keeping its location.
    pub fn set_size(&self, size: Size) {
        let bounds = self.bounds();
        self.set_bounds(Rect::from_origin_size(bounds.origin, size));
    }

    /// Control visibility.
    pub fn visible(&self) -> bool {
        self.inner.state.borrow().visible
    }

    /// Show or hide the control.
    pub fn set_visible(&self, visible: bool) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.visible == visible {
                false
            } else {
                st.visible = visible;
                true
            }
        };
        if changed {
            if self.handler_created() {
                self.with_handler(|h, c| h.set_visible(c, visible));
            }
            let mut arg = visible;
            self.raise_event(|e| &mut e.visibility_changed, &mut arg);
        }
    }

    /// Control enabled state.
    pub fn enabled(&self) -> bool {
        self.inner.state.borrow().enabled
    }

    /// Enable or disable the control. Disabling clears interaction state.
    pub fn set_enabled(&self, enabled: bool) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.enabled == enabled {
                false
            } else {
                st.enabled = enabled;
                if !enabled {
                    st.hovered = false;
                    st.pressed = false;
                }
                true
            }
        };
        if changed {
            if self.handler_created() {
                self.with_handler(|h, c| h.set_enabled(c, enabled));
            }
            self.invalidate();
        }
    }

    /// Explicit background color, if set on this control.
    pub fn background_color(&self) -> Option<Color> {
        self.inner.state.borrow().background
    }

    /// Set or clear the explicit background color.
    pub fn set_background_color(&self, color: Option<Color>) {
        self.inner.state.borrow_mut().background = color;
        if self.handler_created() {
            let fg = self.inner.state.borrow().foreground;
            self.with_handler(|h, c| h.apply_colors(c, color, fg));
        }
        self.invalidate();
    }

    /// Explicit foreground color, if set on this control.
    pub fn foreground_color(&self) -> Option<Color> {
        self.inner.state.borrow().foreground
    }

    /// Set or clear the explicit foreground color.
    pub fn set_foreground_color(&self, color: Option<Color>) {
        self.inner.state.borrow_mut().foreground = color;
        if self.handler_created() {
            let bg = self.inner.state.borrow().background;
            self.with_handler(|h, c| h.apply_colors(c, bg, color));
        }
        self.invalidate();
    }

    /// The background color in effect: this control's, else the nearest
    /// ancestor's, else the system window color.
    pub fn effective_background_color(&self) -> Color {
        let mut current = Some(self.clone());
        while let Some(c) = current {
            if let Some(color) = c.background_color() {
                return color;
            }
            current = c.parent();
        }
        SystemColors::default().window
    }

    /// The foreground color in effect, with the same fallback chain ending
    /// in the system text color.
    pub fn effective_foreground_color(&self) -> Color {
        let mut current = Some(self.clone());
        while let Some(c) = current {
            if let Some(color) = c.foreground_color() {
                return color;
            }
            current = c.parent();
        }
        SystemColors::default().text
    }

    /// Explicit font, if set on this control.
    pub fn font(&self) -> Option<Font> {
        self.inner.state.borrow().font.clone()
    }

    /// Set or clear the explicit font.
    pub fn set_font(&self, font: Option<Font>) {
        self.inner.state.borrow_mut().font = font;
        self.invalidate();
    }

    /// The font in effect: this control's, else the nearest ancestor's,
    /// else the default font.
    pub fn effective_font(&self) -> Font {
        let mut current = Some(self.clone());
        while let Some(c) = current {
            if let Some(font) = c.font() {
                return font;
            }
            current = c.parent();
        }
        Font::default()
    }

    /// Whether the control can receive focus at all.
    pub fn can_select(&self) -> bool {
        self.inner.state.borrow().can_select
    }

    /// Set whether the control can receive focus.
    pub fn set_can_select(&self, can_select: bool) {
        self.inner.state.borrow_mut().can_select = can_select;
    }

    /// Whether the control participates in tab traversal.
    pub fn tab_stop(&self) -> bool {
        self.inner.state.borrow().tab_stop
    }

    /// Set tab traversal participation.
    pub fn set_tab_stop(&self, tab_stop: bool) {
        self.inner.state.borrow_mut().tab_stop = tab_stop;
    }

    /// Whether focus-first searches descend into this control's children.
    pub fn accepts_focus_recursively(&self) -> bool {
        self.inner.state.borrow().accepts_focus_recursively
    }

    /// Set whether focus-first searches descend into this control.
    pub fn set_accepts_focus_recursively(&self, value: bool) {
        self.inner.state.borrow_mut().accepts_focus_recursively = value;
    }

    /// True once the control has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.state.borrow().disposed
    }

    /// Tear the control down: dispose children, detach and drop the
    /// handler. Idempotent.
    pub fn dispose(&self) {
        if self.is_disposed() {
            return;
        }
        self.inner.state.borrow_mut().disposed = true;
        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            *child.inner.parent.borrow_mut() = Weak::new();
            child.dispose();
        }
        self.detach_from_parent();
        let handler = self.inner.handler.borrow_mut().take();
        if let Some(mut handler) = handler {
            handler.detach(self);
            debug!(name = %self.name(), "handler disposed");
        }
    }

    // ------------------------------------------------------------------
    // Handler access
    // ------------------------------------------------------------------

    /// True if the handler has already been created.
    pub fn handler_created(&self) -> bool {
        self.inner.handler.borrow().is_some()
    }

    /// Create the handler if it does not exist yet. At most one handler is
    /// ever created for a control; disposed controls never create one.
    /// Returns true if a handler exists afterwards.
    fn ensure_handler(&self) -> bool {
        if self.handler_created() {
            return true;
        }
        if self.is_disposed() {
            return false;
        }
        // A visual child of a control whose handler composites its children
        // delegates to that ancestor instead of realizing a native object.
        let delegated = self
            .parent()
            .and_then(|parent| parent.with_handler(|h, _| !h.visual_child_needs_native_control()))
            .unwrap_or(false);
        let mut handler = if delegated {
            self.inner.backend.create_delegated_handler(self.inner.kind)
        } else {
            self.inner.backend.create_handler(self.inner.kind)
        };
        debug!(name = %self.name(), kind = ?self.inner.kind, delegated, "handler created");
        handler.attach(self);
        handler.set_bounds(self, self.bounds());
        self.wire_handler(handler.as_mut());
        *self.inner.handler.borrow_mut() = Some(handler);
        true
    }

    /// Subscribe the control to its handler's callback slots. Called exactly
    /// once, immediately after handler creation.
    fn wire_handler(&self, handler: &mut dyn ControlHandler) {
        let callbacks = handler.callbacks();
        let weak = self.downgrade();
        callbacks.paint.set(move |ctx| {
            if let Some(c) = weak.upgrade() {
                c.raise_event(|e| &mut e.paint, ctx);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_down.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_up.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_moved.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_enter.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_leave.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.mouse_wheel.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.on_handler_mouse(ev);
            }
        });
        let weak = self.downgrade();
        callbacks.key_down.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.raise_event(|e| &mut e.key_down, ev);
            }
        });
        let weak = self.downgrade();
        callbacks.key_up.set(move |ev| {
            if let Some(c) = weak.upgrade() {
                c.raise_event(|e| &mut e.key_up, ev);
            }
        });
        let weak = self.downgrade();
        callbacks.got_focus.set(move |()| {
            if let Some(c) = weak.upgrade() {
                c.apply_focus(true);
            }
        });
        let weak = self.downgrade();
        callbacks.lost_focus.set(move |()| {
            if let Some(c) = weak.upgrade() {
                c.apply_focus(false);
            }
        });
        let weak = self.downgrade();
        callbacks.bounds_changed.set(move |bounds| {
            if let Some(c) = weak.upgrade() {
                c.inner.state.borrow_mut().bounds = *bounds;
                c.raise_event(|e| &mut e.bounds_changed, bounds);
            }
        });
        let weak = self.downgrade();
        callbacks.visibility_changed.set(move |visible| {
            if let Some(c) = weak.upgrade() {
                c.inner.state.borrow_mut().visible = *visible;
                c.raise_event(|e| &mut e.visibility_changed, visible);
            }
        });
        let weak = self.downgrade();
        callbacks.selection_changed.set(move |arg| {
            if let Some(c) = weak.upgrade() {
                c.raise_event(|e| &mut e.selection_changed, arg);
            }
        });
        let weak = self.downgrade();
        callbacks.destroyed.set(move |()| {
            if let Some(c) = weak.upgrade() {
                c.dispose();
            }
        });
    }

    /// Run a closure against the handler, creating it on first use.
    /// Returns `None` for disposed controls.
    pub fn with_handler<R>(&self, f: impl FnOnce(&mut dyn ControlHandler, &Self) -> R) -> Option<R> {
        if !self.ensure_handler() {
            return None;
        }
        let mut slot = self.inner.handler.borrow_mut();
        let handler = slot.as_mut()?;
        Some(f(handler.as_mut(), self))
    }

    /// Raise one of the handler's callback slots, re-entrancy safe: the
    /// subscriber is taken out of the slot for the duration of the call.
    pub(crate) fn raise_handler<A: ?Sized>(
        &self,
        pick: impl Fn(&mut HandlerCallbacks) -> &mut Callback<A>,
        arg: &mut A,
    ) -> bool {
        if !self.ensure_handler() {
            return false;
        }
        let taken = {
            let mut slot = self.inner.handler.borrow_mut();
            let Some(handler) = slot.as_mut() else {
                return false;
            };
            pick(handler.callbacks()).take_slot()
        };
        let Some(mut f) = taken else {
            return false;
        };
        f(arg);
        let mut slot = self.inner.handler.borrow_mut();
        if let Some(handler) = slot.as_mut() {
            pick(handler.callbacks()).restore_slot(f);
        }
        true
    }

    /// Raise one of the control's own callback slots, re-entrancy safe.
    fn raise_event<A: ?Sized>(
        &self,
        pick: impl Fn(&mut ControlEvents) -> &mut Callback<A>,
        arg: &mut A,
    ) -> bool {
        let taken = pick(&mut self.inner.events.borrow_mut()).take_slot();
        let Some(mut f) = taken else {
            return false;
        };
        f(arg);
        pick(&mut self.inner.events.borrow_mut()).restore_slot(f);
        true
    }

    // ------------------------------------------------------------------
    // Forwarded operations
    // ------------------------------------------------------------------

    /// Request a repaint of the whole control.
    pub fn invalidate(&self) {
        self.with_handler(|h, c| h.invalidate(c));
    }

    /// Request a repaint of a client-space rectangle.
    pub fn invalidate_rect(&self, rect: Rect) {
        self.with_handler(|h, c| h.invalidate_rect(c, rect));
    }

    /// Convert a client-space point to screen coordinates.
    pub fn client_to_screen(&self, point: Point) -> Point {
        self.with_handler(|h, c| h.client_to_screen(c, point))
            .unwrap_or(point)
    }

    /// Convert a screen-space point to client coordinates.
    pub fn screen_to_client(&self, point: Point) -> Point {
        self.with_handler(|h, c| h.screen_to_client(c, point))
            .unwrap_or(point)
    }

    /// Pixels per device-independent unit for this control.
    pub fn scale_factor(&self) -> f32 {
        self.with_handler(|h, c| h.scale_factor(c))
            .unwrap_or_else(|| self.inner.backend.display().scale_factor())
    }

    /// The native handle, for controls realized as native objects.
    pub fn native_handle(&self) -> Option<NativeHandle> {
        self.with_handler(|h, _| h.native_handle()).flatten()
    }

    /// Begin routing all mouse input to this control. Soft failure.
    pub fn capture_mouse(&self) -> bool {
        self.with_handler(|h, c| h.capture_mouse(c)).unwrap_or(false)
    }

    /// Stop routing all mouse input to this control.
    pub fn release_mouse(&self) {
        self.with_handler(|h, c| h.release_mouse(c));
    }

    // ------------------------------------------------------------------
    // Focus
    // ------------------------------------------------------------------

    /// True if the control could take focus right now.
    pub fn can_accept_focus(&self) -> bool {
        let st = self.inner.state.borrow();
        st.visible && st.enabled && st.can_select && !st.disposed
    }

    /// True while the control holds keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.inner.state.borrow().focused
    }

    /// Transfer keyboard focus to this control. Returns false if the
    /// control cannot accept focus or the backend refused.
    pub fn set_focus(&self) -> bool {
        if !self.can_accept_focus() {
            return false;
        }
        let Some(change) = self.with_handler(|h, c| h.set_focus(c)).flatten() else {
            return false;
        };
        if let Some(previous) = change.previous {
            if &previous == self {
                return true;
            }
            previous.apply_focus(false);
        }
        self.apply_focus(true);
        true
    }

    /// Record a focus change and raise the matching slot.
    pub(crate) fn apply_focus(&self, focused: bool) {
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            if st.focused == focused {
                false
            } else {
                st.focused = focused;
                true
            }
        };
        if changed {
            trace!(name = %self.name(), focused, "focus changed");
            if focused {
                self.raise_event(|e| &mut e.got_focus, &mut ());
            } else {
                self.raise_event(|e| &mut e.lost_focus, &mut ());
            }
            self.invalidate();
        }
    }

    /// Focus the first focusable control in this control's subtree,
    /// pre-order. Descends into children only where
    /// `accepts_focus_recursively` allows.
    pub fn focus_first_child(&self) -> Option<Self> {
        for child in self.children() {
            if !child.visible() {
                continue;
            }
            if child.can_accept_focus() && child.set_focus() {
                return Some(child);
            }
            if child.accepts_focus_recursively() {
                if let Some(found) = child.focus_first_child() {
                    return Some(found);
                }
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Interaction state and event ingress
    // ------------------------------------------------------------------

    /// Pointer is currently over the control.
    pub fn is_hovered(&self) -> bool {
        self.inner.state.borrow().hovered
    }

    /// A press started on the control and has not been released.
    pub fn is_pressed(&self) -> bool {
        self.inner.state.borrow().pressed
    }

    /// The visual state implied by the control's interaction flags.
    pub fn visual_state(&self) -> VisualState {
        let st = self.inner.state.borrow();
        VisualState::for_control(st.enabled, st.hovered, st.pressed, st.focused)
    }

    /// Platform mouse ingress: raise the matching handler slot. Called by
    /// backends delivering input, and by tests.
    pub fn feed_mouse(&self, ev: &mut MouseEvent) -> bool {
        match ev.action {
            Action::Down => self.raise_handler(|cb| &mut cb.mouse_down, ev),
            Action::Up => self.raise_handler(|cb| &mut cb.mouse_up, ev),
            Action::Moved => self.raise_handler(|cb| &mut cb.mouse_moved, ev),
            Action::Enter => self.raise_handler(|cb| &mut cb.mouse_enter, ev),
            Action::Leave => self.raise_handler(|cb| &mut cb.mouse_leave, ev),
            Action::Wheel => self.raise_handler(|cb| &mut cb.mouse_wheel, ev),
        }
    }

    /// Platform key ingress: raise the matching handler slot.
    pub fn feed_key_down(&self, ev: &mut KeyEvent) -> bool {
        self.raise_handler(|cb| &mut cb.key_down, ev)
    }

    /// Platform key-release ingress: raise the matching handler slot.
    pub fn feed_key_up(&self, ev: &mut KeyEvent) -> bool {
        self.raise_handler(|cb| &mut cb.key_up, ev)
    }

    /// Multiplex a handler mouse callback: update interaction flags, then
    /// raise the matching control slot.
    fn on_handler_mouse(&self, ev: &mut MouseEvent) {
        let before = self.visual_state();
        {
            let mut st = self.inner.state.borrow_mut();
            match ev.action {
                Action::Enter => st.hovered = true,
                Action::Leave => {
                    st.hovered = false;
                    st.pressed = false;
                }
                Action::Down => st.pressed = true,
                Action::Up => st.pressed = false,
                Action::Moved | Action::Wheel => {}
            }
        }
        if self.visual_state() != before {
            self.invalidate();
        }
        match ev.action {
            Action::Down => self.raise_event(|e| &mut e.mouse_down, ev),
            Action::Up => self.raise_event(|e| &mut e.mouse_up, ev),
            Action::Moved => self.raise_event(|e| &mut e.mouse_moved, ev),
            Action::Enter => self.raise_event(|e| &mut e.mouse_enter, ev),
            Action::Leave => self.raise_event(|e| &mut e.mouse_leave, ev),
            Action::Wheel => self.raise_event(|e| &mut e.mouse_wheel, ev),
        };
    }

    /// The deepest visible descendant containing a client-space point,
    /// with the point translated into that descendant's client space.
    pub fn hit_test(&self, point: Point) -> (Self, Point) {
        for child in self.children().into_iter().rev() {
            if child.visible() && child.bounds().contains(point) {
                let local = point - child.bounds().origin.to_vector();
                return child.hit_test(local);
            }
        }
        (self.clone(), point)
    }

    // ------------------------------------------------------------------
    // Event subscriptions
    // ------------------------------------------------------------------

    /// Subscribe to paint requests. Single subscriber; replaces.
    pub fn set_on_paint(&self, f: impl FnMut(&mut (dyn DrawContext + 'static)) + 'static) {
        self.inner.events.borrow_mut().paint.set(f);
    }

    /// Subscribe to mouse-down events. Single subscriber; replaces.
    pub fn set_on_mouse_down(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_down.set(f);
    }

    /// Subscribe to mouse-up events. Single subscriber; replaces.
    pub fn set_on_mouse_up(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_up.set(f);
    }

    /// Subscribe to mouse-move events. Single subscriber; replaces.
    pub fn set_on_mouse_moved(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_moved.set(f);
    }

    /// Subscribe to mouse-enter events. Single subscriber; replaces.
    pub fn set_on_mouse_enter(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_enter.set(f);
    }

    /// Subscribe to mouse-leave events. Single subscriber; replaces.
    pub fn set_on_mouse_leave(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_leave.set(f);
    }

    /// Subscribe to mouse-wheel events. Single subscriber; replaces.
    pub fn set_on_mouse_wheel(&self, f: impl FnMut(&mut MouseEvent) + 'static) {
        self.inner.events.borrow_mut().mouse_wheel.set(f);
    }

    /// Subscribe to key-down events. Single subscriber; replaces.
    pub fn set_on_key_down(&self, f: impl FnMut(&mut KeyEvent) + 'static) {
        self.inner.events.borrow_mut().key_down.set(f);
    }

    /// Subscribe to key-up events. Single subscriber; replaces.
    pub fn set_on_key_up(&self, f: impl FnMut(&mut KeyEvent) + 'static) {
        self.inner.events.borrow_mut().key_up.set(f);
    }

    /// Subscribe to focus-gained events. Single subscriber; replaces.
    pub fn set_on_got_focus(&self, f: impl FnMut(&mut ()) + 'static) {
        self.inner.events.borrow_mut().got_focus.set(f);
    }

    /// Subscribe to focus-lost events. Single subscriber; replaces.
    pub fn set_on_lost_focus(&self, f: impl FnMut(&mut ()) + 'static) {
        self.inner.events.borrow_mut().lost_focus.set(f);
    }

    /// Subscribe to bounds changes. Single subscriber; replaces.
    pub fn set_on_bounds_changed(&self, f: impl FnMut(&mut Rect) + 'static) {
        self.inner.events.borrow_mut().bounds_changed.set(f);
    }

    /// Subscribe to visibility changes. Single subscriber; replaces.
    pub fn set_on_visibility_changed(&self, f: impl FnMut(&mut bool) + 'static) {
        self.inner.events.borrow_mut().visibility_changed.set(f);
    }

    /// Subscribe to backend-side selection notifications. Single subscriber;
    /// replaces. Widgets with item models subscribe this slot themselves and
    /// re-raise on their own callback.
    pub fn set_on_selection_changed(&self, f: impl FnMut(&mut ()) + 'static) {
        self.inner.events.borrow_mut().selection_changed.set(f);
    }

    // ------------------------------------------------------------------
    // Rendering and diagnostics
    // ------------------------------------------------------------------

    /// Paint this control and its children into a surface. Hidden controls
    /// and their subtrees are skipped.
    pub fn render(&self, ctx: &mut (dyn DrawContext + 'static)) {
        if !self.visible() {
            return;
        }
        if let Some(background) = self.background_color() {
            self.paint_background(ctx, background);
        }
        self.raise_event(|e| &mut e.paint, ctx);
        for child in self.children() {
            if !child.visible() {
                continue;
            }
            ctx.push_offset(child.bounds().origin.to_vector());
            child.render(ctx);
            ctx.pop_offset();
        }
    }

    /// Fill the control's client area with its background color.
    fn paint_background(&self, ctx: &mut dyn DrawContext, background: Color) {
        ctx.fill_rect(&Brush::solid(background), self.size().rect());
    }

    /// Render an indented tree of names, bounds and flags. Debug aid.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    /// Walk a subtree emitting formatted debug output.
    fn dump_into(&self, out: &mut String, level: usize) {
        use std::fmt::Write;
        let st = self.inner.state.borrow();
        let indent = "  ".repeat(level);
        let _ = writeln!(
            out,
            "{indent}{} [{:?}] bounds={:?}{}{}{}",
            self.inner.name.borrow(),
            self.inner.kind,
            st.bounds,
            if st.visible { "" } else { " hidden" },
            if st.enabled { "" } else { " disabled" },
            if st.focused { " focused" } else { "" },
        );
        drop(st);
        for child in self.children() {
            child.dump_into(out, level + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        drawing::Brush,
        event::mouse::MouseEvent,
        handler::Display,
        pless::PlessBackend,
        testing::RecordingSurface,
    };

    /// A backend wrapper counting handler creations.
    struct CountingBackend {
        inner: Rc<PlessBackend>,
        native: Cell<usize>,
        delegated: Cell<usize>,
    }

    impl CountingBackend {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                inner: PlessBackend::new(),
                native: Cell::new(0),
                delegated: Cell::new(0),
            })
        }

        fn total(&self) -> usize {
            self.native.get() + self.delegated.get()
        }
    }

    impl Backend for CountingBackend {
        fn create_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler> {
            self.native.set(self.native.get() + 1);
            self.inner.create_handler(kind)
        }

        fn create_delegated_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler> {
            self.delegated.set(self.delegated.get() + 1);
            self.inner.create_delegated_handler(kind)
        }

        fn display(&self) -> Display {
            self.inner.display()
        }
    }

    fn backend() -> Rc<dyn Backend> {
        PlessBackend::new()
    }

    #[test]
    fn kind_names() {
        let c = Control::new(backend(), ControlKind::ListView);
        assert_eq!(c.name(), "list_view");
        c.set_name(ControlName::sanitize("My List"));
        assert_eq!(c.name(), "my_list");
    }

    #[test]
    fn tree_maintenance() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        let a = Control::new(b.clone(), ControlKind::Generic);
        let c = Control::new(b, ControlKind::Generic);
        root.add_child(&a).unwrap();
        root.add_child(&c).unwrap();
        assert_eq!(root.child_count(), 2);
        assert_eq!(a.parent(), Some(root.clone()));

        // Re-parenting detaches first.
        a.add_child(&c).unwrap();
        assert_eq!(root.child_count(), 1);
        assert_eq!(c.parent(), Some(a.clone()));

        assert!(!root.remove_child(&c));
        assert!(a.remove_child(&c));
        assert!(c.parent().is_none());
    }

    #[test]
    fn cycles_rejected() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        let child = Control::new(b, ControlKind::Panel);
        root.add_child(&child).unwrap();
        assert!(matches!(root.add_child(&root), Err(Error::Invalid(_))));
        assert!(matches!(child.add_child(&root), Err(Error::Invalid(_))));
    }

    #[test]
    fn effective_values_walk_the_parent_chain() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        let mid = Control::new(b.clone(), ControlKind::Panel);
        let leaf = Control::new(b, ControlKind::Generic);
        root.add_child(&mid).unwrap();
        mid.add_child(&leaf).unwrap();

        let system = SystemColors::default();
        assert_eq!(leaf.effective_background_color(), system.window);
        assert_eq!(leaf.effective_foreground_color(), system.text);

        root.set_background_color(Some(Color::RED));
        assert_eq!(leaf.effective_background_color(), Color::RED);
        mid.set_background_color(Some(Color::BLUE));
        assert_eq!(leaf.effective_background_color(), Color::BLUE);
        leaf.set_background_color(Some(Color::GREEN));
        assert_eq!(leaf.effective_background_color(), Color::GREEN);

        assert_eq!(leaf.effective_font(), Font::default());
        let big = Font::new("serif", 16.0);
        root.set_font(Some(big.clone()));
        assert_eq!(leaf.effective_font(), big);
    }

    #[test]
    fn bounds_events() {
        let b = backend();
        let c = Control::new(b, ControlKind::Generic);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        c.set_on_bounds_changed(move |r| seen2.borrow_mut().push(*r));
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        c.set_bounds(r);
        // Unchanged bounds do not raise.
        c.set_bounds(r);
        assert_eq!(*seen.borrow(), vec![r]);
        assert_eq!(c.location(), Point::new(1.0, 2.0));
        assert_eq!(c.size(), Size::new(3.0, 4.0));
    }

    #[test]
    fn handler_created_at_most_once() {
        crate::testing::init_tracing();
        let b = CountingBackend::new();
        let dyn_b: Rc<dyn Backend> = b.clone();
        let c = Control::new(dyn_b, ControlKind::Generic);
        assert!(!c.handler_created());
        c.invalidate();
        assert!(c.handler_created());
        c.client_to_screen(Point::zero());
        let _ = c.scale_factor();
        c.invalidate();
        assert_eq!(b.total(), 1);
        assert_eq!(b.native.get(), 1);
    }

    #[test]
    fn visual_children_get_delegated_handlers() {
        let b = CountingBackend::new();
        let dyn_b: Rc<dyn Backend> = b.clone();
        let window = Control::new(dyn_b.clone(), ControlKind::Window);
        let child = Control::new(dyn_b, ControlKind::Panel);
        window.add_child(&child).unwrap();
        child.invalidate();
        // The window realizes natively, the child delegates to it.
        assert_eq!(b.native.get(), 1);
        assert_eq!(b.delegated.get(), 1);
    }

    #[test]
    fn dispose_is_recursive_and_idempotent() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        let child = Control::new(b, ControlKind::Generic);
        root.add_child(&child).unwrap();
        root.invalidate();

        root.dispose();
        root.dispose();
        assert!(root.is_disposed());
        assert!(child.is_disposed());
        assert_eq!(root.child_count(), 0);
        assert!(!root.handler_created());
        // Disposed controls never create a handler.
        assert!(root.with_handler(|_, _| ()).is_none());
        assert!(matches!(
            root.add_child(&Control::new(backend(), ControlKind::Generic)),
            Err(Error::Disposed(_))
        ));
    }

    #[test]
    fn mouse_state_and_event_multiplexing() {
        let b = backend();
        let c = Control::new(b, ControlKind::Button);
        let downs = Rc::new(Cell::new(0));
        let downs2 = downs.clone();
        c.set_on_mouse_down(move |_| downs2.set(downs2.get() + 1));

        c.feed_mouse(&mut MouseEvent::at(Action::Enter, (1.0, 1.0)));
        assert!(c.is_hovered());
        c.feed_mouse(&mut MouseEvent::left(Action::Down, (1.0, 1.0)));
        assert!(c.is_pressed());
        assert_eq!(downs.get(), 1);
        assert_eq!(c.visual_state(), VisualState::Pressed);

        c.feed_mouse(&mut MouseEvent::at(Action::Leave, (9.0, 9.0)));
        assert!(!c.is_hovered());
        assert!(!c.is_pressed());
    }

    #[test]
    fn disabling_clears_interaction_state() {
        let b = backend();
        let c = Control::new(b, ControlKind::Button);
        c.feed_mouse(&mut MouseEvent::at(Action::Enter, (1.0, 1.0)));
        c.feed_mouse(&mut MouseEvent::left(Action::Down, (1.0, 1.0)));
        c.set_enabled(false);
        assert!(!c.is_hovered());
        assert!(!c.is_pressed());
        assert_eq!(c.visual_state(), VisualState::Disabled);
        assert!(!c.can_accept_focus());
    }

    #[test]
    fn hit_test_finds_deepest_visible_child() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        root.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        let mid = Control::new(b.clone(), ControlKind::Panel);
        mid.set_bounds(Rect::new(10.0, 10.0, 50.0, 50.0));
        let leaf = Control::new(b.clone(), ControlKind::Generic);
        leaf.set_bounds(Rect::new(5.0, 5.0, 10.0, 10.0));
        root.add_child(&mid).unwrap();
        mid.add_child(&leaf).unwrap();

        let (hit, local) = root.hit_test(Point::new(17.0, 18.0));
        assert_eq!(hit, leaf);
        assert_eq!(local, Point::new(2.0, 3.0));

        let (hit, _) = root.hit_test(Point::new(90.0, 90.0));
        assert_eq!(hit, root);

        // Hidden children are transparent to hit testing.
        leaf.set_visible(false);
        let (hit, _) = root.hit_test(Point::new(17.0, 18.0));
        assert_eq!(hit, mid);

        // The topmost (last) sibling wins.
        let over = Control::new(b, ControlKind::Generic);
        over.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        root.add_child(&over).unwrap();
        let (hit, _) = root.hit_test(Point::new(17.0, 18.0));
        assert_eq!(hit, over);
    }

    #[test]
    fn render_offsets_children_and_skips_hidden() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        root.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
        root.set_background_color(Some(Color::WHITE));
        let child = Control::new(b.clone(), ControlKind::Generic);
        child.set_bounds(Rect::new(10.0, 20.0, 30.0, 30.0));
        child.set_background_color(Some(Color::RED));
        let hidden = Control::new(b, ControlKind::Generic);
        hidden.set_bounds(Rect::new(50.0, 50.0, 10.0, 10.0));
        hidden.set_background_color(Some(Color::BLUE));
        hidden.set_visible(false);
        root.add_child(&child).unwrap();
        root.add_child(&hidden).unwrap();

        let mut surface = RecordingSurface::new();
        root.render(&mut surface);
        assert_eq!(
            surface.ops(),
            [
                "fill 0,0 100x100 #ffffff".to_string(),
                "fill 10,20 30x30 #ff0000".to_string(),
            ]
        );
    }

    #[test]
    fn paint_slot_receives_offset_surface() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Panel);
        let child = Control::new(b, ControlKind::Generic);
        child.set_bounds(Rect::new(10.0, 10.0, 20.0, 20.0));
        root.add_child(&child).unwrap();
        child.set_on_paint(|ctx| {
            ctx.fill_rect(&Brush::solid(Color::GREEN), Rect::new(1.0, 1.0, 2.0, 2.0));
        });
        let mut surface = RecordingSurface::new();
        root.render(&mut surface);
        assert_eq!(surface.ops(), ["fill 11,11 2x2 #008000".to_string()]);
    }

    #[test]
    fn dump_renders_the_tree() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Window);
        let child = Control::new(b, ControlKind::Button);
        root.add_child(&child).unwrap();
        child.set_visible(false);
        let dump = root.dump();
        assert!(dump.contains("window"));
        assert!(dump.contains("  button"));
        assert!(dump.contains("hidden"));
    }

    #[test]
    fn event_subscription_replaces() {
        let b = backend();
        let c = Control::new(b, ControlKind::Generic);
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let f = first.clone();
        c.set_on_key_down(move |_| f.set(f.get() + 1));
        let s = second.clone();
        c.set_on_key_down(move |_| s.set(s.get() + 1));
        c.feed_key_down(&mut crate::event::key::KeyEvent::new(
            crate::event::key::KeyCode::Tab,
        ));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn backend_selection_notification_routes() {
        let c = Control::new(backend(), ControlKind::ListView);
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        c.set_on_selection_changed(move |()| hits2.set(hits2.get() + 1));
        assert!(c.raise_handler(|cb| &mut cb.selection_changed, &mut ()));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn backend_destruction_disposes() {
        let b = backend();
        let root = Control::new(b.clone(), ControlKind::Window);
        let child = Control::new(b, ControlKind::Button);
        root.add_child(&child).unwrap();
        assert!(root.raise_handler(|cb| &mut cb.destroyed, &mut ()));
        assert!(root.is_disposed());
        assert!(child.is_disposed());
    }
}
