//! The push-button widget.

use std::{cell::RefCell, rc::Rc};

use alder_geom::Point;
use tracing::trace;

use crate::{
    control::Control,
    dispatch::Dispatcher,
    drawing::{Brush, Image},
    event::{
        key::KeyCode,
        mouse::Button as MouseButton,
    },
    handler::{Backend, Callback, ControlKind},
    state::{StateBrushes, StateImages, VisualState},
};

/// Portable button state.
struct ButtonState {
    /// Button label.
    label: String,
    /// Click notification.
    on_click: Callback<()>,
    /// Per-state background brushes, created on first styling.
    backgrounds: Option<StateBrushes>,
    /// Per-state images, created on first styling.
    images: Option<StateImages>,
}

/// Shared button storage.
struct ButtonInner {
    /// The underlying control.
    ctrl: Control,
    /// Deferred-execution queue for click delivery.
    dispatcher: Rc<Dispatcher>,
    /// Label, styling and the click slot.
    state: RefCell<ButtonState>,
}

/// A push button.
///
/// Clicks are never delivered synchronously from inside an input callback;
/// they are queued on the dispatcher and arrive on the next
/// [`Dispatcher::process_pending`] pump, guarded on the button still being
/// alive.
#[derive(Clone)]
pub struct Button {
    /// Shared storage.
    inner: Rc<ButtonInner>,
}

impl Button {
    /// Construct a button with a label.
    pub fn new(backend: Rc<dyn Backend>, dispatcher: Rc<Dispatcher>, label: &str) -> Self {
        let button = Self {
            inner: Rc::new(ButtonInner {
                ctrl: Control::new(backend, ControlKind::Button),
                dispatcher,
                state: RefCell::new(ButtonState {
                    label: label.into(),
                    on_click: Callback::new(),
                    backgrounds: None,
                    images: None,
                }),
            }),
        };
        button.wire();
        button
    }

    /// Subscribe the underlying control's input slots. Called once from the
    /// constructor.
    fn wire(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctrl.set_on_mouse_up(move |ev| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let b = Self { inner };
            // A release outside the client area cancels the press.
            if ev.button == MouseButton::Left && b.inner.ctrl.size().rect().contains(ev.location) {
                b.queue_click();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctrl.set_on_key_down(move |ev| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if ev.handled || !ev.key.mods.is_empty() {
                return;
            }
            if matches!(ev.key.key, KeyCode::Enter | KeyCode::Char(' ')) {
                ev.handled = true;
                (Self { inner }).queue_click();
            }
        });
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctrl.set_on_paint(move |ctx| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            (Self { inner }).paint(ctx);
        });
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.inner.ctrl
    }

    /// Button label.
    pub fn label(&self) -> String {
        self.inner.state.borrow().label.clone()
    }

    /// Replace the label.
    pub fn set_label(&self, label: &str) {
        self.inner.state.borrow_mut().label = label.into();
        self.inner.ctrl.invalidate();
    }

    /// Subscribe to clicks. Single subscriber; replaces.
    pub fn set_on_click(&self, f: impl FnMut(&mut ()) + 'static) {
        self.inner.state.borrow_mut().on_click.set(f);
    }

    /// Trigger a click programmatically. Delivery is deferred like input
    /// clicks.
    pub fn click(&self) {
        self.queue_click();
    }

    /// Queue click delivery on the dispatcher, guarded on liveness.
    fn queue_click(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.dispatcher.begin_invoke(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if inner.ctrl.is_disposed() {
                return;
            }
            trace!(name = %inner.ctrl.name(), "button clicked");
            (Self { inner }).raise_click();
        });
    }

    /// Raise the click callback, re-entrancy safe.
    fn raise_click(&self) {
        let taken = self.inner.state.borrow_mut().on_click.take_slot();
        if let Some(mut f) = taken {
            f(&mut ());
            self.inner.state.borrow_mut().on_click.restore_slot(f);
        }
    }

    /// The visual state implied by the button's interaction flags.
    pub fn current_visual_state(&self) -> VisualState {
        self.inner.ctrl.visual_state()
    }

    /// Mutate the per-state background brushes, creating the set on first
    /// use.
    pub fn with_backgrounds<R>(&self, f: impl FnOnce(&mut StateBrushes) -> R) -> R {
        let mut st = self.inner.state.borrow_mut();
        let r = f(st.backgrounds.get_or_insert_with(StateBrushes::new));
        drop(st);
        self.inner.ctrl.invalidate();
        r
    }

    /// The background brush for a state, with normal fallback.
    pub fn background(&self, state: VisualState) -> Option<Brush> {
        self.inner
            .state
            .borrow()
            .backgrounds
            .as_ref()
            .and_then(|b| b.get_or_normal(state).cloned())
    }

    /// Mutate the per-state images, creating the set on first use.
    pub fn with_images<R>(&self, f: impl FnOnce(&mut StateImages) -> R) -> R {
        let mut st = self.inner.state.borrow_mut();
        let r = f(st.images.get_or_insert_with(StateImages::new));
        drop(st);
        self.inner.ctrl.invalidate();
        r
    }

    /// The image for a state, with normal fallback.
    pub fn image(&self, state: VisualState) -> Option<Image> {
        self.inner
            .state
            .borrow()
            .images
            .as_ref()
            .and_then(|i| i.get_or_normal(state).cloned())
    }

    /// Paint the background for the current state, then the image and the
    /// label. The label shifts right to make room for the image.
    fn paint(&self, ctx: &mut dyn crate::drawing::DrawContext) {
        let state = self.current_visual_state();
        let brush = self
            .background(state)
            .unwrap_or_else(|| Brush::solid(self.inner.ctrl.effective_background_color()));
        ctx.fill_rect(&brush, self.inner.ctrl.size().rect());
        let mut text_origin = Point::new(4.0, 4.0);
        if let Some(image) = self.image(state) {
            ctx.draw_image(&image, Point::new(4.0, 4.0));
            text_origin.x += image.size.w + 4.0;
        }
        let st = self.inner.state.borrow();
        ctx.draw_text(
            &self.inner.ctrl.effective_font(),
            self.inner.ctrl.effective_foreground_color(),
            text_origin,
            &st.label,
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use alder_geom::{Rect, Size};

    use super::*;
    use crate::{
        drawing::Color,
        event::mouse::{Action, MouseEvent},
        pless::PlessBackend,
        testing::RecordingSurface,
    };

    fn button() -> (Button, Rc<Dispatcher>) {
        let backend = PlessBackend::new();
        let d = Dispatcher::new();
        let b = Button::new(backend, d.clone(), "ok");
        b.control().set_bounds(Rect::new(0.0, 0.0, 60.0, 20.0));
        (b, d)
    }

    #[test]
    fn click_is_deferred() {
        crate::testing::init_tracing();
        let (b, d) = button();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        b.set_on_click(move |()| hits2.set(hits2.get() + 1));

        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Down, (5.0, 5.0)));
        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Up, (5.0, 5.0)));
        assert_eq!(hits.get(), 0);
        d.process_pending();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn release_outside_cancels() {
        let (b, d) = button();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        b.set_on_click(move |()| hits2.set(hits2.get() + 1));

        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Down, (5.0, 5.0)));
        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Up, (99.0, 5.0)));
        d.process_pending();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn keyboard_clicks() {
        let (b, d) = button();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        b.set_on_click(move |()| hits2.set(hits2.get() + 1));

        let mut ev = crate::event::key::KeyEvent::new(KeyCode::Enter);
        b.control().feed_key_down(&mut ev);
        assert!(ev.handled);
        let mut ev = crate::event::key::KeyEvent::new(KeyCode::Char(' '));
        b.control().feed_key_down(&mut ev);
        d.process_pending();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn disposed_button_drops_queued_click() {
        let (b, d) = button();
        let hits = Rc::new(Cell::new(0));
        let hits2 = hits.clone();
        b.set_on_click(move |()| hits2.set(hits2.get() + 1));
        b.click();
        b.control().dispose();
        d.process_pending();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn interaction_state_tracks_mouse() {
        let (b, _d) = button();
        assert_eq!(b.current_visual_state(), VisualState::Normal);
        b.control()
            .feed_mouse(&mut MouseEvent::at(Action::Enter, (1.0, 1.0)));
        assert_eq!(b.current_visual_state(), VisualState::Hovered);
        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Down, (1.0, 1.0)));
        assert_eq!(b.current_visual_state(), VisualState::Pressed);
        b.control()
            .feed_mouse(&mut MouseEvent::left(Action::Up, (1.0, 1.0)));
        assert_eq!(b.current_visual_state(), VisualState::Hovered);
        b.control()
            .feed_mouse(&mut MouseEvent::at(Action::Leave, (9.0, 9.0)));
        assert_eq!(b.current_visual_state(), VisualState::Normal);

        b.control().set_enabled(false);
        assert_eq!(b.current_visual_state(), VisualState::Disabled);
    }

    #[test]
    fn state_brushes_queried_with_fallback() {
        let (b, _d) = button();
        b.with_backgrounds(|bg| {
            bg.set(VisualState::Normal, Some(Brush::solid(Color::WHITE)));
            bg.set(VisualState::Pressed, Some(Brush::solid(Color::BLACK)));
        });
        assert_eq!(
            b.background(VisualState::Hovered),
            Some(Brush::solid(Color::WHITE))
        );
        assert_eq!(
            b.background(VisualState::Pressed),
            Some(Brush::solid(Color::BLACK))
        );
    }

    #[test]
    fn state_images_painted_before_label() {
        let (b, _d) = button();
        b.with_images(|im| {
            let icon = Image::from_bytes(Size::new(8.0, 8.0), vec![0]);
            im.set(VisualState::Normal, Some(icon));
        });
        let mut surface = RecordingSurface::new();
        b.control().render(&mut surface);
        assert!(surface.contains("image 4,4 8x8"));
        assert!(surface.contains("text 16,4"));
    }
}
