//! The bordered-container widget.

use std::{cell::RefCell, rc::Rc};

use alder_geom::Rect;

use crate::{
    control::Control,
    drawing::{BorderSettings, DrawContext},
    error::Result,
    handler::{Backend, ControlKind},
};

/// Shared border storage.
struct BorderInner {
    /// The underlying control.
    ctrl: Control,
    /// Frame appearance.
    settings: RefCell<BorderSettings>,
}

/// A container that draws a frame around its children.
///
/// Children occupy the client rectangle, the control's area inset by the
/// frame width on every side. The popup window uses a border as its chrome.
#[derive(Clone)]
pub struct Border {
    /// Shared storage.
    inner: Rc<BorderInner>,
}

impl Border {
    /// Construct a border with default settings.
    pub fn new(backend: Rc<dyn Backend>) -> Self {
        let border = Self {
            inner: Rc::new(BorderInner {
                ctrl: Control::new(backend, ControlKind::Border),
                settings: RefCell::new(BorderSettings::default()),
            }),
        };
        border.wire();
        border
    }

    /// Subscribe the underlying control's slots. Called once from the
    /// constructor.
    fn wire(&self) {
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctrl.set_on_paint(move |ctx| {
            if let Some(inner) = weak.upgrade() {
                (Self { inner }).paint(ctx);
            }
        });
        let weak = Rc::downgrade(&self.inner);
        self.inner.ctrl.set_on_bounds_changed(move |_| {
            if let Some(inner) = weak.upgrade() {
                (Self { inner }).layout();
            }
        });
    }

    /// The underlying control.
    pub fn control(&self) -> &Control {
        &self.inner.ctrl
    }

    /// Frame appearance.
    pub fn settings(&self) -> BorderSettings {
        *self.inner.settings.borrow()
    }

    /// Replace the frame appearance and re-layout the children.
    pub fn set_settings(&self, settings: BorderSettings) {
        *self.inner.settings.borrow_mut() = settings;
        self.layout();
        self.inner.ctrl.invalidate();
    }

    /// The area inside the frame, in client coordinates.
    pub fn client_rect(&self) -> Rect {
        let width = self.inner.settings.borrow().width;
        let full = self.inner.ctrl.size().rect();
        Rect::new(
            width,
            width,
            (full.size.w - width * 2.0).max(0.0),
            (full.size.h - width * 2.0).max(0.0),
        )
    }

    /// Add a child filling the client rectangle.
    pub fn set_child(&self, child: &Control) -> Result<()> {
        self.inner.ctrl.add_child(child)?;
        self.layout();
        Ok(())
    }

    /// Fit all children to the client rectangle.
    fn layout(&self) {
        let client = self.client_rect();
        for child in self.inner.ctrl.children() {
            child.set_bounds(client);
        }
    }

    /// Stroke the frame. The pen is centered on the frame's midline.
    fn paint(&self, ctx: &mut dyn DrawContext) {
        let settings = self.settings();
        if settings.width <= 0.0 {
            return;
        }
        let rect = self.inner.ctrl.size().rect().inflate(-settings.width / 2.0);
        ctx.draw_rect(&settings.pen(), rect);
    }
}
