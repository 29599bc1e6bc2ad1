use alder_geom::Rect;

use super::ControlHandler;
use crate::error::{Error, Result};

/// The widget families a backend can realize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// A plain control with no specialized behavior.
    Generic,
    /// A container control.
    Panel,
    /// A push button.
    Button,
    /// A bordered container.
    Border,
    /// A multi-column item list.
    ListView,
    /// A hierarchical item tree.
    TreeView,
    /// A date picker.
    Calendar,
    /// A top-level window.
    Window,
    /// A transient popup window.
    Popup,
}

/// An opaque native window/widget handle, passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Information about a display, queried from the backend environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    /// Pixels per device-independent unit.
    scale_factor: f32,
    /// Usable screen area in device-independent units.
    client_area: Rect,
}

impl Display {
    /// Construct display info, validating the scale factor and area.
    pub fn try_new(scale_factor: f32, client_area: Rect) -> Result<Self> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(Error::Invalid(format!("scale factor {scale_factor}")));
        }
        Ok(Self {
            scale_factor,
            client_area: client_area.validated()?,
        })
    }

    /// Pixels per device-independent unit.
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// Usable screen area in device-independent units.
    pub fn client_area(&self) -> Rect {
        self.client_area
    }
}

impl Default for Display {
    /// A 1.0-scale 1280x800 display.
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            client_area: Rect::new(0.0, 0.0, 1280.0, 800.0),
        }
    }
}

/// A handler factory plus environment queries: the seam between the portable
/// control model and a platform.
///
/// Backends are explicit, caller-supplied dependencies; controls keep an
/// `Rc<dyn Backend>` and consult it exactly once, when their handler is first
/// needed.
pub trait Backend {
    /// Create a handler that realizes an actual native window/widget for the
    /// given kind.
    fn create_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler>;

    /// Create a handler for a purely-composited visual child: one that
    /// delegates geometry, input and painting to its nearest native-backed
    /// ancestor instead of realizing a native widget.
    fn create_delegated_handler(&self, kind: ControlKind) -> Box<dyn ControlHandler>;

    /// The primary display.
    fn display(&self) -> Display;
}
