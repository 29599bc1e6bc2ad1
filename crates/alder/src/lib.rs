//! A backend-agnostic desktop widget toolkit core.
//!
//! The model is split along one seam: portable [`control::Control`] objects
//! hold widget state and tree structure, and every platform-dependent
//! behavior is delegated to a per-control handler created by a
//! [`handler::Backend`]. The bundled [`pless`] backend is fully headless and
//! doubles as the test backend.
//!
//! The toolkit is single-threaded. Work that must not run inside an input
//! callback, popup hiding and click delivery among it, is deferred through a
//! [`dispatch::Dispatcher`] owned by the event loop.

/// The portable control object model.
pub mod control;
/// Deferred execution on the UI event loop.
pub mod dispatch;
/// Drawing value types and the paint surface abstraction.
pub mod drawing;
/// Error types.
pub mod error;
/// Keyboard and mouse event types.
pub mod event;
/// The handler abstraction and backend seam.
pub mod handler;
/// Item models for lists and trees, and their widgets.
pub mod items;
/// Control naming.
mod name;
/// The headless Pless backend.
pub mod pless;
/// Per-visual-state value storage.
pub mod state;
/// Test support.
#[cfg(any(test, feature = "testing"))]
pub mod testing;
/// Built-in widgets.
pub mod widgets;

pub use control::{Control, WeakControl};
pub use dispatch::Dispatcher;
pub use error::{Error, Result};
pub use handler::{Backend, ControlHandler, ControlKind};
pub use name::ControlName;
pub use state::{StateObjects, VisualState};
