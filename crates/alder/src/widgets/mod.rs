//! Built-in widgets composed on the control object model.
//!
//! Each widget wraps a [`crate::control::Control`] of the matching kind and
//! layers its own portable state on top, forwarding to the backend through
//! the control's handler and its capability surfaces. The list and tree
//! widgets live with their item models in [`crate::items`].

/// Bordered container.
mod border;
/// Push button.
mod button;
/// Date picker and the date value type.
pub mod calendar;
/// Transient popup windows.
mod popup;
/// Top-level windows.
mod window;

pub use border::Border;
pub use button::Button;
pub use calendar::{Calendar, Date};
pub use popup::{Popup, PopupContent, PopupResult};
pub use window::Window;
