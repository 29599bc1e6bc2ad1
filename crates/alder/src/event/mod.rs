//! Input event payloads raised through handler callback slots.

/// Keyboard input primitives.
pub mod key;
/// Mouse input primitives.
pub mod mouse;
