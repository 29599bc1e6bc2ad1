//! This module contains the core primitives to represent mouse input.
use alder_geom::Point;

use super::key::Mods;

/// Mouse buttons.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Button {
    /// Left mouse button.
    Left,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Right,
    /// No button (motion events).
    None,
}

/// Mouse actions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Action {
    /// Button pressed.
    Down,
    /// Button released.
    Up,
    /// Pointer moved.
    Moved,
    /// Pointer entered the control.
    Enter,
    /// Pointer left the control.
    Leave,
    /// Wheel scrolled.
    Wheel,
}

/// A mouse event delivered through a handler callback slot.
///
/// `location` is in the receiving control's client coordinates,
/// device-independent units.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MouseEvent {
    /// The button involved, if any.
    pub button: Button,
    /// What happened.
    pub action: Action,
    /// Pointer location in client coordinates.
    pub location: Point,
    /// Wheel delta for `Action::Wheel`, positive away from the user.
    pub wheel: f64,
    /// Active keyboard modifiers.
    pub mods: Mods,
}

impl MouseEvent {
    /// Construct a buttonless event at a location.
    pub fn at(action: Action, location: impl Into<Point>) -> Self {
        Self {
            button: Button::None,
            action,
            location: location.into(),
            wheel: 0.0,
            mods: Mods::default(),
        }
    }

    /// Construct a left-button event at a location.
    pub fn left(action: Action, location: impl Into<Point>) -> Self {
        Self {
            button: Button::Left,
            ..Self::at(action, location)
        }
    }
}
