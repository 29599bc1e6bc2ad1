//! Per-visual-state value storage.
//!
//! Styleable controls vary a value (brush, pen, image, color pair, border)
//! over the five fixed visual states. [`StateObjects`] stores one optional
//! value per state, with `Normal` as the fallback for unset states.

use crate::{
    drawing::{BorderSettings, Brush, Color, Image, Pen},
    handler::Callback,
};

/// The finite set of visual states a styleable control property can vary
/// over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualState {
    /// Default state.
    Normal,
    /// Pointer is over the control.
    Hovered,
    /// Control is being pressed.
    Pressed,
    /// Control is disabled.
    Disabled,
    /// Control has keyboard focus.
    Focused,
}

impl VisualState {
    /// All states, in slot order.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Hovered,
        Self::Pressed,
        Self::Disabled,
        Self::Focused,
    ];

    /// Compute the visual state for a control's interaction flags.
    ///
    /// Priority: Disabled, then Pressed, then Hovered, then Focused.
    pub fn for_control(enabled: bool, hovered: bool, pressed: bool, focused: bool) -> Self {
        if !enabled {
            Self::Disabled
        } else if pressed {
            Self::Pressed
        } else if hovered {
            Self::Hovered
        } else if focused {
            Self::Focused
        } else {
            Self::Normal
        }
    }
}

/// A value of type `T` per visual state, with `Normal` as fallback.
///
/// Instances can be frozen, after which every mutation is a silent no-op;
/// this supports shared read-only defaults. Freezing is deliberately
/// irreversible (see DESIGN.md on the original's one-way `Immutable` latch).
pub struct StateObjects<T> {
    /// Value slots in [`VisualState::ALL`] order.
    slots: [Option<T>; 5],
    /// Frozen instances silently ignore mutation.
    frozen: bool,
    /// Single-subscriber change notification, keyed by the mutated state.
    on_changed: Callback<VisualState>,
}

impl<T> Default for StateObjects<T> {
    fn default() -> Self {
        Self {
            slots: [None, None, None, None, None],
            frozen: false,
            on_changed: Callback::new(),
        }
    }
}

impl<T> StateObjects<T> {
    /// Construct an empty, mutable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty, permanently frozen set, for shared defaults.
    pub fn frozen_empty() -> Self {
        Self {
            frozen: true,
            ..Self::default()
        }
    }

    /// Index of a state's slot.
    fn slot_index(state: VisualState) -> usize {
        match state {
            VisualState::Normal => 0,
            VisualState::Hovered => 1,
            VisualState::Pressed => 2,
            VisualState::Disabled => 3,
            VisualState::Focused => 4,
        }
    }

    /// Exact-state lookup with no fallback.
    pub fn get(&self, state: VisualState) -> Option<&T> {
        self.slots[Self::slot_index(state)].as_ref()
    }

    /// Lookup falling back to the `Normal` slot when the requested state is
    /// unset.
    pub fn get_or_normal(&self, state: VisualState) -> Option<&T> {
        self.get(state).or_else(|| self.get(VisualState::Normal))
    }

    /// The `Normal` slot.
    pub fn normal(&self) -> Option<&T> {
        self.get(VisualState::Normal)
    }

    /// True if no slot is set.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// True if the set is frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Permanently freeze the set. There is no unfreeze.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Register the change subscriber, replacing any previous one. The
    /// subscriber receives the mutated state; it fires only on successful,
    /// value-changing mutation.
    pub fn set_on_changed(&mut self, f: impl FnMut(&mut VisualState) + 'static) {
        self.on_changed.set(f);
    }
}

impl<T: Clone + PartialEq> StateObjects<T> {
    /// Lookup with normal-fallback, then a caller-supplied default.
    pub fn get_or(&self, state: VisualState, default: T) -> T {
        self.get_or_normal(state).cloned().unwrap_or(default)
    }

    /// Lookup with normal-fallback, then a caller-supplied factory.
    pub fn get_or_else(&self, state: VisualState, factory: impl FnOnce() -> T) -> T {
        self.get_or_normal(state).cloned().unwrap_or_else(factory)
    }

    /// Set one slot. A no-op when frozen or when the value is unchanged.
    pub fn set(&mut self, state: VisualState, value: Option<T>) {
        if self.frozen {
            return;
        }
        let slot = &mut self.slots[Self::slot_index(state)];
        if *slot == value {
            return;
        }
        *slot = value;
        let mut key = state;
        self.on_changed.invoke(&mut key);
    }

    /// Set all five slots to one value.
    pub fn set_all(&mut self, value: Option<T>) {
        for state in VisualState::ALL {
            self.set(state, value.clone());
        }
    }

    /// Copy all five slots from another set. The frozen flag and the change
    /// subscriber are not copied.
    pub fn assign(&mut self, source: &Self) {
        for state in VisualState::ALL {
            self.set(state, source.get(state).cloned());
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateObjects<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateObjects")
            .field("slots", &self.slots)
            .field("frozen", &self.frozen)
            .finish()
    }
}

/// A foreground/background color pair for one visual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorPair {
    /// Foreground color, if set.
    pub foreground: Option<Color>,
    /// Background color, if set.
    pub background: Option<Color>,
}

/// Per-state brushes.
pub type StateBrushes = StateObjects<Brush>;
/// Per-state pens.
pub type StatePens = StateObjects<Pen>;
/// Per-state color pairs.
pub type StateColors = StateObjects<ColorPair>;
/// Per-state images.
pub type StateImages = StateObjects<Image>;
/// Per-state border settings.
pub type StateBorders = StateObjects<BorderSettings>;
