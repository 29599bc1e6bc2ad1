/// A single-subscriber callback slot.
///
/// Unlike a multicast event, a slot holds at most one subscriber: setting a
/// new callback replaces the previous one. This matches the contract between
/// a control and its handler, where the owning control is the only expected
/// subscriber.
pub struct Callback<A: ?Sized> {
    /// The registered subscriber, if any.
    slot: Option<Box<dyn FnMut(&mut A)>>,
}

impl<A: ?Sized> Default for Callback<A> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<A: ?Sized> Callback<A> {
    /// Construct an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber, replacing any previous one.
    pub fn set(&mut self, f: impl FnMut(&mut A) + 'static) {
        self.slot = Some(Box::new(f));
    }

    /// Remove the subscriber.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// True if a subscriber is registered.
    pub fn is_set(&self) -> bool {
        self.slot.is_some()
    }

    /// Invoke the subscriber in place. Returns false if the slot is empty.
    ///
    /// The subscriber must not re-enter the object holding this slot; use
    /// [`Callback::take_slot`] / [`Callback::restore_slot`] when re-entrancy
    /// is possible.
    pub fn invoke(&mut self, arg: &mut A) -> bool {
        if let Some(f) = self.slot.as_mut() {
            f(arg);
            true
        } else {
            false
        }
    }

    /// Take the subscriber out of the slot for re-entrancy-safe invocation.
    pub(crate) fn take_slot(&mut self) -> Option<Box<dyn FnMut(&mut A)>> {
        self.slot.take()
    }

    /// Put a taken subscriber back, unless a new one was registered while it
    /// was out.
    pub(crate) fn restore_slot(&mut self, f: Box<dyn FnMut(&mut A)>) {
        if self.slot.is_none() {
            self.slot = Some(f);
        }
    }
}

impl<A: ?Sized> std::fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_set())
            .finish()
    }
}
