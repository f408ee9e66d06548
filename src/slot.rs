use std::{fmt, marker::PhantomData};

use crate::{verify, Error, Verified};

/// Canned result returned by a binding when no hook is set.
///
/// The result is boxed, so a double may return itself.
#[derive(Clone)]
pub struct ReturnSlot<T> {
    value: Verified<Box<T>>,
}

impl<T> ReturnSlot<T> {
    pub const fn new() -> Self {
        ReturnSlot {
            value: Verified::named("result"),
        }
    }

    pub fn set(&mut self, value: T) {
        self.value.assign(Box::new(value));
    }

    pub fn is_set(&self) -> bool {
        self.value.is_assigned()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Reads the result.
    ///
    /// # Panics
    ///
    /// Fails through [`verify::fail`] if it was never set.
    #[track_caller]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        T::clone(self.value.get())
    }
}

impl<T> Default for ReturnSlot<T> {
    fn default() -> Self {
        ReturnSlot::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReturnSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

/// Slot of signatures returning `()`: there is nothing to store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSlot;

/// The return dimension of a [`Signature`](crate::Signature).
///
/// Implemented only by [`Void`] and [`Returns`]. This is what makes
/// the result-related methods of a [`Binding`](crate::Binding) exist
/// exclusively for non-unit signatures.
pub trait Output: private::Sealed {
    /// What the mocked function returns.
    type Value;
    /// Storage for a canned result.
    type Slot: Default + Clone;

    /// An empty slot, usable in `static` bindings.
    #[doc(hidden)]
    const EMPTY: Self::Slot;

    /// Whether the slot holds a result.
    #[doc(hidden)]
    fn is_set(slot: &Self::Slot) -> bool;

    /// Produces the return value when there is no hook.
    #[doc(hidden)]
    fn fallback(slot: &Self::Slot, prototype: &str) -> Self::Value;
}

/// Output of signatures returning `()`.
pub enum Void {}

/// Output of signatures returning `T`.
pub struct Returns<T>(PhantomData<fn() -> T>);

impl Output for Void {
    type Value = ();
    type Slot = NoSlot;
    const EMPTY: NoSlot = NoSlot;

    fn is_set(_: &NoSlot) -> bool {
        false
    }

    fn fallback(_: &NoSlot, _: &str) {}
}

impl<T: Clone> Output for Returns<T> {
    type Value = T;
    type Slot = ReturnSlot<T>;
    const EMPTY: ReturnSlot<T> = ReturnSlot::new();

    fn is_set(slot: &ReturnSlot<T>) -> bool {
        slot.is_set()
    }

    #[track_caller]
    fn fallback(slot: &ReturnSlot<T>, prototype: &str) -> T {
        verify::verify(slot.is_set(), || Error::Unconfigured(prototype.to_string()));
        slot.get()
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Void {}
    impl<T> Sealed for super::Returns<T> {}
}
