use std::fmt::{self, Formatter};

use crate::{verify, Error};

/// A value that must be written before it is read.
///
/// Reading an unassigned `Verified` goes through
/// [`verify::fail`](crate::verify::fail) instead of producing a
/// default. Assigning is always allowed and the last write wins.
///
/// Instantiating it with a borrowed type (`Verified<&'a T>`) stores a
/// non-owning reference; the borrow checker keeps the referent alive
/// for as long as the `Verified` is.
///
/// # Examples
///
/// ```
/// use decoy::Verified;
///
/// let mut name = Verified::new();
/// assert!(!name.is_assigned());
///
/// name.assign("Donald").assign("Daisy");
/// assert_eq!(name.read(), "Daisy");
/// ```
///
/// A name given with [`named`](Self::named) shows up in the failure:
///
/// ```should_panic
/// let age: decoy::Verified<u32> = decoy::Verified::named("age");
/// age.read(); // panics: age was read before it was assigned
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Verified<T> {
    value: Option<T>,
    name: &'static str,
}

impl<T> Verified<T> {
    pub const fn new() -> Self {
        Verified::named("value")
    }

    /// Creates an unassigned value that is called `name` in failures.
    pub const fn named(name: &'static str) -> Self {
        Verified { value: None, name }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stores `value`, replacing any previous one.
    pub fn assign(&mut self, value: T) -> &mut Self {
        self.value = Some(value);
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.value.is_some()
    }

    /// Returns to the unassigned state.
    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Returns a reference to the stored value.
    ///
    /// # Panics
    ///
    /// Fails through [`verify::fail`] if nothing was assigned.
    #[track_caller]
    pub fn get(&self) -> &T {
        verify::verified(self.value.as_ref(), || Error::Unassigned(self.name))
    }

    /// Returns a copy of the stored value.
    ///
    /// # Panics
    ///
    /// Fails through [`verify::fail`] if nothing was assigned.
    #[track_caller]
    pub fn read(&self) -> T
    where
        T: Clone,
    {
        self.get().clone()
    }

    /// Non-failing analog of [`get`](Self::get).
    pub fn try_get(&self) -> Result<&T, Error> {
        self.value.as_ref().ok_or(Error::Unassigned(self.name))
    }
}

impl<T> Default for Verified<T> {
    fn default() -> Self {
        Verified::new()
    }
}

impl<T> From<T> for Verified<T> {
    fn from(value: T) -> Self {
        Verified {
            value: Some(value),
            name: "value",
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Verified<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => f.debug_tuple("Verified").field(value).finish(),
            None => f.write_str("Verified(<unassigned>)"),
        }
    }
}
