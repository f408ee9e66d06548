use std::fmt::{self, Formatter};

use paste::paste;

/// Arguments of the most recent call to a binding.
///
/// `P` is a tuple holding one owned copy per parameter. Every capture
/// replaces the previous one wholesale; no history is kept.
///
/// Positions are read through [`Param`], which is implemented for
/// tuples of up to ten elements. The zero-arity `Params<()>` has no
/// positions at all.
pub struct Params<P> {
    // boxed, a double may take itself as an argument
    last: Option<Box<P>>,
}

impl<P> Params<P> {
    pub const fn new() -> Self {
        Params { last: None }
    }

    /// Replaces the captured arguments.
    pub fn set(&mut self, params: P) {
        self.last = Some(Box::new(params));
    }

    /// The whole argument tuple of the last call, if there was one.
    pub fn last(&self) -> Option<&P> {
        self.last.as_deref()
    }

    pub fn clear(&mut self) {
        self.last = None;
    }
}

impl<P> Default for Params<P> {
    fn default() -> Self {
        Params::new()
    }
}

impl<P: fmt::Debug> fmt::Debug for Params<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.last {
            Some(params) => params.fmt(f),
            None => f.write_str("<none>"),
        }
    }
}

/// Positional, 1-based access into [`Params`].
///
/// # Examples
///
/// ```
/// use decoy::{Param, Params};
///
/// let mut params = Params::<(i32, String)>::new();
/// assert_eq!(Param::<1>::get(&params), None);
///
/// params.set((7, "seven".to_string()));
/// assert_eq!(Param::<1>::get(&params), Some(&7));
/// assert_eq!(Param::<2>::get(&params).map(String::as_str), Some("seven"));
/// ```
pub trait Param<const N: usize> {
    type Value;

    /// The argument at position `N` of the last call.
    fn get(&self) -> Option<&Self::Value>;
}

// (0, 1, 2) => Param<1>, Param<2>, Param<3> for Params<(T0, T1, T2)>
macro_rules! positions {
    (@each $all:tt; $($idx:tt),+) => {
        $(positions! { @one $all $idx })+
    };
    (@one ($($all:tt),+) $idx:tt) => {
        paste! {
            impl<$([<T $all>]),+> Param<{ $idx + 1 }> for Params<($([<T $all>],)+)> {
                type Value = [<T $idx>];

                fn get(&self) -> Option<&Self::Value> {
                    self.last.as_ref().map(|params| &params.$idx)
                }
            }
        }
    };
    ($($idx:tt),+) => {
        positions! { @each ($($idx),+); $($idx),+ }
    };
}

positions! { 0 }
positions! { 0, 1 }
positions! { 0, 1, 2 }
positions! { 0, 1, 2, 3 }
positions! { 0, 1, 2, 3, 4 }
positions! { 0, 1, 2, 3, 4, 5 }
positions! { 0, 1, 2, 3, 4, 5, 6 }
positions! { 0, 1, 2, 3, 4, 5, 6, 7 }
positions! { 0, 1, 2, 3, 4, 5, 6, 7, 8 }
positions! { 0, 1, 2, 3, 4, 5, 6, 7, 8, 9 }
