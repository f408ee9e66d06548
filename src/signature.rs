use std::sync::Arc;

use crate::slot::Output;

/// Describes one mocked function signature at the type level.
///
/// Implemented by (usually generated) marker types. For a function
/// `fn find(&self, name: &str, limit: usize) -> Option<u32>` the
/// generated implementation looks like this:
///
/// ```
/// use std::sync::Arc;
///
/// enum Find {}
///
/// impl decoy::Signature for Find {
///     type Params = (String, usize);
///     type Output = decoy::Returns<Option<u32>>;
///     type Hook = dyn Fn(&str, usize) -> Option<u32>;
/// }
///
/// impl<F> decoy::IntoHook<F> for Find
/// where
///     F: Fn(&str, usize) -> Option<u32> + 'static,
/// {
///     fn into_hook(hook: F) -> Arc<Self::Hook> {
///         Arc::new(hook)
///     }
/// }
/// ```
///
/// Free functions get `dyn Fn(..) -> .. + Send + Sync` hooks instead,
/// which is what lets their bindings live in a `static`.
pub trait Signature: 'static {
    /// Owned copies of the parameters, as a tuple.
    type Params;
    /// Either [`Void`](crate::Void) or [`Returns<T>`](crate::Returns).
    type Output: Output;
    /// The override, usually `dyn Fn(..) -> ..` over the parameters as
    /// declared, plus `Send + Sync` when the binding is shared between
    /// threads.
    type Hook: ?Sized;
}

/// Converts a closure into the [`Signature::Hook`] of a signature.
pub trait IntoHook<F>: Signature {
    fn into_hook(hook: F) -> Arc<Self::Hook>;
}

/// The value a call to a binding of `S` produces.
pub type ValueOf<S> = <<S as Signature>::Output as Output>::Value;
