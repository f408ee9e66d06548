use crate::{
    binding::Binding,
    signature::{Signature, ValueOf},
};

/// One call routed through a [`Binding`].
///
/// Generated functions create an `Intercept` per call, hand it the
/// call's arguments through [`capture`](Self::capture), and let
/// [`resolve`](Self::resolve) decide the outcome:
///
/// 1. if the binding has a hook, the hook is invoked with the original
///    arguments;
/// 2. otherwise a non-unit signature reads the binding's result, which
///    fails loudly if it was never set;
/// 3. otherwise the call does nothing.
///
/// The call is counted when the `Intercept` is dropped. That happens
/// exactly once per call on every path out of it, including a hook
/// that panics.
///
/// # Examples
///
/// Generated code for `fn area(&self, w: u32, h: u32) -> u32` boils
/// down to:
///
/// ```
/// # use std::sync::Arc;
/// # enum Area {}
/// # impl decoy::Signature for Area {
/// #     type Params = (u32, u32);
/// #     type Output = decoy::Returns<u32>;
/// #     type Hook = dyn Fn(u32, u32) -> u32;
/// # }
/// # impl<F: Fn(u32, u32) -> u32 + 'static> decoy::IntoHook<F> for Area {
/// #     fn into_hook(hook: F) -> Arc<Self::Hook> { Arc::new(hook) }
/// # }
/// fn area(binding: &decoy::Binding<Area>, w: u32, h: u32) -> u32 {
///     decoy::Intercept::new(binding)
///         .capture((w, h))
///         .resolve(|hook| hook(w, h))
/// }
///
/// let binding = decoy::Binding::<Area>::new("u32 area(u32, u32)");
/// binding.set_hook(|w: u32, h: u32| w * h);
///
/// assert_eq!(area(&binding, 3, 4), 12);
/// assert_eq!(binding.count(), 1);
/// assert_eq!(binding.param::<2>(), 4);
/// ```
#[must_use = "a call is only resolved by `Intercept::resolve`"]
pub struct Intercept<'b, S: Signature> {
    binding: &'b Binding<S>,
}

impl<'b, S: Signature> Intercept<'b, S> {
    pub fn new(binding: &'b Binding<S>) -> Self {
        log::trace!("intercepted `{}`", binding.prototype());
        Intercept { binding }
    }

    /// Records the arguments of this call, replacing those of the
    /// previous one.
    pub fn capture(self, params: S::Params) -> Self {
        self.binding.capture(params);
        self
    }

    /// Produces the outcome of the call.
    ///
    /// `invoke` receives the hook, if there is one, and is expected to
    /// call it with the call's original arguments.
    #[track_caller]
    pub fn resolve<F>(self, invoke: F) -> ValueOf<S>
    where
        F: FnOnce(&S::Hook) -> ValueOf<S>,
    {
        // the hook is cloned out so nothing stays borrowed while it
        // runs; it may call back into this binding
        match self.binding.hook() {
            Some(hook) => invoke(&*hook),
            None => self.binding.fallback(),
        }
    }
}

impl<S: Signature> Drop for Intercept<'_, S> {
    fn drop(&mut self) {
        self.binding.finish_call();
    }
}
