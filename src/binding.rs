use std::{
    borrow::Cow,
    fmt::{self, Formatter},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::{const_mutex, Mutex, MutexGuard};

use crate::{
    params::{Param, Params},
    signature::{IntoHook, Signature, ValueOf},
    slot::{Output, Returns},
    verify, Error,
};

/// State of one mocked function: how often it was called, what it was
/// last called with, and what it should do when called.
///
/// Every operation takes `&self`, so a binding can be configured and
/// inspected while the double owning it is lent to the code under
/// test.
///
/// A binding is `Sync` exactly when its hook type is `Send + Sync` and
/// its arguments and result are `Send`. Bindings of doubles keep plain
/// `dyn Fn` hooks, so they stay on one thread and their hooks may
/// capture `Rc`s. Bindings of [`function!`](crate::function) are
/// process-wide `static`s: a call from any thread reaches the same
/// binding, and tests sharing one serialize through
/// [`isolate`](Self::isolate).
///
/// Bindings are normally generated by [`double!`](crate::double) or
/// [`function!`](crate::function); calls reach them through an
/// [`Intercept`](crate::Intercept).
///
/// # Examples
///
/// ```
/// pub trait UserNames {
///     fn find_by_id(&self, id: i32) -> &'static str;
/// }
///
/// decoy::double! {
///     struct MockUserNames;
///
///     impl UserNames for MockUserNames {
///         fn find_by_id(&self, id: i32) -> &'static str;
///     }
/// }
///
/// let names = MockUserNames::new();
/// names.find_by_id.set_result("Donald Duck");
///
/// assert_eq!(names.find_by_id(7), "Donald Duck");
/// assert!(names.find_by_id.called());
/// assert_eq!(names.find_by_id.param::<1>(), 7);
/// assert_eq!(names.find_by_id.prototype(), "&'static str find_by_id(i32)");
/// ```
pub struct Binding<S: Signature> {
    prototype: Cow<'static, str>,
    count: AtomicUsize,
    hook: Mutex<Option<Arc<S::Hook>>>,
    params: Mutex<Params<S::Params>>,
    slot: Mutex<<S::Output as Output>::Slot>,
    exclusive: Mutex<()>,
}

/// Exclusive use of a [`Binding`], see [`Binding::isolate`].
#[must_use = "the binding is only isolated while the guard is alive"]
pub struct Isolated<'b> {
    _exclusive: MutexGuard<'b, ()>,
}

impl<S: Signature> Binding<S> {
    /// Creates a fresh binding. Runs of whitespace in `prototype` are
    /// collapsed and surrounding whitespace is trimmed.
    pub fn new(prototype: impl AsRef<str>) -> Self {
        Binding::with_prototype(Cow::Owned(normalize(prototype.as_ref())))
    }

    /// Creates a fresh binding in a `const` context. `prototype` is
    /// kept as given.
    ///
    /// ```
    /// # enum Tick {}
    /// # impl decoy::Signature for Tick {
    /// #     type Params = ();
    /// #     type Output = decoy::Returns<u64>;
    /// #     type Hook = dyn Fn() -> u64 + Send + Sync;
    /// # }
    /// static TICK: decoy::Binding<Tick> = decoy::Binding::new_static("u64 tick()");
    ///
    /// TICK.set_result(3);
    /// assert_eq!(std::thread::spawn(|| TICK.result()).join().unwrap(), 3);
    /// ```
    pub const fn new_static(prototype: &'static str) -> Self {
        Binding::with_prototype(Cow::Borrowed(prototype))
    }

    const fn with_prototype(prototype: Cow<'static, str>) -> Self {
        Binding {
            prototype,
            count: AtomicUsize::new(0),
            hook: const_mutex(None),
            params: const_mutex(Params::new()),
            slot: const_mutex(<S::Output as Output>::EMPTY),
            exclusive: const_mutex(()),
        }
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Whether the function was called at least once.
    pub fn called(&self) -> bool {
        self.count() > 0
    }

    /// Human readable description of the mocked signature.
    pub fn prototype(&self) -> &str {
        &self.prototype
    }

    /// Returns the binding to its just-constructed state. The prototype
    /// is kept.
    pub fn reset(&self) {
        log::debug!("resetting `{}`", self.prototype);
        self.count.store(0, Ordering::SeqCst);
        *self.hook.lock() = None;
        self.params.lock().clear();
        *self.slot.lock() = Default::default();
    }

    /// Resets the binding and keeps other callers of `isolate` waiting
    /// until the returned guard is dropped.
    ///
    /// Tests sharing a process-wide binding hold the guard for their
    /// whole body. Calls through the binding are not blocked by it.
    /// Isolating a binding twice on the same thread deadlocks.
    pub fn isolate(&self) -> Isolated<'_> {
        let exclusive = self.exclusive.lock();
        self.reset();
        Isolated {
            _exclusive: exclusive,
        }
    }

    /// Replaces the mocked behavior with `hook` for every following
    /// call. A hook takes precedence over a result.
    pub fn set_hook<F>(&self, hook: F)
    where
        S: IntoHook<F>,
    {
        *self.hook.lock() = Some(<S as IntoHook<F>>::into_hook(hook));
    }

    pub fn clear_hook(&self) {
        *self.hook.lock() = None;
    }

    pub fn has_hook(&self) -> bool {
        self.hook.lock().is_some()
    }

    /// The argument at 1-based position `N` of the last call.
    ///
    /// Returns the default value if there was no call yet; check
    /// [`called`](Self::called) first when that matters.
    pub fn param<const N: usize>(&self) -> <Params<S::Params> as Param<N>>::Value
    where
        Params<S::Params>: Param<N>,
        <Params<S::Params> as Param<N>>::Value: Clone + Default,
    {
        let params = self.params.lock();
        Param::<N>::get(&*params).cloned().unwrap_or_default()
    }

    /// All arguments of the last call, if there was one.
    pub fn params(&self) -> Option<S::Params>
    where
        S::Params: Clone,
    {
        self.params.lock().last().cloned()
    }

    pub(crate) fn capture(&self, params: S::Params) {
        self.params.lock().set(params);
    }

    pub(crate) fn hook(&self) -> Option<Arc<S::Hook>> {
        self.hook.lock().clone()
    }

    #[track_caller]
    pub(crate) fn fallback(&self) -> ValueOf<S> {
        let slot = self.slot.lock().clone();
        <S::Output as Output>::fallback(&slot, &self.prototype)
    }

    pub(crate) fn finish_call(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

impl<S, T> Binding<S>
where
    S: Signature<Output = Returns<T>>,
    T: Clone,
{
    /// Sets the value returned by every following call that is not
    /// handled by a hook.
    pub fn set_result(&self, value: T) {
        self.slot.lock().set(value);
    }

    pub fn has_result(&self) -> bool {
        self.slot.lock().is_set()
    }

    /// The configured result.
    ///
    /// # Panics
    ///
    /// Fails through [`verify::fail`](crate::verify::fail) with
    /// [`Error::Unconfigured`] if no result was set.
    #[track_caller]
    pub fn result(&self) -> T {
        let slot = self.slot.lock().clone();
        verify::verify(slot.is_set(), || {
            Error::Unconfigured(self.prototype.to_string())
        });
        slot.get()
    }
}

/// The copy has the same prototype, hook and result. Its call history
/// starts empty.
impl<S: Signature> Clone for Binding<S> {
    fn clone(&self) -> Self {
        let copy = Binding::with_prototype(self.prototype.clone());
        *copy.hook.lock() = self.hook();
        *copy.slot.lock() = self.slot.lock().clone();
        copy
    }
}

impl<S: Signature> fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("prototype", &self.prototype)
            .field("count", &self.count())
            .field("hook", &self.has_hook())
            .field("result", &<S::Output as Output>::is_set(&self.slot.lock()))
            .finish()
    }
}

fn normalize(prototype: &str) -> String {
    prototype.split_whitespace().collect::<Vec<_>>().join(" ")
}
