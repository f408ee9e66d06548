use std::fmt::{self, Formatter};

use parking_lot::{const_mutex, Mutex, MutexGuard};

use crate::{verify, Error};

/// Process-wide forwarding target for a free function.
///
/// A function can only be defined once, so a free function that many
/// test modules want to stub is defined once with
/// [`proxy!`](crate::proxy), which forwards every call to whatever
/// *subject* is currently connected. Each test defines its own subject
/// (typically with [`function!`](crate::function)) and connects it
/// for the duration of a scope.
///
/// Connections are exclusive: a second `connect`, from any thread,
/// waits until the first [`Connection`] is dropped. Connecting twice
/// on the same thread without dropping the first connection
/// deadlocks.
///
/// # Examples
///
/// ```
/// mod clock {
///     decoy::proxy! {
///         pub fn now() -> u64;
///     }
/// }
///
/// mod tests {
///     decoy::function! {
///         pub fn now() -> u64;
///     }
/// }
///
/// let _connection = clock::NOW_PROXY.connect(tests::now);
/// tests::NOW.set_result(42);
///
/// assert_eq!(clock::now(), 42);
/// assert_eq!(tests::NOW.count(), 1);
/// ```
pub struct Proxy<F> {
    prototype: &'static str,
    subject: Mutex<Option<F>>,
    exclusive: Mutex<()>,
}

impl<F: Copy> Proxy<F> {
    pub const fn new(prototype: &'static str) -> Self {
        Proxy {
            prototype,
            subject: const_mutex(None),
            exclusive: const_mutex(()),
        }
    }

    pub fn prototype(&self) -> &'static str {
        self.prototype
    }

    /// Routes calls to `subject` until the returned [`Connection`] is
    /// dropped.
    pub fn connect(&self, subject: F) -> Connection<'_, F> {
        let exclusive = self.exclusive.lock();
        log::debug!("connecting `{}`", self.prototype);
        *self.subject.lock() = Some(subject);
        Connection {
            proxy: self,
            _exclusive: exclusive,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.subject.lock().is_some()
    }

    /// The connected subject.
    ///
    /// # Panics
    ///
    /// Fails through [`verify::fail`](crate::verify::fail) if nothing is
    /// connected.
    #[track_caller]
    pub fn subject(&self) -> F {
        let subject = *self.subject.lock();
        verify::verified(subject, || Error::Disconnected(self.prototype.to_string()))
    }
}

impl<F> fmt::Debug for Proxy<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("prototype", &self.prototype)
            .field("connected", &self.subject.lock().is_some())
            .finish()
    }
}

/// Keeps a subject connected to a [`Proxy`]. Disconnects on drop.
#[must_use = "the subject is disconnected as soon as the connection is dropped"]
pub struct Connection<'p, F> {
    proxy: &'p Proxy<F>,
    _exclusive: MutexGuard<'p, ()>,
}

impl<F> Drop for Connection<'_, F> {
    fn drop(&mut self) {
        log::debug!("disconnecting `{}`", self.proxy.prototype);
        *self.proxy.subject.lock() = None;
    }
}

impl<F> fmt::Debug for Connection<'_, F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("prototype", &self.proxy.prototype)
            .finish()
    }
}
