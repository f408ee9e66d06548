use thiserror::Error;

/// Everything that can go wrong while a double is being used.
///
/// Most of these never reach the caller as a value: they are handed to
/// [`verify::fail`](crate::verify::fail), which panics or aborts
/// depending on the configured [`Policy`](crate::verify::Policy). The
/// `try_*` accessors return them directly instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Holds the name of the value, `value` unless it was created with
    /// [`Verified::named`](crate::Verified::named).
    #[error("{0} was read before it was assigned")]
    Unassigned(&'static str),
    #[error("`{0}` was called without a hook or a result")]
    Unconfigured(String),
    #[error("`{0}` was called through a proxy with no subject connected")]
    Disconnected(String),
    #[error("unknown violation policy `{0}`; expected `panic` or `abort`")]
    UnknownPolicy(String),
}
