//! Loud failure for misused doubles.
//!
//! A double that is read before it was configured must never hand back
//! a made-up value: that would turn missing test setup into a passing
//! test. Every such violation funnels through [`fail`], which logs the
//! violation with a backtrace and then either panics (the default) or
//! aborts the process.
//!
//! The policy is read once from the `DECOY_ON_VIOLATION` environment
//! variable (`panic` or `abort`) and can be overridden with
//! [`set_policy`].

use std::{
    backtrace::Backtrace,
    fmt,
    panic::Location,
    str::FromStr,
    sync::{
        atomic::{AtomicU8, Ordering},
        OnceLock,
    },
};

use crate::Error;

/// Environment variable holding the default [`Policy`].
pub const POLICY_ENV: &str = "DECOY_ON_VIOLATION";

/// What [`fail`] does after logging a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Unwind with a panic. Observable through `#[should_panic]`.
    #[default]
    Panic,
    /// Abort the process immediately.
    Abort,
}

impl FromStr for Policy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" | "unwind" => Ok(Policy::Panic),
            "abort" => Ok(Policy::Abort),
            _ => Err(Error::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (match self {
            Policy::Panic => "panic",
            Policy::Abort => "abort",
        })
        .fmt(f)
    }
}

const UNSET: u8 = 0;
const PANIC: u8 = 1;
const ABORT: u8 = 2;

static OVERRIDE: AtomicU8 = AtomicU8::new(UNSET);
static FROM_ENV: OnceLock<Policy> = OnceLock::new();

/// The policy currently in effect.
pub fn policy() -> Policy {
    match OVERRIDE.load(Ordering::Relaxed) {
        PANIC => Policy::Panic,
        ABORT => Policy::Abort,
        _ => *FROM_ENV.get_or_init(policy_from_env),
    }
}

/// Overrides the policy for the rest of the process, regardless of
/// the environment.
pub fn set_policy(policy: Policy) {
    let raw = match policy {
        Policy::Panic => PANIC,
        Policy::Abort => ABORT,
    };
    OVERRIDE.store(raw, Ordering::Relaxed);
}

fn policy_from_env() -> Policy {
    match std::env::var(POLICY_ENV) {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            log::warn!("{POLICY_ENV}: {e}; falling back to `{}`", Policy::Panic);
            Policy::Panic
        }),
        Err(_) => Policy::default(),
    }
}

/// Fails with the given error unless `condition` holds.
///
/// The error is only built when the check fails.
#[track_caller]
pub fn verify(condition: bool, error: impl FnOnce() -> Error) {
    if !condition {
        fail(error())
    }
}

/// Unwraps `value`, failing with the given error if it is `None`.
#[track_caller]
pub fn verified<T>(value: Option<T>, error: impl FnOnce() -> Error) -> T {
    match value {
        Some(value) => value,
        None => fail(error()),
    }
}

/// Reports a violation and never returns.
///
/// The violation is logged together with the caller's location and a
/// backtrace (captured according to `RUST_BACKTRACE`), then handled
/// according to [`policy`].
#[cold]
#[track_caller]
pub fn fail(error: Error) -> ! {
    let location = Location::caller();
    log::error!(
        "decoy violation at {location}: {error}\n{}",
        Backtrace::capture()
    );

    match policy() {
        Policy::Panic => panic!("decoy: {error}"),
        Policy::Abort => {
            eprintln!("decoy: {error} (at {location}); aborting");
            std::process::abort()
        }
    }
}
