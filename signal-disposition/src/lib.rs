use std::fmt::{self, Debug};
use std::io;

use libc::c_int;

mod backend;

pub use backend::{Callback, PlatformBackend, SigBackend, SUPPRESSES_CHILD_STOP};

/// What should happen when a signal is delivered.
#[derive(Copy, Clone)]
pub enum Handler {
    /// The default action for the signal.
    Default,
    /// Discard the signal.
    Ignore,
    /// Call this function on delivery.
    Callback(Callback),
}

impl Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Default => f.write_str("Default"),
            Handler::Ignore => f.write_str("Ignore"),
            Handler::Callback(cb) => f
                .debug_tuple("Callback")
                .field(&(*cb as *const ()))
                .finish(),
        }
    }
}

impl Eq for Handler {}
impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Handler::Default, Handler::Default) | (Handler::Ignore, Handler::Ignore) => true,
            // Compare addresses: the installed handler is only ever known by address.
            (Handler::Callback(a), Handler::Callback(b)) => *a as usize == *b as usize,
            _ => false,
        }
    }
}

/// The disposition that was in effect before a swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Previous {
    Handler(Handler),
    /// A disposition which was not installed by a compatible installer, for
    /// example a plain `sa_handler` without `SA_SIGINFO`. Holds the raw value.
    Unrecognized(libc::sighandler_t),
}

/// Install `handler` for `signum`, returning whatever was installed before.
///
/// # Safety
///
/// A `Handler::Callback` runs asynchronously on whatever thread the signal is
/// delivered to, and must only perform async-signal-safe operations.
pub unsafe fn swap(signum: c_int, handler: Handler) -> io::Result<Previous> {
    PlatformBackend::swap(signum, handler)
}

/// Read the disposition currently installed for `signum`.
pub fn current(signum: c_int) -> io::Result<Previous> {
    PlatformBackend::detect(signum)
}

/// Whether the active backend keeps handlers installed across deliveries and
/// restarts interrupted system calls.
pub const fn is_reliable() -> bool {
    <PlatformBackend as SigBackend>::RELIABLE
}
