//! Install signal handlers that stay installed and restart interrupted system
//! calls, on any platform.
//!
//! Where `sigaction(2)` is available every handler is installed with
//! `SA_RESTART`, callbacks receive a `siginfo_t`, and `SIGCHLD` only reports
//! child termination. Elsewhere (or with the `legacy-signal` feature) this
//! falls back to plain `signal(2)`.
//!
//! ```no_run
//! use reliable_signal::{DiagnosticReporter, Handler, SignalInstaller};
//!
//! let installer = SignalInstaller::new(DiagnosticReporter);
//! let prev = unsafe { installer.install(libc::SIGINT, Handler::Ignore) }?;
//! assert_eq!(prev, Handler::Default);
//! # Ok::<(), reliable_signal::InstallError>(())
//! ```
use std::io;

use libc::c_int;
use signal_disposition::Previous;

mod report;

pub use report::{DiagnosticReporter, FatalReporter, Reporter};
pub use signal_disposition::{Callback, Handler, SUPPRESSES_CHILD_STOP};

#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// The OS rejected the request, eg. because the signal number is invalid
    /// or its disposition cannot be changed. Nothing was modified.
    #[error("failed to set handler for signal {signum}: {source}")]
    Os {
        signum: c_int,
        #[source]
        source: io::Error,
    },
    /// The previous disposition was installed by something that does not
    /// follow our conventions, so it cannot be returned.
    #[error("unexpected signal handler {raw:#x} for signal {signum}")]
    UnexpectedHandler {
        signum: c_int,
        raw: libc::sighandler_t,
    },
}

pub type InstallResult = Result<Handler, InstallError>;

/// Whether handlers stay installed after delivery and interrupted system
/// calls are restarted. False on the `signal(2)` fallback.
pub const fn is_reliable() -> bool {
    signal_disposition::is_reliable()
}

/// Installs signal handlers, reporting foreign dispositions through `R`.
#[derive(Copy, Clone, Debug, Default)]
pub struct SignalInstaller<R> {
    reporter: R,
}

impl<R> SignalInstaller<R> {
    pub const fn new(reporter: R) -> Self {
        Self { reporter }
    }
    pub fn reporter(&self) -> &R {
        &self.reporter
    }
}

impl<R: Reporter> SignalInstaller<R> {
    /// Set the handler for `signum`, returning the one it replaces.
    ///
    /// # Safety
    ///
    /// A `Handler::Callback` runs asynchronously, interrupting whatever thread
    /// the signal is delivered to, and must only perform async-signal-safe
    /// operations.
    pub unsafe fn install(&self, signum: c_int, handler: Handler) -> InstallResult {
        let prev = signal_disposition::swap(signum, handler)
            .map_err(|source| InstallError::Os { signum, source })?;
        log::debug!("set handler for signal {} to {:?}", signum, handler);
        self.resolve(signum, prev)
    }

    /// The handler currently in effect for `signum`.
    pub fn current(&self, signum: c_int) -> InstallResult {
        let prev = signal_disposition::current(signum)
            .map_err(|source| InstallError::Os { signum, source })?;
        self.resolve(signum, prev)
    }

    /// Like [`install`](Self::install), but the previous handler is put back
    /// when the returned guard is dropped.
    ///
    /// # Safety
    ///
    /// See [`install`](Self::install).
    pub unsafe fn scoped(
        &self,
        signum: c_int,
        handler: Handler,
    ) -> Result<HandlerGuard, InstallError> {
        let prev = self.install(signum, handler)?;
        Ok(HandlerGuard {
            signum,
            prev: Some(prev),
        })
    }

    fn resolve(&self, signum: c_int, prev: Previous) -> InstallResult {
        match prev {
            Previous::Handler(handler) => Ok(handler),
            Previous::Unrecognized(raw) => {
                self.reporter.unexpected_handler(signum, raw);
                Err(InstallError::UnexpectedHandler { signum, raw })
            }
        }
    }
}

/// Puts a signal's previous handler back when dropped.
///
/// Restoring never consults the installer's [`Reporter`], so dropping a guard
/// cannot panic, even during unwinding. A foreign disposition found at that
/// point is overwritten and logged.
#[derive(Debug)]
pub struct HandlerGuard {
    signum: c_int,
    prev: Option<Handler>,
}

impl HandlerGuard {
    pub fn signum(&self) -> c_int {
        self.signum
    }
    /// The handler that will be restored.
    pub fn previous(&self) -> Option<Handler> {
        self.prev
    }
    /// Leave the new handler installed.
    pub fn forget(mut self) {
        self.prev = None;
    }
}

impl Drop for HandlerGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            // Safety: `prev` was installed for this signal before we replaced it.
            match unsafe { signal_disposition::swap(self.signum, prev) } {
                Ok(Previous::Handler(_)) => {
                    log::debug!("restored handler for signal {}", self.signum)
                }
                Ok(Previous::Unrecognized(raw)) => log::warn!(
                    "replaced unexpected signal handler {:#x} for signal {} while restoring",
                    raw,
                    self.signum
                ),
                Err(e) => log::warn!("failed to restore handler for signal {}: {}", self.signum, e),
            }
        }
    }
}
