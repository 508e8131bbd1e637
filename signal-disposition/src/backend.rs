use std::io;
use std::mem;

use libc::c_int;

use super::{Handler, Previous};

pub trait SigBackend {
    /// Handlers stay installed after delivery and interrupted calls are restarted.
    const RELIABLE: bool;

    unsafe fn swap(signum: c_int, handler: Handler) -> io::Result<Previous>;
    fn detect(signum: c_int) -> io::Result<Previous>;
}

pub use handler_impl::{Callback, PlatformBackend, SUPPRESSES_CHILD_STOP};

#[cfg(any(windows, feature = "legacy"))]
mod handler_impl {
    use super::*;

    #[cfg(windows)]
    const SIG_DFL: libc::sighandler_t = 0;
    #[cfg(windows)]
    const SIG_IGN: libc::sighandler_t = 1;
    #[cfg(windows)]
    const SIG_GET: libc::sighandler_t = 2;
    #[cfg(windows)]
    const SIG_ERR: libc::sighandler_t = !0;

    #[cfg(not(windows))]
    use libc::{SIG_DFL, SIG_ERR, SIG_IGN};

    pub type Callback = extern "C" fn(c_int);

    pub const SUPPRESSES_CHILD_STOP: bool = false;

    fn raw(handler: Handler) -> libc::sighandler_t {
        match handler {
            Handler::Default => SIG_DFL,
            Handler::Ignore => SIG_IGN,
            Handler::Callback(cb) => cb as libc::sighandler_t,
        }
    }

    #[cfg(windows)]
    fn last_error() -> io::Error {
        // The CRT reports through errno, which `last_os_error` does not read.
        io::Error::from(io::ErrorKind::InvalidInput)
    }

    #[cfg(not(windows))]
    fn last_error() -> io::Error {
        io::Error::last_os_error()
    }

    pub(super) fn classify(prev: libc::sighandler_t) -> Previous {
        Previous::Handler(match prev {
            SIG_DFL => Handler::Default,
            SIG_IGN => Handler::Ignore,
            // Anything else signal(2) hands back is a function address.
            other => Handler::Callback(unsafe {
                mem::transmute::<libc::sighandler_t, Callback>(other)
            }),
        })
    }

    fn check(prev: libc::sighandler_t) -> io::Result<Previous> {
        if prev == SIG_ERR {
            Err(last_error())
        } else {
            Ok(classify(prev))
        }
    }

    pub struct PlatformBackend;

    impl SigBackend for PlatformBackend {
        // System V style signal(2) resets the handler on delivery, and nothing
        // here can request SA_RESTART.
        const RELIABLE: bool = false;

        unsafe fn swap(signum: c_int, handler: Handler) -> io::Result<Previous> {
            check(libc::signal(signum, raw(handler)))
        }

        #[cfg(windows)]
        fn detect(signum: c_int) -> io::Result<Previous> {
            check(unsafe { libc::signal(signum, SIG_GET) })
        }

        // signal(2) cannot read without writing, but sigaction(2) exists on
        // every unix target and can.
        #[cfg(not(windows))]
        fn detect(signum: c_int) -> io::Result<Previous> {
            unsafe {
                let mut old: libc::sigaction = mem::zeroed();
                if libc::sigaction(signum, std::ptr::null(), &mut old) < 0 {
                    return Err(last_error());
                }
                Ok(classify(old.sa_sigaction))
            }
        }
    }
}

#[cfg(not(any(windows, feature = "legacy")))]
mod handler_impl {
    use super::*;
    use libc::c_void;

    pub type Callback = extern "C" fn(c_int, *mut libc::siginfo_t, *mut c_void);

    pub const SUPPRESSES_CHILD_STOP: bool = true;

    pub(super) fn action(signum: c_int, handler: Handler) -> libc::sigaction {
        unsafe {
            let mut res: libc::sigaction = mem::zeroed();
            libc::sigemptyset(&mut res.sa_mask);
            res.sa_flags = libc::SA_RESTART;
            match handler {
                Handler::Default => res.sa_sigaction = libc::SIG_DFL,
                Handler::Ignore => res.sa_sigaction = libc::SIG_IGN,
                Handler::Callback(cb) => {
                    res.sa_flags |= libc::SA_SIGINFO;
                    res.sa_sigaction = cb as libc::sighandler_t;
                }
            }
            // Only report children that terminate, not ones that stop or continue.
            if signum == libc::SIGCHLD {
                res.sa_flags |= libc::SA_NOCLDSTOP;
            }
            res
        }
    }

    pub(super) fn classify(old: &libc::sigaction) -> Previous {
        match old.sa_sigaction {
            libc::SIG_DFL => Previous::Handler(Handler::Default),
            libc::SIG_IGN => Previous::Handler(Handler::Ignore),
            other if old.sa_flags & libc::SA_SIGINFO != 0 => {
                Previous::Handler(Handler::Callback(unsafe {
                    mem::transmute::<libc::sighandler_t, Callback>(other)
                }))
            }
            other => Previous::Unrecognized(other),
        }
    }

    pub struct PlatformBackend;

    impl SigBackend for PlatformBackend {
        const RELIABLE: bool = true;

        unsafe fn swap(signum: c_int, handler: Handler) -> io::Result<Previous> {
            let act = action(signum, handler);
            let mut old: libc::sigaction = mem::zeroed();
            if libc::sigaction(signum, &act, &mut old) < 0 {
                return Err(io::Error::last_os_error());
            }
            Ok(classify(&old))
        }

        fn detect(signum: c_int) -> io::Result<Previous> {
            unsafe {
                let mut old: libc::sigaction = mem::zeroed();
                if libc::sigaction(signum, std::ptr::null(), &mut old) < 0 {
                    return Err(io::Error::last_os_error());
                }
                Ok(classify(&old))
            }
        }
    }
}
