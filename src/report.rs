use libc::c_int;

/// Decides what happens when a signal's previous disposition is not one this
/// crate knows how to describe.
///
/// That can only occur when something else in the process installed a
/// handler without going through a compatible installer, so it indicates a
/// bug elsewhere. If `unexpected_handler` returns, the install call reports
/// [`InstallError::UnexpectedHandler`](crate::InstallError::UnexpectedHandler).
pub trait Reporter {
    fn unexpected_handler(&self, signum: c_int, raw: libc::sighandler_t);
}

/// For long-running processes with logging set up: logs the problem and
/// panics, unwinding the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct FatalReporter;

impl Reporter for FatalReporter {
    fn unexpected_handler(&self, signum: c_int, raw: libc::sighandler_t) {
        log::error!(
            "unexpected signal handler {:#x} installed for signal {}",
            raw,
            signum
        );
        panic!("unexpected signal handler");
    }
}

/// For small standalone tools: prints a line to stderr and carries on.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiagnosticReporter;

impl Reporter for DiagnosticReporter {
    fn unexpected_handler(&self, _signum: c_int, _raw: libc::sighandler_t) {
        eprintln!("unexpected signal handler");
    }
}

impl<'a, R: Reporter + ?Sized> Reporter for &'a R {
    fn unexpected_handler(&self, signum: c_int, raw: libc::sighandler_t) {
        (**self).unexpected_handler(signum, raw)
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn unexpected_handler(&self, signum: c_int, raw: libc::sighandler_t) {
        (**self).unexpected_handler(signum, raw)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::process::Command;

    use super::*;

    const CHILD_ENV: &str = "RELIABLE_SIGNAL_REPORT_CHILD";

    #[test]
    fn diagnostic_writes_to_stderr() {
        if env::var_os(CHILD_ENV).is_some() {
            DiagnosticReporter.unexpected_handler(libc::SIGINT, 0x1234);
            eprintln!("still running");
            return;
        }

        // Rerun just this test uncaptured so the line reaches the real stderr.
        let output = Command::new(env::current_exe().unwrap())
            .args(&[
                "--exact",
                "report::tests::diagnostic_writes_to_stderr",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(CHILD_ENV, "1")
            .output()
            .unwrap();
        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("unexpected signal handler\nstill running\n"),
            "stderr was {:?}",
            stderr
        );
    }

    #[test]
    #[should_panic(expected = "unexpected signal handler")]
    fn fatal_panics() {
        FatalReporter.unexpected_handler(libc::SIGINT, 0x1234);
    }

    #[test]
    #[should_panic(expected = "unexpected signal handler")]
    fn boxed_forwards() {
        let reporter: Box<dyn Reporter> = Box::new(FatalReporter);
        reporter.unexpected_handler(libc::SIGINT, 0x1234);
    }
}
