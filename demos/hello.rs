use std::sync::atomic::{AtomicI32, Ordering};
use std::thread;
use std::time::Duration;

use libc::c_int;
use reliable_signal::{FatalReporter, Handler, SignalInstaller};

static RECEIVED: AtomicI32 = AtomicI32::new(0);

#[cfg(not(any(windows, feature = "legacy-signal")))]
extern "C" fn on_shutdown(signum: c_int, _info: *mut libc::siginfo_t, _ctx: *mut libc::c_void) {
    RECEIVED.store(signum, Ordering::SeqCst);
}

#[cfg(any(windows, feature = "legacy-signal"))]
extern "C" fn on_shutdown(signum: c_int) {
    RECEIVED.store(signum, Ordering::SeqCst);
}

fn main() -> Result<(), reliable_signal::InstallError> {
    let installer = SignalInstaller::new(FatalReporter);
    let _int = unsafe { installer.scoped(libc::SIGINT, Handler::Callback(on_shutdown))? };
    let _term = unsafe { installer.scoped(libc::SIGTERM, Handler::Callback(on_shutdown))? };

    println!("Hello, world! (reliable: {})", reliable_signal::is_reliable());
    while RECEIVED.load(Ordering::SeqCst) == 0 {
        thread::sleep(Duration::from_millis(100));
    }
    println!("{}", RECEIVED.load(Ordering::SeqCst));
    Ok(())
}
