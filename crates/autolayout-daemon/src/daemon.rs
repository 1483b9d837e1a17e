//! Detach the process from its controlling terminal
//!
//! Classic double fork: the first child becomes a session leader, the
//! second can never reacquire a terminal. Must run before the tokio runtime
//! is built and before any socket is opened.

use std::fs::OpenOptions;
use std::os::fd::AsRawFd;

use anyhow::{Context, Result};
use nix::libc;
use nix::sys::resource::{getrlimit, Resource};
use nix::sys::signal::{signal, sigprocmask, SigHandler, SigSet, SigmaskHow, Signal};
use nix::sys::stat::{umask, Mode};
use nix::unistd::{chdir, close, dup2, fork, setsid, ForkResult};

/// Upper bound on descriptors closed when the limit is huge or unlimited
const MAX_CLOSED_FD: libc::rlim_t = 1 << 20;

/// Daemonize the current process
///
/// Returns in the grandchild; the original process and the intermediate
/// child exit with status 0.
///
/// # Errors
///
/// Returns an error with the system error text if any step fails.
pub fn daemonize() -> Result<()> {
    close_inherited_descriptors();
    reset_signals().context("Failed to reset signal mask")?;

    fork_and_exit_parent().context("fork failed")?;
    setsid().context("setsid failed")?;
    fork_and_exit_parent().context("fork failed")?;

    umask(Mode::empty());
    chdir("/").context("chdir to / failed")?;
    redirect_standard_streams().context("Failed to redirect standard streams to /dev/null")?;

    Ok(())
}

/// Close every descriptor above stderr
fn close_inherited_descriptors() {
    let limit = getrlimit(Resource::RLIMIT_NOFILE)
        .map(|(soft, _hard)| soft)
        .unwrap_or(1024)
        .min(MAX_CLOSED_FD);

    for fd in (libc::STDERR_FILENO + 1)..(limit as libc::c_int) {
        // Most of these were never open
        let _ = close(fd);
    }
}

/// Restore default dispositions and unblock every signal
fn reset_signals() -> nix::Result<()> {
    for sig in Signal::iterator() {
        // SIGKILL and SIGSTOP cannot be changed
        if matches!(sig, Signal::SIGKILL | Signal::SIGSTOP) {
            continue;
        }
        // SAFETY: no handlers are installed at this point and SigDfl runs no code
        unsafe { signal(sig, SigHandler::SigDfl) }?;
    }

    sigprocmask(SigmaskHow::SIG_SETMASK, Some(&SigSet::empty()), None)
}

fn fork_and_exit_parent() -> nix::Result<()> {
    // SAFETY: called while the process is still single-threaded
    match unsafe { fork() }? {
        ForkResult::Parent { .. } => std::process::exit(0),
        ForkResult::Child => Ok(()),
    }
}

fn redirect_standard_streams() -> Result<()> {
    let dev_null = OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/null")
        .context("open /dev/null failed")?;
    let fd = dev_null.as_raw_fd();

    for target in [libc::STDIN_FILENO, libc::STDOUT_FILENO, libc::STDERR_FILENO] {
        dup2(fd, target).with_context(|| format!("dup2 onto fd {} failed", target))?;
    }

    Ok(())
}
