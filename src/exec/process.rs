// Process primitives shared by the simple, parallel and pipe executors.
//
// A forked child reports through raw writes and leaves through `_exit`, so
// the parent's buffered handles and destructors never run twice.

use crate::exec::error::ExecError;
use crate::exec::status::EXIT_FAILURE;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{self, ForkResult, Pid};
use std::io::{self, Write};
use std::os::fd::{BorrowedFd, RawFd};

pub enum Fork {
    Child,
    Parent(Pid),
}

pub fn fork() -> Result<Fork, ExecError> {
    // Buffered output would otherwise be written twice
    io::stdout().flush().ok();
    match unsafe { unistd::fork() } {
        Ok(ForkResult::Child) => Ok(Fork::Child),
        Ok(ForkResult::Parent { child }) => Ok(Fork::Parent(child)),
        Err(errno) => Err(ExecError::Fork(errno.into())),
    }
}

/// Block until `pid` terminates and return its decoded exit status.
pub fn wait_for(pid: Pid) -> Result<i32, ExecError> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => return Ok(exit_status(status)),
            Err(Errno::EINTR) => continue,
            Err(errno) => {
                return Err(ExecError::Wait { pid: pid.as_raw(), source: errno.into() });
            }
        }
    }
}

/// Normal exit yields the exit code, death by signal `s` yields `128 + s`.
pub fn exit_status(status: WaitStatus) -> i32 {
    match status {
        WaitStatus::Exited(_, code) => code,
        WaitStatus::Signaled(_, signal, _) => 128 + signal as i32,
        _ => EXIT_FAILURE,
    }
}

/// Terminate a forked child without running the parent's destructors.
pub fn exit_child(code: i32) -> ! {
    io::stdout().flush().ok();
    unsafe { libc::_exit(code) }
}

/// Write straight to a descriptor, bypassing std's locked handles.
pub fn write_fd(fd: RawFd, msg: &[u8]) {
    // The standard streams stay open for the life of the process
    let fd = unsafe { BorrowedFd::borrow_raw(fd) };
    let mut off = 0;
    while off < msg.len() {
        match unistd::write(fd, &msg[off..]) {
            Ok(0) => return,
            Ok(n) => off += n,
            Err(Errno::EINTR) => continue,
            Err(_) => return,
        }
    }
}
