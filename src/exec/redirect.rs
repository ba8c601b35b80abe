// Redirection resolver
//
// Targets are opened by the shell before forking so that a bad target is
// reported to the interpreter. The child only rebinds the opened
// descriptors onto 0/1/2.

use crate::exec::ast::{Redirect, SimpleCommand};
use crate::exec::error::ExecError;
use crate::exec::expand::expand_word;
use log::debug;
use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, FdFlag};
use nix::unistd::dup2;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::os::unix::fs::OpenOptionsExt;

pub const STDIN: RawFd = libc::STDIN_FILENO;
pub const STDOUT: RawFd = libc::STDOUT_FILENO;
pub const STDERR: RawFd = libc::STDERR_FILENO;

const CREATE_MODE: u32 = 0o666;
// Saved copies stay clear of the descriptors commands expect to use
const SAVED_FD_MIN: RawFd = 10;

/// Descriptors opened for one simple command, not yet bound.
#[derive(Debug, Default)]
pub struct Redirections {
    input: Option<File>,
    output: Option<File>,
    error: Option<File>,
    // stderr goes to the same open file as stdout
    shared: bool,
}

impl Redirections {
    /// Bind every opened descriptor onto its standard stream.
    pub fn apply(self) -> Result<(), ExecError> {
        if let Some(file) = self.input {
            bind(file.into(), STDIN)?;
        }
        if let Some(file) = self.output {
            if self.shared {
                dup_onto(file.as_raw_fd(), STDERR)?;
            }
            bind(file.into(), STDOUT)?;
        }
        if let Some(file) = self.error {
            bind(file.into(), STDERR)?;
        }
        Ok(())
    }
}

/// Open every redirection target of `cmd`.
pub fn resolve(cmd: &SimpleCommand) -> Result<Redirections, ExecError> {
    // Input first: a missing input must not leave truncated outputs behind
    let input = match &cmd.input {
        Some(redirect) => {
            let path = expand_word(&redirect.target);
            debug!("redirect < {}", path);
            Some(File::open(&path).map_err(|source| ExecError::Redirection { path, source })?)
        }
        None => None,
    };
    Ok(Redirections { input, ..resolve_outputs(cmd)? })
}

/// Create or open the stdout/stderr targets and close them again.
///
/// Used by builtins that produce no stream output but must still establish
/// the files they were redirected to.
pub fn touch_outputs(cmd: &SimpleCommand) -> Result<(), ExecError> {
    let _ = resolve_outputs(cmd)?;
    Ok(())
}

fn resolve_outputs(cmd: &SimpleCommand) -> Result<Redirections, ExecError> {
    let mut res = Redirections::default();
    let out = cmd.output.as_ref().map(|r| (expand_word(&r.target), r));
    let err = cmd.error.as_ref().map(|r| (expand_word(&r.target), r));

    match (out, err) {
        (Some((out_path, out)), Some((err_path, _))) if out_path == err_path => {
            // One descriptor for both streams, or they would clobber each other
            res.output = Some(open_output(&out_path, out)?);
            res.shared = true;
        }
        (out, err) => {
            if let Some((path, redirect)) = out {
                res.output = Some(open_output(&path, redirect)?);
            }
            if let Some((path, redirect)) = err {
                res.error = Some(open_output(&path, redirect)?);
            }
        }
    }
    Ok(res)
}

/// Whether writes to `path` append rather than truncate.
///
/// A target that still carries a literal `>>` leaked from the parser is
/// treated as an append request.
pub fn is_append(redirect: &Redirect, path: &str) -> bool {
    redirect.append || path.contains(">>")
}

fn open_output(path: &str, redirect: &Redirect) -> Result<File, ExecError> {
    let append = is_append(redirect, path);
    debug!("redirect {} {}", if append { ">>" } else { ">" }, path);
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).mode(CREATE_MODE);
    if append {
        opts.append(true);
    } else {
        opts.truncate(true);
    }
    opts.open(path).map_err(|source| ExecError::Redirection { path: path.to_string(), source })
}

/// Duplicate `fd` onto `target` and close the original.
pub fn bind(fd: OwnedFd, target: RawFd) -> Result<(), ExecError> {
    if fd.as_raw_fd() == target {
        // Already in place; keep it open across exec
        let raw = fd.into_raw_fd();
        fcntl(raw, FcntlArg::F_SETFD(FdFlag::empty())).map_err(|e| rebind_error(target, e))?;
        return Ok(());
    }
    dup_onto(fd.as_raw_fd(), target)
}

fn dup_onto(fd: RawFd, target: RawFd) -> Result<(), ExecError> {
    loop {
        match dup2(fd, target) {
            Ok(_) => return Ok(()),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(rebind_error(target, e)),
        }
    }
}

/// Take ownership of any raw descriptor holder, such as a pipe end.
pub fn owned<F: IntoRawFd>(f: F) -> OwnedFd {
    unsafe { OwnedFd::from_raw_fd(f.into_raw_fd()) }
}

/// Keep a close-on-exec copy of `target` so it can be restored later.
pub fn save(target: RawFd) -> Result<OwnedFd, ExecError> {
    let raw = fcntl(target, FcntlArg::F_DUPFD_CLOEXEC(SAVED_FD_MIN))
        .map_err(|e| rebind_error(target, e))?;
    Ok(unsafe { OwnedFd::from_raw_fd(raw) })
}

fn rebind_error(fd: RawFd, errno: Errno) -> ExecError {
    ExecError::Rebind { fd, source: errno.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ast::Word;
    use std::fs;

    fn out_cmd(path: &str, append: bool) -> SimpleCommand {
        let target = Word::literal(path);
        let redirect = if append { Redirect::append(target) } else { Redirect::truncate(target) };
        SimpleCommand::new("true", &[]).with_output(redirect)
    }

    #[test]
    fn test_append_marker_in_path() {
        let redirect = Redirect::truncate(Word::literal("log>>"));
        assert!(is_append(&redirect, "log>>"));
        assert!(!is_append(&redirect, "log"));
        assert!(is_append(&Redirect::append(Word::literal("log")), "log"));
    }

    #[test]
    fn test_missing_input_is_redirection_error() {
        let cmd = SimpleCommand::new("cat", &[])
            .with_input(Redirect::truncate(Word::literal("/definitely/not/here.txt")));
        match resolve(&cmd) {
            Err(ExecError::Redirection { path, .. }) => {
                assert_eq!(path, "/definitely/not/here.txt")
            }
            other => panic!("Expected redirection error, got {:?}", other),
        }
    }

    #[test]
    fn test_touch_creates_and_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touched.txt");
        let path_str = path.to_string_lossy().into_owned();

        fs::write(&path, "old content").unwrap();
        touch_outputs(&out_cmd(&path_str, true)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "old content");

        touch_outputs(&out_cmd(&path_str, false)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_same_path_opens_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("both.txt").to_string_lossy().into_owned();
        let cmd = out_cmd(&path, false).with_error(Redirect::truncate(Word::literal(&path)));

        let res = resolve(&cmd).unwrap();
        assert!(res.shared);
        assert!(res.output.is_some());
        assert!(res.error.is_none());
    }

    #[test]
    fn test_distinct_paths_open_separately() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt").to_string_lossy().into_owned();
        let err = dir.path().join("err.txt").to_string_lossy().into_owned();
        let cmd = out_cmd(&out, false).with_error(Redirect::append(Word::literal(&err)));

        let res = resolve(&cmd).unwrap();
        assert!(!res.shared);
        assert!(res.output.is_some() && res.error.is_some());
        assert!(dir.path().join("err.txt").exists());
    }
}
