// System command

use crate::exec::ast::SimpleCommand;
use crate::exec::commands::Builtin;
use crate::exec::context::ShellContext;
use crate::exec::error::ExecError;
use crate::exec::expand::build_argv;
use crate::exec::process::{self, Fork};
use crate::exec::redirect::{self, STDERR, STDOUT};
use crate::exec::status::{Status, EXIT_FAILURE};
use log::debug;
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::execvp;
use std::ffi::CString;

/// Runs a program in a forked child and waits for it.
pub struct SystemCommand;

impl Builtin for SystemCommand {
    fn execute(&self, cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<Status, ExecError> {
        let argv = build_argv(cmd);
        let verb = argv.first().cloned().unwrap_or_default();

        // Everything the child needs is prepared up front
        let Some(c_argv) = to_c_argv(&argv) else {
            return Err(ExecError::Exec { verb });
        };
        let failure = format!("{}\n", ExecError::Exec { verb: verb.clone() });
        let redirections = redirect::resolve(cmd)?;

        debug!("exec: {}", shell_words::join(&argv));
        match process::fork()? {
            Fork::Child => {
                if let Err(e) = redirections.apply() {
                    process::write_fd(STDERR, format!("{}\n", e).as_bytes());
                    process::exit_child(EXIT_FAILURE);
                }
                // The runtime ignores SIGPIPE; programs expect the default
                let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
                // Only returns on failure
                let _ = execvp(&c_argv[0], &c_argv);
                process::write_fd(STDOUT, failure.as_bytes());
                process::exit_child(EXIT_FAILURE)
            }
            Fork::Parent(pid) => {
                // Our copies of the redirection targets are no longer needed
                drop(redirections);
                let code = process::wait_for(pid)?;
                debug!("{} (pid {}) exited with {}", verb, pid, code);
                Ok(Status::Code(code))
            }
        }
    }
}

/// Argument vector for execvp; `None` when it is empty or holds a NUL byte.
fn to_c_argv(argv: &[String]) -> Option<Vec<CString>> {
    if argv.is_empty() {
        return None;
    }
    argv.iter().map(|arg| CString::new(arg.as_str()).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_argv_rejects_interior_nul() {
        assert!(to_c_argv(&["echo".to_string(), "a\0b".to_string()]).is_none());
        assert!(to_c_argv(&[]).is_none());
        let c_argv = to_c_argv(&["ls".to_string(), "-l".to_string()]).unwrap();
        assert_eq!(c_argv.len(), 2);
        assert_eq!(c_argv[0].as_bytes(), b"ls");
    }
}
