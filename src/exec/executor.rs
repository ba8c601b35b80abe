use crate::exec::ast::{Command, Operator};
use crate::exec::commands::run_simple;
use crate::exec::context::{RedirectPolicy, ShellContext};
use crate::exec::error::ExecError;
use crate::exec::process::{self, Fork};
use crate::exec::redirect::{self, STDERR, STDIN, STDOUT};
use crate::exec::status::{Status, EXIT_FAILURE};
use log::{error, trace, warn};
use nix::unistd::Pid;
use std::io::{self, Write};

// Unwrap an ordinary exit code, handing `Terminate` straight to the caller.
macro_rules! code {
    ($status:expr) => {
        match $status {
            Status::Code(code) => code,
            Status::Terminate => return Status::Terminate,
        }
    };
}

/// Evaluate a command tree depth-first and return its status.
pub fn execute(cmd: &Command, ctx: &mut ShellContext) -> Status {
    let status = match cmd {
        Command::Simple(simple) => settle(run_simple(simple, ctx), ctx),
        Command::Binary { op, left, right } => {
            trace!("{:?}", op);
            match op {
                Operator::Sequential => {
                    code!(execute(left, ctx));
                    execute(right, ctx)
                }
                Operator::CondOnZero => {
                    if code!(execute(left, ctx)) == 0 {
                        execute(right, ctx)
                    } else {
                        Status::FAILURE
                    }
                }
                Operator::CondOnNonZero => {
                    // A successful left side still reports failure when right is skipped
                    if code!(execute(left, ctx)) != 0 {
                        execute(right, ctx)
                    } else {
                        Status::FAILURE
                    }
                }
                Operator::Parallel => settle(run_in_parallel(left, right, ctx), ctx),
                Operator::Pipe => settle(run_on_pipe(left, right, ctx), ctx),
                Operator::None => {
                    warn!("Internal node without an operator");
                    Status::Terminate
                }
            }
        }
    };

    if let Status::Code(code) = status {
        ctx.last_status = code;
    }
    status
}

/// Turn an engine error into the status the interpreter reacts to.
fn settle(res: Result<Status, ExecError>, ctx: &ShellContext) -> Status {
    let err = match res {
        Ok(status) => return status,
        Err(err) => err,
    };

    match &err {
        ExecError::Builtin(_) | ExecError::Exec { .. } => {
            // Command diagnostics go to stdout
            println!("{}", err);
            io::stdout().flush().ok();
            Status::FAILURE
        }
        ExecError::Redirection { .. } => {
            error!("{}", err);
            match ctx.redirect_policy {
                RedirectPolicy::Terminate => Status::Terminate,
                RedirectPolicy::Fail => Status::FAILURE,
            }
        }
        ExecError::Fork(_)
        | ExecError::Pipe(_)
        | ExecError::Rebind { .. }
        | ExecError::Wait { .. } => {
            error!("{}", err);
            Status::Terminate
        }
    }
}

/// Run both subtrees in their own child processes; succeed only if both do.
fn run_in_parallel(
    left: &Command,
    right: &Command,
    ctx: &mut ShellContext,
) -> Result<Status, ExecError> {
    let first = spawn_subtree(left, ctx)?;
    let second = match spawn_subtree(right, ctx) {
        Ok(pid) => pid,
        Err(e) => {
            // Reap what we already started before giving up
            process::wait_for(first).ok();
            return Err(e);
        }
    };

    // Creation order, not completion order
    let first_code = process::wait_for(first)?;
    let second_code = process::wait_for(second)?;
    trace!("parallel: {} & {}", first_code, second_code);

    if first_code == 0 && second_code == 0 {
        Ok(Status::SUCCESS)
    } else {
        Ok(Status::FAILURE)
    }
}

fn spawn_subtree(cmd: &Command, ctx: &mut ShellContext) -> Result<Pid, ExecError> {
    match process::fork()? {
        Fork::Child => {
            let status = execute(cmd, ctx);
            process::exit_child(status.exit_code())
        }
        Fork::Parent(pid) => Ok(pid),
    }
}

/// `left | right`: left runs in a child writing into the pipe, right runs
/// here with the read end as its stdin.
fn run_on_pipe(
    left: &Command,
    right: &Command,
    ctx: &mut ShellContext,
) -> Result<Status, ExecError> {
    let (reader, writer) = os_pipe::pipe().map_err(ExecError::Pipe)?;

    let writer_pid = match process::fork()? {
        Fork::Child => {
            drop(reader);
            if let Err(e) = redirect::bind(redirect::owned(writer), STDOUT) {
                process::write_fd(STDERR, format!("{}\n", e).as_bytes());
                process::exit_child(EXIT_FAILURE);
            }
            let status = execute(left, ctx);
            process::exit_child(status.exit_code())
        }
        Fork::Parent(pid) => pid,
    };

    // The reader only sees end-of-stream once every write end is closed
    drop(writer);
    let status = read_side(reader, right, ctx);

    let writer_code = process::wait_for(writer_pid)?;
    trace!("pipe: writer exited with {}", writer_code);
    status
}

// Run `right` with stdin swapped for the pipe, then put stdin back.
fn read_side(
    reader: os_pipe::PipeReader,
    right: &Command,
    ctx: &mut ShellContext,
) -> Result<Status, ExecError> {
    let saved_stdin = redirect::save(STDIN)?;
    redirect::bind(redirect::owned(reader), STDIN)?;
    let status = execute(right, ctx);
    redirect::bind(saved_stdin, STDIN)?;
    Ok(status)
}
