pub mod builtins;
pub mod system;

use crate::exec::ast::SimpleCommand;
use crate::exec::context::ShellContext;
use crate::exec::error::ExecError;
use crate::exec::expand::expand_verb;
use crate::exec::status::Status;
use builtins::assign::AssignCommand;
use log::trace;
use system::SystemCommand;

/// A command that runs inside the shell process itself.
pub trait Builtin: Send + Sync {
    fn execute(&self, cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<Status, ExecError>;
}

/// Run a leaf: a registered builtin, an assignment, or an external program.
pub fn run_simple(cmd: &SimpleCommand, ctx: &mut ShellContext) -> Result<Status, ExecError> {
    // No verb at all is handled like `exit`
    let Some(verb) = expand_verb(cmd) else {
        return Ok(Status::Terminate);
    };

    let registry = ctx.registry.clone();
    if let Some(builtin) = registry.get(&verb) {
        trace!("builtin: {}", verb);
        return builtin.execute(cmd, ctx);
    }
    if verb.contains('=') {
        trace!("assignment: {}", verb);
        return AssignCommand.execute(cmd, ctx);
    }
    SystemCommand.execute(cmd, ctx)
}
