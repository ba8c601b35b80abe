// Exit command

use crate::exec::ast::SimpleCommand;
use crate::exec::commands::Builtin;
use crate::exec::context::ShellContext;
use crate::exec::error::ExecError;
use crate::exec::status::Status;

pub struct ExitCommand;

impl Builtin for ExitCommand {
    fn execute(&self, _cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<Status, ExecError> {
        Ok(Status::Terminate)
    }
}
