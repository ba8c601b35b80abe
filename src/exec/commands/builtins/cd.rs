// Cd command

use crate::exec::ast::SimpleCommand;
use crate::exec::commands::Builtin;
use crate::exec::context::ShellContext;
use crate::exec::error::{BuiltinError, ExecError};
use crate::exec::expand::expand_word;
use crate::exec::redirect::touch_outputs;
use crate::exec::status::Status;
use log::debug;

pub struct CdCommand;

impl Builtin for CdCommand {
    fn execute(&self, cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<Status, ExecError> {
        // cd writes nothing, but its output targets must still exist afterwards
        touch_outputs(cmd)?;

        let dir = cmd.params.first().map(expand_word).ok_or(BuiltinError::NoSuchDirectory)?;
        std::env::set_current_dir(&dir).map_err(|e| {
            debug!("cd {}: {}", dir, e);
            BuiltinError::NoSuchDirectory
        })?;
        Ok(Status::SUCCESS)
    }
}
