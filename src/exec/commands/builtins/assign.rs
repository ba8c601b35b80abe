// NAME=value

use crate::exec::ast::SimpleCommand;
use crate::exec::commands::Builtin;
use crate::exec::context::ShellContext;
use crate::exec::env::{set_var, split_assignment};
use crate::exec::error::{BuiltinError, ExecError};
use crate::exec::expand::expand_verb;
use crate::exec::status::Status;
use log::debug;

pub struct AssignCommand;

impl Builtin for AssignCommand {
    fn execute(&self, cmd: &SimpleCommand, _ctx: &mut ShellContext) -> Result<Status, ExecError> {
        let verb = expand_verb(cmd).unwrap_or_default();
        let (name, value) = split_assignment(&verb).unwrap_or((verb.as_str(), ""));

        set_var(name, value).map_err(|source| BuiltinError::Assignment {
            name: name.to_string(),
            source,
        })?;
        debug!("set {}={}", name, value);
        Ok(Status::SUCCESS)
    }
}
