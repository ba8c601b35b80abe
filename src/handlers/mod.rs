pub mod interactive;
pub mod script;

use colored::*;
use crate::exec::context::ShellContext;
use crate::exec::run_command_line;
use crate::exec::status::Status;

/// Status reported for a line that does not parse.
pub const PARSE_ERROR_STATUS: i32 = 2;

pub enum Flow {
    Continue,
    Exit,
}

/// One shell process: the context plus the last ordinary status.
pub struct Session {
    ctx: ShellContext,
}

impl Session {
    pub fn new(ctx: ShellContext) -> Self {
        Self { ctx }
    }

    pub fn last_status(&self) -> i32 {
        self.ctx.last_status
    }

    pub fn run_line(&mut self, line: &str) -> Flow {
        match run_command_line(line, &mut self.ctx) {
            Ok(Status::Code(_)) => Flow::Continue,
            Ok(Status::Terminate) => Flow::Exit,
            Err(e) => {
                eprintln!("{} {:#}", "minish:".red().bold(), e);
                self.ctx.last_status = PARSE_ERROR_STATUS;
                Flow::Continue
            }
        }
    }
}
