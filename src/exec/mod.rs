pub mod ast;
pub mod commands;
pub mod context;
pub mod env;
pub mod error;
pub mod executor;
pub mod expand;
pub mod parser;
pub mod process;
pub mod redirect;
pub mod status;

use anyhow::Result;
use context::ShellContext;
use executor::execute;
use status::Status;


/// Parse and evaluate one line. Blank lines succeed without doing anything.
pub fn run_command_line(line: &str, ctx: &mut ShellContext) -> Result<Status> {
    match parser::parse_command_line(line)? {
        Some(cmd) => Ok(execute(&cmd, ctx)),
        None => Ok(Status::SUCCESS),
    }
}
