use anyhow::{Context, Result};
use colored::*;
use std::io::{self, IsTerminal, Write};
use crate::handlers::{Flow, Session};

/// Read lines from stdin until end of input or a terminate request.
///
/// The prompt is only shown when stdin is a terminal.
pub fn handle_interactive(session: &mut Session, prompt: &str) -> Result<i32> {
    let show_prompt = io::stdin().is_terminal();
    let mut line = String::new();

    loop {
        if show_prompt {
            print!("{}", prompt.green().bold());
            io::stdout().flush().ok();
        }

        line.clear();
        let read = io::stdin().read_line(&mut line).context("Failed to read from stdin")?;
        if read == 0 {
            break;
        }
        if let Flow::Exit = session.run_line(&line) {
            break;
        }
    }
    Ok(session.last_status())
}
