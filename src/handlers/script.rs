use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use crate::handlers::{Flow, Session};

/// `minish -c '<line>'`
pub fn handle_command(line: &str, session: &mut Session) -> i32 {
    session.run_line(line);
    session.last_status()
}

/// Run a script file line by line until it ends or asks to terminate.
pub fn handle_script(path: &Path, session: &mut Session) -> Result<i32> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open script: {}", path.display()))?;
    for (lineno, line) in BufReader::new(file).lines().enumerate() {
        let line =
            line.with_context(|| format!("Failed to read {}:{}", path.display(), lineno + 1))?;
        if let Flow::Exit = session.run_line(&line) {
            info!("Terminated at {}:{}", path.display(), lineno + 1);
            break;
        }
    }
    Ok(session.last_status())
}
