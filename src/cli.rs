use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minish", version, about = "Minish: a minimal fork/exec shell")]
pub struct Cli {
    /// Run a single command line and exit with its status
    #[arg(short = 'c', long = "command", conflicts_with = "script")]
    pub command: Option<String>,

    /// Script to run line by line (reads stdin when omitted)
    pub script: Option<PathBuf>,

    /// Configuration file (defaults to ./minish.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
