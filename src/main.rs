use anyhow::Result;
use clap::Parser;
use minish::cli::Cli;
use minish::config::{apply_env, load_config};
use minish::exec::context::ShellContext;
use minish::handlers::{interactive, script, Session};
use minish::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    apply_env(&config)?;

    let ctx = ShellContext::new().with_redirect_policy(config.on_redirect_error);
    let mut session = Session::new(ctx);

    let code = if let Some(line) = cli.command {
        script::handle_command(&line, &mut session)
    } else if let Some(path) = cli.script {
        script::handle_script(&path, &mut session)?
    } else {
        interactive::handle_interactive(&mut session, config.prompt())?
    };

    std::process::exit(code);
}
