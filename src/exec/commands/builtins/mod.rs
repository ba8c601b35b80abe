pub mod assign;
pub mod cd;
pub mod exit;

use crate::exec::context::ShellContext;

/// Helper to register all built-in commands at once
pub fn register_all_builtins(ctx: &mut ShellContext) {
    // Navigation
    ctx.register_command("cd", Box::new(cd::CdCommand));

    // Shell lifetime
    ctx.register_command("exit", Box::new(exit::ExitCommand));
    ctx.register_command("quit", Box::new(exit::ExitCommand));
}
