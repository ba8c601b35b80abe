use std::collections::HashMap;
use std::sync::Arc;
use log::warn;
use serde::Deserialize;
use crate::exec::commands::Builtin;

/// What a redirection target that cannot be opened does to the shell.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectPolicy {
    /// Stop the whole shell.
    #[default]
    Terminate,
    /// Fail only the command that carried the redirection.
    Fail,
}

#[derive(Clone)]
pub struct ShellContext {
    pub redirect_policy: RedirectPolicy,
    pub last_status: i32,
    pub registry: Arc<HashMap<String, Box<dyn Builtin>>>,
}

impl ShellContext {
    pub fn new() -> Self {
        let mut ctx = Self {
            redirect_policy: RedirectPolicy::default(),
            last_status: 0,
            registry: Arc::new(HashMap::new()),
        };
        crate::exec::commands::builtins::register_all_builtins(&mut ctx);
        ctx
    }

    pub fn with_redirect_policy(mut self, policy: RedirectPolicy) -> Self {
        self.redirect_policy = policy;
        self
    }

    pub fn register_command(&mut self, name: &str, command: Box<dyn Builtin>) {
        match Arc::get_mut(&mut self.registry) {
            Some(map) => {
                map.insert(name.to_string(), command);
            }
            None => warn!("Cannot register '{}': builtin registry is shared", name),
        }
    }
}

impl Default for ShellContext {
    fn default() -> Self {
        Self::new()
    }
}
