use std::io;

/// Errors raised while evaluating a command tree.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to create child process: {0}")]
    Fork(#[source] io::Error),

    #[error("failed to create pipe: {0}")]
    Pipe(#[source] io::Error),

    #[error("cannot redirect to '{path}': {source}")]
    Redirection {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to rebind descriptor {fd}: {source}")]
    Rebind {
        fd: i32,
        #[source]
        source: io::Error,
    },

    #[error("Execution failed for '{verb}'")]
    Exec { verb: String },

    #[error("failed to wait for child {pid}: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Builtin(#[from] BuiltinError),
}

#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("No such file or directory")]
    NoSuchDirectory,

    #[error("cannot assign variable '{name}': {source}")]
    Assignment {
        name: String,
        #[source]
        source: io::Error,
    },
}
