/// Fixed failure code for builtin and internal errors.
pub const EXIT_FAILURE: i32 = 1;

/// Outcome of evaluating a command tree.
///
/// `Terminate` asks the driver to stop the shell. It is kept apart from the
/// integer channel so that no exit code can be mistaken for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Code(i32),
    Terminate,
}

impl Status {
    pub const SUCCESS: Status = Status::Code(0);
    pub const FAILURE: Status = Status::Code(EXIT_FAILURE);

    /// Exit code used when this status ends a forked subtree.
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Code(code) => *code,
            Status::Terminate => EXIT_FAILURE,
        }
    }
}
