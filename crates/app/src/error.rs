//! CLI-facing error type, distinguishing the exit-code classes of §7:
//! malformed flags or invocation state exit non-zero before any kernel
//! runs; verification failure is reported but is not fatal.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("bad invocation state: {0}")]
    InvalidInvocation(String),
    #[error(transparent)]
    Mining(#[from] graph_mining::Error),
    #[error(transparent)]
    Builder(#[from] graph_builder::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// §6's exit code for anything that got past argument parsing but
    /// failed before reaching a kernel.
    pub const EXIT_BAD_INVOCATION: i32 = 101;
}
