//! ProcessControl port - command execution on deployed hosts
//!
//! Component behaviors query and control their processes through this trait.
//! Transport (SSH, agents, local shell) lives outside the core.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("host [{host_id}] unreachable: {message}")]
    Unreachable { host_id: String, message: String },

    #[error("command failed on host [{host_id}]: {message}")]
    CommandFailed { host_id: String, message: String },
}

pub trait ProcessControl: Send + Sync {
    /// Run a shell command on the host and return its stdout.
    fn exec(&self, host_id: &str, command: &str) -> Result<String, ProcessError>;

    /// Signal every process on the host whose command line contains `pattern`.
    fn kill_processes(&self, host_id: &str, signal: &str, pattern: &str)
        -> Result<(), ProcessError>;
}
