// src/types.rs

use std::fmt;

/// Outcome of running one scan command.
///
/// Produced exactly once per command by a [`crate::exec::CommandRunner`] and
/// consumed once by the request pipeline to pick an HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// The process exited before the deadline. `exit_code` is `None` when the
    /// process was terminated by a signal.
    Success { exit_code: Option<i32> },
    /// The deadline elapsed first and the process was killed.
    Timeout,
    /// The process could not be started or waited on.
    Error(String),
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Success { .. })
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionResult::Success {
                exit_code: Some(code),
            } => write!(f, "process exited with status {code}"),
            ExecutionResult::Success { exit_code: None } => {
                write!(f, "process terminated by signal")
            }
            ExecutionResult::Timeout => write!(f, "process timed out"),
            ExecutionResult::Error(desc) => write!(f, "{desc}"),
        }
    }
}
