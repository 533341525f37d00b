// src/exec/backend.rs

//! Pluggable runner abstraction.
//!
//! The pipeline talks to a `CommandRunner` instead of spawning processes
//! itself. Production code uses [`ProcessRunner`]; tests provide runners
//! that record their input or return scripted results.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::exec::command::ScanCommand;
use crate::exec::process_runner::ProcessRunner;
use crate::types::ExecutionResult;

/// Trait abstracting how a scan command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion or until `timeout` elapses.
    fn run(
        &self,
        command: ScanCommand,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>>;
}

impl CommandRunner for ProcessRunner {
    fn run(
        &self,
        command: ScanCommand,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        Box::pin(async move { ProcessRunner::run(self, &command, timeout).await })
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    fn run(
        &self,
        command: ScanCommand,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        (**self).run(command, timeout)
    }
}
