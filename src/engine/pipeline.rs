// src/engine/pipeline.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::ConfigFile;
use crate::errors::RequestError;
use crate::exec::{CommandRunner, CommandTemplate, ScanCommand};
use crate::types::ExecutionResult;

use super::RequestStage;
use super::queue::AdmissionQueue;

/// Execution limits applied to every admitted command.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Hard deadline for one process run.
    pub timeout: Duration,
    /// Turn a non-zero exit status into `ExecutionResult::Error`.
    pub fail_on_nonzero_exit: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            fail_on_nonzero_exit: false,
        }
    }
}

/// Shared, process-wide request pipeline.
///
/// One instance serves every request:
/// - admission is bounded by the [`AdmissionQueue`] capacity, counting both
///   requests waiting for the execution slot and the one running;
/// - at most one command runs at a time; waiters are served in arrival order.
pub struct ScanPipeline {
    template: CommandTemplate,
    queue: AdmissionQueue<ScanCommand>,
    /// Makes enqueue + dequeue one step per request, so every request takes
    /// back the command it put in.
    handoff: Mutex<()>,
    exec_slot: tokio::sync::Mutex<()>,
    runner: Arc<dyn CommandRunner>,
    options: PipelineOptions,
}

impl fmt::Debug for ScanPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScanPipeline")
            .field("template", &self.template)
            .field("queue", &self.queue)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl ScanPipeline {
    pub fn new(
        template: CommandTemplate,
        capacity: usize,
        runner: Arc<dyn CommandRunner>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            template,
            queue: AdmissionQueue::new(capacity),
            handoff: Mutex::new(()),
            exec_slot: tokio::sync::Mutex::new(()),
            runner,
            options,
        }
    }

    pub fn from_config(cfg: &ConfigFile, runner: Arc<dyn CommandRunner>) -> Self {
        Self::new(
            cfg.template.clone(),
            cfg.capacity,
            runner,
            PipelineOptions {
                timeout: cfg.timeout,
                fail_on_nonzero_exit: cfg.fail_on_nonzero_exit,
            },
        )
    }

    pub fn queue(&self) -> &AdmissionQueue<ScanCommand> {
        &self.queue
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Build, admit and run one scan for `locator`.
    ///
    /// Returns `Err` when the request never reached execution; every
    /// execution outcome, including timeouts and spawn failures, is `Ok`.
    pub async fn submit(&self, locator: Option<&str>) -> Result<ExecutionResult, RequestError> {
        debug!(stage = ?RequestStage::Received, url = ?locator, "scan request received");

        let command = locator
            .ok_or(RequestError::MissingLocator)
            .and_then(|url| self.template.build(url))
            .inspect_err(|e| {
                warn!(stage = ?RequestStage::Rejected, error = %e, "invalid scan request");
            })?;
        debug!(stage = ?RequestStage::Validated, command = %command, "command built");

        let (command, _slot) = self.admit(command)?;
        debug!(
            stage = ?RequestStage::Dequeued,
            in_flight = self.queue.in_flight(),
            "waiting for execution slot"
        );

        let result = {
            let _running = self.exec_slot.lock().await;
            info!(command = %command, "executing scan");
            self.runner.run(command, self.options.timeout).await
        };
        let result = self.apply_exit_policy(result);

        debug!(stage = ?RequestStage::Executed, result = %result, "scan finished");
        Ok(result)
    }

    /// Enqueue `command` and immediately take it back out, holding a slot.
    fn admit(&self, command: ScanCommand) -> Result<(ScanCommand, SlotGuard<'_>), RequestError> {
        let _handoff = self.handoff.lock();

        if !self.queue.try_enqueue(command) {
            warn!(
                stage = ?RequestStage::Rejected,
                capacity = self.queue.capacity(),
                "too many requests in the queue"
            );
            return Err(RequestError::QueueFull);
        }
        debug!(stage = ?RequestStage::Enqueued, "command enqueued");

        match self.queue.try_dequeue() {
            Some(command) => Ok((command, SlotGuard { queue: &self.queue })),
            None => {
                error!(
                    stage = ?RequestStage::Failed,
                    "admission queue empty right after enqueue"
                );
                Err(RequestError::QueueEmpty)
            }
        }
    }

    fn apply_exit_policy(&self, result: ExecutionResult) -> ExecutionResult {
        match result {
            ExecutionResult::Success { exit_code }
                if self.options.fail_on_nonzero_exit && exit_code != Some(0) =>
            {
                let desc = match exit_code {
                    Some(code) => format!("process exited with status {code}"),
                    None => "process terminated by signal".to_string(),
                };
                ExecutionResult::Error(desc)
            }
            other => other,
        }
    }
}

/// Releases one admission slot when dropped, whatever happened to the run.
struct SlotGuard<'a> {
    queue: &'a AdmissionQueue<ScanCommand>,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.queue.release();
    }
}
