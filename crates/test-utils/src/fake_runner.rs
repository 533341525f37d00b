use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;

use scanqueue::exec::{CommandRunner, ScanCommand};
use scanqueue::types::ExecutionResult;

/// A fake runner that:
/// - records the argv of every command it was asked to run
/// - returns a fixed result without spawning anything.
#[derive(Debug, Clone)]
pub struct EchoRunner {
    received: Arc<Mutex<Vec<Vec<String>>>>,
    result: ExecutionResult,
}

impl EchoRunner {
    pub fn new() -> Self {
        Self::returning(ExecutionResult::Success { exit_code: Some(0) })
    }

    pub fn returning(result: ExecutionResult) -> Self {
        Self {
            received: Arc::new(Mutex::new(Vec::new())),
            result,
        }
    }

    /// Argument vectors received so far, program first.
    pub fn received(&self) -> Vec<Vec<String>> {
        self.received.lock().clone()
    }
}

impl Default for EchoRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for EchoRunner {
    fn run(
        &self,
        command: ScanCommand,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        let mut argv = vec![command.program().to_string()];
        argv.extend(command.args().iter().cloned());
        self.received.lock().push(argv);

        let result = self.result.clone();
        Box::pin(async move { result })
    }
}

/// A runner that blocks every run until the test opens the gate.
///
/// Tracks how many runs are executing at once so tests can check that the
/// pipeline never overlaps them.
#[derive(Debug, Clone)]
pub struct GatedRunner {
    gate: Arc<Notify>,
    started: Arc<Notify>,
    running: Arc<AtomicUsize>,
    max_running: Arc<AtomicUsize>,
    result: ExecutionResult,
}

impl GatedRunner {
    pub fn new() -> Self {
        Self {
            gate: Arc::new(Notify::new()),
            started: Arc::new(Notify::new()),
            running: Arc::new(AtomicUsize::new(0)),
            max_running: Arc::new(AtomicUsize::new(0)),
            result: ExecutionResult::Success { exit_code: Some(0) },
        }
    }

    /// Let one waiting (or the next) run complete.
    pub fn open_one(&self) {
        self.gate.notify_one();
    }

    /// Resolves once a run has started.
    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }
}

impl Default for GatedRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for GatedRunner {
    fn run(
        &self,
        _command: ScanCommand,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + '_>> {
        Box::pin(async move {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            self.started.notify_one();

            self.gate.notified().await;

            self.running.fetch_sub(1, Ordering::SeqCst);
            self.result.clone()
        })
    }
}
