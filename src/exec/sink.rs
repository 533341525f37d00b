// src/exec/sink.rs

use tracing::info;

/// Destination for child-process output, one line at a time.
///
/// Drain workers of concurrent runs may write at the same time, so
/// implementations must be thread-safe.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Forwards every line to `tracing` at INFO under the `scanqueue::output`
/// target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        info!(target: "scanqueue::output", "{}", line);
    }
}
