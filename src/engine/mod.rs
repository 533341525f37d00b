// src/engine/mod.rs

//! Request admission and execution engine.
//!
//! - [`queue`] holds the bounded admission queue shared by all requests.
//! - [`pipeline`] walks one request through build, admission, execution and
//!   slot release. It knows nothing about HTTP; the server layer maps its
//!   results onto status codes.

/// Where a request is in its walk through the pipeline. Used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Received,
    Validated,
    Enqueued,
    Dequeued,
    Executed,
    Rejected,
    Failed,
}

pub mod pipeline;
pub mod queue;

pub use pipeline::{PipelineOptions, ScanPipeline};
pub use queue::AdmissionQueue;
