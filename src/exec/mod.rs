// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] builds a [`ScanCommand`] from a [`CommandTemplate`] and a
//!   caller-supplied URL. The URL always travels as a single argv element.
//! - [`process_runner`] spawns the command, streams its merged output into a
//!   [`LogSink`] and enforces the deadline.
//! - [`backend`] provides the [`CommandRunner`] trait the pipeline talks to,
//!   so tests can swap in stub runners.
//! - [`sink`] defines where child output lines go.

pub mod backend;
pub mod command;
pub mod process_runner;
pub mod sink;

pub use backend::CommandRunner;
pub use command::{CommandTemplate, ScanCommand};
pub use process_runner::ProcessRunner;
pub use sink::{LogSink, TracingSink};
