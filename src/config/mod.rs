// src/config/mod.rs

//! Configuration loading and validation for scanqueue.
//!
//! - `model.rs` holds the TOML-backed data model.
//! - `loader.rs` reads a config file from disk.
//! - `validate.rs` turns a `RawConfigFile` into a checked `ConfigFile`.
//! - `duration.rs` parses the `"300s"`-style strings used for timeouts.

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{ConfigFile, QueueSection, RawConfigFile, RunnerSection, ServerSection};
