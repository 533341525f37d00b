// src/config/model.rs

use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;

use crate::exec::CommandTemplate;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [server]
/// bind = "0.0.0.0:5000"
///
/// [queue]
/// capacity = 10
///
/// [runner]
/// program = "/app/src/OpenDirectoryDownloader/OpenDirectoryDownloader-linux"
/// args = ["--postgres", "--postgres-connection", "Host=postgres_db;..."]
/// url_flag = "--url"
/// trailing_args = ["-q"]
/// timeout = "300s"
/// ```
///
/// Every section is optional and falls back to the values above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub queue: QueueSection,

    #[serde(default)]
    pub runner: RunnerSection,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// `[queue]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueueSection {
    /// Maximum number of requests admitted at once (waiting or running).
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    10
}

impl Default for QueueSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// `[runner]` section: the command template and execution limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerSection {
    /// Path of the scanner executable.
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the URL flag.
    #[serde(default = "default_args")]
    pub args: Vec<String>,

    /// Flag preceding the caller-supplied URL. Empty means the URL is passed
    /// as a bare positional argument.
    #[serde(default = "default_url_flag")]
    pub url_flag: String,

    /// Arguments placed after the URL.
    #[serde(default = "default_trailing_args")]
    pub trailing_args: Vec<String>,

    /// Hard deadline for one scan, e.g. `"300s"`.
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Report a non-zero exit status as an error instead of a success.
    #[serde(default)]
    pub fail_on_nonzero_exit: bool,
}

fn default_program() -> String {
    "/app/src/OpenDirectoryDownloader/OpenDirectoryDownloader-linux".to_string()
}

fn default_args() -> Vec<String> {
    vec![
        "--postgres".to_string(),
        "--postgres-connection".to_string(),
        "Host=postgres_db;Username=postgres;Password=mysecretpassword;Database=postgres"
            .to_string(),
    ]
}

fn default_url_flag() -> String {
    "--url".to_string()
}

fn default_trailing_args() -> Vec<String> {
    vec!["-q".to_string()]
}

fn default_timeout() -> String {
    "300s".to_string()
}

impl Default for RunnerSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
            url_flag: default_url_flag(),
            trailing_args: default_trailing_args(),
            timeout: default_timeout(),
            fail_on_nonzero_exit: false,
        }
    }
}

/// Validated configuration. Built from a [`RawConfigFile`] via `TryFrom`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub bind: SocketAddr,
    pub capacity: usize,
    pub template: CommandTemplate,
    pub timeout: Duration,
    pub fail_on_nonzero_exit: bool,
}
