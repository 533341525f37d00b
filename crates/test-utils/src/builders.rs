#![allow(dead_code)]

use scanqueue::config::{ConfigFile, RawConfigFile};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from built-in defaults but binds to an ephemeral localhost port.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.server.bind = "127.0.0.1:0".to_string();
        Self { config }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.queue.capacity = capacity;
        self
    }

    pub fn program(mut self, program: &str) -> Self {
        self.config.runner.program = program.to_string();
        self
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.config.runner.args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn url_flag(mut self, flag: &str) -> Self {
        self.config.runner.url_flag = flag.to_string();
        self
    }

    pub fn trailing_args(mut self, args: &[&str]) -> Self {
        self.config.runner.trailing_args = args.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.config.runner.timeout = timeout.to_string();
        self
    }

    pub fn fail_on_nonzero_exit(mut self, val: bool) -> Self {
        self.config.runner.fail_on_nonzero_exit = val;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
