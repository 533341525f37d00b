// src/config/validate.rs

use std::net::SocketAddr;

use crate::config::duration::parse_duration;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, ScanqueueError};
use crate::exec::CommandTemplate;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ScanqueueError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let bind = validate_bind(&raw)?;
        validate_queue(&raw)?;
        validate_program(&raw)?;
        let timeout = parse_duration(&raw.runner.timeout)
            .map_err(|e| ScanqueueError::ConfigError(format!("[runner].timeout: {e}")))?;
        if timeout.is_zero() {
            return Err(ScanqueueError::ConfigError(
                "[runner].timeout must be greater than zero".to_string(),
            ));
        }

        let url_flag = Some(raw.runner.url_flag.trim())
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        Ok(ConfigFile {
            bind,
            capacity: raw.queue.capacity,
            template: CommandTemplate::new(
                raw.runner.program,
                raw.runner.args,
                url_flag,
                raw.runner.trailing_args,
            ),
            timeout,
            fail_on_nonzero_exit: raw.runner.fail_on_nonzero_exit,
        })
    }
}

fn validate_bind(cfg: &RawConfigFile) -> Result<SocketAddr> {
    cfg.server.bind.parse().map_err(|e| {
        ScanqueueError::ConfigError(format!(
            "[server].bind '{}' is not a socket address: {e}",
            cfg.server.bind
        ))
    })
}

fn validate_queue(cfg: &RawConfigFile) -> Result<()> {
    if cfg.queue.capacity == 0 {
        return Err(ScanqueueError::ConfigError(
            "[queue].capacity must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_program(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.program.trim().is_empty() {
        return Err(ScanqueueError::ConfigError(
            "[runner].program must not be empty".to_string(),
        ));
    }
    Ok(())
}
