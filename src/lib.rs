// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod server;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, RawConfigFile, load_or_default};
use crate::engine::ScanPipeline;
use crate::exec::{ProcessRunner, TracingSink};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the process runner with its log sink
/// - the shared request pipeline
/// - the HTTP server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = resolve_config(&args)?;

    if args.check {
        print_check(&cfg);
        return Ok(());
    }

    let runner = Arc::new(ProcessRunner::new(Arc::new(TracingSink)));
    let pipeline = Arc::new(ScanPipeline::from_config(&cfg, runner));

    let listener = TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("binding HTTP listener on {}", cfg.bind))?;

    info!(
        bind = %cfg.bind,
        capacity = cfg.capacity,
        timeout_secs = cfg.timeout.as_secs_f64(),
        program = %cfg.template.program(),
        "scanqueue starting"
    );

    server::serve(listener, pipeline, shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("scanqueue stopped");
    Ok(())
}

/// Load the config file and apply CLI overrides before validation.
pub fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let path = args.config.as_deref().map(Path::new);
    let mut raw: RawConfigFile = load_or_default(path).with_context(|| match path {
        Some(p) => format!("loading config from {}", p.display()),
        None => "loading default config".to_string(),
    })?;

    if let Some(bind) = &args.bind {
        raw.server.bind = bind.clone();
    }
    if let Some(capacity) = args.capacity {
        raw.queue.capacity = capacity;
    }

    let cfg = ConfigFile::try_from(raw).context("validating config")?;
    Ok(cfg)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

fn print_check(cfg: &ConfigFile) {
    println!("scanqueue config OK:");
    println!("  bind: {}", cfg.bind);
    println!("  capacity: {}", cfg.capacity);
    println!("  timeout: {:?}", cfg.timeout);
    println!("  fail_on_nonzero_exit: {}", cfg.fail_on_nonzero_exit);
    match cfg.template.build("<url>") {
        Ok(cmd) => println!("  command: {cmd}"),
        Err(e) => println!("  command: <invalid: {e}>"),
    }
}
