// src/main.rs

//! The main entry point for the hoststat binary: status server by default,
//! polling client with `--poll`.

use anyhow::{Context, Result, anyhow};
use hoststat::config::Config;
use hoststat::{poller, server};
use serde::de::IntoDeserializer;
use serde::de::value::StrDeserializer;
use std::env;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{filter::EnvFilter, prelude::*};

const USAGE: &str = "Usage: hoststat [--config PATH] [--host HOST] [--port PORT]
       hoststat --poll [--config PATH] [--server HOST] [--port PORT] [--interval DURATION]
       hoststat --version";

#[tokio::main]
async fn main() -> Result<()> {
    run_app().await
}

async fn run_app() -> Result<()> {
    // Define version information.
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Collect command-line arguments to decide the execution mode.
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--version") {
        println!("hoststat version {VERSION}");
        return Ok(());
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{USAGE}");
        return Ok(());
    }

    let poll_mode = args.iter().any(|a| a == "--poll");

    // Load the configuration, then apply command-line overrides.
    let config = match load_config(&args, poll_mode) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e:#}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    // RUST_LOG wins over the configured level.
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone());
    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(
            tracing_subscriber::fmt::layer()
                .compact() // Use the compact, single-line format.
                .with_ansi(true),
        )
        .init();

    if poll_mode {
        // --- Poller Mode ---
        info!("Starting hoststat {VERSION} in poller mode...");
        if let Err(e) = poller::run(config).await {
            error!("Poller runtime error: {}", e);
            return Err(e);
        }
    } else {
        // --- Server Mode ---
        info!("Starting hoststat {VERSION} server...");
        if let Err(e) = server::run(config).await {
            error!("Server runtime error: {:#}", e);
            return Err(e);
        }
    }

    Ok(())
}

/// Resolves the configuration file and the command-line overrides for `args`.
fn load_config(args: &[String], poll_mode: bool) -> Result<Config> {
    let mut config = Config::load(flag_value(args, "--config")?)?;

    if let Some(port_str) = flag_value(args, "--port")? {
        let port = port_str
            .parse::<u16>()
            .with_context(|| format!("Invalid port number: {port_str}"))?;
        if poll_mode {
            config.poller.server_port = port;
        } else {
            config.port = port;
        }
    }
    if let Some(host) = flag_value(args, "--host")? {
        config.host = host.to_string();
    }
    if let Some(server) = flag_value(args, "--server")? {
        config.poller.server_host = server.to_string();
    }
    if let Some(interval) = flag_value(args, "--interval")? {
        config.poller.interval = parse_duration(interval)?;
    }

    config.validate()?;
    Ok(config)
}

/// Returns the value following `flag`, or an error if the flag has none.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    match args.iter().position(|arg| arg == flag) {
        None => Ok(None),
        Some(i) => args
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .ok_or_else(|| anyhow!("{flag} flag requires a value")),
    }
}

/// Parses a humantime duration such as `90s`, `5m` or `1h 30m`.
fn parse_duration(value: &str) -> Result<Duration> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = value.into_deserializer();
    humantime_serde::deserialize(deserializer)
        .with_context(|| format!("Invalid duration: {value}"))
}
