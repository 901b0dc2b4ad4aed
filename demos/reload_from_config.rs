//! Hot reload example
//!
//! Loads a logger topology from a JSON document, logs through it, then
//! reloads a changed document while the same logger handles stay in use.
//!
//! Run with: cargo run --example reload_from_config

use rust_config_logger::prelude::*;
use rust_config_logger::{info, logger, root_info, warn};
use std::path::Path;

fn main() -> Result<()> {
    println!("=== Rust Config Logger - Hot Reload Example ===\n");

    // Subscribe the reconciler to the global `logs` cell
    let logs = rust_config_logger::init()?;
    let config = ConfigRegistry::global();

    // Typed cells living next to the logger topology
    let port = config.lookup("server.port", 80u16, "listen port")?;
    let workers = config.lookup("server.workers", 1usize, "worker threads")?;
    workers.add_listener(|old: &usize, new: &usize| {
        println!("   workers changed: {} -> {}", old, new);
        Ok(())
    });

    println!("1. Loading demos/logging.json:");
    config.load_from_file(Path::new("demos").join("logging.json"))?;
    println!("   server.port = {}", port.value());

    let http = logger!("app.http");
    info!(http, "listening on port {}", port.value());
    warn!(http, "slow request: {} ms", 950);
    root_info!("root logger reconfigured");

    println!("\n2. Reloading with a stricter level and no file appender:");
    config.load_from_str(
        r#"{"server": {"workers": 8},
            "logs": [{"name": "root", "level": "INFO"},
                     {"name": "app.http", "level": "ERROR"}]}"#,
    )?;
    info!(http, "hidden after reload");
    http.error("errors still reach root's console");

    println!("\n3. Current topology:");
    let document = LoggerRegistry::global().to_document();
    println!("{}", serde_json::to_string_pretty(&document)?);
    println!("   {} logger snapshot(s) in the `logs` cell", logs.value().len());

    let _ = std::fs::remove_file("app_http.log");
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
