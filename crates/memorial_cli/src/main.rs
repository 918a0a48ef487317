//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memorial_core` linkage.
//! - Print the resolved catalog and countdown for quick local sanity checks.

use chrono::Utc;
use memorial_core::{countdown_between, MemoryCatalog, SiteConfig};
use std::process::ExitCode;

/// Optional absolute directory for rolling log files.
const LOG_DIR_ENV: &str = "MEMORIAL_LOG_DIR";

fn main() -> ExitCode {
    println!("memorial_core ping={}", memorial_core::ping());
    println!("memorial_core version={}", memorial_core::core_version());

    if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
        if let Err(err) = memorial_core::init_logging(memorial_core::default_log_level(), &dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config = match SiteConfig::default().with_env_overrides() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };
    let catalog = match MemoryCatalog::builtin() {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("builtin catalog unavailable: {err}");
            return ExitCode::FAILURE;
        }
    };
    println!("catalog memories={}", catalog.len());

    let remaining = countdown_between(config.target_instant, Utc::now());
    let cells = remaining
        .units()
        .iter()
        .map(|unit| format!("{} {}", unit.padded(), unit.label))
        .collect::<Vec<_>>();
    println!("countdown target={} {}", config.target_instant.to_rfc3339(), cells.join(" "));
    ExitCode::SUCCESS
}
