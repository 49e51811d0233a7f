//! Logging system configuration and initialization
//!
//! - Console output with local timestamps
//! - Optional daily-rotated file output, plain or JSON
//! - `RUST_LOG` overrides the configured level
//! - Dependency noise (sqlx, hyper, reqwest) suppressed unless TRACE is requested

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use chrono::Local;
use once_cell::sync::OnceCell;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the life of the process
static LOG_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Local time formatter
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());

    exe_dir.join("logs")
}

/// Builds the filter: `RUST_LOG` wins, otherwise the configured level with
/// verbose dependencies clamped.
pub fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new(&config.level);

        if !config.level.to_lowercase().contains("trace") {
            for directive in [
                "sqlx::query=warn",
                "sqlx::sqlite=warn",
                "hyper=warn",
                "h2=warn",
                "reqwest=info",
                "tower_http=info",
            ] {
                if let Ok(directive) = directive.parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        filter
    })
}

/// Initialize logging with custom configuration.
///
/// Fails if no output is enabled or if a global subscriber is already installed.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    if !config.console_output && !config.file_output {
        return Err(anyhow!("No logging output configured"));
    }

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
            .boxed()
    });

    let file_layer = if config.file_output {
        let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let (file_writer, guard) = non_blocking(rolling::daily(&log_dir, &config.file_prefix));
        // A second initialization keeps the first guard; the subscriber install below fails anyway.
        let _ = LOG_GUARD.set(guard);

        let layer = if config.json_format {
            fmt::Layer::new()
                .json()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    Registry::default()
        .with(build_env_filter(config))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("Console output: {}", config.console_output);
    info!("File output: {}", config.file_output);

    Ok(())
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== ShopCart System Information ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
    info!("===================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.level.is_empty());
        assert!(config.console_output);
        assert!(!config.file_output);
    }

    #[test]
    fn test_log_directory_is_deterministic() {
        assert!(get_log_directory().to_string_lossy().ends_with("logs"));
    }

    #[test]
    fn test_no_output_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(&config).is_err());
    }
}
