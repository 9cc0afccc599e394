//! Tracing setup for the binary

use anyhow::{anyhow, Context};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingSection;

pub const INTERACTIVE_LOG_FILE: &str = "trend-tracker.log";

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "trend_tracker=debug"
    pub level: String,
    /// Append logs here instead of stderr
    pub file_path: Option<PathBuf>,
}

impl LoggingConfig {
    /// The interactive menu owns the terminal, so without a configured file
    /// its logs go next to the rendered chart.
    pub fn resolve(section: &LoggingSection, interactive: bool, output_path: &Path) -> Self {
        let file_path = section.file.clone().or_else(|| {
            interactive.then(|| {
                output_path
                    .parent()
                    .unwrap_or_else(|| Path::new(""))
                    .join(INTERACTIVE_LOG_FILE)
            })
        });
        Self {
            level: section.level.clone(),
            file_path,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .with_context(|| format!("Invalid log level {:?}", config.level))?;

    let (writer, ansi) = match &config.file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
        None => (BoxMakeWriter::new(io::stderr), true),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(ansi)
                .with_target(true),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_file_wins() {
        let section = LoggingSection {
            level: "debug".to_string(),
            file: Some(PathBuf::from("logs/run.log")),
        };
        let config = LoggingConfig::resolve(&section, true, Path::new("output/chart.svg"));
        assert_eq!(config.level, "debug");
        assert_eq!(config.file_path, Some(PathBuf::from("logs/run.log")));
    }

    #[test]
    fn test_interactive_logs_next_to_output() {
        let config = LoggingConfig::resolve(
            &LoggingSection::default(),
            true,
            Path::new("output/chart.svg"),
        );
        assert_eq!(config.file_path, Some(PathBuf::from("output/trend-tracker.log")));
    }

    #[test]
    fn test_batch_logs_to_stderr() {
        let config = LoggingConfig::resolve(
            &LoggingSection::default(),
            false,
            Path::new("output/chart.svg"),
        );
        assert_eq!(config.level, "info");
        assert_eq!(config.file_path, None);
    }
}
