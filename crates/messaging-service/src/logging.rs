//! Tracing subscriber driven by the `[logging]` configuration section

use std::str::FromStr;

use testbed_messaging_core::{MessagingError, Result};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogConfig;

/// Resolved logging options for one process
#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: Level,
    pub json: bool,
    /// Source file and line on every event
    pub file_info: bool,
    /// Emit span enter/exit events
    pub spans: bool,
    pub app_name: String,
}

impl LogSettings {
    pub fn from_config(config: &LogConfig, app_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            level: parse_log_level(&config.level)?,
            json: config.json,
            file_info: config.file_info,
            spans: config.spans,
            app_name: app_name.into(),
        })
    }

    fn span_events(&self) -> FmtSpan {
        if self.spans {
            FmtSpan::ACTIVE
        } else {
            FmtSpan::NONE
        }
    }
}

/// Install the global subscriber; `RUST_LOG` directives are added on top of the level
pub fn setup_logging(settings: &LogSettings) -> Result<()> {
    let builder = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(settings.level.into()))
        .with_span_events(settings.span_events())
        .with_file(settings.file_info)
        .with_line_number(settings.file_info);

    let installed = if settings.json {
        builder.with_writer(std::io::stdout).json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| MessagingError::config(format!("Failed to install logger: {}", e)))
}

pub fn parse_log_level(level: &str) -> Result<Level> {
    Level::from_str(level.trim())
        .map_err(|_| MessagingError::config(format!("Invalid log level: {}", level)))
}

/// First line written once logging is up
pub fn log_startup(settings: &LogSettings, version: &str) {
    tracing::info!(
        app = %settings.app_name,
        level = %settings.level,
        json = settings.json,
        "Starting {} v{}",
        settings.app_name,
        version
    );
}
