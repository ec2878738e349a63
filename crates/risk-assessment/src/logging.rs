//! Logging Setup

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::AssessmentError;
use crate::settings::{LogFormat, LoggingSettings};

/// Install the global tracing subscriber.
///
/// Fails if the level is unknown or a subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), AssessmentError> {
    let level = Level::from_str(settings.level.trim())
        .map_err(|_| AssessmentError::Logging(format!("unknown level '{}'", settings.level)))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let installed = match settings.format {
        LogFormat::Plain => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };
    installed.map_err(|e| AssessmentError::Logging(e.to_string()))
}
