use std::fs::File;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::{LogConfig, LogFormat};
use crate::error::GeneCacheError;

pub const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// Installs the global subscriber described by `config`. A log file is
/// truncated if it already exists.
pub fn init(config: &LogConfig) -> Result<(), GeneCacheError> {
    let writer = match &config.file {
        Some(path) => {
            let file = File::create(path).map_err(|err| GeneCacheError::LogFile {
                path: path.clone(),
                message: err.to_string(),
            })?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.level.directive()))
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_target(false)
        .with_writer(writer);

    match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Text => builder.try_init(),
    }
    .map_err(|err| GeneCacheError::Logging(err.to_string()))
}
