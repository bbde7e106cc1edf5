use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use crate::error::GeneCacheError;
use crate::urls::UrlBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Log destination; stderr when unset.
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub input: PathBuf,
    pub urls: UrlBuilder,
    pub workers: usize,
    pub timeout: Option<Duration>,
    pub log: LogConfig,
}

/// Command line values before validation.
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub input: Option<PathBuf>,
    pub base_url: String,
    pub workers: usize,
    pub timeout_secs: Option<u64>,
    pub log: LogConfig,
}

pub struct SettingsLoader;

impl SettingsLoader {
    pub fn resolve(raw: RawSettings) -> Result<Settings, GeneCacheError> {
        let input = raw.input.ok_or(GeneCacheError::MissingInput)?;
        let urls = UrlBuilder::new(&raw.base_url)?;
        Ok(Settings {
            input,
            urls,
            workers: raw.workers.max(1),
            timeout: raw.timeout_secs.map(Duration::from_secs),
            log: raw.log,
        })
    }
}
