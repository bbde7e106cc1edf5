use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Failure of a single GET against the upstream site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("http error {0} in fetching url")]
    Status(u16),

    #[error("unable to decode page response: {0}")]
    Decode(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status(status) => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum GeneCacheError {
    #[error("input file is not given")]
    MissingInput,

    #[error("cannot open file {path}: {message}")]
    InputOpen { path: PathBuf, message: String },

    #[error("cannot read line {line} of input: {message}")]
    InputRead { line: usize, message: String },

    #[error("malformed record on line {line}: expected <gene id>\\t<transcript id>")]
    MalformedRecord { line: usize },

    #[error("invalid base url {url}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    #[error("unable to open log file {path}: {message}")]
    LogFile { path: PathBuf, message: String },

    #[error("unable to set up logging: {0}")]
    Logging(String),

    #[error("unable to build http client: {0}")]
    HttpClient(String),

    #[error("error fetching url {url} for gene {gene_id}: {source}")]
    #[diagnostic(help("the references endpoint is used as an upstream health check; the run stops here"))]
    ReferencesUnavailable {
        gene_id: String,
        url: String,
        #[source]
        source: FetchError,
    },
}
