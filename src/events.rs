use std::fmt;

use crate::domain::{ResourceKind, ResourceRequest};
use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Fetch,
    Http,
    Decoding,
    Caching,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Fetch => write!(f, "fetch"),
            EventKind::Http => write!(f, "http"),
            EventKind::Decoding => write!(f, "decoding"),
            EventKind::Caching => write!(f, "caching"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Error,
}

/// Report of one fetch attempt, or of a gene that finished its walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchEvent {
    pub gene_id: String,
    pub url: Option<String>,
    pub resource: Option<ResourceKind>,
    pub kind: EventKind,
    pub status: Option<u16>,
    pub level: EventLevel,
    pub message: String,
}

impl FetchEvent {
    pub fn fetched(request: &ResourceRequest) -> Self {
        Self {
            gene_id: request.gene_id.clone(),
            url: Some(request.url.clone()),
            resource: Some(request.kind),
            kind: EventKind::Caching,
            status: None,
            level: EventLevel::Debug,
            message: "success in fetching and caching url".to_string(),
        }
    }

    pub fn failed(request: &ResourceRequest, error: &FetchError) -> Self {
        let kind = match error {
            FetchError::Network(_) => EventKind::Fetch,
            FetchError::Status(_) => EventKind::Http,
            FetchError::Decode(_) => EventKind::Decoding,
        };
        Self {
            gene_id: request.gene_id.clone(),
            url: Some(request.url.clone()),
            resource: Some(request.kind),
            kind,
            status: error.status(),
            level: EventLevel::Error,
            message: error.to_string(),
        }
    }

    pub fn gene_completed(gene_id: &str) -> Self {
        Self {
            gene_id: gene_id.to_string(),
            url: None,
            resource: None,
            kind: EventKind::Caching,
            status: None,
            level: EventLevel::Info,
            message: "success in caching gene id".to_string(),
        }
    }

    /// True for per-url reports, false for the per-gene summary.
    pub fn is_fetch(&self) -> bool {
        self.url.is_some()
    }
}

pub trait EventSink: Send + Sync {
    fn event(&self, event: FetchEvent);
}

/// Forwards events to the installed `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn event(&self, event: FetchEvent) {
        let id = event.gene_id.as_str();
        let url = event.url.as_deref();
        let resource = event.resource.map(|resource| resource.to_string());
        let resource = resource.as_deref();
        let message = event.message.as_str();
        match event.level {
            EventLevel::Debug => tracing::debug!(
                id,
                url,
                kind = %event.kind,
                resource,
                "statusCode" = event.status,
                "{message}"
            ),
            EventLevel::Info => tracing::info!(
                id,
                url,
                kind = %event.kind,
                resource,
                "statusCode" = event.status,
                "{message}"
            ),
            EventLevel::Error => tracing::error!(
                id,
                url,
                kind = %event.kind,
                resource,
                "statusCode" = event.status,
                "{message}"
            ),
        }
    }
}
