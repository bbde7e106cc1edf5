use std::fmt;
use std::str::FromStr;

use crate::error::GeneCacheError;

/// One `gene id<TAB>transcript id` line of the input list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeneRecord {
    pub gene_id: String,
    pub transcript_id: String,
}

impl GeneRecord {
    pub fn new(gene_id: impl Into<String>, transcript_id: impl Into<String>) -> Self {
        Self {
            gene_id: gene_id.into(),
            transcript_id: transcript_id.into(),
        }
    }

    /// Parses a line, attributing failures to the given 1-based line number.
    pub fn parse_line(value: &str, line: usize) -> Result<Self, GeneCacheError> {
        let mut tokens = value.split('\t');
        match (tokens.next(), tokens.next()) {
            (Some(gene_id), Some(transcript_id)) => Ok(Self::new(gene_id, transcript_id)),
            _ => Err(GeneCacheError::MalformedRecord { line }),
        }
    }
}

impl FromStr for GeneRecord {
    type Err = GeneCacheError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse_line(value, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    GeneDetail,
    ProteinDetail,
    PanelSource,
    References,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::GeneDetail => write!(f, "gene"),
            ResourceKind::ProteinDetail => write!(f, "protein"),
            ResourceKind::PanelSource => write!(f, "panel"),
            ResourceKind::References => write!(f, "references"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    pub kind: ResourceKind,
    pub url: String,
    pub gene_id: String,
}
