use url::Url;

use crate::domain::{GeneRecord, ResourceKind, ResourceRequest};
use crate::error::GeneCacheError;

pub const DEFAULT_BASE_URL: &str = "http://dictybase.org";

/// Resolves resource kinds into request URLs below a validated base.
///
/// The base is checked once on construction. Identifiers and panel source
/// paths are spliced in verbatim, so a bad id shows up later as an http error
/// rather than here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
}

impl UrlBuilder {
    pub fn new(base: &str) -> Result<Self, GeneCacheError> {
        let parsed = Url::parse(base).map_err(|err| GeneCacheError::InvalidBaseUrl {
            url: base.to_string(),
            message: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(GeneCacheError::InvalidBaseUrl {
                url: base.to_string(),
                message: "not a hierarchical url".to_string(),
            });
        }
        Ok(Self {
            base: base.to_string(),
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `detail` is the transcript id for protein pages and the source path
    /// for panels; the other kinds ignore it.
    pub fn resolve(&self, kind: ResourceKind, gene_id: &str, detail: &str) -> ResourceRequest {
        let base = &self.base;
        let url = match kind {
            ResourceKind::GeneDetail => format!("{base}/gene/{gene_id}/gene.json"),
            ResourceKind::ProteinDetail => {
                format!("{base}/gene/{gene_id}/protein/{detail}.json")
            }
            ResourceKind::PanelSource => format!("{base}{detail}"),
            ResourceKind::References => format!("{base}/gene/{gene_id}/references.json"),
        };
        ResourceRequest {
            kind,
            url,
            gene_id: gene_id.to_string(),
        }
    }

    pub fn gene_detail(&self, record: &GeneRecord) -> ResourceRequest {
        self.resolve(ResourceKind::GeneDetail, &record.gene_id, "")
    }

    pub fn protein_detail(&self, record: &GeneRecord) -> ResourceRequest {
        self.resolve(
            ResourceKind::ProteinDetail,
            &record.gene_id,
            &record.transcript_id,
        )
    }

    pub fn panel_source(&self, gene_id: &str, source_path: &str) -> ResourceRequest {
        self.resolve(ResourceKind::PanelSource, gene_id, source_path)
    }

    pub fn references(&self, gene_id: &str) -> ResourceRequest {
        self.resolve(ResourceKind::References, gene_id, "")
    }

    pub fn top_level(&self, record: &GeneRecord) -> [ResourceRequest; 2] {
        [self.gene_detail(record), self.protein_detail(record)]
    }
}
