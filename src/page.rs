use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Layout description returned by the gene and protein detail pages.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageResponse {
    #[serde(default)]
    pub items: Vec<PanelItem>,
    #[serde(default)]
    pub layout: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PanelItem {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub label: Vec<Label>,
    /// Path relative to the site base, starting with `/`.
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub text: String,
}

pub fn parse_pages(bytes: &[u8]) -> Result<Vec<PageResponse>, FetchError> {
    serde_json::from_slice(bytes).map_err(|err| FetchError::Decode(err.to_string()))
}

/// Only the first page of a response is ever walked. An empty array is a
/// decode error rather than a missing page.
pub fn first_page(bytes: &[u8]) -> Result<PageResponse, FetchError> {
    parse_pages(bytes)?
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::Decode("empty page response".to_string()))
}
