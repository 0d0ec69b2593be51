//! AQL search execution.

use serde::Deserialize;

use super::aql::{self, ROOT_PATH};
use super::{FileSpec, ItemKind, ItemRecord};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::transport::{Transport, artifactory_url, indent_json};

const AQL_ENDPOINT: &str = "api/search/aql";

#[derive(Debug, Deserialize)]
struct AqlResponse {
    results: Vec<AqlItem>,
}

#[derive(Debug, Deserialize)]
struct AqlItem {
    repo: String,
    path: String,
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    actual_sha1: Option<String>,
}

impl AqlItem {
    /// `None` for the repository root folder, which is never deleted.
    fn into_record(self) -> Option<ItemRecord> {
        if self.name == ROOT_PATH || self.name.is_empty() {
            return None;
        }
        let path = if self.path == ROOT_PATH || self.path.is_empty() {
            self.name
        } else {
            format!("{}/{}", self.path, self.name)
        };
        let mut record = ItemRecord::new(self.repo, path, ItemKind::from_aql(self.kind.as_deref()));
        if let Some(size) = self.size {
            record = record.with_size(size);
        }
        if let Some(sha1) = self.actual_sha1 {
            record = record.with_sha1(sha1);
        }
        Some(record)
    }
}

/// Decode an AQL response body into normalized records.
pub fn parse_search_results(body: &[u8]) -> Result<Vec<ItemRecord>> {
    let response: AqlResponse = serde_json::from_slice(body).map_err(Error::Parse)?;
    Ok(response
        .results
        .into_iter()
        .filter_map(AqlItem::into_record)
        .collect())
}

/// Runs searches against the AQL endpoint.
pub struct SearchClient<'a> {
    transport: &'a dyn Transport,
    config: &'a ServiceConfig,
}

impl<'a> SearchClient<'a> {
    pub fn new(transport: &'a dyn Transport, config: &'a ServiceConfig) -> Self {
        Self { transport, config }
    }

    pub async fn search(&self, spec: &FileSpec) -> Result<Vec<ItemRecord>> {
        let query = aql::build_query(spec)?;
        let url = artifactory_url(self.config.url(), AQL_ENDPOINT)?;
        let headers = self.config.auth().headers()?;
        tracing::debug!(%query, "Searching with AQL");

        let response = self
            .transport
            .send_post(&url, &headers, query)
            .await
            .map_err(|e| Error::Query {
                status: None,
                detail: e.to_string(),
            })?;

        if !response.status.is_success() {
            return Err(Error::Query {
                status: Some(response.status),
                detail: indent_json(&response.body),
            });
        }

        let items = parse_search_results(&response.body)?;
        tracing::info!(count = items.len(), "Found {} artifacts.", items.len());
        Ok(items)
    }
}
