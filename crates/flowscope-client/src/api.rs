//! HTTP retrieval client
//!
//! Thin async wrapper over the backend's read-only API. Each method performs
//! one request and returns parsed core types; transport and status failures
//! map onto [`Error::Http`]. Nothing is cached and nothing is retried here.

use serde_json::Value;
use url::Url;

use flowscope_core::prelude::*;
use flowscope_core::{FlowDetail, RawChunk};

use crate::parse::{parse_flow_detail, parse_flow_list, parse_raw_chunks, FlowListResponse};
use crate::query::FlowQuery;

/// Fixed page size of the flow list endpoint. A response of exactly this
/// many flows means older flows may remain; fewer means the listing is
/// exhausted.
pub const PAGE_SIZE: usize = 100;

/// Client for the Flowscope retrieval backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the URL cannot be parsed.
    pub fn new(base_url: &str) -> Result<Self> {
        // A trailing slash makes Url::join treat the base as a directory.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base = Url::parse(&normalized)
            .map_err(|e| Error::config(format!("invalid backend URL {base_url:?}: {e}")))?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    /// List flows matching the query, together with the protocol list and
    /// tag catalogue. Results are limited to [`PAGE_SIZE`] entries ordered
    /// by descending start time.
    pub async fn list_flows(&self, query: &FlowQuery) -> Result<FlowListResponse> {
        let mut url = self.endpoint("api/flow")?;
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        let value = self.get_json(url).await?;
        Ok(parse_flow_list(&value))
    }

    /// Fetch one flow's full detail. Returns `None` when the backend does
    /// not know the flow.
    pub async fn get_flow(&self, flow_id: i64) -> Result<Option<FlowDetail>> {
        let url = self.endpoint(&format!("api/flow/{flow_id}"))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| Error::http(e.to_string()))?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| Error::http(e.to_string()))?;
        parse_flow_detail(&value).map(Some)
    }

    /// Fetch the ordered raw payload chunks of one flow, decoded from their
    /// transport text encoding.
    pub async fn get_flow_raw(&self, flow_id: i64) -> Result<Vec<RawChunk>> {
        let url = self.endpoint(&format!("api/flow/{flow_id}/raw"))?;
        let value = self.get_json(url).await?;
        Ok(parse_raw_chunks(&value))
    }

    /// Fetch the bytes of an extracted file by its content-addressed
    /// storage path (`<hash[0..2]>/<hash>`).
    pub async fn fetch_file(&self, storage_path: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("filestore/{storage_path}"))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::http(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| Error::config(format!("invalid endpoint path {path:?}: {e}")))
    }

    async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::http(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::http(e.to_string()))?;
        response.json().await.map_err(|e| Error::http(e.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_url() {
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn test_endpoint_joins_relative_to_base() {
        let client = ApiClient::new("http://capture-box:8080/shovel").unwrap();
        let url = client.endpoint("api/flow/42").unwrap();
        assert_eq!(url.as_str(), "http://capture-box:8080/shovel/api/flow/42");
    }

    #[test]
    fn test_endpoint_preserves_existing_trailing_slash() {
        let client = ApiClient::new("http://capture-box:8080/").unwrap();
        let url = client.endpoint("filestore/ab/ab12").unwrap();
        assert_eq!(url.as_str(), "http://capture-box:8080/filestore/ab/ab12");
    }

    #[test]
    fn test_list_url_carries_query_pairs() {
        let client = ApiClient::new("http://capture-box:8080").unwrap();
        let mut url = client.endpoint("api/flow").unwrap();
        let query = FlowQuery {
            time_to: Some(1_700_000_000_000),
            tags_require: vec!["flag-out".to_string()],
            ..Default::default()
        };
        url.query_pairs_mut().extend_pairs(query.to_query_pairs());
        assert_eq!(
            url.as_str(),
            "http://capture-box:8080/api/flow?to=1700000000000&tag_require=flag-out"
        );
    }
}
