use async_trait::async_trait;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::ACCEPT;

use crate::client::error::ClientError;
use crate::client::{JobSearchApi, SearchResponse};

/// Characters that encodeURIComponent does NOT encode.
const ENCODE_URI_COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const DEFAULT_API_URL: &str = "https://www.themuse.com/api/public/jobs";

/// Client for The Muse public jobs endpoint. Only the first page is ever
/// requested.
pub struct MuseApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MuseApi {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jobsearch/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::ExternalApi(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    fn search_url(&self, query: &str) -> String {
        let mut url = format!(
            "{}?category={}&page=1",
            self.base_url,
            urlencoded(query)
        );
        if let Some(key) = &self.api_key {
            url.push_str("&api_key=");
            url.push_str(&urlencoded(key));
        }
        url
    }
}

#[async_trait]
impl JobSearchApi for MuseApi {
    async fn search(&self, query: &str) -> Result<SearchResponse, ClientError> {
        let resp = self
            .client
            .get(self.search_url(query))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ClientError::ExternalApi(format!("Search request failed: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| ClientError::ExternalApi(format!("Failed to read response: {e}")))?;
        Ok(SearchResponse { status, body })
    }
}

fn urlencoded(s: &str) -> String {
    utf8_percent_encode(s, ENCODE_URI_COMPONENT_SET).to_string()
}
