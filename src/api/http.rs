use crate::api::traits::PropertyDataApi;
use crate::api::types::{is_invalid_page, property_types_from_json, SearchResponse};
use crate::config;
use crate::filters::QueryParams;
use crate::models::PropertyType;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, info, warn};

/// REST client for the listing backend
pub struct HttpPropertyApi {
    client: Client,
    base_url: String,
}

impl HttpPropertyApi {
    /// Create a client for the configured backend
    pub fn new(config: &config::Api) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/", self.base_url, path)
    }
}

#[async_trait]
impl PropertyDataApi for HttpPropertyApi {
    async fn property_types(&self) -> Result<Vec<PropertyType>> {
        let url = self.endpoint("property-types");
        debug!("Fetching property types from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch property types")?;

        if !response.status().is_success() {
            warn!("Property types endpoint returned status: {}", response.status());
            anyhow::bail!("Failed to fetch property types: {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to read property types body")?;
        let types = property_types_from_json(body)?;
        info!("Loaded {} property types", types.len());
        Ok(types)
    }

    async fn search(&self, params: &QueryParams) -> Result<SearchResponse> {
        let url = self.endpoint("properties");
        debug!("Searching {} with {}", url, params.to_query_string());

        let response = self
            .client
            .get(&url)
            .query(params.as_pairs())
            .send()
            .await
            .context("Failed to fetch properties")?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read search response body")?;

        classify_search(status, &text)
    }

    fn source_name(&self) -> &str {
        &self.base_url
    }
}

/// Map a search response status and body to a [`SearchResponse`].
/// A rejected page is reported as 404 or 400 with the invalid-page marker.
fn classify_search(status: StatusCode, text: &str) -> Result<SearchResponse> {
    let body = serde_json::from_str::<Value>(text);

    if !status.is_success() {
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST)
            && body.as_ref().is_ok_and(is_invalid_page)
        {
            debug!("Backend rejected the requested page");
            return Ok(SearchResponse::InvalidPage);
        }
        warn!("Search returned status: {}", status);
        anyhow::bail!("Failed to fetch properties: {}", status);
    }

    let body = body.context("Search response is not valid JSON")?;
    SearchResponse::from_json(body)
}
