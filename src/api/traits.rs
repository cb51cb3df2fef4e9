use crate::api::types::SearchResponse;
use crate::filters::QueryParams;
use crate::models::PropertyType;
use anyhow::Result;
use async_trait::async_trait;

/// Data access to the listing backend.
/// The listing view only talks to this trait, so tests and alternative
/// backends can stand in for the HTTP client.
#[async_trait]
pub trait PropertyDataApi: Send + Sync {
    /// Fetch every known property type
    async fn property_types(&self) -> Result<Vec<PropertyType>>;

    /// Run one paginated search
    async fn search(&self, params: &QueryParams) -> Result<SearchResponse>;

    /// Human readable name of the backend, used in logs
    fn source_name(&self) -> &str;
}
