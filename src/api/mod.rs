pub mod http;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::TierConfigRequest;

/// Query filters for listing requests, sent as URL query parameters.
pub type Filters = BTreeMap<String, String>;

/// Raw body and status code of a successful API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub body: String,
    pub status: u16,
}

/// The primitive operations on the tier configuration request resource.
/// The dispatcher only knows this trait.
#[async_trait]
pub trait TierApi: Send + Sync {
    /// Fetch requests matching the filters.
    async fn list(&self, filters: &Filters) -> Result<Vec<TierConfigRequest>, ApiError>;

    /// Approve a request with the given template parameters.
    async fn approve(&self, id: &str, params: &Value) -> Result<String, ApiError>;

    /// Move a request to inquiring so the requester can fix its parameters.
    async fn inquire(&self, id: &str) -> Result<String, ApiError>;

    /// Fail a request with a reason shown to the requester.
    async fn fail(&self, id: &str, reason: &str) -> Result<String, ApiError>;

    /// PUT a JSON body at a path below the resource.
    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError>;
}
