use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{ApiResponse, Filters, TierApi};
use crate::config::Config;
use crate::consts::RESOURCE;
use crate::error::ApiError;
use crate::models::TierConfigRequest;

/// Talks to the tier configuration request resource over HTTPS.
pub struct HttpTierApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpTierApi {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: format!("{}/{}", config.api_url.trim_end_matches('/'), RESOURCE),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<ApiResponse, ApiError> {
        let resp = req
            .header("authorization", &self.api_key)
            .header("content-type", "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "API response");

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(ApiResponse {
            body,
            status: status.as_u16(),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> Result<String, ApiError> {
        let req = self.client.post(self.url(path)).json(body);
        Ok(self.send(req).await?.body)
    }
}

#[async_trait]
impl TierApi for HttpTierApi {
    async fn list(&self, filters: &Filters) -> Result<Vec<TierConfigRequest>, ApiError> {
        let req = self.client.get(self.url("")).query(filters);
        let resp = self.send(req).await?;
        serde_json::from_str(&resp.body)
            .map_err(|e| ApiError::Decode(format!("request list: {}", e)))
    }

    async fn approve(&self, id: &str, params: &Value) -> Result<String, ApiError> {
        self.post(&format!("{}/approve/", id), params).await
    }

    async fn inquire(&self, id: &str) -> Result<String, ApiError> {
        self.post(&format!("{}/inquire/", id), &serde_json::json!({}))
            .await
    }

    async fn fail(&self, id: &str, reason: &str) -> Result<String, ApiError> {
        self.post(
            &format!("{}/fail/", id),
            &serde_json::json!({ "reason": reason }),
        )
        .await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        let req = self.client.put(self.url(path)).json(body);
        self.send(req).await
    }
}
