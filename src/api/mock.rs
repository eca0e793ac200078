use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::{ApiResponse, Filters, TierApi};
use crate::error::ApiError;
use crate::models::TierConfigRequest;

/// Which primitive a recorded call went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Approve,
    Inquire,
    Fail,
    Put,
}

/// One call received by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    List(Filters),
    Approve { id: String, params: Value },
    Inquire { id: String },
    Fail { id: String, reason: String },
    Put { path: String, body: Value },
}

impl ApiCall {
    pub fn action(&self) -> Action {
        match self {
            ApiCall::List(_) => Action::List,
            ApiCall::Approve { .. } => Action::Approve,
            ApiCall::Inquire { .. } => Action::Inquire,
            ApiCall::Fail { .. } => Action::Fail,
            ApiCall::Put { .. } => Action::Put,
        }
    }
}

/// An in-memory API for tests. Records every call in order, serves a fixed
/// request list, and can be told to fail one kind of call.
#[derive(Default)]
pub struct RecordingApi {
    requests: Vec<TierConfigRequest>,
    failing: Option<Action>,
    calls: Mutex<Vec<ApiCall>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these requests from `list`.
    pub fn with_requests(mut self, requests: Vec<TierConfigRequest>) -> Self {
        self.requests = requests;
        self
    }

    /// Make every call of this kind return a 500.
    pub fn failing_on(mut self, action: Action) -> Self {
        self.failing = Some(action);
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than `list`, i.e. the ones that change a request.
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.action() != Action::List)
            .collect()
    }

    fn record(&self, call: ApiCall) -> Result<(), ApiError> {
        let action = call.action();
        self.calls.lock().unwrap().push(call);
        if self.failing == Some(action) {
            return Err(ApiError::Status {
                status: 500,
                body: format!("mock failure on {:?}", action),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TierApi for RecordingApi {
    async fn list(&self, filters: &Filters) -> Result<Vec<TierConfigRequest>, ApiError> {
        self.record(ApiCall::List(filters.clone()))?;
        Ok(self.requests.clone())
    }

    async fn approve(&self, id: &str, params: &Value) -> Result<String, ApiError> {
        self.record(ApiCall::Approve {
            id: id.to_string(),
            params: params.clone(),
        })?;
        Ok("approved".to_string())
    }

    async fn inquire(&self, id: &str) -> Result<String, ApiError> {
        self.record(ApiCall::Inquire { id: id.to_string() })?;
        Ok("inquiring".to_string())
    }

    async fn fail(&self, id: &str, reason: &str) -> Result<String, ApiError> {
        self.record(ApiCall::Fail {
            id: id.to_string(),
            reason: reason.to_string(),
        })?;
        Ok("failed".to_string())
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse, ApiError> {
        self.record(ApiCall::Put {
            path: path.to_string(),
            body: body.clone(),
        })?;
        Ok(ApiResponse {
            body: body.to_string(),
            status: 200,
        })
    }
}
