use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};

use super::{Disposition, Engine, ProcessSummary};
use crate::api::{Filters, TierApi};
use crate::config::Config;
use crate::consts::{DEFAULT_STATUS, INVALID_PRODUCT, PRODUCT_FILTER};
use crate::error::{ApiError, DispatchError, ProcessError};
use crate::models::{Activation, ParamUpdate, TierConfigRequest};
use crate::processor::{Outcome, TierConfigProcessor};

/// Routes tier configuration requests through a processor and turns each
/// outcome into the matching API call.
pub struct Dispatcher {
    config: Config,
    api: Arc<dyn TierApi>,
    processor: Arc<dyn TierConfigProcessor>,
}

impl Dispatcher {
    pub fn new(
        config: Config,
        api: Arc<dyn TierApi>,
        processor: Arc<dyn TierConfigProcessor>,
    ) -> Self {
        Self {
            config,
            api,
            processor,
        }
    }

    /// Query filters for fetching requests. `status` defaults to pending and
    /// wins over an `extra` status; the product allow-list, when set, is
    /// sent comma-joined.
    pub fn filters(&self, status: Option<&str>, extra: Filters) -> Filters {
        let mut filters = extra;
        filters.insert(
            "status".to_string(),
            status.unwrap_or(DEFAULT_STATUS).to_string(),
        );
        if !self.config.products.is_empty() {
            filters.insert(PRODUCT_FILTER.to_string(), self.config.products.join(","));
        }
        filters
    }

    pub fn default_filters(&self) -> Filters {
        self.filters(None, Filters::new())
    }

    /// Dispatch one request. Returns the result of the terminal API call,
    /// the skip code, an empty string when nothing was done, or
    /// [`INVALID_PRODUCT`]. Only an unimplemented processor is an error.
    pub async fn dispatch(&self, request: &TierConfigRequest) -> Result<String, DispatchError> {
        self.dispatch_with_disposition(request)
            .await
            .map(|(_, result)| result)
    }

    async fn dispatch_with_disposition(
        &self,
        request: &TierConfigRequest,
    ) -> Result<(Disposition, String), DispatchError> {
        let span = info_span!(
            "tier_config",
            request_id = %request.id,
            config_id = %request.configuration.id,
            account_id = %request.account_id(),
        );

        async {
            if !self.config.accepts_product(request.product_id()) {
                debug!(product_id = %request.product_id(), "product not in allow-list");
                return Ok((Disposition::InvalidProduct, INVALID_PRODUCT.to_string()));
            }

            info!("Start tier config request process / ID request - {}", request.id);

            match self.resolve(request).await {
                Ok(resolved) => Ok(resolved),
                Err(ProcessError::Unimplemented(reason)) => Err(DispatchError::Unimplemented {
                    request_id: request.id.clone(),
                    reason,
                }),
                Err(ProcessError::Other(err)) => {
                    warn!(
                        "Skipping request {} because an error was raised: {:#}",
                        request.id, err
                    );
                    Ok((Disposition::Errored, String::new()))
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run the processor and carry out its outcome. Every failure on this
    /// path, a processor panic included, comes back as a `ProcessError` for
    /// `dispatch` to classify.
    async fn resolve(
        &self,
        request: &TierConfigRequest,
    ) -> Result<(Disposition, String), ProcessError> {
        let outcome = AssertUnwindSafe(self.processor.process_request(request))
            .catch_unwind()
            .await
            .map_err(panic_error)??;

        match outcome {
            Outcome::NoResult => {
                info!("Method `process_request` did not return result");
                Ok((Disposition::NoResult, String::new()))
            }
            Outcome::Approve(activation) => {
                let result = self.approve(&request.id, &activation).await?;
                Ok((Disposition::Approved, result))
            }
            Outcome::Inquire(params) => {
                self.update_parameters(&request.id, params).await?;
                let result = self.api.inquire(&request.id).await?;
                Ok((Disposition::Inquired, result))
            }
            Outcome::Fail(reason) => {
                let result = self.api.fail(&request.id, &reason).await?;
                Ok((Disposition::Failed, result))
            }
            Outcome::Skip(code) => {
                info!(code = %code, "request skipped");
                Ok((Disposition::Skipped, code))
            }
        }
    }

    async fn approve(&self, id: &str, activation: &Activation) -> Result<String, ProcessError> {
        if activation.payload().trim().is_empty() {
            let kind = match activation {
                Activation::Tile(_) => "tile",
                Activation::Template(_) => "template id",
            };
            return Err(anyhow!("refusing to approve {} with an empty {}", id, kind).into());
        }
        Ok(self.api.approve(id, &activation.approval_params()).await?)
    }

    /// Send parameters to the server in one batch. Returns the response body.
    pub async fn update_parameters(
        &self,
        pk: &str,
        params: Vec<ParamUpdate>,
    ) -> Result<String, ApiError> {
        let params = params
            .into_iter()
            .map(|p| p.into_mapping().map(Value::Object))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(count = params.len(), "updating request parameters");

        let resp = self
            .api
            .put(pk, &serde_json::json!({ "params": params }))
            .await?;
        Ok(resp.body)
    }
}

/// Classify a processor panic. `unimplemented!()` and `todo!()` stay fatal.
fn panic_error(payload: Box<dyn Any + Send>) -> ProcessError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());

    if message.starts_with("not implemented") || message.starts_with("not yet implemented") {
        ProcessError::Unimplemented(message)
    } else {
        ProcessError::Other(anyhow!("processor panicked: {}", message))
    }
}

#[async_trait]
impl Engine for Dispatcher {
    async fn process(&self) -> Result<ProcessSummary> {
        let requests = self
            .api
            .list(&self.default_filters())
            .await
            .context("failed to list tier config requests")?;
        info!(count = requests.len(), "fetched tier config requests");

        let mut summary = ProcessSummary::default();
        for request in &requests {
            let (disposition, _) = self.dispatch_with_disposition(request).await?;
            summary.record(disposition);
        }

        info!("{}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::RecordingApi;
    use crate::processor::mock::ScriptedProcessor;

    fn dispatcher(products: &[&str]) -> Dispatcher {
        Dispatcher::new(
            Config::new(
                "https://api.example.com",
                "key",
                products.iter().map(|p| p.to_string()).collect(),
            ),
            Arc::new(RecordingApi::new()),
            Arc::new(ScriptedProcessor::default()),
        )
    }

    fn extra(pairs: &[(&str, &str)]) -> Filters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_filters_are_pending_only() {
        let filters = dispatcher(&[]).default_filters();
        assert_eq!(filters, extra(&[("status", "pending")]));
    }

    #[test]
    fn filters_merge_caller_values() {
        let filters = dispatcher(&[]).filters(None, extra(&[("assignee__id", "UR-1")]));
        assert_eq!(
            filters,
            extra(&[("status", "pending"), ("assignee__id", "UR-1")])
        );
    }

    #[test]
    fn filters_with_allow_list() {
        let filters = dispatcher(&["p1", "p2"]).default_filters();
        assert_eq!(
            filters,
            extra(&[
                ("status", "pending"),
                ("configuration__product__id", "p1,p2")
            ])
        );
    }

    #[test]
    fn panic_with_str_payload_is_other() {
        let err = panic_error(Box::new("attempt to divide by zero"));
        assert!(matches!(err, ProcessError::Other(_)));
        assert!(err.to_string().contains("divide by zero"));
    }

    #[test]
    fn panic_with_string_payload_is_other() {
        let err = panic_error(Box::new(String::from("index out of bounds")));
        assert!(err.to_string().contains("index out of bounds"));
    }

    #[test]
    fn unimplemented_and_todo_payloads_stay_fatal() {
        assert!(matches!(
            panic_error(Box::new("not implemented")),
            ProcessError::Unimplemented(_)
        ));
        assert!(matches!(
            panic_error(Box::new(String::from("not yet implemented: tier 3"))),
            ProcessError::Unimplemented(_)
        ));
    }

    #[test]
    fn explicit_status_wins() {
        let filters = dispatcher(&[]).filters(Some("approved"), extra(&[("status", "failed")]));
        assert_eq!(filters["status"], "approved");
    }
}
