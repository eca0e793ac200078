use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{Outcome, TierConfigProcessor};
use crate::error::ProcessError;
use crate::models::TierConfigRequest;

/// A scripted processor for tests. Returns pre-defined results in order and
/// remembers which requests it saw.
#[derive(Default)]
pub struct ScriptedProcessor {
    results: Mutex<VecDeque<Result<Outcome, ProcessError>>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedProcessor {
    pub fn new(results: Vec<Result<Outcome, ProcessError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always-successful script.
    pub fn outcomes(outcomes: Vec<Outcome>) -> Self {
        Self::new(outcomes.into_iter().map(Ok).collect())
    }

    /// Ids of the requests passed to `process_request`, in call order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl TierConfigProcessor for ScriptedProcessor {
    async fn process_request(&self, request: &TierConfigRequest) -> Result<Outcome, ProcessError> {
        let calls = {
            let mut seen = self.seen.lock().unwrap();
            seen.push(request.id.clone());
            seen.len()
        };
        self.results.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(anyhow::anyhow!(
                "ScriptedProcessor: no more results (called {} times)",
                calls
            )
            .into())
        })
    }
}
