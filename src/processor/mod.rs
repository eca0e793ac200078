pub mod console;
pub mod mock;

use async_trait::async_trait;

use crate::consts::DEFAULT_SKIP_CODE;
use crate::error::ProcessError;
use crate::models::{Activation, ParamUpdate, TierConfigRequest};

/// What a processor decided for one request. Exactly one per call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Approve with an activation tile or template.
    Approve(Activation),
    /// Push these parameters back and ask the requester for more information.
    Inquire(Vec<ParamUpdate>),
    /// Fail the request; the reason is shown to the requester.
    Fail(String),
    /// Leave the request untouched. The code is returned as the dispatch result.
    Skip(String),
    /// Nothing to do.
    NoResult,
}

impl Outcome {
    pub fn tile(representation: impl Into<String>) -> Self {
        Outcome::Approve(Activation::Tile(representation.into()))
    }

    pub fn template(template_id: impl Into<String>) -> Self {
        Outcome::Approve(Activation::Template(template_id.into()))
    }

    pub fn inquire<I, P>(params: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParamUpdate>,
    {
        Outcome::Inquire(params.into_iter().map(Into::into).collect())
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Outcome::Fail(reason.into())
    }

    pub fn skip() -> Self {
        Outcome::Skip(DEFAULT_SKIP_CODE.to_string())
    }

    pub fn skip_with(code: impl Into<String>) -> Self {
        Outcome::Skip(code.into())
    }
}

/// Decides what happens to each tier configuration request. Implement this
/// to automate a product's tier setup.
///
/// Return [`ProcessError::Unimplemented`] for requests this processor was
/// never meant to handle; that error stops processing. Any other error only
/// skips the current request.
#[async_trait]
pub trait TierConfigProcessor: Send + Sync {
    async fn process_request(&self, request: &TierConfigRequest) -> Result<Outcome, ProcessError>;
}
