pub mod dispatcher;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

/// The outermost boundary. main.rs only knows this trait.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Fetch pending requests and dispatch each of them in turn.
    async fn process(&self) -> Result<ProcessSummary>;
}

/// How a single dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    InvalidProduct,
    NoResult,
    Approved,
    Inquired,
    Failed,
    Skipped,
    /// An error was logged and the request skipped.
    Errored,
}

/// Counts per disposition for one processing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    pub dispatched: usize,
    pub approved: usize,
    pub inquired: usize,
    pub failed: usize,
    pub skipped: usize,
    pub invalid_product: usize,
    pub no_result: usize,
    pub errored: usize,
}

impl ProcessSummary {
    pub fn record(&mut self, disposition: Disposition) {
        self.dispatched += 1;
        let counter = match disposition {
            Disposition::InvalidProduct => &mut self.invalid_product,
            Disposition::NoResult => &mut self.no_result,
            Disposition::Approved => &mut self.approved,
            Disposition::Inquired => &mut self.inquired,
            Disposition::Failed => &mut self.failed,
            Disposition::Skipped => &mut self.skipped,
            Disposition::Errored => &mut self.errored,
        };
        *counter += 1;
    }
}

impl fmt::Display for ProcessSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dispatched: {} approved, {} inquired, {} failed, {} skipped, {} invalid product, {} no result, {} errored",
            self.dispatched,
            self.approved,
            self.inquired,
            self.failed,
            self.skipped,
            self.invalid_product,
            self.no_result,
            self.errored,
        )
    }
}
