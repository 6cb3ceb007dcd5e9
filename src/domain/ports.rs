use super::transaction::TransactionPayload;
use crate::error::Result;
use async_trait::async_trait;

/// Record of transaction ids that have already been accepted for confirmation.
#[async_trait]
pub trait TransactionLedger: Send + Sync {
    async fn contains(&self, transaction_id: &str) -> Result<bool>;

    /// Records an id. Recording an id twice is a no-op.
    async fn record(&self, transaction_id: &str) -> Result<()>;

    /// Atomically records `transaction_id` if absent. Returns `true` when the
    /// id was new, `false` when it was already present.
    ///
    /// For any id, at most one concurrent caller observes `true`.
    async fn record_if_absent(&self, transaction_id: &str) -> Result<bool>;

    async fn len(&self) -> Result<usize>;

    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }
}

/// Outbound notification of a transaction's fate to a downstream system.
///
/// Both calls return `true` only when the destination acknowledged with a
/// success status. Failures are reported, never retried.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn confirm(&self, payload: &TransactionPayload) -> bool;
    async fn cancel(&self, payload: &TransactionPayload) -> bool;
}

pub type LedgerBox = Box<dyn TransactionLedger>;
pub type DispatcherBox = Box<dyn Dispatcher>;
