use crate::domain::ports::TransactionLedger;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory ledger of processed transaction ids.
///
/// Uses `Arc<RwLock<HashSet<String>>>` so clones share the same set. Nothing is
/// evicted or persisted; the ledger lives exactly as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    processed: Arc<RwLock<HashSet<String>>>,
}

impl InMemoryLedger {
    /// Creates a new, empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionLedger for InMemoryLedger {
    async fn contains(&self, transaction_id: &str) -> Result<bool> {
        let processed = self.processed.read().await;
        Ok(processed.contains(transaction_id))
    }

    async fn record(&self, transaction_id: &str) -> Result<()> {
        let mut processed = self.processed.write().await;
        processed.insert(transaction_id.to_string());
        Ok(())
    }

    async fn record_if_absent(&self, transaction_id: &str) -> Result<bool> {
        // Check and insert under one write guard.
        let mut processed = self.processed.write().await;
        if processed.contains(transaction_id) {
            return Ok(false);
        }
        processed.insert(transaction_id.to_string());
        Ok(true)
    }

    async fn len(&self) -> Result<usize> {
        let processed = self.processed.read().await;
        Ok(processed.len())
    }
}
