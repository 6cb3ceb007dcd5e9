use super::outcome::WebhookOutcome;
use crate::domain::ports::{DispatcherBox, LedgerBox};
use crate::domain::transaction::{NormalizedTransaction, RejectionReason, TransactionPayload};
use crate::domain::validation::Validator;
use crate::error::Result;

/// The webhook entry point.
///
/// `WebhookProcessor` owns the validator, the ledger and the dispatcher. It
/// keeps no per-request state, so one instance behind an `Arc` serves every
/// concurrent request.
pub struct WebhookProcessor {
    token: String,
    validator: Validator,
    ledger: LedgerBox,
    dispatcher: DispatcherBox,
}

impl WebhookProcessor {
    /// Creates a new `WebhookProcessor`.
    ///
    /// # Arguments
    ///
    /// * `token` - The shared secret callers must present.
    /// * `validator` - The payload rule chain.
    /// * `ledger` - Record of already-processed transaction ids.
    /// * `dispatcher` - Downstream confirm/cancel destination.
    pub fn new(
        token: impl Into<String>,
        validator: Validator,
        ledger: LedgerBox,
        dispatcher: DispatcherBox,
    ) -> Self {
        Self {
            token: token.into(),
            validator,
            ledger,
            dispatcher,
        }
    }

    /// Exact comparison against the configured secret. An absent token fails.
    pub fn authenticate(&self, token: Option<&str>) -> bool {
        token == Some(self.token.as_str())
    }

    /// Handles one raw webhook request: authenticate, parse, then process.
    pub async fn handle(&self, token: Option<&str>, body: &[u8]) -> WebhookOutcome {
        if !self.authenticate(token) {
            tracing::warn!(token_present = token.is_some(), "rejected webhook: bad token");
            return WebhookOutcome::Unauthorized;
        }

        let payload = match TransactionPayload::from_slice(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "rejected webhook: malformed body");
                return WebhookOutcome::Malformed;
            }
        };

        self.process(payload).await
    }

    /// Runs validation and dispatch for an already authenticated payload.
    pub async fn process(&self, payload: TransactionPayload) -> WebhookOutcome {
        match self.validator.validate(&payload) {
            Ok(tx) => self.process_valid(tx).await,
            Err(reason) => self.process_invalid(&payload, reason).await,
        }
    }

    async fn process_valid(&self, tx: NormalizedTransaction) -> WebhookOutcome {
        // The id stays recorded even if the confirm below fails.
        match self.ledger.record_if_absent(&tx.transaction_id).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(transaction_id = %tx.transaction_id, "duplicate transaction");
                return WebhookOutcome::Duplicate;
            }
            Err(e) => {
                tracing::error!(transaction_id = %tx.transaction_id, error = %e, "ledger failure");
                return WebhookOutcome::InternalFault(e.to_string());
            }
        }

        if self.dispatcher.confirm(&tx.payload).await {
            tracing::info!(
                transaction_id = %tx.transaction_id,
                amount = %tx.amount.value(),
                currency = %tx.currency,
                "transaction confirmed"
            );
            WebhookOutcome::Accepted
        } else {
            tracing::error!(transaction_id = %tx.transaction_id, "confirmation failed");
            WebhookOutcome::ConfirmFailed
        }
    }

    async fn process_invalid(
        &self,
        payload: &TransactionPayload,
        reason: RejectionReason,
    ) -> WebhookOutcome {
        tracing::warn!(kind = reason.kind(), %reason, "rejected webhook: invalid payload");

        if payload.has_transaction_id() {
            // Best effort; the rejection stands whatever the outcome.
            let cancelled = self.dispatcher.cancel(payload).await;
            tracing::debug!(cancelled, "cancellation dispatched");
        }

        WebhookOutcome::Invalid(reason)
    }

    /// Number of transaction ids recorded so far.
    pub async fn processed_count(&self) -> Result<usize> {
        self.ledger.len().await
    }
}
