//! Application layer containing the webhook orchestration.
//!
//! `WebhookProcessor` authenticates, validates, deduplicates and dispatches a
//! single inbound webhook, producing a terminal `WebhookOutcome`.

pub mod outcome;
pub mod processor;
