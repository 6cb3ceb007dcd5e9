//! Static service configuration, loaded once at startup.

use crate::domain::amount::AmountBounds;
use crate::domain::validation::Validator;
use crate::error::{Result, WebhookError};
use crate::interfaces::http::DEFAULT_BODY_LIMIT;
use reqwest::Url;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Everything the service needs to decide and dispatch.
///
/// Every field has a default, so a config file only has to name what it
/// changes. The token has no usable default and must always be supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
    /// Shared secret expected in the `X-Webhook-Token` header.
    pub token: String,
    pub confirmation_url: String,
    pub cancellation_url: String,
    pub valid_events: BTreeSet<String>,
    pub valid_currencies: BTreeSet<String>,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub dispatch_timeout_secs: u64,
    /// Largest accepted `/webhook` body, in bytes.
    pub max_body_bytes: usize,
    pub bind: SocketAddr,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            confirmation_url: "http://localhost:5001/confirmar".to_string(),
            cancellation_url: "http://localhost:5001/cancelar".to_string(),
            valid_events: BTreeSet::from(["payment_success".to_string()]),
            valid_currencies: ["BRL", "USD", "EUR"]
                .into_iter()
                .map(String::from)
                .collect(),
            min_amount: Decimal::new(1, 2),
            max_amount: Decimal::new(99_999_999, 2),
            dispatch_timeout_secs: 5,
            max_body_bytes: DEFAULT_BODY_LIMIT,
            bind: SocketAddr::from(([127, 0, 0, 1], 5000)),
        }
    }
}

impl WebhookConfig {
    /// Reads a JSON config file. Missing keys fall back to defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Rejects configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(WebhookError::ConfigError("token must not be empty".into()));
        }
        self.confirmation_url()?;
        self.cancellation_url()?;
        if self.valid_events.is_empty() {
            return Err(WebhookError::ConfigError(
                "valid_events must not be empty".into(),
            ));
        }
        if self.valid_currencies.is_empty() {
            return Err(WebhookError::ConfigError(
                "valid_currencies must not be empty".into(),
            ));
        }
        if self.min_amount > self.max_amount {
            return Err(WebhookError::ConfigError(format!(
                "min_amount {} exceeds max_amount {}",
                self.min_amount, self.max_amount
            )));
        }
        if self.dispatch_timeout_secs == 0 {
            return Err(WebhookError::ConfigError(
                "dispatch_timeout_secs must be positive".into(),
            ));
        }
        if self.max_body_bytes == 0 {
            return Err(WebhookError::ConfigError(
                "max_body_bytes must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn confirmation_url(&self) -> Result<Url> {
        parse_url("confirmation_url", &self.confirmation_url)
    }

    pub fn cancellation_url(&self) -> Result<Url> {
        parse_url("cancellation_url", &self.cancellation_url)
    }

    pub fn amount_bounds(&self) -> AmountBounds {
        AmountBounds::new(self.min_amount, self.max_amount)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    pub fn validator(&self) -> Validator {
        Validator::new(
            self.valid_events.clone(),
            self.valid_currencies.clone(),
            self.amount_bounds(),
        )
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| WebhookError::ConfigError(format!("{field} is not a valid URL: {e}")))
}
