use crate::domain::ports::Dispatcher;
use crate::domain::transaction::TransactionPayload;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Default bound on each outbound confirm/cancel call.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Dispatches confirmations and cancellations as JSON POSTs.
///
/// A single `reqwest::Client` is shared by all requests; every call carries
/// its own timeout so a slow destination only stalls the request that hit it.
#[derive(Clone, Debug)]
pub struct HttpDispatcher {
    client: Client,
    confirmation_url: Url,
    cancellation_url: Url,
}

impl HttpDispatcher {
    pub fn new(confirmation_url: Url, cancellation_url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            confirmation_url,
            cancellation_url,
        })
    }

    async fn post(&self, url: &Url, payload: &TransactionPayload) -> bool {
        match self.client.post(url.clone()).json(payload).send().await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                tracing::warn!(
                    destination = %url,
                    status = %response.status(),
                    "downstream rejected dispatch"
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    destination = %url,
                    timeout = e.is_timeout(),
                    error = %e,
                    "dispatch failed"
                );
                false
            }
        }
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn confirm(&self, payload: &TransactionPayload) -> bool {
        self.post(&self.confirmation_url, payload).await
    }

    async fn cancel(&self, payload: &TransactionPayload) -> bool {
        self.post(&self.cancellation_url, payload).await
    }
}
