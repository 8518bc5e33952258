use crate::domain::ports::{BankClient, BankRequest, BankResponse};
use crate::error::{BankFailure, GatewayError};
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// HTTP client for the acquiring bank's authorization endpoint.
///
/// Retries transport failures and 5xx responses up to `max_retries` extra
/// attempts with linear backoff; every other response is final. The
/// backoff wait races against `shutdown` so a cancelled process fails
/// in-flight calls instead of sleeping through them.
pub struct AcquiringBankClient {
    http: reqwest::Client,
    endpoint: String,
    max_retries: u32,
    retry_delay: Duration,
    shutdown: CancellationToken,
}

impl AcquiringBankClient {
    pub fn new(
        bank_url: &str,
        max_retries: u32,
        retry_delay: Duration,
        shutdown: CancellationToken,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/payments", bank_url.trim_end_matches('/')),
            max_retries,
            retry_delay,
            shutdown,
        })
    }

    async fn call(&self, request: &BankRequest) -> Result<BankResponse, BankFailure> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(BankFailure::ServerError(status));
        }

        // Anything below 500 is the bank's final word, authorized or not.
        response
            .json::<BankResponse>()
            .await
            .map_err(BankFailure::InvalidResponse)
    }

    /// Waits `retry_delay * retry` before the next attempt. Cancellation
    /// during the wait surfaces immediately as `BankUnavailable`.
    async fn backoff(&self, retry: u32) -> Result<(), GatewayError> {
        info!(
            attempt = retry + 1,
            total = self.max_retries + 1,
            "retrying bank call"
        );
        tokio::select! {
            _ = self.shutdown.cancelled() => Err(GatewayError::BankUnavailable {
                attempts: retry,
                source: BankFailure::Interrupted,
            }),
            _ = tokio::time::sleep(self.retry_delay * retry) => Ok(()),
        }
    }
}

#[async_trait]
impl BankClient for AcquiringBankClient {
    async fn authorize(&self, request: &BankRequest) -> Result<BankResponse, GatewayError> {
        let mut attempts = 0u32;
        loop {
            info!(endpoint = %self.endpoint, "calling bank");
            let failure = match self.call(request).await {
                Ok(response) => {
                    info!(authorized = response.authorized, "bank responded");
                    return Ok(response);
                }
                Err(failure) => failure,
            };

            attempts += 1;
            if !failure.is_retriable() || attempts > self.max_retries {
                error!(attempts, "bank unavailable: {}", failure);
                return Err(GatewayError::BankUnavailable {
                    attempts,
                    source: failure,
                });
            }

            warn!(attempt = attempts, "bank call failed: {}", failure);
            self.backoff(attempts).await?;
        }
    }
}
