use reqwest::StatusCode;
use thiserror::Error;
use uuid::Uuid;

/// Infrastructure failures raised by the gateway.
///
/// Business outcomes (rejected, declined) are modeled as data in
/// [`crate::domain::payment::ProcessingResult`] so callers cannot ignore
/// them by catching an error. Only conditions the gateway cannot resolve
/// locally are raised.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("bank did not respond after {attempts} attempts")]
    BankUnavailable {
        attempts: u32,
        #[source]
        source: BankFailure,
    },
    #[error("payment not found: {0}")]
    PaymentNotFound(Uuid),
}

/// The underlying reason a bank call did not produce a usable response.
#[derive(Error, Debug)]
pub enum BankFailure {
    #[error("connection failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("bank returned server error {0}")]
    ServerError(StatusCode),
    #[error("unreadable bank response: {0}")]
    InvalidResponse(reqwest::Error),
    #[error("interrupted while waiting to retry")]
    Interrupted,
}

impl BankFailure {
    /// Only connectivity failures and bank-side 5xx responses are retried.
    /// Anything else is final on the first occurrence.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ServerError(_))
    }
}
