use super::card::{Card, Money};
use super::payment::PaymentRecord;
use crate::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload sent to the acquiring bank. The bank expects the expiry as
/// a single "MM/YYYY" string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankRequest {
    pub card_number: String,
    pub expiry_date: String,
    pub currency: String,
    pub amount: i64,
    pub cvv: String,
}

impl BankRequest {
    pub fn new(card: &Card, money: &Money) -> Self {
        Self {
            card_number: card.number.clone(),
            expiry_date: format!("{:02}/{}", card.expiry_month, card.expiry_year),
            currency: money.currency.clone(),
            amount: money.amount,
            cvv: card.cvv.clone(),
        }
    }
}

/// The bank's decision on an authorization request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankResponse {
    pub authorized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
}

/// The only port that performs network I/O. Failures surface as
/// [`GatewayError::BankUnavailable`], never as a business outcome.
#[async_trait]
pub trait BankClient: Send + Sync {
    async fn authorize(&self, request: &BankRequest) -> Result<BankResponse, GatewayError>;
}

/// Volatile payment ledger. Implementations synchronize internally;
/// callers never hold a lock across a lookup-then-store sequence.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Atomically stores the record under its id and indexes the id under
    /// the idempotency key, as one indivisible operation. A blank or
    /// absent key leaves the record unstored.
    async fn store_if_keyed(&self, record: PaymentRecord, idempotency_key: Option<&str>);

    async fn get(&self, id: Uuid) -> Option<PaymentRecord>;

    /// A blank or absent key yields `None` without consulting the index.
    async fn get_by_idempotency_key(&self, key: Option<&str>) -> Option<PaymentRecord>;

    /// Clears all stored state. Test isolation only.
    async fn reset(&self);
}
