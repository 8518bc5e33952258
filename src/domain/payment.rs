use super::card::{Card, Money};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

static IDEMPOTENCY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\-_]{8,64}$").expect("valid regex"));
static CARD_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{14,19}$").expect("valid regex"));
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("valid regex"));
static CVV_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{3,4}$").expect("valid regex"));

/// Inbound payment request.
///
/// Format rules are enforced at the HTTP boundary via [`Validate`];
/// business rules (expiry, currency support) are re-checked by the
/// [`crate::domain::validation::PaymentValidator`].
#[derive(Clone, Deserialize, Validate)]
pub struct PaymentRequest {
    #[validate(
        required(message = "Idempotency key is required"),
        regex(
            path = "IDEMPOTENCY_KEY_RE",
            message = "Idempotency key must be 8-64 alphanumeric characters, hyphens, or underscores"
        )
    )]
    pub idempotency_key: Option<String>,

    #[validate(regex(path = "CARD_NUMBER_RE", message = "Card number must be 14-19 digits"))]
    pub card_number: String,

    #[validate(range(min = 1, max = 12, message = "Expiry month must be between 1 and 12"))]
    pub expiry_month: u32,

    #[validate(range(min = 2000, message = "Expiry year must be valid"))]
    pub expiry_year: i32,

    #[validate(regex(
        path = "CURRENCY_RE",
        message = "Currency must be a 3-letter ISO code (e.g., USD, GBP, EUR)"
    ))]
    pub currency: String,

    #[validate(range(min = 1, message = "Amount must be greater than 0"))]
    pub amount: i64,

    #[validate(regex(path = "CVV_RE", message = "CVV must be 3 or 4 digits"))]
    pub cvv: String,
}

impl PaymentRequest {
    pub fn card(&self) -> Card {
        Card {
            number: self.card_number.clone(),
            expiry_month: self.expiry_month,
            expiry_year: self.expiry_year,
            cvv: self.cvv.clone(),
        }
    }

    pub fn money(&self) -> Money {
        Money {
            amount: self.amount,
            currency: self.currency.clone(),
        }
    }
}

// Same redaction rules as Card.
impl fmt::Debug for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentRequest")
            .field("idempotency_key", &self.idempotency_key)
            .field("card_number", &format_args!("****{}", self.card().last_four_digits()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("currency", &self.currency)
            .field("amount", &self.amount)
            .field("cvv", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Authorized,
    Declined,
    Rejected,
}

/// The persisted outcome of a processed (non-rejected) payment.
/// Created exactly once per payment and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub status: PaymentStatus,
    pub card_number_last_four: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub currency: String,
    pub amount: i64,
}

/// Explicit outcome of a processing attempt.
///
/// A rejected payment carries only its validation errors and no record;
/// an authorized or declined payment carries only its record. The enum
/// makes any other combination unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    Processed(PaymentRecord),
    Rejected(Vec<String>),
}

impl ProcessingResult {
    pub fn status(&self) -> PaymentStatus {
        match self {
            Self::Processed(record) => record.status,
            Self::Rejected(_) => PaymentStatus::Rejected,
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Processed(record) if record.status == PaymentStatus::Authorized)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}
