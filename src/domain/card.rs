use chrono::{Datelike, Utc};
use std::collections::BTreeSet;
use std::fmt;

/// Currency codes accepted when no explicit set is configured.
pub const DEFAULT_SUPPORTED_CURRENCIES: [&str; 3] = ["USD", "GBP", "EUR"];

pub fn default_supported_currencies() -> BTreeSet<String> {
    DEFAULT_SUPPORTED_CURRENCIES
        .iter()
        .map(|c| c.to_string())
        .collect()
}

/// A payment card as submitted by the caller.
///
/// Pure value object; expiry arithmetic takes an explicit year/month so
/// tests never depend on the wall clock.
#[derive(Clone, PartialEq, Eq)]
pub struct Card {
    pub number: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
}

impl Card {
    pub fn last_four_digits(&self) -> String {
        let cut = self.number.len().saturating_sub(4);
        self.number[cut..].to_string()
    }

    /// A card is unusable during and after its printed expiry month.
    pub fn is_expired_at(&self, year: i32, month: u32) -> bool {
        (self.expiry_year, self.expiry_month) <= (year, month)
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now();
        self.is_expired_at(now.year(), now.month())
    }
}

// Card number and CVV must never reach the logs.
impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Card")
            .field("number", &format_args!("****{}", self.last_four_digits()))
            .field("expiry_month", &self.expiry_month)
            .field("expiry_year", &self.expiry_year)
            .field("cvv", &"***")
            .finish()
    }
}

/// An amount in minor currency units together with its ISO 4217 code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Money {
    pub amount: i64,
    pub currency: String,
}

impl Money {
    /// Matches the currency case-insensitively against the supported set.
    pub fn is_currency_supported(&self, supported: &BTreeSet<String>) -> bool {
        supported.contains(&self.currency.to_uppercase())
    }

    pub fn is_valid(&self, supported: &BTreeSet<String>) -> bool {
        self.amount > 0 && self.is_currency_supported(supported)
    }
}
