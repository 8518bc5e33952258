use super::card::default_supported_currencies;
use super::payment::PaymentRequest;
use std::collections::BTreeSet;

/// Business-rule validation, applied after boundary format validation.
///
/// The supported-currency set is fixed at construction and immutable for
/// the lifetime of the process.
pub struct PaymentValidator {
    supported_currencies: BTreeSet<String>,
}

impl Default for PaymentValidator {
    fn default() -> Self {
        Self {
            supported_currencies: default_supported_currencies(),
        }
    }
}

impl PaymentValidator {
    pub fn new(supported_currencies: impl IntoIterator<Item = String>) -> Self {
        Self {
            supported_currencies: supported_currencies
                .into_iter()
                .map(|c| c.to_uppercase())
                .collect(),
        }
    }

    /// Returns one message per failed rule: expiry first, currency second.
    /// Both rules are always evaluated, so a request can accumulate
    /// multiple errors. An empty list means the request may be forwarded
    /// to the bank.
    pub fn validate(&self, request: &PaymentRequest) -> Vec<String> {
        let card = request.card();
        let money = request.money();
        let mut errors = Vec::new();

        if card.is_expired() {
            errors.push("Card has expired".to_string());
        }

        if !money.is_currency_supported(&self.supported_currencies) {
            errors.push(format!(
                "Currency '{}' is not supported. Allowed: {:?}",
                request.currency, self.supported_currencies
            ));
        }

        errors
    }
}
