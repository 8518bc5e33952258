//! Application layer containing the core orchestration logic.
//!
//! This module defines the `PaymentGateway`, which composes the ledger,
//! the bank client, and the validator into the payment-processing
//! pipeline: idempotency lookup, validation, bank call, persistence.

pub mod gateway;
