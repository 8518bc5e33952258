//! Adapters implementing the domain ports: the in-memory ledger and the
//! HTTP client for the acquiring bank.

pub mod bank;
pub mod in_memory;
