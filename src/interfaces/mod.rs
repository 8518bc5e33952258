//! Transport adapters around the core pipeline.

pub mod http;
