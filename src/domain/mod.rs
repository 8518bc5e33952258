//! Domain layer: value objects, business validation, and the ports the
//! application layer depends on.

pub mod card;
pub mod payment;
pub mod ports;
pub mod validation;
