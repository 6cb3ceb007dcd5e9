//! Domain layer: payload types, the validation rule chain and the ports the
//! application layer depends on.

pub mod amount;
pub mod ports;
pub mod transaction;
pub mod validation;
