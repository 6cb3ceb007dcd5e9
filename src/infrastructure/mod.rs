//! Adapters for the domain ports: the in-memory ledger and the HTTP dispatcher.

pub mod http;
pub mod in_memory;
