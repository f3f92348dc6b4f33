//! High-level components of the adapter protocol: link configuration,
//! frame transport, and the async link service.
pub mod config;
pub mod link;
pub mod transport;
