// Adapters layer: concrete implementations of the domain ports.

pub mod clock;
pub mod converter;
pub mod http_client;
pub mod identity;
pub mod memory_store;
pub mod storage;
