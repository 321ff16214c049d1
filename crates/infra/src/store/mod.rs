//! The entity store: persistent records plus scoped transactions.

pub mod config;
pub mod in_memory;

pub use config::{ProductDeletePolicy, StoreConfig};
pub use in_memory::{InMemoryStore, StoreTxn, StoreView};
