//! Infrastructure layer: the entity store, the transactional sale flows, and
//! the read-only client history projection.
//!
//! The hosting web layer calls [`service::SalesService`] and
//! [`history::ClientHistory`] with already-validated primitive inputs; raw
//! request parsing is its concern, not ours.

pub mod history;
pub mod ledger;
pub mod service;
pub mod store;

pub use history::{ClientHistory, PurchaseSummary};
pub use service::SalesService;
pub use store::{InMemoryStore, ProductDeletePolicy, StoreConfig};
