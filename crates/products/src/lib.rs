//! Products domain module.
//!
//! Business rules for the product catalog and its stock counter, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;

pub use product::{Product, STOCK_CEILING};
