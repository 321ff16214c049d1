//! Sales domain module.
//!
//! A `Sale` owns its `SaleLineItem`s; the stored total is derived from their
//! subtotals. The transactional choreography that keeps stock consistent
//! with line items lives in the infra layer.

pub mod line_item;
pub mod sale;

pub use line_item::{LineItemSpec, SaleLineItem};
pub use sale::{Sale, total_of};
