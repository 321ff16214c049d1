//! Parties domain module: the people side of the business.
//!
//! Employees, suppliers, and clients are plain reference data; the derived
//! client views (purchase history) live in the infra layer, which has access
//! to sales.

pub mod client;
pub mod contact;
pub mod employee;
pub mod supplier;

pub use client::Client;
pub use contact::ContactInfo;
pub use employee::Employee;
pub use supplier::Supplier;
