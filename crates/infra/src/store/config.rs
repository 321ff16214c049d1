//! Store configuration.

use serde::{Deserialize, Serialize};

/// What to do when deleting a product that historical line items reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductDeletePolicy {
    /// Reject the deletion with a conflict error.
    #[default]
    Restrict,
    /// Delete the referencing line items and recompute the affected sales'
    /// totals so the total invariant keeps holding.
    Cascade,
}

/// Store-level configuration, loadable by the hosting layer from its own
/// config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub product_delete_policy: ProductDeletePolicy,
}
