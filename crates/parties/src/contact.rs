use serde::{Deserialize, Serialize};

use storefront_core::ValueObject;

/// Contact information for a party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ValueObject for ContactInfo {}
