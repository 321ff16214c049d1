use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, SupplierId};

use crate::contact::ContactInfo;

/// A supplier: reference data with no derived invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    id: SupplierId,
    company: String,
    contact_person: String,
    contact: ContactInfo,
    category: String,
    /// Free-text description of the goods this supplier provides.
    supplied_goods: String,
}

impl Supplier {
    pub fn new(
        company: impl Into<String>,
        contact_person: impl Into<String>,
        contact: ContactInfo,
        category: impl Into<String>,
        supplied_goods: impl Into<String>,
    ) -> DomainResult<Self> {
        let company = company.into();
        if company.trim().is_empty() {
            return Err(DomainError::validation("supplier company cannot be empty"));
        }
        Ok(Self {
            id: SupplierId::new(),
            company,
            contact_person: contact_person.into(),
            contact,
            category: category.into(),
            supplied_goods: supplied_goods.into(),
        })
    }

    pub fn id_typed(&self) -> SupplierId {
        self.id
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn contact_person(&self) -> &str {
        &self.contact_person
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn supplied_goods(&self) -> &str {
        &self.supplied_goods
    }

    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }
}

impl Entity for Supplier {
    type Id = SupplierId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
