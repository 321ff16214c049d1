use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{ClientId, DomainError, DomainResult, EmployeeId, Entity};

use crate::contact::ContactInfo;

/// A client served by an assigned employee.
///
/// Purchase history (products bought, last product, summary label) is derived
/// in the infra layer from the client's sales; nothing here duplicates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    id: ClientId,
    name: String,
    contact: ContactInfo,
    assigned_employee: EmployeeId,
    /// Set once at creation; never changes afterwards.
    first_purchase: NaiveDate,
}

impl Client {
    pub fn new(
        name: impl Into<String>,
        contact: ContactInfo,
        assigned_employee: EmployeeId,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("client name cannot be empty"));
        }
        Ok(Self {
            id: ClientId::new(),
            name,
            contact,
            assigned_employee,
            first_purchase: Utc::now().date_naive(),
        })
    }

    pub fn id_typed(&self) -> ClientId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    pub fn assigned_employee(&self) -> EmployeeId {
        self.assigned_employee
    }

    pub fn first_purchase(&self) -> NaiveDate {
        self.first_purchase
    }

    pub fn set_contact(&mut self, contact: ContactInfo) {
        self.contact = contact;
    }

    pub fn assign_employee(&mut self, employee: EmployeeId) {
        self.assigned_employee = employee;
    }
}

impl Entity for Client {
    type Id = ClientId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
