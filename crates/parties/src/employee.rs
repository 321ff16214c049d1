use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, EmployeeId, Entity, Money};

/// An employee: reference data with no derived invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    first_name: String,
    last_name: String,
    position: String,
    salary: Money,
    hired_on: NaiveDate,
}

impl Employee {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        position: impl Into<String>,
        salary: Money,
        hired_on: NaiveDate,
    ) -> DomainResult<Self> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        if first_name.trim().is_empty() {
            return Err(DomainError::validation("employee first name cannot be empty"));
        }
        if last_name.trim().is_empty() {
            return Err(DomainError::validation("employee last name cannot be empty"));
        }
        if salary.is_negative() {
            return Err(DomainError::validation("employee salary cannot be negative"));
        }
        Ok(Self {
            id: EmployeeId::new(),
            first_name,
            last_name,
            position: position.into(),
            salary,
            hired_on,
        })
    }

    pub fn id_typed(&self) -> EmployeeId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn salary(&self) -> Money {
        self.salary
    }

    pub fn hired_on(&self) -> NaiveDate {
        self.hired_on
    }

    pub fn set_position(&mut self, position: impl Into<String>) {
        self.position = position.into();
    }

    pub fn set_salary(&mut self, salary: Money) -> DomainResult<()> {
        if salary.is_negative() {
            return Err(DomainError::validation("employee salary cannot be negative"));
        }
        self.salary = salary;
        Ok(())
    }
}

impl Entity for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
