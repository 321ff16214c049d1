use serde::{Deserialize, Serialize};

use storefront_core::{
    DomainError, DomainResult, Entity, LineItemId, Money, ProductId, SaleId,
};

/// Caller-supplied specification for one line of a sale: product, quantity,
/// unit price. The price is a snapshot taken at sale time, deliberately
/// independent of later catalog price changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSpec {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl LineItemSpec {
    pub fn new(product_id: ProductId, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity == 0 {
            return Err(DomainError::validation("line item quantity must be positive"));
        }
        if self.unit_price.is_negative() {
            return Err(DomainError::validation("line item unit price cannot be negative"));
        }
        Ok(())
    }
}

/// A persisted line of a sale. Its lifecycle is bound to the owning sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLineItem {
    id: LineItemId,
    sale: SaleId,
    /// 1-based creation order within the sale.
    line_no: u32,
    product: ProductId,
    quantity: u32,
    unit_price: Money,
    subtotal: Money,
}

impl SaleLineItem {
    /// Build a line item from a validated spec, storing the derived subtotal.
    pub fn from_spec(sale: SaleId, line_no: u32, spec: &LineItemSpec) -> DomainResult<Self> {
        spec.validate()?;
        let subtotal = spec.unit_price.mul_quantity(spec.quantity)?;
        Ok(Self {
            id: LineItemId::new(),
            sale,
            line_no,
            product: spec.product_id,
            quantity: spec.quantity,
            unit_price: spec.unit_price,
            subtotal,
        })
    }

    pub fn id_typed(&self) -> LineItemId {
        self.id
    }

    pub fn sale(&self) -> SaleId {
        self.sale
    }

    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    pub fn product(&self) -> ProductId {
        self.product
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }
}

impl Entity for SaleLineItem {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
