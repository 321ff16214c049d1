use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, Entity, Money, ProductId, SupplierId};

/// Upper bound on a product's stock counter.
///
/// Releasing stock (reversing a reservation) has no business-level upper
/// bound, so this only guards the counter against corruption.
pub const STOCK_CEILING: i64 = 1_000_000_000;

/// A catalog product with an on-hand stock counter.
///
/// Invariant: `stock` stays within `0..=STOCK_CEILING` after every
/// successful mutation. `reserve` and `release` are the only stock
/// mutations; both leave the product untouched on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    category: String,
    unit_price: Money,
    supplier: SupplierId,
    description: String,
    stock: i64,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        unit_price: Money,
        supplier: SupplierId,
        description: impl Into<String>,
        initial_stock: i64,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if unit_price.is_negative() {
            return Err(DomainError::validation("product price cannot be negative"));
        }
        if !(0..=STOCK_CEILING).contains(&initial_stock) {
            return Err(DomainError::validation(format!(
                "initial stock must be within 0..={STOCK_CEILING}"
            )));
        }
        Ok(Self {
            id: ProductId::new(),
            name,
            category: category.into(),
            unit_price,
            supplier,
            description: description.into(),
            stock: initial_stock,
        })
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn supplier(&self) -> SupplierId {
        self.supplier
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn set_unit_price(&mut self, unit_price: Money) -> DomainResult<()> {
        if unit_price.is_negative() {
            return Err(DomainError::validation("product price cannot be negative"));
        }
        self.unit_price = unit_price;
        Ok(())
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    /// Decrement stock for a sale. Fails without mutating when the request
    /// exceeds what is on hand.
    pub fn reserve(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("reserve quantity must be positive"));
        }
        let requested = i64::from(quantity);
        if requested > self.stock {
            return Err(DomainError::InsufficientStock {
                requested: quantity,
                available: self.stock,
            });
        }
        self.stock -= requested;
        Ok(())
    }

    /// Increment stock, reversing a prior reservation. Capped at
    /// `STOCK_CEILING` to guard against a corrupted counter.
    pub fn release(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("release quantity must be positive"));
        }
        let restored = self
            .stock
            .checked_add(i64::from(quantity))
            .ok_or_else(|| DomainError::validation("stock counter overflow"))?;
        if restored > STOCK_CEILING {
            return Err(DomainError::validation(format!(
                "stock counter would exceed {STOCK_CEILING}"
            )));
        }
        self.stock = restored;
        Ok(())
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(stock: i64) -> Product {
        Product::new(
            "Rice 1kg",
            "grains",
            Money::from_minor_units(300),
            SupplierId::new(),
            "",
            stock,
        )
        .unwrap()
    }

    #[test]
    fn reserve_decrements_stock() {
        let mut p = test_product(10);
        p.reserve(4).unwrap();
        assert_eq!(p.stock(), 6);
    }

    #[test]
    fn reserve_beyond_stock_fails_without_mutating() {
        let mut p = test_product(6);
        let err = p.reserve(10).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                requested: 10,
                available: 6
            }
        );
        assert_eq!(p.stock(), 6);
    }

    #[test]
    fn reserve_entire_stock_is_allowed() {
        let mut p = test_product(5);
        p.reserve(5).unwrap();
        assert_eq!(p.stock(), 0);
    }

    #[test]
    fn release_reverses_a_reservation() {
        let mut p = test_product(10);
        p.reserve(7).unwrap();
        p.release(7).unwrap();
        assert_eq!(p.stock(), 10);
    }

    #[test]
    fn release_is_capped_at_the_ceiling() {
        let mut p = test_product(STOCK_CEILING);
        let err = p.release(1).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(p.stock(), STOCK_CEILING);
    }

    #[test]
    fn zero_quantities_are_rejected() {
        let mut p = test_product(10);
        assert!(p.reserve(0).is_err());
        assert!(p.release(0).is_err());
        assert_eq!(p.stock(), 10);
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = Product::new(
            "Rice 1kg",
            "grains",
            Money::from_minor_units(-1),
            SupplierId::new(),
            "",
            0,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum StockOp {
            Reserve(u32),
            Release(u32),
        }

        fn stock_op() -> impl Strategy<Value = StockOp> {
            prop_oneof![
                (1u32..500).prop_map(StockOp::Reserve),
                (1u32..500).prop_map(StockOp::Release),
            ]
        }

        proptest! {
            /// Property: stock never leaves `0..=STOCK_CEILING`, whatever
            /// sequence of reserves and releases is attempted.
            #[test]
            fn stock_stays_in_bounds(
                initial in 0i64..1000,
                ops in proptest::collection::vec(stock_op(), 0..64),
            ) {
                let mut p = test_product(initial);
                for op in ops {
                    let _ = match op {
                        StockOp::Reserve(q) => p.reserve(q),
                        StockOp::Release(q) => p.release(q),
                    };
                    prop_assert!((0..=STOCK_CEILING).contains(&p.stock()));
                }
            }

            /// Property: a failed reserve leaves stock exactly as it was.
            #[test]
            fn failed_reserve_never_mutates(initial in 0i64..100, extra in 1u32..100) {
                let mut p = test_product(initial);
                let quantity = initial as u32 + extra;
                prop_assert!(p.reserve(quantity).is_err());
                prop_assert_eq!(p.stock(), initial);
            }
        }
    }
}
