use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{ClientId, DomainResult, EmployeeId, Entity, Money, SaleId};

use crate::line_item::SaleLineItem;

/// A sale made to a client by an employee.
///
/// `occurred_at` is set at creation and never changes. `total` is derived
/// from the sale's line items; only the aggregation step writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    id: SaleId,
    occurred_at: DateTime<Utc>,
    total: Money,
    client: ClientId,
    employee: EmployeeId,
}

impl Sale {
    /// Open a sale with a provisional total of zero. Line items and the real
    /// total are attached by the transactional sale flow.
    pub fn open(client: ClientId, employee: EmployeeId) -> Self {
        Self {
            id: SaleId::new(),
            occurred_at: Utc::now(),
            total: Money::ZERO,
            client,
            employee,
        }
    }

    pub fn id_typed(&self) -> SaleId {
        self.id
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn client(&self) -> ClientId {
        self.client
    }

    pub fn employee(&self) -> EmployeeId {
        self.employee
    }

    /// Write the derived total. Callers must pass a value computed from the
    /// sale's currently persisted line items (see `total_of`).
    pub fn set_total(&mut self, total: Money) {
        self.total = total;
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Sum of stored line-item subtotals, with checked arithmetic.
pub fn total_of<'a>(items: impl IntoIterator<Item = &'a SaleLineItem>) -> DomainResult<Money> {
    let mut total = Money::ZERO;
    for item in items {
        total = total.add(item.subtotal())?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItemSpec;
    use storefront_core::ProductId;

    #[test]
    fn open_sale_starts_with_zero_total() {
        let sale = Sale::open(ClientId::new(), EmployeeId::new());
        assert_eq!(sale.total(), Money::ZERO);
    }

    #[test]
    fn total_of_sums_subtotals() {
        let sale_id = SaleId::new();
        let items = [
            SaleLineItem::from_spec(
                sale_id,
                1,
                &LineItemSpec::new(ProductId::new(), 2, Money::from_minor_units(300)),
            )
            .unwrap(),
            SaleLineItem::from_spec(
                sale_id,
                2,
                &LineItemSpec::new(ProductId::new(), 5, Money::from_minor_units(120)),
            )
            .unwrap(),
        ];
        assert_eq!(total_of(&items).unwrap(), Money::from_minor_units(1200));
    }

    #[test]
    fn total_of_nothing_is_zero() {
        assert_eq!(total_of([]).unwrap(), Money::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn line_items(specs: &[(u32, i64)]) -> Vec<SaleLineItem> {
            let sale_id = SaleId::new();
            specs
                .iter()
                .enumerate()
                .map(|(idx, (quantity, price_minor))| {
                    SaleLineItem::from_spec(
                        sale_id,
                        idx as u32 + 1,
                        &LineItemSpec::new(
                            ProductId::new(),
                            *quantity,
                            Money::from_minor_units(*price_minor),
                        ),
                    )
                    .unwrap()
                })
                .collect()
        }

        proptest! {
            /// Property: the stored total matches an exact wide-integer sum
            /// for arbitrary item vectors.
            #[test]
            fn total_of_matches_exact_sum(
                specs in proptest::collection::vec((1u32..1000, 0i64..100_000), 0..32),
            ) {
                let items = line_items(&specs);
                let expected: i128 = specs
                    .iter()
                    .map(|(quantity, price_minor)| i128::from(*quantity) * i128::from(*price_minor))
                    .sum();
                let total = total_of(&items).unwrap();
                prop_assert_eq!(i128::from(total.minor_units()), expected);
            }

            /// Property: summation never overflows silently; near the `i64`
            /// ceiling it surfaces a validation error instead of wrapping.
            #[test]
            fn total_of_overflow_is_an_error_not_a_wrap(extra in 1i64..100_000) {
                let items = line_items(&[(1, i64::MAX - extra), (1, extra), (1, extra)]);
                prop_assert!(total_of(&items).is_err());
            }
        }
    }
}
