//! Sale aggregation: the caller-facing transactional sale flows.
//!
//! Each operation runs as one scoped store transaction; on any error the
//! store is left exactly as it was. Total recomputation is an explicit final
//! step here, invoked exactly once per logical mutation, never a hidden side
//! effect of saving a line item.

use std::sync::Arc;

use storefront_core::{ClientId, DomainResult, EmployeeId, SaleId};
use storefront_sales::{LineItemSpec, Sale, total_of};

use crate::ledger;
use crate::store::{InMemoryStore, StoreTxn};

/// Caller-facing surface for creating, editing, and deleting sales.
#[derive(Debug, Clone)]
pub struct SalesService {
    store: Arc<InMemoryStore>,
}

impl SalesService {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &InMemoryStore {
        &self.store
    }

    /// Create a sale for `client` handled by `employee` with the given line
    /// items. If line-item processing fails, the sale row does not persist.
    pub fn create_sale(
        &self,
        client: ClientId,
        employee: EmployeeId,
        specs: &[LineItemSpec],
    ) -> DomainResult<Sale> {
        let sale = self
            .store
            .transaction(|txn| {
                txn.get_client(client)?;
                txn.get_employee(employee)?;
                let sale = Sale::open(client, employee);
                txn.insert_sale(sale.clone())?;
                ledger::replace_line_items(txn, sale.id_typed(), specs)?;
                Self::recompute_total(txn, sale.id_typed())
            })
            .inspect_err(|err| {
                tracing::warn!(client_id = %client, error = %err, "sale creation rolled back");
            })?;
        tracing::info!(
            sale_id = %sale.id_typed(),
            client_id = %client,
            total = %sale.total(),
            lines = specs.len(),
            "sale created"
        );
        Ok(sale)
    }

    /// Replace a sale's line items, restoring the old items' stock and
    /// reserving the new, then recompute the total.
    pub fn edit_sale(&self, sale_id: SaleId, specs: &[LineItemSpec]) -> DomainResult<Sale> {
        let sale = self
            .store
            .transaction(|txn| {
                ledger::replace_line_items(txn, sale_id, specs)?;
                Self::recompute_total(txn, sale_id)
            })
            .inspect_err(|err| {
                tracing::warn!(sale_id = %sale_id, error = %err, "sale edit rolled back");
            })?;
        tracing::info!(
            sale_id = %sale_id,
            total = %sale.total(),
            lines = specs.len(),
            "sale edited"
        );
        Ok(sale)
    }

    /// Delete a sale, restoring every line item's quantity to stock. The
    /// sale's line items go with it.
    pub fn delete_sale(&self, sale_id: SaleId) -> DomainResult<()> {
        self.store
            .transaction(|txn| {
                txn.get_sale(sale_id)?;
                for item in txn.line_items_of_sale(sale_id) {
                    ledger::release(txn, item.product(), item.quantity())?;
                }
                txn.delete_sale(sale_id)
            })
            .inspect_err(|err| {
                tracing::warn!(sale_id = %sale_id, error = %err, "sale deletion failed");
            })?;
        tracing::info!(sale_id = %sale_id, "sale deleted");
        Ok(())
    }

    /// Sum the sale's persisted line-item subtotals and store the result as
    /// the sale's total. Final step of every line-item mutation.
    fn recompute_total(txn: &mut StoreTxn<'_>, sale_id: SaleId) -> DomainResult<Sale> {
        let items = txn.line_items_of_sale(sale_id);
        let total = total_of(&items)?;
        let mut sale = txn.get_sale(sale_id)?;
        sale.set_total(total);
        txn.update_sale(sale.clone())?;
        Ok(sale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use chrono::NaiveDate;
    use storefront_core::{DomainError, Money, ProductId};
    use storefront_parties::{Client, ContactInfo, Employee, Supplier};
    use storefront_products::Product;

    struct World {
        service: SalesService,
        client: ClientId,
        employee: EmployeeId,
    }

    fn world() -> World {
        let store = Arc::new(InMemoryStore::new(StoreConfig::default()));
        let employee = Employee::new(
            "Ana",
            "Reyes",
            "cashier",
            Money::from_minor_units(120_000),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
        .unwrap();
        let employee_id = employee.id_typed();
        store.insert_employee(employee).unwrap();
        let client = Client::new("Marta", ContactInfo::default(), employee_id).unwrap();
        let client_id = client.id_typed();
        store.insert_client(client).unwrap();
        World {
            service: SalesService::new(store),
            client: client_id,
            employee: employee_id,
        }
    }

    fn add_product(w: &World, name: &str, price_minor: i64, stock: i64) -> ProductId {
        let supplier = Supplier::new(
            format!("{name} supplier"),
            "Eva",
            ContactInfo::default(),
            "general",
            "",
        )
        .unwrap();
        let supplier_id = supplier.id_typed();
        w.service.store().insert_supplier(supplier).unwrap();
        let product = Product::new(
            name,
            "general",
            Money::from_minor_units(price_minor),
            supplier_id,
            "",
            stock,
        )
        .unwrap();
        let id = product.id_typed();
        w.service.store().insert_product(product).unwrap();
        id
    }

    #[test]
    fn create_sale_reserves_stock_and_stores_the_total() {
        let w = world();
        let p = add_product(&w, "Rice 1kg", 300, 10);

        let sale = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(p, 4, Money::from_minor_units(300))],
            )
            .unwrap();

        assert_eq!(sale.total(), Money::from_minor_units(1200));
        assert_eq!(w.service.store().get_product(p).unwrap().stock(), 6);

        // A second sale asking for more than remains fails and leaves stock
        // untouched.
        let err = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(p, 10, Money::from_minor_units(300))],
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(w.service.store().get_product(p).unwrap().stock(), 6);
    }

    #[test]
    fn failed_create_does_not_persist_the_sale_row() {
        let w = world();
        let p = add_product(&w, "Rice 1kg", 300, 2);

        let before = w.service.store().list_sales().unwrap().len();
        let err = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(p, 5, Money::from_minor_units(300))],
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));
        assert_eq!(w.service.store().list_sales().unwrap().len(), before);
    }

    #[test]
    fn create_sale_with_unknown_client_is_not_found() {
        let w = world();
        let p = add_product(&w, "Rice 1kg", 300, 10);
        let err = w
            .service
            .create_sale(
                ClientId::new(),
                w.employee,
                &[LineItemSpec::new(p, 1, Money::from_minor_units(300))],
            )
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound("client"));
    }

    #[test]
    fn create_sale_with_no_items_is_rejected() {
        let w = world();
        let err = w.service.create_sale(w.client, w.employee, &[]).unwrap_err();
        assert_eq!(err, DomainError::EmptySale);
    }

    #[test]
    fn edit_sale_keeps_total_equal_to_sum_of_subtotals() {
        let w = world();
        let a = add_product(&w, "Rice 1kg", 300, 10);
        let b = add_product(&w, "Milk 1L", 250, 10);

        let sale = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(a, 2, Money::from_minor_units(300))],
            )
            .unwrap();

        let edited = w
            .service
            .edit_sale(
                sale.id_typed(),
                &[
                    LineItemSpec::new(a, 1, Money::from_minor_units(300)),
                    LineItemSpec::new(b, 5, Money::from_minor_units(250)),
                ],
            )
            .unwrap();

        assert_eq!(edited.total(), Money::from_minor_units(300 + 5 * 250));
        let items = w.service.store().line_items_of_sale(sale.id_typed()).unwrap();
        let sum = total_of(&items).unwrap();
        assert_eq!(edited.total(), sum);
        assert_eq!(w.service.store().get_product(a).unwrap().stock(), 9);
        assert_eq!(w.service.store().get_product(b).unwrap().stock(), 5);
    }

    #[test]
    fn failed_edit_leaves_everything_as_it_was() {
        let w = world();
        let a = add_product(&w, "Rice 1kg", 300, 10);
        let sale = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(a, 4, Money::from_minor_units(300))],
            )
            .unwrap();

        let err = w
            .service
            .edit_sale(
                sale.id_typed(),
                &[LineItemSpec::new(a, 100, Money::from_minor_units(300))],
            )
            .unwrap_err();
        assert!(matches!(err, DomainError::InsufficientStock { .. }));

        assert_eq!(w.service.store().get_product(a).unwrap().stock(), 6);
        let kept = w.service.store().get_sale(sale.id_typed()).unwrap();
        assert_eq!(kept.total(), Money::from_minor_units(1200));
        let items = w.service.store().line_items_of_sale(sale.id_typed()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 4);
    }

    #[test]
    fn delete_sale_restores_stock_and_removes_line_items() {
        let w = world();
        let a = add_product(&w, "Rice 1kg", 300, 10);
        let b = add_product(&w, "Milk 1L", 250, 10);

        let sale = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[
                    LineItemSpec::new(a, 2, Money::from_minor_units(300)),
                    LineItemSpec::new(b, 5, Money::from_minor_units(250)),
                ],
            )
            .unwrap();
        assert_eq!(w.service.store().get_product(a).unwrap().stock(), 8);
        assert_eq!(w.service.store().get_product(b).unwrap().stock(), 5);

        w.service.delete_sale(sale.id_typed()).unwrap();

        assert_eq!(w.service.store().get_product(a).unwrap().stock(), 10);
        assert_eq!(w.service.store().get_product(b).unwrap().stock(), 10);
        assert!(w.service.store().get_sale(sale.id_typed()).is_err());
        assert!(w.service.store().line_items_of_sale(sale.id_typed()).unwrap().is_empty());
    }

    #[test]
    fn deleting_a_missing_sale_is_not_found() {
        let w = world();
        let err = w.service.delete_sale(SaleId::new()).unwrap_err();
        assert_eq!(err, DomainError::NotFound("sale"));
    }

    #[test]
    fn timestamp_is_immutable_across_edits() {
        let w = world();
        let a = add_product(&w, "Rice 1kg", 300, 10);
        let sale = w
            .service
            .create_sale(
                w.client,
                w.employee,
                &[LineItemSpec::new(a, 1, Money::from_minor_units(300))],
            )
            .unwrap();
        let edited = w
            .service
            .edit_sale(
                sale.id_typed(),
                &[LineItemSpec::new(a, 2, Money::from_minor_units(300))],
            )
            .unwrap();
        assert_eq!(edited.occurred_at(), sale.occurred_at());
    }
}
