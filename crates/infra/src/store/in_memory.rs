//! In-memory entity store with scoped, all-or-nothing transactions.
//!
//! State lives behind one `RwLock`. A transaction clones the committed state,
//! runs the caller's closure against the working copy, and swaps the copy in
//! only when the closure returns `Ok` — any error discards every write.
//! Intended for tests/dev and a single synchronous caller per operation;
//! concurrent callers are serialized by the lock itself.

use std::collections::HashMap;
use std::sync::RwLock;

use storefront_core::{
    ClientId, DomainError, DomainResult, EmployeeId, LineItemId, ProductId, SaleId, SupplierId,
};
use storefront_parties::{Client, Employee, Supplier};
use storefront_products::Product;
use storefront_sales::{Sale, SaleLineItem, total_of};

use super::config::{ProductDeletePolicy, StoreConfig};

#[derive(Debug, Clone, Default)]
struct StoreState {
    employees: HashMap<EmployeeId, Employee>,
    suppliers: HashMap<SupplierId, Supplier>,
    products: HashMap<ProductId, Product>,
    clients: HashMap<ClientId, Client>,
    sales: HashMap<SaleId, Sale>,
    line_items: HashMap<LineItemId, SaleLineItem>,
}

/// In-memory entity store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    config: StoreConfig,
    state: RwLock<StoreState>,
}

/// Read-only view of the committed (or in-transaction working) state.
#[derive(Debug, Clone, Copy)]
pub struct StoreView<'a> {
    state: &'a StoreState,
}

/// Handle on an open transaction's working state.
///
/// Every mutation made through this handle becomes visible only if the
/// enclosing `transaction` closure returns `Ok`.
#[derive(Debug)]
pub struct StoreTxn<'a> {
    state: &'a mut StoreState,
    config: StoreConfig,
}

impl InMemoryStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            state: RwLock::new(StoreState::default()),
        }
    }

    pub fn config(&self) -> StoreConfig {
        self.config
    }

    /// Run `f` inside a scoped all-or-nothing transaction.
    ///
    /// The closure works on a copy of the committed state; the copy replaces
    /// it only on `Ok`. On `Err` nothing the closure did is visible.
    pub fn transaction<T>(
        &self,
        f: impl FnOnce(&mut StoreTxn<'_>) -> DomainResult<T>,
    ) -> DomainResult<T> {
        let mut guard = self
            .state
            .write()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        let mut working = guard.clone();
        let mut txn = StoreTxn {
            state: &mut working,
            config: self.config,
        };
        let out = f(&mut txn)?;
        *guard = working;
        Ok(out)
    }

    /// Run `f` against the committed state, read-only.
    pub fn read<T>(&self, f: impl FnOnce(StoreView<'_>) -> DomainResult<T>) -> DomainResult<T> {
        let guard = self
            .state
            .read()
            .map_err(|_| DomainError::conflict("store lock poisoned"))?;
        f(StoreView { state: &guard })
    }
}

macro_rules! impl_view_access {
    ($get:ident, $list:ident, $field:ident, $id:ty, $entity:ty, $kind:literal) => {
        pub fn $get(&self, id: $id) -> DomainResult<$entity> {
            self.state
                .$field
                .get(&id)
                .cloned()
                .ok_or(DomainError::NotFound($kind))
        }

        /// Lists every record, ordered by id for determinism.
        pub fn $list(&self) -> Vec<$entity> {
            let mut all: Vec<_> = self.state.$field.values().cloned().collect();
            all.sort_by_key(|e| *e.id_typed().as_uuid());
            all
        }
    };
}

impl<'a> StoreView<'a> {
    impl_view_access!(get_employee, list_employees, employees, EmployeeId, Employee, "employee");
    impl_view_access!(get_supplier, list_suppliers, suppliers, SupplierId, Supplier, "supplier");
    impl_view_access!(get_product, list_products, products, ProductId, Product, "product");
    impl_view_access!(get_client, list_clients, clients, ClientId, Client, "client");
    impl_view_access!(get_sale, list_sales, sales, SaleId, Sale, "sale");

    /// A client's sales in creation order (timestamp, then time-ordered id).
    pub fn sales_of_client(&self, client: ClientId) -> Vec<Sale> {
        let mut sales: Vec<_> = self
            .state
            .sales
            .values()
            .filter(|s| s.client() == client)
            .cloned()
            .collect();
        sales.sort_by_key(|s| (s.occurred_at(), s.id_typed()));
        sales
    }

    /// A sale's line items in creation order (line number).
    pub fn line_items_of_sale(&self, sale: SaleId) -> Vec<SaleLineItem> {
        let mut items: Vec<_> = self
            .state
            .line_items
            .values()
            .filter(|i| i.sale() == sale)
            .cloned()
            .collect();
        items.sort_by_key(SaleLineItem::line_no);
        items
    }

    /// Line items referencing a product, across all sales.
    pub fn line_items_for_product(&self, product: ProductId) -> Vec<SaleLineItem> {
        let mut items: Vec<_> = self
            .state
            .line_items
            .values()
            .filter(|i| i.product() == product)
            .cloned()
            .collect();
        items.sort_by_key(|i| *i.id_typed().as_uuid());
        items
    }
}

macro_rules! impl_txn_crud {
    ($get:ident, $insert:ident, $update:ident, $field:ident, $id:ty, $entity:ty, $kind:literal) => {
        pub fn $get(&self, id: $id) -> DomainResult<$entity> {
            self.view().$get(id)
        }

        pub fn $insert(&mut self, record: $entity) -> DomainResult<()> {
            let id = record.id_typed();
            if self.state.$field.contains_key(&id) {
                return Err(DomainError::conflict(concat!($kind, " already exists")));
            }
            self.state.$field.insert(id, record);
            Ok(())
        }

        pub fn $update(&mut self, record: $entity) -> DomainResult<()> {
            let id = record.id_typed();
            if !self.state.$field.contains_key(&id) {
                return Err(DomainError::NotFound($kind));
            }
            self.state.$field.insert(id, record);
            Ok(())
        }
    };
}

impl<'a> StoreTxn<'a> {
    /// Read-only view of the transaction's working state.
    pub fn view(&self) -> StoreView<'_> {
        StoreView { state: self.state }
    }

    impl_txn_crud!(get_employee, insert_employee, update_employee, employees, EmployeeId, Employee, "employee");
    impl_txn_crud!(get_supplier, insert_supplier, update_supplier, suppliers, SupplierId, Supplier, "supplier");
    impl_txn_crud!(get_product, insert_product, update_product, products, ProductId, Product, "product");
    impl_txn_crud!(get_client, insert_client, update_client, clients, ClientId, Client, "client");
    impl_txn_crud!(get_sale, insert_sale, update_sale, sales, SaleId, Sale, "sale");

    pub fn line_items_of_sale(&self, sale: SaleId) -> Vec<SaleLineItem> {
        self.view().line_items_of_sale(sale)
    }

    pub fn insert_line_item(&mut self, item: SaleLineItem) -> DomainResult<()> {
        let id = item.id_typed();
        if self.state.line_items.contains_key(&id) {
            return Err(DomainError::conflict("line item already exists"));
        }
        self.state.line_items.insert(id, item);
        Ok(())
    }

    pub fn delete_line_item(&mut self, id: LineItemId) -> DomainResult<()> {
        self.state
            .line_items
            .remove(&id)
            .map(|_| ())
            .ok_or(DomainError::NotFound("line item"))
    }

    /// Deletes an employee. Rejected while clients or sales still reference
    /// them.
    pub fn delete_employee(&mut self, id: EmployeeId) -> DomainResult<()> {
        if !self.state.employees.contains_key(&id) {
            return Err(DomainError::NotFound("employee"));
        }
        if self.state.clients.values().any(|c| c.assigned_employee() == id) {
            return Err(DomainError::conflict("employee is assigned to clients"));
        }
        if self.state.sales.values().any(|s| s.employee() == id) {
            return Err(DomainError::conflict("employee is referenced by sales"));
        }
        self.state.employees.remove(&id);
        Ok(())
    }

    /// Deletes a supplier. Rejected while products still reference them.
    pub fn delete_supplier(&mut self, id: SupplierId) -> DomainResult<()> {
        if !self.state.suppliers.contains_key(&id) {
            return Err(DomainError::NotFound("supplier"));
        }
        if self.state.products.values().any(|p| p.supplier() == id) {
            return Err(DomainError::conflict("supplier is referenced by products"));
        }
        self.state.suppliers.remove(&id);
        Ok(())
    }

    /// Deletes a client. Rejected while sales still reference them.
    pub fn delete_client(&mut self, id: ClientId) -> DomainResult<()> {
        if !self.state.clients.contains_key(&id) {
            return Err(DomainError::NotFound("client"));
        }
        if self.state.sales.values().any(|s| s.client() == id) {
            return Err(DomainError::conflict("client is referenced by sales"));
        }
        self.state.clients.remove(&id);
        Ok(())
    }

    /// Deletes a product, honoring the configured delete policy for
    /// historical line items that reference it.
    pub fn delete_product(&mut self, id: ProductId) -> DomainResult<()> {
        if !self.state.products.contains_key(&id) {
            return Err(DomainError::NotFound("product"));
        }
        let referencing = self.view().line_items_for_product(id);
        if !referencing.is_empty() {
            match self.config.product_delete_policy {
                ProductDeletePolicy::Restrict => {
                    return Err(DomainError::conflict(
                        "product is referenced by sale line items",
                    ));
                }
                ProductDeletePolicy::Cascade => {
                    tracing::info!(
                        product_id = %id,
                        line_items = referencing.len(),
                        "cascading product deletion to referencing line items"
                    );
                    let mut touched_sales = Vec::new();
                    for item in &referencing {
                        self.state.line_items.remove(&item.id_typed());
                        if !touched_sales.contains(&item.sale()) {
                            touched_sales.push(item.sale());
                        }
                    }
                    // Keep the total invariant intact on every touched sale.
                    for sale_id in touched_sales {
                        let remaining = self.line_items_of_sale(sale_id);
                        let total = total_of(&remaining)?;
                        let mut sale = self.get_sale(sale_id)?;
                        sale.set_total(total);
                        self.update_sale(sale)?;
                    }
                }
            }
        }
        self.state.products.remove(&id);
        Ok(())
    }

    /// Deletes a sale and, through ownership, its line items.
    ///
    /// Stock restoration is the ledger's job; callers go through
    /// `SalesService::delete_sale` rather than calling this directly.
    pub fn delete_sale(&mut self, id: SaleId) -> DomainResult<()> {
        if self.state.sales.remove(&id).is_none() {
            return Err(DomainError::NotFound("sale"));
        }
        self.state.line_items.retain(|_, item| item.sale() != id);
        Ok(())
    }
}

// Single-transaction CRUD conveniences for the hosting layer's plain admin
// screens. Sale mutations are deliberately absent here: they must go through
// `SalesService` so stock stays consistent.
macro_rules! impl_store_crud {
    ($create:ident, $get:ident, $update:ident, $delete:ident, $list:ident, $id:ty, $entity:ty) => {
        pub fn $create(&self, record: $entity) -> DomainResult<()> {
            self.transaction(|txn| txn.$create(record))
        }

        pub fn $get(&self, id: $id) -> DomainResult<$entity> {
            self.read(|view| view.$get(id))
        }

        pub fn $update(&self, record: $entity) -> DomainResult<()> {
            self.transaction(|txn| txn.$update(record))
        }

        pub fn $delete(&self, id: $id) -> DomainResult<()> {
            self.transaction(|txn| txn.$delete(id))
        }

        pub fn $list(&self) -> DomainResult<Vec<$entity>> {
            self.read(|view| Ok(view.$list()))
        }
    };
}

impl InMemoryStore {
    impl_store_crud!(insert_employee, get_employee, update_employee, delete_employee, list_employees, EmployeeId, Employee);
    impl_store_crud!(insert_supplier, get_supplier, update_supplier, delete_supplier, list_suppliers, SupplierId, Supplier);
    impl_store_crud!(insert_product, get_product, update_product, delete_product, list_products, ProductId, Product);
    impl_store_crud!(insert_client, get_client, update_client, delete_client, list_clients, ClientId, Client);

    pub fn get_sale(&self, id: SaleId) -> DomainResult<Sale> {
        self.read(|view| view.get_sale(id))
    }

    pub fn list_sales(&self) -> DomainResult<Vec<Sale>> {
        self.read(|view| Ok(view.list_sales()))
    }

    pub fn line_items_of_sale(&self, sale: SaleId) -> DomainResult<Vec<SaleLineItem>> {
        self.read(|view| Ok(view.line_items_of_sale(sale)))
    }
}
