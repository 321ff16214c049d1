//! Client history projection: read-only derivations over a client's sales.
//!
//! Nothing here mutates the store. Ordering is sale creation order
//! (timestamp, then time-ordered id), then line number within each sale.

use std::sync::Arc;

use storefront_core::{ClientId, DomainResult, Money};
use storefront_products::Product;

use crate::store::{InMemoryStore, StoreView};

/// Fixed label used when a client has never bought anything.
pub const NO_PURCHASES_LABEL: &str = "no purchases";

/// Aggregated purchase history for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseSummary {
    /// One entry per line item, in purchase order; duplicates allowed.
    pub products: Vec<Product>,
    /// Product of the first line item of the most recent sale.
    pub last_product: Option<Product>,
    /// Sum of the client's sale totals.
    pub total_spent: Money,
    pub sale_count: usize,
}

/// Read-only client history queries over a shared store handle.
#[derive(Debug, Clone)]
pub struct ClientHistory {
    store: Arc<InMemoryStore>,
}

impl ClientHistory {
    pub fn new(store: Arc<InMemoryStore>) -> Self {
        Self { store }
    }

    /// Products the client has bought, one entry per line item, in purchase
    /// order. Duplicates are expected when the same product was bought more
    /// than once.
    pub fn purchased_products(&self, client: ClientId) -> DomainResult<Vec<Product>> {
        self.store.read(|view| {
            view.get_client(client)?;
            collect_products(view, client)
        })
    }

    /// Product of the first line item of the client's most recently created
    /// sale, or `None` when the client has no sales.
    pub fn last_purchased_product(&self, client: ClientId) -> DomainResult<Option<Product>> {
        self.store.read(|view| {
            view.get_client(client)?;
            last_product(view, client)
        })
    }

    /// Human-readable product-name listing: the first `max_items` entries
    /// joined with ", ", plus "and N more" when entries remain, or a fixed
    /// label when the client has no purchases.
    pub fn summary_label(&self, client: ClientId, max_items: usize) -> DomainResult<String> {
        let products = self.purchased_products(client)?;
        if products.is_empty() {
            return Ok(NO_PURCHASES_LABEL.to_string());
        }
        let names: Vec<&str> = products.iter().take(max_items).map(Product::name).collect();
        let mut label = names.join(", ");
        let remaining = products.len().saturating_sub(max_items);
        if remaining > 0 {
            label.push_str(&format!(" and {remaining} more"));
        }
        Ok(label)
    }

    /// Everything the client-detail screen needs in one read.
    pub fn purchase_summary(&self, client: ClientId) -> DomainResult<PurchaseSummary> {
        self.store.read(|view| {
            view.get_client(client)?;
            let sales = view.sales_of_client(client);
            let mut total_spent = Money::ZERO;
            for sale in &sales {
                total_spent = total_spent.add(sale.total())?;
            }
            Ok(PurchaseSummary {
                products: collect_products(view, client)?,
                last_product: last_product(view, client)?,
                total_spent,
                sale_count: sales.len(),
            })
        })
    }
}

fn collect_products(view: StoreView<'_>, client: ClientId) -> DomainResult<Vec<Product>> {
    let mut products = Vec::new();
    for sale in view.sales_of_client(client) {
        for item in view.line_items_of_sale(sale.id_typed()) {
            products.push(view.get_product(item.product())?);
        }
    }
    Ok(products)
}

fn last_product(view: StoreView<'_>, client: ClientId) -> DomainResult<Option<Product>> {
    let last_sale = match view.sales_of_client(client).into_iter().next_back() {
        Some(sale) => sale,
        None => return Ok(None),
    };
    match view.line_items_of_sale(last_sale.id_typed()).first() {
        Some(item) => Ok(Some(view.get_product(item.product())?)),
        None => Ok(None),
    }
}
