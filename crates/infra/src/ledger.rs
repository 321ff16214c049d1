//! Stock ledger operations.
//!
//! These keep `Product` stock consistent with the set of line items that
//! reference it. Every function works on an open store transaction; a
//! returned error aborts that transaction, so a partial failure never leaves
//! stock drift or orphaned line items behind.

use storefront_core::{DomainError, DomainResult, ProductId, SaleId};
use storefront_products::Product;
use storefront_sales::{LineItemSpec, SaleLineItem};

use crate::store::StoreTxn;

/// Decrement a product's stock for a sale and persist the new value.
///
/// Fails with `InsufficientStock` without touching the product when the
/// request exceeds what is on hand.
pub fn reserve(
    txn: &mut StoreTxn<'_>,
    product_id: ProductId,
    quantity: u32,
) -> DomainResult<Product> {
    let mut product = txn.get_product(product_id)?;
    product.reserve(quantity)?;
    txn.update_product(product.clone())?;
    Ok(product)
}

/// Increment a product's stock, reversing a prior reservation, and persist
/// the new value.
pub fn release(
    txn: &mut StoreTxn<'_>,
    product_id: ProductId,
    quantity: u32,
) -> DomainResult<Product> {
    let mut product = txn.get_product(product_id)?;
    product.release(quantity)?;
    txn.update_product(product.clone())?;
    Ok(product)
}

/// Swap a sale's line items for `new_items`, keeping stock consistent.
///
/// Releases and deletes every currently persisted line item of the sale,
/// then reserves and inserts one fresh line item per spec, numbering them in
/// order. Runs inside the caller's transaction, so a failure on any entry
/// rolls the whole swap back.
pub fn replace_line_items(
    txn: &mut StoreTxn<'_>,
    sale_id: SaleId,
    new_items: &[LineItemSpec],
) -> DomainResult<Vec<SaleLineItem>> {
    txn.get_sale(sale_id)?;
    if new_items.is_empty() {
        return Err(DomainError::EmptySale);
    }

    // Restore prior stock before the old items disappear.
    for item in txn.line_items_of_sale(sale_id) {
        release(txn, item.product(), item.quantity())?;
        txn.delete_line_item(item.id_typed())?;
    }

    let mut created = Vec::with_capacity(new_items.len());
    for (idx, spec) in new_items.iter().enumerate() {
        spec.validate()?;
        reserve(txn, spec.product_id, spec.quantity)?;
        let item = SaleLineItem::from_spec(sale_id, idx as u32 + 1, spec)?;
        txn.insert_line_item(item.clone())?;
        created.push(item);
    }
    Ok(created)
}
