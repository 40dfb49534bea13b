use thiserror::Error;

use crate::db_types::{Order, OrderId, OrderStatus};

/// The merchant platform's order storage, as seen by the gateway.
///
/// This is an external collaborator: the gateway reads order records, writes the status field and one metadata entry
/// (the remote invoice id), and asks the platform to clear the customer's cart after a successful checkout. Nothing
/// else about order storage is this crate's business.
#[allow(async_fn_in_trait)]
pub trait OrderStore {
    /// Fetch an order by id. `Ok(None)` when the platform has no such order.
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Unconditionally set the order status, with an optional human-readable note.
    ///
    /// Only the checkout workflow may use this (the order is not yet visible to reconciliation at that point).
    /// Reconciliation goes through [`OrderStore::update_status_if`] instead.
    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Order, OrderStoreError>;

    /// Compare-and-swap status update: applies the transition only if the order's current status is `expected`.
    ///
    /// Returns the updated order when the transition was applied, or `Ok(None)` when the precondition failed —
    /// which is how a concurrent webhook/sweep race resolves to exactly one winner.
    async fn update_status_if(
        &self,
        order_id: &OrderId,
        expected: OrderStatus,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Option<Order>, OrderStoreError>;

    /// Read a metadata entry for the order.
    async fn fetch_metadata(&self, order_id: &OrderId, key: &str) -> Result<Option<String>, OrderStoreError>;

    /// Write a metadata entry for the order.
    async fn set_metadata(&self, order_id: &OrderId, key: &str, value: &str) -> Result<(), OrderStoreError>;

    /// Clear the cart/session state the platform associates with the order's customer.
    async fn empty_cart(&self, order_id: &OrderId) -> Result<(), OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order store failure: {0}")]
    StorageError(String),
}
