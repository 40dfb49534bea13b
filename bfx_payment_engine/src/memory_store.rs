use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;
use log::*;

use crate::{
    db_types::{Order, OrderId, OrderStatus},
    traits::{OrderStore, OrderStoreError},
};

#[derive(Debug, Default)]
struct OrderRecord {
    order: Option<Order>,
    metadata: HashMap<String, String>,
    cart_emptied: bool,
}

/// An in-process [`OrderStore`].
///
/// The real Order Store is the merchant platform; this one exists so the gateway can run standalone and so the
/// engine and server tests have a store with honest compare-and-swap semantics to race against.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    inner: Arc<RwLock<HashMap<OrderId, OrderRecord>>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order, as if the merchant platform had created it.
    pub fn insert_order(&self, order: Order) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let record = guard.entry(order.order_id.clone()).or_default();
        record.order = Some(order);
    }

    /// Whether `empty_cart` has been called for this order. Test observability hook.
    pub fn cart_emptied(&self, order_id: &OrderId) -> bool {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        guard.get(order_id).map(|r| r.cart_emptied).unwrap_or(false)
    }
}

impl OrderStore for MemoryOrderStore {
    async fn fetch_order(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(order_id).and_then(|r| r.order.clone()))
    }

    async fn update_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Order, OrderStoreError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let order = guard
            .get_mut(order_id)
            .and_then(|r| r.order.as_mut())
            .ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
        order.status = status;
        order.status_note = note.map(|s| s.to_string());
        order.updated_at = Utc::now();
        trace!("🗄️ Order {order_id} status set to {status}");
        Ok(order.clone())
    }

    async fn update_status_if(
        &self,
        order_id: &OrderId,
        expected: OrderStatus,
        status: OrderStatus,
        note: Option<&str>,
    ) -> Result<Option<Order>, OrderStoreError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let order = guard
            .get_mut(order_id)
            .and_then(|r| r.order.as_mut())
            .ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
        if order.status != expected {
            return Ok(None);
        }
        order.status = status;
        order.status_note = note.map(|s| s.to_string());
        order.updated_at = Utc::now();
        trace!("🗄️ Order {order_id} status moved {expected} -> {status}");
        Ok(Some(order.clone()))
    }

    async fn fetch_metadata(&self, order_id: &OrderId, key: &str) -> Result<Option<String>, OrderStoreError> {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        Ok(guard.get(order_id).and_then(|r| r.metadata.get(key).cloned()))
    }

    async fn set_metadata(&self, order_id: &OrderId, key: &str, value: &str) -> Result<(), OrderStoreError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let record = guard.get_mut(order_id).ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
        record.metadata.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn empty_cart(&self, order_id: &OrderId) -> Result<(), OrderStoreError> {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let record = guard.get_mut(order_id).ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
        record.cart_emptied = true;
        Ok(())
    }
}
