use std::fmt::Debug;

use bpg_common::InvoiceStatus;
use log::*;
use thiserror::Error;

use crate::{
    db_types::{OrderId, OrderStatus},
    traits::{NotificationSink, OrderStore, OrderStoreError},
};

/// What the applier did with an observed invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The order moved from on-hold to completed and fulfillment was triggered.
    Fulfilled,
    /// The order moved from on-hold to failed.
    Failed,
    /// A recognised signal that requires no transition (a `PENDING` invoice, or an order not yet on hold).
    Unchanged,
    /// The order was already in a terminal state; the signal was stale or duplicated and was ignored.
    AlreadySettled,
}

impl TransitionOutcome {
    /// True when a state transition was actually applied by this call.
    pub fn transition_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Fulfilled | TransitionOutcome::Failed)
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("{0}")]
    StoreError(#[from] OrderStoreError),
}

/// The single code path permitted to mutate order status from invoice state.
///
/// Both reconciliation producers (the webhook ingestor and the poll sweeper) feed their observations through here.
/// Transitions are idempotent at the order level: the store's compare-and-swap on "currently on-hold" guarantees
/// that when both producers observe the same `COMPLETED` invoice, exactly one of them wins the transition and fires
/// the fulfillment notification; the loser sees the precondition fail and treats it as a successful no-op.
pub struct StatusApplier<S, N> {
    store: S,
    sink: N,
}

impl<S, N> Debug for StatusApplier<S, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StatusApplier")
    }
}

impl<S, N> StatusApplier<S, N> {
    pub fn new(store: S, sink: N) -> Self {
        Self { store, sink }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S, N> StatusApplier<S, N>
where
    S: OrderStore,
    N: NotificationSink,
{
    /// Apply an observed invoice status to the given order, per the order state machine:
    ///
    /// | observed status | order on-hold becomes | side effect |
    /// |-----------------|-----------------------|-------------|
    /// | COMPLETED       | completed             | fulfillment notification, exactly once |
    /// | PENDING         | on-hold (no-op)       | none |
    /// | EXPIRED         | failed                | failure notification |
    /// | anything else   | failed                | anomaly logged |
    ///
    /// Signals for orders already in a terminal state are stale by definition and are dropped without side effects.
    /// Every skipped transition leaves a log trail.
    pub async fn apply(&self, order_id: &OrderId, status: &InvoiceStatus) -> Result<TransitionOutcome, OrderFlowError> {
        let order =
            self.store.fetch_order(order_id).await?.ok_or_else(|| OrderFlowError::OrderNotFound(order_id.clone()))?;
        match order.status {
            OrderStatus::OnHold => {},
            s if s.is_terminal() => {
                debug!("🔁️ Order {order_id} is already {s}; ignoring stale {status} signal");
                return Ok(TransitionOutcome::AlreadySettled);
            },
            s => {
                warn!("🔁️ Order {order_id} is {s} and not tracked by reconciliation; ignoring {status} signal");
                return Ok(TransitionOutcome::Unchanged);
            },
        }
        match status {
            InvoiceStatus::Pending => {
                trace!("🔁️ Invoice for order {order_id} is still pending; order stays on hold");
                Ok(TransitionOutcome::Unchanged)
            },
            InvoiceStatus::Completed => self.complete_order(order_id).await,
            InvoiceStatus::Expired => self.fail_order(order_id, "Payment invoice expired").await,
            InvoiceStatus::Unknown(raw) => {
                error!("🔁️ Unrecognised invoice status '{raw}' for order {order_id}. Failing the order.");
                self.fail_order(order_id, "Payment reported an unrecognised invoice status").await
            },
        }
    }

    async fn complete_order(&self, order_id: &OrderId) -> Result<TransitionOutcome, OrderFlowError> {
        let updated = self
            .store
            .update_status_if(order_id, OrderStatus::OnHold, OrderStatus::Completed, Some("Bitfinex payment received"))
            .await?;
        match updated {
            Some(order) => {
                info!("🔁️ Order {order_id} completed. Triggering fulfillment.");
                self.sink.order_completed(&order).await;
                Ok(TransitionOutcome::Fulfilled)
            },
            None => {
                debug!("🔁️ Order {order_id} left on-hold while this completion signal was in flight; no-op");
                Ok(TransitionOutcome::AlreadySettled)
            },
        }
    }

    async fn fail_order(&self, order_id: &OrderId, reason: &str) -> Result<TransitionOutcome, OrderFlowError> {
        let updated = self.store.update_status_if(order_id, OrderStatus::OnHold, OrderStatus::Failed, Some(reason)).await?;
        match updated {
            Some(order) => {
                info!("🔁️ Order {order_id} failed: {reason}");
                self.sink.order_failed(&order, reason).await;
                Ok(TransitionOutcome::Failed)
            },
            None => {
                debug!("🔁️ Order {order_id} was settled concurrently; dropping {reason} signal");
                Ok(TransitionOutcome::AlreadySettled)
            },
        }
    }
}
