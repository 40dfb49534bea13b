//! The poll sweeper: the safety net for webhooks the server never received.
//!
//! Every poll interval it walks the reconciliation windows, lists the processor's recent invoices, and feeds the
//! status of every invoice belonging to an on-hold order through the status applier. The applier's idempotence is
//! what makes it harmless to observe the same invoice from both a webhook and a sweep.

use std::time::Duration;

use bfx_payment_engine::{
    db_types::{OrderId, OrderStatus},
    traits::{NotificationSink, OrderStore},
    MemoryOrderStore, StatusApplier,
};
use bfx_tools::{BfxPayApi, PaymentProcessor, ReconciliationWindow, SWEEP_LIMIT};
use chrono::Utc;
use log::*;
use tokio::task::JoinHandle;

use crate::notifier::LogNotifier;

/// Spawn the periodic sweep task. It runs until the server shuts down.
pub fn start_sweep_worker(
    processor: BfxPayApi,
    applier: StatusApplier<MemoryOrderStore, LogNotifier>,
    period: Duration,
) -> JoinHandle<()> {
    info!("🧹️ Starting reconciliation sweep worker. Sweeping every {} seconds.", period.as_secs());
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            run_sweep(&processor, &applier).await;
        }
    })
}

/// One full sweep over the reconciliation span.
///
/// A failed window query is logged and skipped; the remaining windows still run, so one flaky call never voids an
/// entire sweep.
pub async fn run_sweep<P, S, N>(processor: &P, applier: &StatusApplier<S, N>)
where
    P: PaymentProcessor,
    S: OrderStore,
    N: NotificationSink,
{
    let windows = ReconciliationWindow::sweep_windows(Utc::now());
    trace!("🧹️ Sweeping {} windows", windows.len());
    let mut examined = 0usize;
    for window in windows {
        let invoices = match processor.list_invoices(window, SWEEP_LIMIT).await {
            Ok(invoices) => invoices,
            Err(e) => {
                warn!("🧹️ Could not list invoices for window {} - {}. Skipping it. {e}", window.start, window.end);
                continue;
            },
        };
        for invoice in invoices {
            if invoice.order_id.is_empty() {
                trace!("🧹️ Invoice {} carries no order reference. Skipping.", invoice.id);
                continue;
            }
            let order_id = OrderId(invoice.order_id.clone());
            let order = match applier.store().fetch_order(&order_id).await {
                Ok(Some(order)) => order,
                Ok(None) => {
                    trace!("🧹️ Invoice {} references order {order_id}, which this store does not hold.", invoice.id);
                    continue;
                },
                Err(e) => {
                    warn!("🧹️ Could not fetch order {order_id} during sweep. {e}");
                    continue;
                },
            };
            if order.status != OrderStatus::OnHold {
                continue;
            }
            examined += 1;
            if let Err(e) = applier.apply(&order_id, &invoice.status).await {
                warn!("🧹️ Could not apply status {} to order {order_id}. {e}", invoice.status);
            }
        }
    }
    debug!("🧹️ Sweep complete. {examined} on-hold orders examined.");
}
