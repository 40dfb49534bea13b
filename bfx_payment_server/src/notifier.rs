use bfx_payment_engine::{db_types::Order, traits::NotificationSink};
use log::*;

/// Settlement notifications as log entries.
///
/// Stands in for a mailer or storefront callback. The applier only needs something that implements
/// [`NotificationSink`], so swapping this out later is a one-line change in `server.rs`.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

impl NotificationSink for LogNotifier {
    async fn order_completed(&self, order: &Order) {
        info!("📧️ Order {} paid in full ({} {}). Fulfillment can proceed.", order.order_id, order.total_price, order.currency);
    }

    async fn order_failed(&self, order: &Order, reason: &str) {
        info!("📧️ Order {} will not be paid. {reason}", order.order_id);
    }
}
