use crate::db_types::Order;

/// Fire-and-forget delivery of order outcome notifications (customer email, merchant log, and so on).
///
/// Implementations must tolerate being slow or failing without affecting order state: the applier has already
/// committed the transition by the time a sink is called, and it calls the sink exactly once per fulfilled order.
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn order_completed(&self, order: &Order);
    async fn order_failed(&self, order: &Order, reason: &str);
}
