mod notification;
mod order_store;

pub use notification::NotificationSink;
pub use order_store::{OrderStore, OrderStoreError};
