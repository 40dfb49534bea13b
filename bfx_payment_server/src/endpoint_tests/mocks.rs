use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use bfx_payment_engine::{db_types::Order, traits::NotificationSink};
use bfx_tools::{BfxApiError, Invoice, InvoiceRequest, PaymentProcessor, ReconciliationWindow};
use mockall::mock;

mock! {
    pub Processor {}

    impl PaymentProcessor for Processor {
        async fn platform_status(&self) -> Result<bool, BfxApiError>;
        async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, BfxApiError>;
        async fn query_invoice(&self, invoice_id: &str) -> Result<Invoice, BfxApiError>;
        async fn list_invoices(&self, window: ReconciliationWindow, limit: u32) -> Result<Vec<Invoice>, BfxApiError>;
    }
}

/// A notification sink that counts deliveries, for asserting the exactly-once guarantee.
#[derive(Clone, Default)]
pub struct CountingSink {
    pub completed: Arc<AtomicUsize>,
    pub failed: Arc<AtomicUsize>,
}

impl CountingSink {
    pub fn completions(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }
}

impl NotificationSink for CountingSink {
    async fn order_completed(&self, _order: &Order) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    async fn order_failed(&self, _order: &Order, _reason: &str) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}
