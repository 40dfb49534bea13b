use bpg_common::{FiatAmount, InvoiceStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How far back a reconciliation sweep looks. A missed webhook is caught by the sweep for a full day afterwards.
pub const SWEEP_SPAN_HOURS: i64 = 25;
/// Width of a single sweep query window. Bounds the per-call payload size.
pub const SWEEP_SLICE_HOURS: i64 = 2;
/// Maximum invoices returned per window query.
pub const SWEEP_LIMIT: u32 = 100;

//--------------------------------------    CustomerInfo      ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub nationality: String,
    pub resid_country: String,
    pub resid_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resid_state: Option<String>,
    pub resid_zip_code: String,
    pub resid_street: String,
    pub full_name: String,
    pub email: String,
}

//--------------------------------------    InvoiceRequest    ---------------------------------------------------------
/// The body of an invoice-create call. Built fresh per checkout attempt and never persisted; only the returned
/// invoice id survives, on the order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRequest {
    pub amount: FiatAmount,
    pub currency: String,
    pub pay_currencies: Vec<String>,
    pub order_id: String,
    pub duration: u32,
    pub webhook: String,
    pub redirect_url: String,
    pub customer_info: CustomerInfo,
}

//--------------------------------------    InvoicePayment    ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePayment {
    pub txid: String,
    pub amount: f64,
    pub currency: String,
}

//--------------------------------------       Invoice        ---------------------------------------------------------
/// A remote invoice as returned by the create, query and list calls. Owned by the processor; this gateway only
/// observes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub order_id: String,
    #[serde(default = "unknown_status")]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub pay_currency: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<InvoicePayment>,
}

fn unknown_status() -> InvoiceStatus {
    InvoiceStatus::Unknown(String::new())
}

//--------------------------------------  ReconciliationWindow ---------------------------------------------------------
/// A bounded time slice, in epoch milliseconds, used to bound a single invoice-list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationWindow {
    pub start: i64,
    pub end: i64,
}

impl ReconciliationWindow {
    /// The consecutive windows a sweep visits, most recent first, covering `span` back from `now` in `slice`-wide
    /// steps. The trailing window is clamped so the walk never reaches past `now - span`.
    pub fn walk(now: DateTime<Utc>, span: Duration, slice: Duration) -> Vec<ReconciliationWindow> {
        let now = now.timestamp_millis();
        let horizon = now - span.num_milliseconds();
        let step = slice.num_milliseconds();
        let mut windows = Vec::new();
        let mut end = now;
        while end > horizon {
            let start = horizon.max(end - step);
            windows.push(ReconciliationWindow { start, end });
            end = start;
        }
        windows
    }

    pub fn sweep_windows(now: DateTime<Utc>) -> Vec<ReconciliationWindow> {
        Self::walk(now, Duration::hours(SWEEP_SPAN_HOURS), Duration::hours(SWEEP_SLICE_HOURS))
    }
}
