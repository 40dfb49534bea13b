use bfx_tools::Invoice;
use serde::{Deserialize, Serialize};

/// The JSON body the processor POSTs to the webhook route.
///
/// The payload arrives unauthenticated, so nothing in it is trusted directly; it is only a hint to look up the
/// order's invoice through the signed API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub order_id: String,
    /// Raw status string from the push. Logged, never acted on.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    /// Where to send the customer to complete payment: the processor's hosted page for the new invoice.
    pub redirect: String,
}
