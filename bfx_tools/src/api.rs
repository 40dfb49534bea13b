use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    config::BfxConfig,
    data_objects::{Invoice, InvoiceRequest, ReconciliationWindow},
    signature::{sign_request, NonceSource},
    BfxApiError,
};

pub const PLATFORM_STATUS_PATH: &str = "v2/platform/status";
pub const INVOICE_CREATE_PATH: &str = "v2/auth/w/ext/pay/invoice/create";
pub const INVOICE_QUERY_PATH: &str = "v2/auth/r/ext/pay/invoice";
pub const INVOICE_LIST_PATH: &str = "v2/auth/r/ext/pay/invoices";

/// The remote payment-processor calls this gateway depends on.
///
/// [`BfxPayApi`] is the production implementation; the server's handlers and workers are generic over this trait so
/// tests can substitute a mock.
#[allow(async_fn_in_trait)]
pub trait PaymentProcessor {
    /// Unauthenticated health probe. `false` means the platform is in maintenance and invoice creation must not be
    /// attempted.
    async fn platform_status(&self) -> Result<bool, BfxApiError>;
    /// Signed create call. A success means the invoice exists, not that it is paid.
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, BfxApiError>;
    /// Signed lookup of a single invoice by id. The authoritative source for settlement state.
    async fn query_invoice(&self, invoice_id: &str) -> Result<Invoice, BfxApiError>;
    /// Signed bulk query over one reconciliation window.
    async fn list_invoices(&self, window: ReconciliationWindow, limit: u32) -> Result<Vec<Invoice>, BfxApiError>;
}

/// Client for the Bitfinex Pay merchant API.
///
/// One immutable instance per merchant credential pair. Cloning shares the underlying connection pool and the nonce
/// source, so clones are safe to use concurrently from the webhook handler and the poll sweeper.
#[derive(Clone)]
pub struct BfxPayApi {
    config: BfxConfig,
    client: Arc<Client>,
    nonce: Arc<NonceSource>,
}

impl BfxPayApi {
    pub fn new(config: BfxConfig) -> Result<Self, BfxApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BfxApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), nonce: Arc::new(NonceSource::new()) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Serialize the body, sign the exact string being sent, and POST it with the `bfx-*` header set.
    async fn signed_post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, BfxApiError> {
        let body_json = serde_json::to_string(body).map_err(|e| BfxApiError::JsonError(e.to_string()))?;
        let nonce = self.nonce.next();
        let signature = sign_request(path, &nonce, &body_json, self.config.api_secret.reveal());
        let mut headers = HeaderMap::with_capacity(5);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert("bfx-nonce", HeaderValue::from_str(&nonce).map_err(|e| BfxApiError::Initialization(e.to_string()))?);
        headers.insert(
            "bfx-apikey",
            HeaderValue::from_str(&self.config.api_key).map_err(|e| BfxApiError::Initialization(e.to_string()))?,
        );
        headers.insert(
            "bfx-signature",
            HeaderValue::from_str(&signature).map_err(|e| BfxApiError::Initialization(e.to_string()))?,
        );
        trace!("💱️ Sending signed POST {path} (nonce {nonce})");
        let response =
            self.client.post(self.url(path)).headers(headers).body(body_json).send().await.map_err(BfxApiError::from_reqwest)?;
        let status = response.status();
        let text = response.text().await.map_err(BfxApiError::from_reqwest)?;
        if self.config.log_responses {
            info!("💱️ {path} response ({status}): {text}");
        }
        if !status.is_success() {
            return Err(BfxApiError::QueryError { status: status.as_u16(), message: text });
        }
        serde_json::from_str(&text).map_err(|e| BfxApiError::JsonError(format!("{e} in response to {path}: {text}")))
    }
}

impl PaymentProcessor for BfxPayApi {
    async fn platform_status(&self) -> Result<bool, BfxApiError> {
        let response =
            self.client.get(self.url(PLATFORM_STATUS_PATH)).send().await.map_err(BfxApiError::from_reqwest)?;
        let status: Vec<i64> = response.json().await.map_err(|e| BfxApiError::JsonError(e.to_string()))?;
        // The platform reports [1] when operative and [0] in maintenance
        let operative = status.first() == Some(&1);
        debug!("💱️ Platform status: {}", if operative { "operative" } else { "unavailable" });
        Ok(operative)
    }

    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice, BfxApiError> {
        debug!("💱️ Creating invoice for order {}", request.order_id);
        let invoice: Invoice = self.signed_post(INVOICE_CREATE_PATH, request).await?;
        info!("💱️ Created invoice {} for order {}", invoice.id, request.order_id);
        Ok(invoice)
    }

    async fn query_invoice(&self, invoice_id: &str) -> Result<Invoice, BfxApiError> {
        debug!("💱️ Fetching invoice {invoice_id}");
        self.signed_post(INVOICE_QUERY_PATH, &json!({ "id": invoice_id })).await
    }

    async fn list_invoices(&self, window: ReconciliationWindow, limit: u32) -> Result<Vec<Invoice>, BfxApiError> {
        trace!("💱️ Listing invoices in window {} - {}", window.start, window.end);
        let body = json!({ "start": window.start, "end": window.end, "limit": limit });
        self.signed_post(INVOICE_LIST_PATH, &body).await
    }
}
