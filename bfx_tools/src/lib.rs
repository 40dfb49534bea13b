//! Client tooling for the Bitfinex Pay merchant API.
//!
//! This crate owns everything that talks to the remote payment processor: the request signer ([`sign_request`]),
//! the monotonic nonce source, the wire data objects, the [`BfxPayApi`] client and the [`InvoiceFailure`]
//! classifier that turns processor errors into customer-facing messages.

mod api;
mod config;
mod error;
mod signature;

mod data_objects;

pub use api::{BfxPayApi, PaymentProcessor};
pub use config::BfxConfig;
pub use data_objects::{
    CustomerInfo, Invoice, InvoicePayment, InvoiceRequest, ReconciliationWindow, SWEEP_LIMIT, SWEEP_SLICE_HOURS,
    SWEEP_SPAN_HOURS,
};
pub use error::{BfxApiError, InvoiceFailure};
pub use signature::{sign_request, NonceSource};
