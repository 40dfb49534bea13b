//! # Bitfinex Pay gateway server
//!
//! This crate hosts the HTTP surface and the background work of the gateway:
//! * the checkout workflow that creates remote invoices for orders,
//! * the webhook route where the payment processor pushes settlement notifications,
//! * the poll sweeper that re-reads recent invoices to catch missed webhooks.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for details. Missing API
//! credentials abort startup.
//!
//! ## Routes
//! * `/health`: liveness check, returns 200 OK.
//! * `POST /checkout/{order_id}`: creates an invoice for the order and returns the payment redirect URL.
//! * `POST /webhook/bitfinex`: settlement notifications pushed by the processor.

pub mod checkout;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod notifier;
pub mod routes;
pub mod server;
pub mod sweep_worker;

#[cfg(test)]
mod endpoint_tests;
