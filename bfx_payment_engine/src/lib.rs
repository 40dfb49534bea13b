//! Order-side domain logic for the Bitfinex Pay merchant gateway.
//!
//! The gateway does not own order storage. Orders live in an external Order Store (the merchant platform), reached
//! through the [`traits::OrderStore`] trait; completion and failure notifications leave through
//! [`traits::NotificationSink`]. The one piece of logic this crate guards jealously is the
//! [`StatusApplier`]: the *only* code path allowed to change an order's status in response to invoice state, so that
//! the two reconciliation producers (webhook push and poll sweep) cannot double-fire fulfillment or resurrect a
//! settled order.

pub mod db_types;
pub mod traits;

mod applier;
mod memory_store;

pub use applier::{OrderFlowError, StatusApplier, TransitionOutcome};
pub use memory_store::MemoryOrderStore;
