use std::{fmt::Display, str::FromStr};

use bpg_common::FiatAmount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The metadata key under which the remote invoice id is stored on an order.
pub const INVOICE_ID_META_KEY: &str = "bitfinexInvoiceId";

//--------------------------------------        OrderId        --------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------      OrderStatus      --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    /// The order exists but checkout has not started a payment. Not tracked by reconciliation.
    New,
    /// An invoice has been created and the gateway is awaiting settlement.
    OnHold,
    /// Terminal. The invoice settled and the order was fulfilled.
    Completed,
    /// Terminal. Invoice creation failed or the invoice expired.
    Failed,
}

impl OrderStatus {
    /// Terminal states must never be overwritten by a later, stale reconciliation signal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Failed)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::New => write!(f, "new"),
            OrderStatus::OnHold => write!(f, "on-hold"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct StatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "on-hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            s => Err(StatusConversionError(s.to_string())),
        }
    }
}

//--------------------------------------         Order         --------------------------------------------------------
/// An order as the merchant platform hands it to the gateway. The gateway reads the billing fields to build invoice
/// requests and writes nothing back except the status and the invoice-id metadata entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub order_id: OrderId,
    pub billing_country: String,
    pub billing_city: String,
    pub billing_state: Option<String>,
    pub billing_postcode: String,
    pub billing_street: String,
    pub billing_name: String,
    pub billing_email: String,
    pub total_price: FiatAmount,
    pub currency: String,
    pub status: OrderStatus,
    /// Human-readable note attached to the last status change, e.g. the classified failure message.
    pub status_note: Option<String>,
    pub updated_at: DateTime<Utc>,
}
