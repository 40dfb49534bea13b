use std::fmt::Display;

use serde::{Deserialize, Serialize};

//--------------------------------------    InvoiceStatus     ---------------------------------------------------------
/// The settlement status of a remote invoice, as reported by the payment processor.
///
/// The processor reports statuses as UPPERCASE strings. Anything this gateway does not recognise (including transient
/// states such as `CREATED`) is preserved in `Unknown` so that callers can log the raw value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    /// The invoice exists, but funds have not settled yet.
    Pending,
    /// The invoice has been paid in full.
    Completed,
    /// The invoice expired before payment settled.
    Expired,
    /// A status string this gateway does not recognise.
    Unknown(String),
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "EXPIRED" => Self::Expired,
            _ => Self::Unknown(value),
        }
    }
}

impl From<InvoiceStatus> for String {
    fn from(status: InvoiceStatus) -> Self {
        status.to_string()
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}
