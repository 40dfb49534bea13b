mod fiat;
mod helpers;
mod invoice_status;
mod secret;

pub use fiat::{FiatAmount, FiatAmountError};
pub use helpers::parse_boolean_flag;
pub use invoice_status::InvoiceStatus;
pub use secret::Secret;
