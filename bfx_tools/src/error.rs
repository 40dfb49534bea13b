use thiserror::Error;

#[derive(Debug, Error)]
pub enum BfxApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Could not reach the payment processor: {0}")]
    TransportError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The processor returned an empty response")]
    EmptyResponse,
}

impl BfxApiError {
    pub fn from_reqwest(e: reqwest::Error) -> Self {
        Self::TransportError(e.to_string())
    }

    /// Transient failures (timeouts, 5xx) may succeed on a later attempt; everything else is a hard rejection.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::TransportError(_) => true,
            Self::QueryError { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

//--------------------------------------    InvoiceFailure    ---------------------------------------------------------
/// Classification of an invoice-creation failure into a customer-facing message.
///
/// The processor reports rejections as a JSON array `["error", null, "ERR_..."]`, usually embedded in a larger error
/// string. Classification only drives the message shown to the customer; control flow never branches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoiceFailure {
    CountryRestricted,
    CurrencyUnsupported,
    AmountTooLow,
    GenericInvoiceFailure,
    TransportError,
}

impl InvoiceFailure {
    pub fn classify(error: &BfxApiError) -> Self {
        match error {
            BfxApiError::TransportError(_) => Self::TransportError,
            BfxApiError::QueryError { message, .. } => Self::classify_error_body(message),
            _ => Self::GenericInvoiceFailure,
        }
    }

    /// Extract the `ERR_...` code from a response body and map it to a failure class. Unparseable bodies fall back
    /// to the generic message.
    pub fn classify_error_body(body: &str) -> Self {
        let code = match extract_error_code(body) {
            Some(code) => code,
            None => return Self::GenericInvoiceFailure,
        };
        if code.contains("COUNTRY") {
            Self::CountryRestricted
        } else if code.contains("CURRENCY") {
            Self::CurrencyUnsupported
        } else if code.contains("AMOUNT") {
            Self::AmountTooLow
        } else {
            Self::GenericInvoiceFailure
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CountryRestricted => "Payments are not available in your country",
            Self::CurrencyUnsupported => "The selected currency is not supported for this payment",
            Self::AmountTooLow => "The order total is below the minimum amount for this payment method",
            Self::GenericInvoiceFailure => "The payment could not be created. Try again later or choose another payment method",
            Self::TransportError => "Internal server error, please try again later",
        }
    }
}

/// Find the `["error", null, "ERR_..."]` array inside an error body and return the third element.
fn extract_error_code(body: &str) -> Option<String> {
    let start = body.find("[\"error\"")?;
    let end = body[start..].find(']')?;
    let parsed: serde_json::Value = serde_json::from_str(&body[start..=start + end]).ok()?;
    parsed.get(2)?.as_str().map(|s| s.to_string())
}
