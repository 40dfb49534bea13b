use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bfx_payment_engine::traits::OrderStoreError;
use thiserror::Error;

use crate::checkout::CheckoutError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("This payment method is currently unavailable. Try again later or choose another one")]
    PaymentMethodUnavailable,
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Could not create the payment. {0}")]
    InvoiceCreationFailed(String),
    #[error("A payment for this order is already underway or settled. {0}")]
    OrderNotPayable(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::PaymentMethodUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InvoiceCreationFailed(_) => StatusCode::BAD_GATEWAY,
            Self::OrderNotPayable(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderStoreError> for ServerError {
    fn from(e: OrderStoreError) -> Self {
        match e {
            OrderStoreError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id}")),
            OrderStoreError::StorageError(msg) => Self::BackendError(msg),
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::PlatformUnavailable => Self::PaymentMethodUnavailable,
            CheckoutError::OrderNotFound(id) => Self::NoRecordFound(format!("Order {id}")),
            CheckoutError::OrderNotPayable(id, status) => Self::OrderNotPayable(format!("Order {id} is {status}.")),
            CheckoutError::InvoiceCreation { message, .. } => Self::InvoiceCreationFailed(message),
            CheckoutError::StoreError(e) => e.into(),
        }
    }
}
