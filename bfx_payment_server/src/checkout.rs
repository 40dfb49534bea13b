//! The checkout workflow: turn a pending order into a remote invoice and hand the customer a payment URL.
//!
//! The happy path leaves three marks on the order: the invoice id in metadata, status `on-hold`, and an emptied
//! cart. The platform status probe runs before any of them, so an unavailable processor leaves the order untouched
//! and retryable.

use bfx_payment_engine::{
    db_types::{OrderId, OrderStatus, INVOICE_ID_META_KEY},
    traits::{OrderStore, OrderStoreError},
};
use bfx_tools::{CustomerInfo, InvoiceFailure, InvoiceRequest, PaymentProcessor};
use log::*;
use thiserror::Error;

use crate::config::PaymentOptions;

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("This payment method is currently unavailable. Try again later or choose another one")]
    PlatformUnavailable,
    #[error("Order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("Order {0} is {1} and cannot start a new payment")]
    OrderNotPayable(OrderId, OrderStatus),
    #[error("{message}")]
    InvoiceCreation { failure: InvoiceFailure, message: String },
    #[error("{0}")]
    StoreError(#[from] OrderStoreError),
}

#[derive(Debug, Clone)]
pub struct CheckoutSuccess {
    pub invoice_id: String,
    /// The processor's hosted payment page for the new invoice.
    pub redirect: String,
}

/// Create a remote invoice for the order and move it on hold.
///
/// On invoice rejection the order is failed with the classified customer-facing message as its status note, and the
/// same message is returned to the caller. A rejected or unreachable platform probe aborts before any mutation.
pub async fn create_invoice_for_order<P, S>(
    order_id: &OrderId,
    processor: &P,
    store: &S,
    options: &PaymentOptions,
) -> Result<CheckoutSuccess, CheckoutError>
where
    P: PaymentProcessor,
    S: OrderStore,
{
    let order = store.fetch_order(order_id).await?.ok_or_else(|| CheckoutError::OrderNotFound(order_id.clone()))?;
    // Failed orders may retry checkout; on-hold and completed ones already have a live or settled invoice.
    if matches!(order.status, OrderStatus::OnHold | OrderStatus::Completed) {
        return Err(CheckoutError::OrderNotPayable(order_id.clone(), order.status));
    }
    let operative = processor.platform_status().await.unwrap_or_else(|e| {
        warn!("🛒️ Could not probe platform status: {e}");
        false
    });
    if !operative {
        info!("🛒️ Payment platform is not operative. Order {order_id} is left untouched.");
        return Err(CheckoutError::PlatformUnavailable);
    }
    let request = InvoiceRequest {
        amount: order.total_price,
        currency: options.currency.clone(),
        pay_currencies: options.pay_currencies.clone(),
        order_id: order_id.as_str().to_string(),
        duration: options.duration_secs,
        webhook: options.webhook_url.clone(),
        redirect_url: format!("{}{}", options.return_url_base, order_id.as_str()),
        customer_info: CustomerInfo {
            nationality: order.billing_country.clone(),
            resid_country: order.billing_country.clone(),
            resid_city: order.billing_city.clone(),
            resid_state: order.billing_state.clone(),
            resid_zip_code: order.billing_postcode.clone(),
            resid_street: order.billing_street.clone(),
            full_name: order.billing_name.clone(),
            email: order.billing_email.clone(),
        },
    };
    let invoice = match processor.create_invoice(&request).await {
        Ok(invoice) => invoice,
        Err(e) => {
            let failure = InvoiceFailure::classify(&e);
            let message = failure.user_message().to_string();
            warn!("🛒️ Invoice creation for order {order_id} was rejected ({failure:?}). {e}");
            store.update_status(order_id, OrderStatus::Failed, Some(&message)).await?;
            return Err(CheckoutError::InvoiceCreation { failure, message });
        },
    };
    store.set_metadata(order_id, INVOICE_ID_META_KEY, &invoice.id).await?;
    store.update_status(order_id, OrderStatus::OnHold, Some("Awaiting Bitfinex payment")).await?;
    store.empty_cart(order_id).await?;
    info!("🛒️ Invoice {} created for order {order_id}. Customer is being redirected to pay.", invoice.id);
    Ok(CheckoutSuccess { redirect: format!("{}{}", options.redirect_url_base, invoice.id), invoice_id: invoice.id })
}
