//! HTTP route handlers.
//!
//! Handlers are generic over the processor, store and notification sink so the endpoint tests can run them against
//! mocks. `server.rs` instantiates them with the production types.

use actix_web::{get, web, HttpResponse, Responder};
use bfx_payment_engine::{
    db_types::{OrderId, INVOICE_ID_META_KEY},
    traits::{NotificationSink, OrderStore},
    StatusApplier,
};
use bfx_tools::PaymentProcessor;
use log::*;

use crate::{
    checkout::create_invoice_for_order,
    config::PaymentOptions,
    data_objects::{CheckoutResponse, WebhookPayload},
    errors::ServerError,
};

/// Route handler for the `health` endpoint
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Route handler for processor webhook pushes.
///
/// The push body is unauthenticated, so the order id in it is only a lookup hint: the authoritative status comes
/// from re-querying the invoice over the signed API, using the invoice id stored on the order at checkout time.
/// Whatever happens, the response is 200 so the processor does not hammer the route with retries; the body is the
/// literal `true` only when this delivery actually transitioned the order.
pub async fn bitfinex_webhook<P, S, N>(
    body: web::Json<WebhookPayload>,
    processor: web::Data<P>,
    applier: web::Data<StatusApplier<S, N>>,
) -> HttpResponse
where
    P: PaymentProcessor,
    S: OrderStore,
    N: NotificationSink,
{
    let payload = body.into_inner();
    let order_id = OrderId(payload.order_id);
    debug!("🔔️ Webhook push for order {order_id} (pushed status: '{}')", payload.status);
    let invoice_id = match applier.store().fetch_metadata(&order_id, INVOICE_ID_META_KEY).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!("🔔️ Webhook for order {order_id}, but no invoice was ever recorded for it. Dropping.");
            return HttpResponse::Ok().finish();
        },
        Err(e) => {
            warn!("🔔️ Could not look up the invoice id for order {order_id}. {e}");
            return HttpResponse::Ok().finish();
        },
    };
    let invoice = match processor.query_invoice(&invoice_id).await {
        Ok(invoice) => invoice,
        Err(e) => {
            warn!("🔔️ Could not verify invoice {invoice_id} with the processor. Dropping webhook for {order_id}. {e}");
            return HttpResponse::Ok().finish();
        },
    };
    if !invoice.order_id.is_empty() && invoice.order_id != order_id.as_str() {
        warn!(
            "🔔️ Invoice {invoice_id} belongs to order #{}, not {order_id}. Dropping mismatched webhook.",
            invoice.order_id
        );
        return HttpResponse::Ok().finish();
    }
    match applier.apply(&order_id, &invoice.status).await {
        Ok(outcome) if outcome.transition_applied() => HttpResponse::Ok().body("true"),
        Ok(_) => HttpResponse::Ok().finish(),
        Err(e) => {
            warn!("🔔️ Could not apply invoice status {} to order {order_id}. {e}", invoice.status);
            HttpResponse::Ok().finish()
        },
    }
}

/// Route handler for starting a checkout. Creates an invoice and returns the URL to send the customer to.
pub async fn checkout<P, S>(
    path: web::Path<String>,
    processor: web::Data<P>,
    store: web::Data<S>,
    options: web::Data<PaymentOptions>,
) -> Result<HttpResponse, ServerError>
where
    P: PaymentProcessor,
    S: OrderStore,
{
    let order_id = OrderId(path.into_inner());
    let success =
        create_invoice_for_order(&order_id, processor.get_ref(), store.get_ref(), options.get_ref()).await?;
    Ok(HttpResponse::Ok().json(CheckoutResponse { redirect: success.redirect }))
}
