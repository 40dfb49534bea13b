use actix_web::{
    test::{call_service, init_service, read_body, TestRequest},
    App,
};
use bfx_payment_engine::{
    db_types::{OrderId, OrderStatus, INVOICE_ID_META_KEY},
    traits::OrderStore,
    MemoryOrderStore,
};
use bpg_common::InvoiceStatus;

use super::{invoice, mocks::*, sample_order};
use crate::{config::PaymentOptions, server::configure_routes};

async fn seeded_store(orders: Vec<(&str, OrderStatus, Option<&str>)>) -> MemoryOrderStore {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    for (id, status, invoice_id) in orders {
        store.insert_order(sample_order(id, status));
        if let Some(inv) = invoice_id {
            store.set_metadata(&OrderId(id.to_string()), INVOICE_ID_META_KEY, inv).await.unwrap();
        }
    }
    store
}

fn webhook_request(order_id: &str, status: &str) -> TestRequest {
    TestRequest::post()
        .uri("/webhook/bitfinex")
        .set_json(serde_json::json!({ "orderId": order_id, "status": status }))
}

#[actix_web::test]
async fn pushes_for_unknown_orders_are_dropped_without_an_api_call() {
    let store = seeded_store(vec![]).await;
    let mut processor = MockProcessor::new();
    processor.expect_query_invoice().never();
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store, sink.clone(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, webhook_request("ghost", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    assert!(read_body(response).await.is_empty());
    assert_eq!(sink.completions(), 0);
}

#[actix_web::test]
async fn verified_completion_fulfills_once_and_acknowledges_with_true() {
    let store = seeded_store(vec![("42", OrderStatus::OnHold, Some("inv-42"))]).await;
    let mut processor = MockProcessor::new();
    processor
        .expect_query_invoice()
        .withf(|id| id == "inv-42")
        .times(2)
        .returning(|_| Ok(invoice("inv-42", "42", InvoiceStatus::Completed)));
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store.clone(), sink.clone(), PaymentOptions::default())),
    )
    .await;

    let response = call_service(&app, webhook_request("42", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    assert_eq!(read_body(response).await, "true");
    // Duplicate delivery of the same push: acknowledged, but no second fulfillment
    let response = call_service(&app, webhook_request("42", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    assert!(read_body(response).await.is_empty());

    assert_eq!(sink.completions(), 1);
    let order = store.fetch_order(&OrderId("42".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.status_note.as_deref(), Some("Bitfinex payment received"));
}

#[actix_web::test]
async fn pushed_status_is_ignored_in_favor_of_the_signed_lookup() {
    // The push claims COMPLETED, but the processor says the invoice is still pending. Order stays on hold.
    let store = seeded_store(vec![("42", OrderStatus::OnHold, Some("inv-42"))]).await;
    let mut processor = MockProcessor::new();
    processor.expect_query_invoice().returning(|_| Ok(invoice("inv-42", "42", InvoiceStatus::Pending)));
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store.clone(), sink.clone(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, webhook_request("42", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    assert!(read_body(response).await.is_empty());
    assert_eq!(sink.completions(), 0);
    let order = store.fetch_order(&OrderId("42".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::OnHold);
}

#[actix_web::test]
async fn stale_pushes_never_regress_a_settled_order() {
    let store = seeded_store(vec![("42", OrderStatus::Completed, Some("inv-42"))]).await;
    let mut processor = MockProcessor::new();
    processor.expect_query_invoice().returning(|_| Ok(invoice("inv-42", "42", InvoiceStatus::Expired)));
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store.clone(), sink.clone(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, webhook_request("42", "EXPIRED").to_request()).await;
    assert!(response.status().is_success());
    assert!(read_body(response).await.is_empty());
    assert_eq!(sink.failures(), 0);
    let order = store.fetch_order(&OrderId("42".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Completed);
}

#[actix_web::test]
async fn mismatched_invoice_ownership_drops_the_push() {
    let store = seeded_store(vec![("42", OrderStatus::OnHold, Some("inv-42"))]).await;
    let mut processor = MockProcessor::new();
    // The signed lookup reveals the invoice belongs to a different order
    processor.expect_query_invoice().returning(|_| Ok(invoice("inv-42", "99", InvoiceStatus::Completed)));
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store.clone(), sink.clone(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, webhook_request("42", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    assert!(read_body(response).await.is_empty());
    assert_eq!(sink.completions(), 0);
    let order = store.fetch_order(&OrderId("42".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::OnHold);
}

#[actix_web::test]
async fn processor_lookup_failures_still_return_200() {
    let store = seeded_store(vec![("42", OrderStatus::OnHold, Some("inv-42"))]).await;
    let mut processor = MockProcessor::new();
    processor
        .expect_query_invoice()
        .returning(|_| Err(bfx_tools::BfxApiError::TransportError("connection reset".to_string())));
    let sink = CountingSink::default();
    let app = init_service(
        App::new().configure(configure_routes(processor, store.clone(), sink.clone(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, webhook_request("42", "COMPLETED").to_request()).await;
    assert!(response.status().is_success());
    let order = store.fetch_order(&OrderId("42".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::OnHold, "a failed verification must not change the order");
}

#[actix_web::test]
async fn health_endpoint_responds() {
    let store = seeded_store(vec![]).await;
    let app = init_service(
        App::new().configure(configure_routes(MockProcessor::new(), store, CountingSink::default(), PaymentOptions::default())),
    )
    .await;
    let response = call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert!(response.status().is_success());
}
