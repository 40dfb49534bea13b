use bfx_payment_engine::{
    db_types::{OrderId, OrderStatus},
    traits::OrderStore,
    MemoryOrderStore, StatusApplier,
};
use bfx_tools::BfxApiError;
use bpg_common::InvoiceStatus;

use super::{invoice, mocks::*, sample_order};
use crate::sweep_worker::run_sweep;

fn applier_with(
    orders: Vec<(&str, OrderStatus)>,
) -> (StatusApplier<MemoryOrderStore, CountingSink>, MemoryOrderStore, CountingSink) {
    let _ = env_logger::try_init();
    let store = MemoryOrderStore::new();
    for (id, status) in orders {
        store.insert_order(sample_order(id, status));
    }
    let sink = CountingSink::default();
    (StatusApplier::new(store.clone(), sink.clone()), store, sink)
}

#[tokio::test]
async fn sweep_completes_on_hold_orders_from_listed_invoices() {
    let (applier, store, sink) = applier_with(vec![("11", OrderStatus::OnHold), ("12", OrderStatus::OnHold)]);
    let mut processor = MockProcessor::new();
    // Most recent window carries both invoices; the rest of the span is empty.
    let mut first = true;
    processor.expect_list_invoices().returning(move |_, _| {
        if first {
            first = false;
            Ok(vec![
                invoice("inv-11", "11", InvoiceStatus::Completed),
                invoice("inv-12", "12", InvoiceStatus::Pending),
            ])
        } else {
            Ok(vec![])
        }
    });
    run_sweep(&processor, &applier).await;
    assert_eq!(sink.completions(), 1);
    assert_eq!(store.fetch_order(&OrderId("11".to_string())).await.unwrap().unwrap().status, OrderStatus::Completed);
    assert_eq!(store.fetch_order(&OrderId("12".to_string())).await.unwrap().unwrap().status, OrderStatus::OnHold);
}

#[tokio::test]
async fn a_failed_window_is_skipped_without_aborting_the_sweep() {
    let (applier, store, sink) = applier_with(vec![("11", OrderStatus::OnHold)]);
    let mut processor = MockProcessor::new();
    let mut calls = 0;
    processor.expect_list_invoices().returning(move |_, _| {
        calls += 1;
        match calls {
            1 => Err(BfxApiError::TransportError("timed out".to_string())),
            2 => Ok(vec![invoice("inv-11", "11", InvoiceStatus::Completed)]),
            _ => Ok(vec![]),
        }
    });
    run_sweep(&processor, &applier).await;
    assert_eq!(sink.completions(), 1, "later windows must still run after one fails");
    assert_eq!(store.fetch_order(&OrderId("11".to_string())).await.unwrap().unwrap().status, OrderStatus::Completed);
}

#[tokio::test]
async fn sweep_ignores_settled_orders_and_foreign_invoices() {
    let (applier, store, sink) = applier_with(vec![("done", OrderStatus::Completed)]);
    let mut processor = MockProcessor::new();
    let mut first = true;
    processor.expect_list_invoices().returning(move |_, _| {
        if first {
            first = false;
            Ok(vec![
                // Stale expiry for an already-settled order
                invoice("inv-a", "done", InvoiceStatus::Expired),
                // Another merchant's invoice with no order reference
                invoice("inv-b", "", InvoiceStatus::Completed),
                // An order this store has never heard of
                invoice("inv-c", "elsewhere", InvoiceStatus::Completed),
            ])
        } else {
            Ok(vec![])
        }
    });
    run_sweep(&processor, &applier).await;
    assert_eq!(sink.completions(), 0);
    assert_eq!(sink.failures(), 0);
    assert_eq!(store.fetch_order(&OrderId("done".to_string())).await.unwrap().unwrap().status, OrderStatus::Completed);
}

#[tokio::test]
async fn sweep_catches_a_missed_expiry() {
    let (applier, store, sink) = applier_with(vec![("13", OrderStatus::OnHold)]);
    let mut processor = MockProcessor::new();
    let mut first = true;
    processor.expect_list_invoices().returning(move |_, _| {
        if first {
            first = false;
            Ok(vec![invoice("inv-13", "13", InvoiceStatus::Expired)])
        } else {
            Ok(vec![])
        }
    });
    run_sweep(&processor, &applier).await;
    assert_eq!(sink.failures(), 1);
    let order = store.fetch_order(&OrderId("13".to_string())).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Failed);
    assert_eq!(order.status_note.as_deref(), Some("Payment invoice expired"));
}
