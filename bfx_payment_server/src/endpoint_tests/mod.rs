mod mocks;
mod sweep;
mod webhook;

use bfx_payment_engine::db_types::{Order, OrderId, OrderStatus};
use bpg_common::{FiatAmount, InvoiceStatus};
use chrono::Utc;

fn sample_order(id: &str, status: OrderStatus) -> Order {
    Order {
        order_id: OrderId(id.to_string()),
        billing_country: "DE".to_string(),
        billing_city: "Berlin".to_string(),
        billing_state: None,
        billing_postcode: "10115".to_string(),
        billing_street: "Invalidenstr. 1".to_string(),
        billing_name: "Ada Lovelace".to_string(),
        billing_email: "ada@example.com".to_string(),
        total_price: FiatAmount::from_cents(2499),
        currency: "USD".to_string(),
        status,
        status_note: None,
        updated_at: Utc::now(),
    }
}

fn invoice(id: &str, order_id: &str, status: InvoiceStatus) -> bfx_tools::Invoice {
    bfx_tools::Invoice {
        id: id.to_string(),
        order_id: order_id.to_string(),
        status,
        pay_currency: None,
        amount: None,
        address: None,
        payment: None,
    }
}
