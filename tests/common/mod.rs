#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn receipt_items(with_vat: bool) -> Value {
    let mut items = json!([
        {
            "description": "Product 1",
            "quantity": 2.0,
            "amount": {"value": 250.0, "currency": "RUB"}
        },
        {
            "description": "Product 2",
            "quantity": 1.0,
            "amount": {"value": 100.0, "currency": "RUB"}
        }
    ]);
    if with_vat && let Some(items) = items.as_array_mut() {
        for item in items {
            item["vat_code"] = json!(2);
        }
    }
    items
}

/// A request that sets every field, with conflicting payment sources.
pub fn full_request() -> Value {
    json!({
        "amount": {"value": 0.1, "currency": "RUB"},
        "description": "Test description",
        "recipient": {"account_id": "213", "gateway_id": "123"},
        "save_payment_method": true,
        "capture": false,
        "payment_method_data": {"type": "webmoney"},
        "receipt": {
            "phone": "79990000000",
            "email": "test@email",
            "tax_system_code": 1,
            "items": receipt_items(true)
        },
        "payment_method_id": "123",
        "payment_token": "99091209012",
        "confirmation": {"type": "redirect", "return_url": "return.url"},
        "client_ip": "192.0.0.0",
        "metadata": {"key": "value"}
    })
}

pub fn card_request(expiry_year: &str, expiry_month: &str) -> Value {
    json!({
        "amount": {"value": "0.1", "currency": "RUB"},
        "payment_method_data": {
            "type": "bank_card",
            "card": {
                "number": "4111111111111111",
                "expiry_year": expiry_year,
                "expiry_month": expiry_month,
                "csc": "111"
            }
        }
    })
}

pub fn write_fixture(document: &Value) -> std::io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    serde_json::to_writer(&mut file, document)?;
    file.flush()?;
    Ok(file)
}
