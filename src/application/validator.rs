//! Cross-field business rules for [`PaymentRequest`].
//!
//! Rules run in a fixed order and validation stops at the first violation,
//! so callers fix one field at a time and validate again.

use crate::application::request::PaymentRequest;
use crate::domain::clock::Clock;
use crate::domain::payment_data::PaymentData;
use crate::error::{PaymentError, Result};

type Rule = fn(&PaymentRequest, &dyn Clock) -> Result<()>;

const RULES: &[(&str, Rule)] = &[
    ("amount", check_amount),
    ("receipt", check_receipt),
    ("payment_source", check_single_payment_source),
    ("card_expiry", check_card_expiry),
    ("recipient", check_recipient),
];

pub fn validate(request: &PaymentRequest, clock: &dyn Clock) -> Result<()> {
    for (name, rule) in RULES {
        if let Err(e) = rule(request, clock) {
            tracing::debug!(rule = *name, "Payment request rejected: {}", e);
            return Err(e);
        }
    }
    Ok(())
}

fn check_amount(request: &PaymentRequest, _: &dyn Clock) -> Result<()> {
    match request.amount() {
        None => Err(PaymentError::invalid("Amount is required")),
        Some(amount) if !amount.is_positive() => Err(PaymentError::invalid(
            "Amount must have a currency and a value above zero",
        )),
        Some(_) => Ok(()),
    }
}

fn check_receipt(request: &PaymentRequest, _: &dyn Clock) -> Result<()> {
    let Some(receipt) = request.receipt() else {
        return Ok(());
    };

    if receipt.items().is_empty() {
        return Err(PaymentError::invalid("Receipt must contain at least one item"));
    }
    if !receipt.has_contact() {
        return Err(PaymentError::invalid(
            "Receipt must have either a phone or an email",
        ));
    }
    if receipt.tax_system_code().is_none()
        && let Some(position) = receipt.items().iter().position(|item| !item.is_self_priced())
    {
        return Err(PaymentError::invalid(format!(
            "Receipt has no tax_system_code, so item {} needs a description, \
             positive quantity, amount and vat_code",
            position + 1
        )));
    }
    Ok(())
}

fn check_single_payment_source(request: &PaymentRequest, _: &dyn Clock) -> Result<()> {
    let sources = [
        ("payment_token", request.payment_token().is_some()),
        ("payment_method_id", request.payment_method_id().is_some()),
        ("payment_method_data", request.payment_method_data().is_some()),
    ];
    let present: Vec<&str> = sources
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect();

    if present.len() > 1 {
        return Err(PaymentError::invalid(format!(
            "Only one of payment_token, payment_method_id and payment_method_data \
             may be set, got {}",
            present.join(" and ")
        )));
    }
    Ok(())
}

fn check_card_expiry(request: &PaymentRequest, clock: &dyn Clock) -> Result<()> {
    let Some(PaymentData::BankCard(data)) = request.payment_method_data() else {
        return Ok(());
    };
    let Some(card) = data.card() else {
        return Ok(());
    };

    if card.is_expired_at(clock.now()) {
        return Err(PaymentError::invalid(format!(
            "Card expired in {:04}-{:02}",
            card.expiry_year().unwrap_or_default(),
            card.expiry_month().unwrap_or_default()
        )));
    }
    Ok(())
}

fn check_recipient(request: &PaymentRequest, _: &dyn Clock) -> Result<()> {
    match request.recipient() {
        Some(recipient) if !recipient.is_complete() => Err(PaymentError::invalid(
            "Recipient requires both account_id and gateway_id",
        )),
        _ => Ok(()),
    }
}
