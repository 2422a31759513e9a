//! Fiscal receipt data sent along with a payment.

use crate::domain::amount::Amount;
use crate::domain::coerce::{
    Coerce, Fields, FromMapping, Mapping, OrderedFields, bounded, ignore_unknown, kind_of,
    present_fields, read_decimal, read_integer, read_sequence, read_string,
};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const VAT_CODES: std::ops::RangeInclusive<i64> = 1..=6;
const TAX_SYSTEM_CODES: std::ops::RangeInclusive<i64> = 1..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSubject {
    Commodity,
    Excise,
    Job,
    Service,
    GamblingBet,
    GamblingPrize,
    Lottery,
    LotteryPrize,
    IntellectualActivity,
    Payment,
    AgentCommission,
    PropertyRight,
    NonOperatingGain,
    InsurancePremium,
    SalesTax,
    ResortFee,
    Composite,
    Another,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    FullPrepayment,
    PartialPrepayment,
    Advance,
    FullPayment,
    PartialPayment,
    Credit,
    CreditPayment,
}

fn read_label<T: DeserializeOwned>(field: &str, value: &Value) -> Result<T> {
    let label = read_string(value)?;
    serde_json::from_value(Value::String(label.clone()))
        .map_err(|_| PaymentError::invalid(format!("unknown {field} '{label}'")))
}

fn render_label<T: Serialize>(label: Option<T>) -> Option<Value> {
    label.and_then(|l| serde_json::to_value(l).ok())
}

fn coded(field: &str, code: i64, allowed: std::ops::RangeInclusive<i64>) -> Result<i64> {
    if allowed.contains(&code) {
        Ok(code)
    } else {
        Err(PaymentError::invalid(format!(
            "{field} must be between {} and {}, got {code}",
            allowed.start(),
            allowed.end()
        )))
    }
}

/// A single line of a receipt.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReceiptItem {
    description: Option<String>,
    quantity: Option<Decimal>,
    amount: Option<Amount>,
    vat_code: Option<i64>,
    payment_subject: Option<PaymentSubject>,
    payment_mode: Option<PaymentMode>,
}

impl ReceiptItem {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn quantity(&self) -> Option<Decimal> {
        self.quantity
    }

    pub fn amount(&self) -> Option<&Amount> {
        self.amount.as_ref()
    }

    pub fn vat_code(&self) -> Option<i64> {
        self.vat_code
    }

    pub fn payment_subject(&self) -> Option<PaymentSubject> {
        self.payment_subject
    }

    pub fn payment_mode(&self) -> Option<PaymentMode> {
        self.payment_mode
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.description = Some(bounded("description", description.into(), 128)?);
        Ok(())
    }

    pub fn set_quantity(&mut self, quantity: Decimal) -> Result<()> {
        if quantity <= Decimal::ZERO {
            return Err(PaymentError::invalid("Item quantity must be positive"));
        }
        self.quantity = Some(quantity);
        Ok(())
    }

    pub fn set_amount(&mut self, amount: impl Coerce<Amount>) -> Result<()> {
        self.amount = Some(amount.coerce()?);
        Ok(())
    }

    pub fn set_vat_code(&mut self, vat_code: i64) -> Result<()> {
        self.vat_code = Some(coded("vat_code", vat_code, VAT_CODES)?);
        Ok(())
    }

    pub fn set_payment_subject(&mut self, subject: PaymentSubject) {
        self.payment_subject = Some(subject);
    }

    pub fn set_payment_mode(&mut self, mode: PaymentMode) {
        self.payment_mode = Some(mode);
    }

    /// True when the item carries everything needed to price it on its own.
    pub fn is_self_priced(&self) -> bool {
        self.description.is_some()
            && self.quantity.is_some()
            && self.amount.is_some()
            && self.vat_code.is_some()
    }
}

impl FromMapping for ReceiptItem {
    const TYPE_NAME: &'static str = "ReceiptItem";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut item = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "description" => item.set_description(read_string(value)?)?,
                "quantity" => item.set_quantity(read_decimal(value)?)?,
                "amount" => item.set_amount(value)?,
                "vat_code" => item.set_vat_code(read_integer(value)?)?,
                "payment_subject" => item.set_payment_subject(read_label(key, value)?),
                "payment_mode" => item.set_payment_mode(read_label(key, value)?),
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(item)
    }
}

impl OrderedFields for ReceiptItem {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("description", self.description.clone())
            .with_opt("quantity", self.quantity.map(|q| q.to_string()))
            .with_nested("amount", self.amount.as_ref())
            .with_opt("vat_code", self.vat_code)
            .with_opt("payment_subject", render_label(self.payment_subject))
            .with_opt("payment_mode", render_label(self.payment_mode))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Receipt {
    phone: Option<String>,
    email: Option<String>,
    tax_system_code: Option<i64>,
    items: Vec<ReceiptItem>,
}

impl Receipt {
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn tax_system_code(&self) -> Option<i64> {
        self.tax_system_code
    }

    pub fn items(&self) -> &[ReceiptItem] {
        &self.items
    }

    /// Sets the customer phone, in E.164 digits with an optional leading `+`.
    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<()> {
        let phone = phone.into();
        let digits = phone.strip_prefix('+').unwrap_or(&phone);
        if digits.is_empty() || digits.len() > 15 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PaymentError::invalid(format!(
                "phone must be up to 15 digits, got '{phone}'"
            )));
        }
        self.phone = Some(phone);
        Ok(())
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<()> {
        let email = email.into();
        if !email.contains('@') {
            return Err(PaymentError::invalid(format!("'{email}' is not an email")));
        }
        self.email = Some(email);
        Ok(())
    }

    pub fn set_tax_system_code(&mut self, code: i64) -> Result<()> {
        self.tax_system_code = Some(coded("tax_system_code", code, TAX_SYSTEM_CODES)?);
        Ok(())
    }

    pub fn set_items(&mut self, items: Vec<ReceiptItem>) {
        self.items = items;
    }

    pub fn add_item(&mut self, item: impl Coerce<ReceiptItem>) -> Result<()> {
        self.items.push(item.coerce()?);
        Ok(())
    }

    pub fn has_contact(&self) -> bool {
        self.phone.is_some() || self.email.is_some()
    }
}

impl FromMapping for Receipt {
    const TYPE_NAME: &'static str = "Receipt";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut receipt = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "phone" => receipt.set_phone(read_string(value)?)?,
                "email" => receipt.set_email(read_string(value)?)?,
                "tax_system_code" => receipt.set_tax_system_code(read_integer(value)?)?,
                "items" => receipt.set_items(read_sequence(value)?),
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(receipt)
    }
}

impl OrderedFields for Receipt {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("phone", self.phone.clone())
            .with_opt("email", self.email.clone())
            .with_opt("tax_system_code", self.tax_system_code)
            .with_sequence("items", &self.items)
            .finish()
    }
}

impl TryFrom<Value> for Receipt {
    type Error = PaymentError;

    fn try_from(value: Value) -> Result<Self> {
        match &value {
            Value::Object(map) => Self::from_mapping(map),
            other => Err(PaymentError::mismatch(Self::TYPE_NAME, kind_of(other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Currency;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn raw_receipt() -> Value {
        json!({
            "phone": "79990000000",
            "email": "test@email",
            "tax_system_code": 1,
            "items": [
                {
                    "description": "Product 1",
                    "quantity": "2.0",
                    "amount": {"value": "250.0", "currency": "RUB"},
                    "vat_code": 2,
                    "payment_subject": "commodity",
                    "payment_mode": "full_payment"
                }
            ]
        })
    }

    #[test]
    fn test_receipt_from_mapping() {
        let receipt = Receipt::try_from(raw_receipt()).unwrap();
        assert_eq!(receipt.phone(), Some("79990000000"));
        assert_eq!(receipt.tax_system_code(), Some(1));

        let item = &receipt.items()[0];
        assert_eq!(item.quantity(), Some(dec!(2.0)));
        assert_eq!(item.amount().and_then(Amount::currency), Some(Currency::Rub));
        assert_eq!(item.payment_subject(), Some(PaymentSubject::Commodity));
        assert_eq!(item.payment_mode(), Some(PaymentMode::FullPayment));
        assert!(item.is_self_priced());
    }

    #[test]
    fn test_receipt_ordered_fields_round_trip() {
        let receipt = Receipt::try_from(raw_receipt()).unwrap();
        assert_eq!(Value::Object(receipt.to_ordered_fields()), raw_receipt());
    }

    #[test]
    fn test_unset_items_are_not_rendered() {
        let receipt = Receipt::try_from(json!({"phone": "79990000000"})).unwrap();
        assert_eq!(
            Value::Object(receipt.to_ordered_fields()),
            json!({"phone": "79990000000"})
        );
        let keys: Vec<String> = receipt.to_ordered_fields().keys().cloned().collect();
        assert_eq!(keys, ["phone"]);
    }

    #[test]
    fn test_item_quantity_must_be_positive() {
        let mut item = ReceiptItem::default();
        assert!(item.set_quantity(dec!(0)).is_err());
        assert!(item.set_quantity(dec!(-1)).is_err());
        assert!(item.set_quantity(dec!(0.5)).is_ok());
    }

    #[test]
    fn test_vat_code_range() {
        let mut item = ReceiptItem::default();
        assert!(item.set_vat_code(7).is_err());
        assert!(item.set_vat_code(6).is_ok());
    }

    #[test]
    fn test_unknown_payment_subject() {
        let result: Result<ReceiptItem> = json!({"payment_subject": "spaceship"}).coerce();
        assert!(matches!(result, Err(PaymentError::ValidationError(_))));
    }

    #[test]
    fn test_phone_and_email_format() {
        let mut receipt = Receipt::default();
        assert!(!receipt.has_contact());
        assert!(receipt.set_phone("+79990000000").is_ok());
        assert!(receipt.set_phone("7999-000").is_err());
        assert!(receipt.set_email("nobody").is_err());
        assert!(receipt.has_contact());
    }

    #[test]
    fn test_add_item_coerces_mapping() {
        let mut receipt = Receipt::default();
        receipt
            .add_item(json!({"description": "Product 2", "quantity": 1}))
            .unwrap();
        assert!(receipt.add_item(json!(["not", "an", "item"])).is_err());
        assert_eq!(receipt.items().len(), 1);
        assert!(!receipt.items()[0].is_self_priced());
    }
}
