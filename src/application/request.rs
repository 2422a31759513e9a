use crate::application::validator;
use crate::domain::airline::Airline;
use crate::domain::amount::Amount;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::coerce::{
    Coerce, Fields, FromMapping, Mapping, OrderedFields, bounded, ignore_unknown, kind_of,
    non_empty, present_fields, read_bool, read_string,
};
use crate::domain::confirmation::Confirmation;
use crate::domain::payment_data::PaymentData;
use crate::domain::receipt::Receipt;
use crate::domain::recipient::Recipient;
use crate::error::{PaymentError, Result};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::net::IpAddr;

/// A "create payment" request.
///
/// Built empty or from a raw mapping, then adjusted through the typed
/// setters. Every setter coerces its input and enforces the constraints of a
/// single field; rules spanning several fields are checked by
/// [`PaymentRequest::validate`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PaymentRequest {
    amount: Option<Amount>,
    description: Option<String>,
    recipient: Option<Recipient>,
    save_payment_method: Option<bool>,
    capture: Option<bool>,
    payment_method_data: Option<PaymentData>,
    receipt: Option<Receipt>,
    payment_method_id: Option<String>,
    payment_token: Option<String>,
    confirmation: Option<Confirmation>,
    client_ip: Option<String>,
    airline: Option<Airline>,
    metadata: Option<Mapping>,
}

impl PaymentRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self) -> Option<&Amount> {
        self.amount.as_ref()
    }

    pub fn set_amount(&mut self, amount: impl Coerce<Amount>) -> Result<()> {
        self.amount = Some(amount.coerce()?);
        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<()> {
        self.description = Some(bounded("description", description.into(), 128)?);
        Ok(())
    }

    pub fn recipient(&self) -> Option<&Recipient> {
        self.recipient.as_ref()
    }

    pub fn recipient_mut(&mut self) -> Option<&mut Recipient> {
        self.recipient.as_mut()
    }

    pub fn set_recipient(&mut self, recipient: impl Coerce<Recipient>) -> Result<()> {
        self.recipient = Some(recipient.coerce()?);
        Ok(())
    }

    pub fn save_payment_method(&self) -> Option<bool> {
        self.save_payment_method
    }

    pub fn set_save_payment_method(&mut self, save: bool) {
        self.save_payment_method = Some(save);
    }

    pub fn capture(&self) -> Option<bool> {
        self.capture
    }

    pub fn set_capture(&mut self, capture: bool) {
        self.capture = Some(capture);
    }

    pub fn payment_method_data(&self) -> Option<&PaymentData> {
        self.payment_method_data.as_ref()
    }

    pub fn payment_method_data_mut(&mut self) -> Option<&mut PaymentData> {
        self.payment_method_data.as_mut()
    }

    pub fn set_payment_method_data(&mut self, data: impl Coerce<PaymentData>) -> Result<()> {
        self.payment_method_data = Some(data.coerce()?);
        Ok(())
    }

    pub fn clear_payment_method_data(&mut self) -> Option<PaymentData> {
        self.payment_method_data.take()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    pub fn receipt_mut(&mut self) -> Option<&mut Receipt> {
        self.receipt.as_mut()
    }

    pub fn set_receipt(&mut self, receipt: impl Coerce<Receipt>) -> Result<()> {
        self.receipt = Some(receipt.coerce()?);
        Ok(())
    }

    pub fn payment_method_id(&self) -> Option<&str> {
        self.payment_method_id.as_deref()
    }

    pub fn set_payment_method_id(&mut self, id: impl Into<String>) -> Result<()> {
        self.payment_method_id = Some(non_empty("payment_method_id", id.into())?);
        Ok(())
    }

    pub fn clear_payment_method_id(&mut self) -> Option<String> {
        self.payment_method_id.take()
    }

    pub fn payment_token(&self) -> Option<&str> {
        self.payment_token.as_deref()
    }

    pub fn set_payment_token(&mut self, token: impl Into<String>) -> Result<()> {
        self.payment_token = Some(non_empty("payment_token", token.into())?);
        Ok(())
    }

    pub fn clear_payment_token(&mut self) -> Option<String> {
        self.payment_token.take()
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn confirmation_mut(&mut self) -> Option<&mut Confirmation> {
        self.confirmation.as_mut()
    }

    pub fn set_confirmation(&mut self, confirmation: impl Coerce<Confirmation>) -> Result<()> {
        self.confirmation = Some(confirmation.coerce()?);
        Ok(())
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    /// Sets the payer's IPv4 or IPv6 address.
    pub fn set_client_ip(&mut self, ip: impl Into<String>) -> Result<()> {
        let ip = ip.into();
        if ip.parse::<IpAddr>().is_err() {
            return Err(PaymentError::invalid(format!(
                "client_ip '{ip}' is not an IP address"
            )));
        }
        self.client_ip = Some(ip);
        Ok(())
    }

    pub fn airline(&self) -> Option<&Airline> {
        self.airline.as_ref()
    }

    pub fn set_airline(&mut self, airline: impl Coerce<Airline>) -> Result<()> {
        self.airline = Some(airline.coerce()?);
        Ok(())
    }

    pub fn metadata(&self) -> Option<&Mapping> {
        self.metadata.as_ref()
    }

    /// Sets free-form metadata. Anything but a JSON object is rejected.
    pub fn set_metadata(&mut self, metadata: impl Into<Value>) -> Result<()> {
        match metadata.into() {
            Value::Object(map) => {
                self.metadata = Some(map);
                Ok(())
            }
            other => Err(PaymentError::mismatch("metadata mapping", kind_of(&other))),
        }
    }

    /// Checks the cross-field business rules against the system clock.
    ///
    /// Stops at the first violated rule.
    pub fn validate(&self) -> Result<()> {
        self.validate_with(&SystemClock)
    }

    /// Same as [`PaymentRequest::validate`], reading "now" from `clock`.
    pub fn validate_with(&self, clock: &dyn Clock) -> Result<()> {
        validator::validate(self, clock)
    }

    fn set_field(&mut self, key: &str, value: &Value) -> Result<()> {
        match key {
            "amount" => self.set_amount(value),
            "description" => self.set_description(read_string(value)?),
            "recipient" => self.set_recipient(value),
            "save_payment_method" => {
                self.set_save_payment_method(read_bool(value)?);
                Ok(())
            }
            "capture" => {
                self.set_capture(read_bool(value)?);
                Ok(())
            }
            "payment_method_data" => self.set_payment_method_data(value),
            "receipt" => self.set_receipt(value),
            "payment_method_id" => self.set_payment_method_id(read_string(value)?),
            "payment_token" => self.set_payment_token(read_string(value)?),
            "confirmation" => self.set_confirmation(value),
            "client_ip" => self.set_client_ip(read_string(value)?),
            "airline" => self.set_airline(value),
            "metadata" => self.set_metadata(value.clone()),
            _ => {
                ignore_unknown(Self::TYPE_NAME, key);
                Ok(())
            }
        }
    }
}

impl FromMapping for PaymentRequest {
    const TYPE_NAME: &'static str = "PaymentRequest";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut request = Self::new();
        for (key, value) in present_fields(map) {
            request.set_field(key, value)?;
        }
        Ok(request)
    }
}

impl TryFrom<Value> for PaymentRequest {
    type Error = PaymentError;

    fn try_from(value: Value) -> Result<Self> {
        value.coerce()
    }
}

impl OrderedFields for PaymentRequest {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_nested("amount", self.amount.as_ref())
            .with_opt("description", self.description.clone())
            .with_nested("recipient", self.recipient.as_ref())
            .with_opt("save_payment_method", self.save_payment_method)
            .with_opt("capture", self.capture)
            .with_nested("payment_method_data", self.payment_method_data.as_ref())
            .with_nested("receipt", self.receipt.as_ref())
            .with_opt("payment_method_id", self.payment_method_id.clone())
            .with_opt("payment_token", self.payment_token.clone())
            .with_nested("confirmation", self.confirmation.as_ref())
            .with_opt("client_ip", self.client_ip.clone())
            .with_nested("airline", self.airline.as_ref())
            .with_opt("metadata", self.metadata.clone())
            .finish()
    }
}

impl Serialize for PaymentRequest {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_ordered_fields().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::amount::Currency;
    use crate::domain::confirmation::RedirectConfirmation;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_empty_request_renders_empty_mapping() {
        assert!(PaymentRequest::new().to_ordered_fields().is_empty());
    }

    #[test]
    fn test_fields_render_in_declaration_order() {
        let mut request = PaymentRequest::new();
        request.set_metadata(json!({"key": "value"})).unwrap();
        request
            .set_confirmation(RedirectConfirmation::new("return.url").unwrap())
            .unwrap();
        request.set_capture(false);
        request
            .set_amount(Amount::new(dec!(0.1), Currency::Rub).unwrap())
            .unwrap();

        let keys: Vec<String> = request.to_ordered_fields().keys().cloned().collect();
        assert_eq!(keys, ["amount", "capture", "confirmation", "metadata"]);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let request =
            PaymentRequest::try_from(json!({"amount": {"value": 1, "currency": "RUB"}, "tip": 5}))
                .unwrap();
        assert_eq!(
            Value::Object(request.to_ordered_fields()),
            json!({"amount": {"value": "1", "currency": "RUB"}})
        );
    }

    #[test]
    fn test_null_fields_stay_unset() {
        let request = PaymentRequest::try_from(json!({"description": null})).unwrap();
        assert_eq!(request.description(), None);
    }

    #[test]
    fn test_primitive_setters() {
        let mut request = PaymentRequest::new();
        assert!(request.set_client_ip("192.0.0.0").is_ok());
        assert!(request.set_client_ip("::1").is_ok());
        assert!(request.set_client_ip("localhost").is_err());
        assert!(request.set_description("x".repeat(129)).is_err());
        assert!(matches!(
            request.set_metadata(json!(["key", "value"])),
            Err(PaymentError::TypeMismatch { .. })
        ));
        assert!(matches!(
            request.set_payment_method_id(""),
            Err(PaymentError::ValidationError(_))
        ));
    }

    #[test]
    fn test_clear_conflicting_paths() {
        let mut request = PaymentRequest::new();
        request.set_payment_token("123").unwrap();
        request.set_payment_method_id("456").unwrap();
        request.set_payment_method_data(PaymentData::Webmoney).unwrap();

        assert_eq!(request.clear_payment_token().as_deref(), Some("123"));
        assert_eq!(request.clear_payment_method_id().as_deref(), Some("456"));
        assert_eq!(request.clear_payment_method_data(), Some(PaymentData::Webmoney));
        assert!(request.to_ordered_fields().is_empty());
    }

    #[test]
    fn test_serialize_uses_ordered_fields() {
        let mut request = PaymentRequest::new();
        request.set_payment_token("99091209012").unwrap();
        request.set_save_payment_method(true);
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"save_payment_method":true,"payment_token":"99091209012"}"#
        );
    }
}
