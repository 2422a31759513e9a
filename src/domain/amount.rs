use crate::domain::coerce::{
    Fields, FromMapping, Mapping, OrderedFields, ignore_unknown, present_fields, read_decimal,
    read_string,
};
use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// ISO 4217 currencies accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Rub,
    Usd,
    Eur,
    Byn,
    Cny,
    Kzt,
    Uah,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Rub,
        Currency::Usd,
        Currency::Eur,
        Currency::Byn,
        Currency::Cny,
        Currency::Kzt,
        Currency::Uah,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Rub => "RUB",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Byn => "BYN",
            Currency::Cny => "CNY",
            Currency::Kzt => "KZT",
            Currency::Uah => "UAH",
        }
    }
}

impl FromStr for Currency {
    type Err = PaymentError;

    fn from_str(s: &str) -> Result<Self> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == s)
            .ok_or_else(|| PaymentError::invalid(format!("unknown currency '{s}'")))
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary amount in a given currency.
///
/// The value is never negative. Whether it must be strictly positive depends
/// on where the amount is used, so that check belongs to request validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Amount {
    value: Option<Decimal>,
    currency: Option<Currency>,
}

impl Amount {
    pub fn new(value: Decimal, currency: Currency) -> Result<Self> {
        let mut amount = Self::default();
        amount.set_value(value)?;
        amount.set_currency(currency);
        Ok(amount)
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency
    }

    pub fn set_value(&mut self, value: Decimal) -> Result<()> {
        if value < Decimal::ZERO {
            return Err(PaymentError::invalid("Amount value must not be negative"));
        }
        self.value = Some(value);
        Ok(())
    }

    pub fn set_currency(&mut self, currency: Currency) {
        self.currency = Some(currency);
    }

    /// True when both fields are set and the value is above zero.
    pub fn is_positive(&self) -> bool {
        self.value.is_some_and(|v| v > Decimal::ZERO) && self.currency.is_some()
    }
}

impl FromMapping for Amount {
    const TYPE_NAME: &'static str = "Amount";

    fn from_mapping(map: &Mapping) -> Result<Self> {
        let mut amount = Self::default();
        for (key, value) in present_fields(map) {
            match key {
                "value" => amount.set_value(read_decimal(value)?)?,
                "currency" => amount.set_currency(read_string(value)?.parse()?),
                _ => ignore_unknown(Self::TYPE_NAME, key),
            }
        }
        Ok(amount)
    }
}

impl OrderedFields for Amount {
    fn to_ordered_fields(&self) -> Mapping {
        Fields::new()
            .with_opt("value", self.value.map(|v| v.to_string()))
            .with_opt("currency", self.currency.map(|c| c.code()))
            .finish()
    }
}
