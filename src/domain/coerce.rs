//! Coercion of loosely-typed JSON input into the typed model.
//!
//! Every typed setter goes through [`Coerce`]: a value that already has the
//! target type is stored as-is, a mapping is converted through
//! [`FromMapping`], anything else is a [`PaymentError::TypeMismatch`].

use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Raw, insertion-ordered JSON object.
pub type Mapping = Map<String, Value>;

/// Types that can be built from a raw mapping of their fields.
pub trait FromMapping: Sized {
    /// Name used in type mismatch messages.
    const TYPE_NAME: &'static str;

    fn from_mapping(map: &Mapping) -> Result<Self>;
}

/// Ordered mapping view used for serialization.
///
/// Only fields that were explicitly set are present, in declaration order.
pub trait OrderedFields {
    fn to_ordered_fields(&self) -> Mapping;
}

/// Conversion accepted by every typed property setter.
pub trait Coerce<T> {
    fn coerce(self) -> Result<T>;
}

impl<T: FromMapping> Coerce<T> for T {
    fn coerce(self) -> Result<T> {
        Ok(self)
    }
}

impl<T: FromMapping> Coerce<T> for Value {
    fn coerce(self) -> Result<T> {
        match self {
            Value::Object(map) => T::from_mapping(&map),
            other => Err(mapping_mismatch::<T>(&other)),
        }
    }
}

impl<T: FromMapping> Coerce<T> for &Value {
    fn coerce(self) -> Result<T> {
        match self {
            Value::Object(map) => T::from_mapping(map),
            other => Err(mapping_mismatch::<T>(other)),
        }
    }
}

impl<T: FromMapping> Coerce<T> for Mapping {
    fn coerce(self) -> Result<T> {
        T::from_mapping(&self)
    }
}

fn mapping_mismatch<T: FromMapping>(value: &Value) -> PaymentError {
    PaymentError::mismatch(
        format!("{0} or a mapping convertible to {0}", T::TYPE_NAME),
        kind_of(value),
    )
}

/// Short name of a JSON value's kind, for error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Fields of a mapping that carry a value; `null` counts as absent.
pub fn present_fields(map: &Mapping) -> impl Iterator<Item = (&str, &Value)> {
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.as_str(), value))
}

pub(crate) fn ignore_unknown(type_name: &str, key: &str) {
    tracing::trace!("ignoring unknown field '{}' for {}", key, type_name);
}

pub fn read_string(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(PaymentError::mismatch("string", kind_of(other))),
    }
}

pub fn read_bool(value: &Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(PaymentError::mismatch("boolean", kind_of(other))),
    }
}

pub fn read_integer(value: &Value) -> Result<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| PaymentError::invalid(format!("{n} is not an integer"))),
        other => Err(PaymentError::mismatch("integer", kind_of(other))),
    }
}

/// Reads a decimal from a JSON number or a decimal string.
///
/// Numbers keep the text they were written with, so `0.1` becomes exactly
/// `0.1`. A value that does not fit a `Decimal` without rounding is rejected.
pub fn read_decimal(value: &Value) -> Result<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        other => return Err(PaymentError::mismatch("decimal", kind_of(other))),
    };
    parse_decimal(&text)
}

pub(crate) fn parse_decimal(text: &str) -> Result<Decimal> {
    let parsed = if text.contains(['e', 'E']) {
        Decimal::from_scientific(text)
    } else {
        Decimal::from_str_exact(text)
    };
    parsed
        .map_err(|_| PaymentError::invalid(format!("'{text}' is not a representable decimal")))
}

/// Reads a short code that may be given either as a string or an integer.
pub fn read_code(value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) if n.is_u64() => Ok(n.to_string()),
        other => Err(PaymentError::mismatch("string or integer", kind_of(other))),
    }
}

/// Reads a JSON array whose elements each coerce into `T`.
pub fn read_sequence<T: FromMapping>(value: &Value) -> Result<Vec<T>> {
    match value {
        Value::Array(elements) => elements
            .iter()
            .map(|element| Coerce::<T>::coerce(element))
            .collect(),
        other => Err(PaymentError::mismatch(
            format!("sequence of {}", T::TYPE_NAME),
            kind_of(other),
        )),
    }
}

/// Rejects empty strings for fields where an empty token is meaningless.
pub(crate) fn non_empty(field: &str, value: String) -> Result<String> {
    if value.is_empty() {
        Err(PaymentError::invalid(format!("{field} must not be empty")))
    } else {
        Ok(value)
    }
}

pub(crate) fn bounded(field: &str, value: String, max_chars: usize) -> Result<String> {
    let value = non_empty(field, value)?;
    if value.chars().count() > max_chars {
        Err(PaymentError::invalid(format!(
            "{field} must be at most {max_chars} characters"
        )))
    } else {
        Ok(value)
    }
}

pub(crate) fn digits(field: &str, value: String, min: usize, max: usize) -> Result<String> {
    if (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(value)
    } else if min == max {
        Err(PaymentError::invalid(format!(
            "{field} must be exactly {min} digits, got '{value}'"
        )))
    } else {
        Err(PaymentError::invalid(format!(
            "{field} must be {min} to {max} digits, got '{value}'"
        )))
    }
}

/// Builder for the ordered mapping view.
#[derive(Default)]
pub(crate) struct Fields(Mapping);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn with_opt<V: Into<Value>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn with_nested<T: OrderedFields>(self, key: &str, value: Option<&T>) -> Self {
        self.with_opt(key, value.map(|v| Value::Object(v.to_ordered_fields())))
    }

    /// Renders a sequence; an empty one is left out like an unset field.
    pub fn with_sequence<T: OrderedFields>(self, key: &str, values: &[T]) -> Self {
        if values.is_empty() {
            return self;
        }
        let rendered: Vec<Value> = values
            .iter()
            .map(|v| Value::Object(v.to_ordered_fields()))
            .collect();
        self.with(key, rendered)
    }

    pub fn finish(self) -> Mapping {
        self.0
    }
}
