//! Resolution of polymorphic mappings through their `type` discriminator.

use crate::domain::coerce::{Mapping, kind_of};
use crate::error::{PaymentError, Result};
use serde_json::Value;

/// Key holding the discriminator in every polymorphic mapping.
pub const DISCRIMINATOR: &str = "type";

pub type Constructor<T> = fn(&Mapping) -> Result<T>;

/// Closed set of concrete variants for one family, keyed by discriminator.
pub struct Registry<T: 'static> {
    family: &'static str,
    variants: &'static [(&'static str, Constructor<T>)],
}

impl<T: 'static> Registry<T> {
    pub const fn new(
        family: &'static str,
        variants: &'static [(&'static str, Constructor<T>)],
    ) -> Self {
        Self { family, variants }
    }

    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants.iter().map(|(name, _)| *name)
    }

    /// Builds the variant named by the mapping's `type` key.
    pub fn resolve(&self, map: &Mapping) -> Result<T> {
        let tag = match map.get(DISCRIMINATOR) {
            Some(Value::String(tag)) => tag,
            Some(other) => {
                return Err(PaymentError::mismatch(
                    format!("{} discriminator string", self.family),
                    kind_of(other),
                ));
            }
            None => {
                return Err(PaymentError::invalid(format!(
                    "{} mapping has no '{DISCRIMINATOR}' key",
                    self.family
                )));
            }
        };

        match self.variants.iter().find(|(name, _)| name == tag) {
            Some((_, construct)) => construct(map),
            None => Err(PaymentError::invalid(format!(
                "unknown {} type '{tag}', expected one of: {}",
                self.family,
                self.discriminators().collect::<Vec<_>>().join(", ")
            ))),
        }
    }
}

/// Checks that a mapping used to build one concrete variant does not name
/// another one. A missing `type` is accepted.
pub fn expect_discriminator(map: &Mapping, expected: &str) -> Result<()> {
    match map.get(DISCRIMINATOR) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::String(tag)) if tag == expected => Ok(()),
        Some(other) => Err(PaymentError::invalid(format!(
            "mapping with '{DISCRIMINATOR}' {other} cannot build a '{expected}' variant"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Shape {
        Dot,
        Line,
    }

    fn dot(_: &Mapping) -> Result<Shape> {
        Ok(Shape::Dot)
    }

    fn line(_: &Mapping) -> Result<Shape> {
        Ok(Shape::Line)
    }

    static SHAPES: Registry<Shape> = Registry::new("Shape", &[("dot", dot), ("line", line)]);

    fn mapping(value: Value) -> Mapping {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_resolve_known_variant() {
        assert_eq!(SHAPES.resolve(&mapping(json!({"type": "line"}))).unwrap(), Shape::Line);
        assert_eq!(SHAPES.resolve(&mapping(json!({"type": "dot"}))).unwrap(), Shape::Dot);
    }

    #[test]
    fn test_resolve_missing_or_unknown_type() {
        assert!(matches!(
            SHAPES.resolve(&mapping(json!({}))),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            SHAPES.resolve(&mapping(json!({"type": "circle"}))),
            Err(PaymentError::ValidationError(_))
        ));
        assert!(matches!(
            SHAPES.resolve(&mapping(json!({"type": 3}))),
            Err(PaymentError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_expect_discriminator() {
        assert!(expect_discriminator(&mapping(json!({})), "dot").is_ok());
        assert!(expect_discriminator(&mapping(json!({"type": "dot"})), "dot").is_ok());
        assert!(expect_discriminator(&mapping(json!({"type": "line"})), "dot").is_err());
    }
}
