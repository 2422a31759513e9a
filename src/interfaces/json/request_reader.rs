use crate::domain::coerce::{Mapping, kind_of};
use crate::error::{PaymentError, Result};
use serde_json::Value;
use std::io::Read;

/// Reads a raw payment request mapping from a JSON source.
///
/// The result is the untyped mapping; turning it into a
/// [`crate::application::request::PaymentRequest`] is left to the caller so
/// that coercion errors are reported separately from syntax errors.
pub struct RequestReader<R: Read> {
    source: R,
}

impl<R: Read> RequestReader<R> {
    /// Creates a new `RequestReader` from any `Read` source (e.g. File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<Mapping> {
        match serde_json::from_reader(self.source)? {
            Value::Object(map) => Ok(map),
            other => Err(PaymentError::mismatch(
                "a PaymentRequest mapping",
                kind_of(&other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_valid_document() {
        let data = r#"{"amount": {"value": "1.0", "currency": "RUB"}, "capture": true}"#;
        let map = RequestReader::new(data.as_bytes()).read().unwrap();

        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, ["amount", "capture"]);
    }

    #[test]
    fn test_reader_malformed_json() {
        let data = r#"{"amount": "#;
        let result = RequestReader::new(data.as_bytes()).read();
        assert!(matches!(result, Err(PaymentError::JsonError(_))));
    }

    #[test]
    fn test_reader_rejects_top_level_array() {
        let result = RequestReader::new("[1, 2]".as_bytes()).read();
        assert!(matches!(result, Err(PaymentError::TypeMismatch { .. })));
    }
}
