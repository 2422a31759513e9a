use crate::application::request::PaymentRequest;
use crate::error::Result;
use std::io::Write;

/// Writes the ordered wire mapping of a request as JSON.
pub struct RequestWriter<W: Write> {
    sink: W,
}

impl<W: Write> RequestWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn write(&mut self, request: &PaymentRequest, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut self.sink, request)?;
        } else {
            serde_json::to_writer(&mut self.sink, request)?;
        }
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_writer_compact_output() {
        let request = PaymentRequest::try_from(json!({
            "amount": {"value": 0.1, "currency": "RUB"},
            "payment_method_data": {"type": "webmoney"}
        }))
        .unwrap();

        let mut buffer = Vec::new();
        RequestWriter::new(&mut buffer).write(&request, false).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"amount\":{\"value\":\"0.1\",\"currency\":\"RUB\"},\
             \"payment_method_data\":{\"type\":\"webmoney\"}}\n"
        );
    }

    #[test]
    fn test_writer_pretty_output_is_multiline() {
        let mut request = PaymentRequest::new();
        request.set_capture(true);

        let mut buffer = Vec::new();
        RequestWriter::new(&mut buffer).write(&request, true).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\n  \"capture\": true\n}\n"
        );
    }
}
