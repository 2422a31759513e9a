//! Application layer: the payment request aggregate and its validation.
//!
//! [`request::PaymentRequest`] owns the typed value objects from the domain
//! layer. [`validator`] holds the ordered, fail-fast business rules that run
//! before a request is handed to a transport.

pub mod request;
pub mod validator;
