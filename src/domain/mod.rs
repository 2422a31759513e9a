//! Typed value objects of a payment request and the coercion rules that
//! build them from raw JSON.

pub mod airline;
pub mod amount;
pub mod clock;
pub mod coerce;
pub mod confirmation;
pub mod discriminator;
pub mod payment_data;
pub mod receipt;
pub mod recipient;
