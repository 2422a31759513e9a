//! Adapters between the request model and external formats.

pub mod json;
