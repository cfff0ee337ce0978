//! HTTP request handlers.

pub mod convert;
pub mod status;
