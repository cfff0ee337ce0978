//! API request and response data models.
//!
//! These structures define the public API contract. They use serde for
//! (de)serialization and are annotated with `utoipa` for the generated
//! OpenAPI documentation.

pub mod convert;
