use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness/identity response returned by the base API endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    /// Fixed service identity string
    pub message: String,
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure
    pub error: String,
}

/// Form payload accepted on the conversion endpoint when the body is
/// `application/x-www-form-urlencoded` (no file upload possible there)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertForm {
    /// Inline text to convert, one paragraph per line
    pub text_content: Option<String>,
}
