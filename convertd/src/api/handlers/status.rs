use axum::Json;

use crate::api::models::convert::StatusResponse;

/// Fixed identity string returned by the base API endpoints.
pub const SERVICE_IDENTITY: &str = "convertd backend (TXT to DOCX) is running";

#[utoipa::path(
    get,
    path = "/api",
    tag = "status",
    summary = "Liveness check",
    description = "Returns the fixed service identity string. Also served at `/api/index`.",
    responses(
        (status = 200, description = "Service is running", body = StatusResponse)
    )
)]
pub async fn index() -> Json<StatusResponse> {
    tracing::info!("Base API endpoint called");
    Json(StatusResponse {
        message: SERVICE_IDENTITY.to_string(),
    })
}
