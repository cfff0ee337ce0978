//! OpenAPI documentation configuration.
//!
//! Aggregates the annotated handler paths and API models into a single
//! [`ApiDoc`] served at `/api-docs/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::api;
use crate::api::models::convert::{ErrorResponse, StatusResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "convertd",
        description = "TXT to DOCX conversion service: upload a plain-text file or submit \
            inline text and receive a Word document with one paragraph per input line."
    ),
    paths(api::handlers::status::index, api::handlers::convert::convert_txt_to_docx),
    components(schemas(StatusResponse, ErrorResponse)),
    tags(
        (name = "status", description = "Liveness and identity"),
        (name = "convert", description = "Text to document conversion")
    )
)]
pub struct ApiDoc;
