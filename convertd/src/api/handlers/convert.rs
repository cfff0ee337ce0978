use axum::{
    extract::{Form, FromRequest, Multipart, Request, State},
    http::header,
    response::{IntoResponse, Response},
};
use bytes::Bytes;

use crate::AppState;
use crate::api::models::convert::ConvertForm;
use crate::docx;
use crate::errors::{Error, Result};

/// An uploaded file captured from the multipart payload.
struct UploadedFile {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Text payload resolved from one of the two input modes.
struct ResolvedInput {
    text: String,
    /// Original filename when the input came from a file upload
    filename: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/convert-txt-to-docx",
    tag = "convert",
    summary = "Convert plain text to DOCX",
    description = "Accepts a plain-text upload (multipart field `file`) or inline text \
        (field `text_content`) and returns a DOCX document with one paragraph per input \
        line. When both inputs are present, the file takes precedence.",
    request_body(
        content_type = "multipart/form-data",
        description = "A `file` part with plain-text content, or a `text_content` field"
    ),
    responses(
        (status = 200, description = "Generated DOCX document, served as an attachment",
         content_type = "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        (status = 400, description = "Missing, empty, or unsupported input", body = crate::api::models::convert::ErrorResponse),
        (status = 500, description = "Decoding or document construction failed", body = crate::api::models::convert::ErrorResponse)
    )
)]
pub async fn convert_txt_to_docx(State(state): State<AppState>, request: Request) -> Result<Response> {
    tracing::info!("Received conversion request");

    let input = resolve_input(&state, request).await?;

    // The emptiness check applies to both input modes: a file that decoded
    // successfully but contains only whitespace is rejected the same way as
    // whitespace-only inline text.
    if input.text.trim().is_empty() {
        tracing::warn!("Resolved text content is empty");
        return Err(Error::EmptyContent);
    }

    let output_filename = docx::derive_output_filename(input.filename.as_deref());

    tracing::info!(filename = %output_filename, "Building DOCX document");
    let document = docx::build_document(&input.text);
    let buffer = docx::serialize_document(document)?;

    tracing::info!(filename = %output_filename, bytes = buffer.len(), "Conversion succeeded, sending file");
    Ok((
        [
            (header::CONTENT_TYPE, docx::DOCX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{output_filename}\"")),
        ],
        buffer,
    )
        .into_response())
}

/// Resolve the text payload from the request body.
///
/// Input resolution is ordered, first match wins: a non-empty file upload,
/// then an inline `text_content` field, then failure. The file silently takes
/// precedence when both are supplied.
async fn resolve_input(state: &AppState, request: Request) -> Result<ResolvedInput> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, state).await.map_err(|e| Error::BadRequest {
            message: format!("Failed to parse multipart data: {e}"),
        })?;

        let mut file: Option<UploadedFile> = None;
        let mut text_content: Option<String> = None;

        while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to parse multipart data: {e}"),
        })? {
            let field_name = field.name().unwrap_or("").to_string();

            match field_name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let declared_type = field.content_type().map(|s| s.to_string());
                    let data = field.bytes().await.map_err(|e| Error::BadRequest {
                        message: format!("Failed to read uploaded file: {e}"),
                    })?;

                    // Browsers send a `file` part with an empty filename when no
                    // file was chosen; treat that as no file supplied.
                    if !filename.is_empty() {
                        file = Some(UploadedFile {
                            filename,
                            content_type: declared_type,
                            data,
                        });
                    }
                }
                "text_content" => {
                    text_content = Some(field.text().await.map_err(|e| Error::BadRequest {
                        message: format!("Failed to read text_content field: {e}"),
                    })?);
                }
                _ => {}
            }
        }

        if let Some(file) = file {
            tracing::info!(filename = %file.filename, content_type = ?file.content_type, "Received uploaded file");
            return resolve_file(file);
        }
        if let Some(text) = text_content {
            tracing::info!("Received inline text_content from form");
            return Ok(ResolvedInput { text, filename: None });
        }
        return Err(Error::MissingInput);
    }

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<ConvertForm>::from_request(request, state).await.map_err(|e| Error::BadRequest {
            message: format!("Failed to parse form data: {e}"),
        })?;

        if let Some(text) = form.text_content {
            tracing::info!("Received inline text_content from form");
            return Ok(ResolvedInput { text, filename: None });
        }
        return Err(Error::MissingInput);
    }

    Err(Error::MissingInput)
}

/// Validate an uploaded file and decode its bytes as UTF-8 text.
fn resolve_file(file: UploadedFile) -> Result<ResolvedInput> {
    let is_plain_text = file.content_type.as_deref() == Some("text/plain");
    let has_txt_extension = file.filename.to_lowercase().ends_with(".txt");

    if !is_plain_text && !has_txt_extension {
        tracing::warn!(filename = %file.filename, content_type = ?file.content_type, "Rejected upload with unsupported format");
        return Err(Error::UnsupportedFormat { filename: file.filename });
    }

    let text = String::from_utf8(file.data.to_vec())?;
    Ok(ResolvedInput {
        text,
        filename: Some(file.filename),
    })
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::status::SERVICE_IDENTITY;
    use crate::api::models::convert::{ErrorResponse, StatusResponse};
    use crate::docx::DOCX_MIME;
    use crate::{Application, Config};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use axum_test::multipart::{MultipartForm, Part};

    fn test_server() -> TestServer {
        Application::new(Config::default())
            .expect("Failed to build application")
            .into_test_server()
    }

    fn content_disposition(response: &axum_test::TestResponse) -> String {
        response
            .header("content-disposition")
            .to_str()
            .expect("content-disposition should be ascii")
            .to_string()
    }

    #[test_log::test(tokio::test)]
    async fn liveness_endpoints_return_identity_message() {
        let server = test_server();

        for path in ["/api", "/api/index"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::OK);
            let status: StatusResponse = response.json();
            assert_eq!(status.message, SERVICE_IDENTITY);
        }
    }

    #[test_log::test(tokio::test)]
    async fn inline_text_converts_with_default_filename() {
        let server = test_server();

        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_text("text_content", "first line\nsecond line"))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(response.header("content-type").to_str().unwrap(), DOCX_MIME);
        assert_eq!(
            content_disposition(&response),
            "attachment; filename=\"dokumen_hasil_konversi.docx\""
        );
        assert!(response.as_bytes().starts_with(b"PK"), "body should be a DOCX package");
    }

    #[test_log::test(tokio::test)]
    async fn uploaded_file_derives_output_filename() {
        let server = test_server();

        let file = Part::bytes("line one\n\nline three".as_bytes()).file_name("report.txt").mime_type("text/plain");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_part("file", file))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(content_disposition(&response), "attachment; filename=\"report.docx\"");
    }

    #[test_log::test(tokio::test)]
    async fn file_without_extension_keeps_full_base_name() {
        let server = test_server();

        let file = Part::bytes("plain text body".as_bytes()).file_name("notes").mime_type("text/plain");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_part("file", file))
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(content_disposition(&response), "attachment; filename=\"notes.docx\"");
    }

    #[test_log::test(tokio::test)]
    async fn file_takes_precedence_over_inline_text() {
        let server = test_server();

        let file = Part::bytes("from the file".as_bytes()).file_name("report.txt").mime_type("text/plain");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(
                MultipartForm::new()
                    .add_text("text_content", "from the form")
                    .add_part("file", file),
            )
            .await;

        response.assert_status(StatusCode::OK);
        // The derived filename proves the file input won
        assert_eq!(content_disposition(&response), "attachment; filename=\"report.docx\"");
    }

    #[test_log::test(tokio::test)]
    async fn whitespace_only_text_is_rejected() {
        let server = test_server();

        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_text("text_content", "   \n  "))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Text content is empty");
    }

    #[test_log::test(tokio::test)]
    async fn whitespace_only_file_is_rejected() {
        let server = test_server();

        let file = Part::bytes("  \n\t\n".as_bytes()).file_name("blank.txt").mime_type("text/plain");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_part("file", file))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "Text content is empty");
    }

    #[test_log::test(tokio::test)]
    async fn wrong_file_type_is_rejected() {
        let server = test_server();

        let file = Part::bytes(&b"\x89PNG\r\n"[..]).file_name("image.png").mime_type("image/png");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_part("file", file))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert!(error.error.contains("image.png"), "error should name the rejected file: {}", error.error);
    }

    #[test_log::test(tokio::test)]
    async fn missing_input_is_rejected() {
        let server = test_server();

        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_text("unrelated", "value"))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let error: ErrorResponse = response.json();
        assert_eq!(error.error, "No valid text input or file was supplied");
    }

    #[test_log::test(tokio::test)]
    async fn invalid_utf8_upload_is_a_server_error() {
        let server = test_server();

        let file = Part::bytes(&b"\xff\xfe\x80"[..]).file_name("weird.txt").mime_type("text/plain");
        let response = server
            .post("/api/convert-txt-to-docx")
            .multipart(MultipartForm::new().add_part("file", file))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let error: ErrorResponse = response.json();
        assert!(
            error.error.starts_with("Failed to read uploaded file"),
            "decode errors surface their cause: {}",
            error.error
        );
    }

    #[test_log::test(tokio::test)]
    async fn urlencoded_text_content_is_accepted() {
        let server = test_server();

        let response = server
            .post("/api/convert-txt-to-docx")
            .form(&[("text_content", "alpha\nbeta")])
            .await;

        response.assert_status(StatusCode::OK);
        assert_eq!(
            content_disposition(&response),
            "attachment; filename=\"dokumen_hasil_konversi.docx\""
        );
    }

    #[test_log::test(tokio::test)]
    async fn identical_requests_produce_equivalent_documents() {
        let server = test_server();

        let post = || {
            server
                .post("/api/convert-txt-to-docx")
                .multipart(MultipartForm::new().add_text("text_content", "same\ninput\nevery\ntime"))
        };

        let first = post().await;
        let second = post().await;

        first.assert_status(StatusCode::OK);
        second.assert_status(StatusCode::OK);
        assert_eq!(content_disposition(&first), content_disposition(&second));
        // The package may embed incidental metadata, but the structure (and
        // therefore the size) of two runs over the same input must match.
        assert_eq!(first.as_bytes().len(), second.as_bytes().len());
    }
}
