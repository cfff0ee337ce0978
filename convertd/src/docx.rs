//! DOCX document assembly and serialization.
//!
//! The document body is a straight one-to-one mapping: every line of input
//! text becomes one paragraph, in input order, with empty lines preserved as
//! empty paragraphs. All package-level structure (content types, relationships,
//! styles) is produced by [`docx_rs`]; this module only controls paragraph
//! content and the derived output filename.

use std::io::Cursor;

use docx_rs::{Docx, Paragraph, Run};

use crate::errors::{Error, Result};

/// File extension of the generated document package
pub const DOCX_EXTENSION: &str = "docx";

/// MIME type of the generated document package
pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Output base name used when the input carried no filename (inline text)
pub const DEFAULT_BASE_NAME: &str = "dokumen_hasil_konversi";

/// Build an in-memory document with one paragraph per line of `text`.
///
/// Lines are split on newline boundaries without collapsing consecutive
/// newlines, so an empty string between two newlines yields an empty
/// paragraph. No other transformation is applied.
pub fn build_document(text: &str) -> Docx {
    let mut docx = Docx::new();
    for line in text.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
    }
    docx
}

/// Serialize a document into its binary package representation.
///
/// The buffer is fully materialized before being returned; there is no
/// partial or streaming write.
pub fn serialize_document(docx: Docx) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    docx.build().pack(&mut buffer).map_err(|e| Error::Internal {
        operation: format!("serialize the document package: {e}"),
    })?;
    Ok(buffer.into_inner())
}

/// Derive the output filename from the uploaded filename, if any.
///
/// The last extension component (text after the final period) is stripped to
/// form the base name; a filename without a period is used whole. Inline text
/// input has no filename and falls back to [`DEFAULT_BASE_NAME`].
pub fn derive_output_filename(original: Option<&str>) -> String {
    let base = match original {
        Some(name) => name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name),
        None => DEFAULT_BASE_NAME,
    };
    format!("{base}.{DOCX_EXTENSION}")
}
