//! Text extraction from uploaded artifacts.
//!
//! Turns a file (declared extension + bytes) into a single text blob. The
//! orchestration layer concatenates extractions across files, appends any
//! manually pasted text, and truncates the result before downstream use.

use docx_rs::{DocumentChild, ParagraphChild, RunChild};

use crate::dataset::cell_to_string;
use crate::error::{ReportError, Result};

/// Hard ceiling on combined extracted text, in characters.
///
/// Truncation is a silent prefix take, not an error.
pub const MAX_COMBINED_CHARS: usize = 200_000;

/// A single uploaded file: declared name and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Lowercased extension, without the dot.
    pub fn extension(&self) -> String {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// Extract text from one uploaded file based on its declared extension.
///
/// Unsupported extensions yield an empty string (silent no-op); the caller
/// decides whether "nothing extracted anywhere" is an error.
pub fn extract_file(file: &UploadedFile) -> Result<String> {
    match file.extension().as_str() {
        "txt" | "md" | "csv" => decode_utf8(&file.name, &file.bytes),
        "pdf" => extract_pdf(&file.name, &file.bytes),
        "docx" => extract_docx(&file.name, &file.bytes),
        "xlsx" => extract_xlsx(&file.name, &file.bytes),
        other => {
            tracing::debug!(name = %file.name, extension = %other, "skipping unsupported extension");
            Ok(String::new())
        }
    }
}

/// Concatenate extractions across files (upload order), append pasted text
/// last, and truncate to [`MAX_COMBINED_CHARS`].
pub fn combine_inputs(files: &[UploadedFile], pasted_text: Option<&str>) -> Result<String> {
    let mut parts = Vec::with_capacity(files.len() + 1);
    for file in files {
        parts.push(extract_file(file)?);
    }
    if let Some(pasted) = pasted_text {
        parts.push(pasted.to_string());
    }
    Ok(truncate_chars(parts.join("\n"), MAX_COMBINED_CHARS))
}

fn decode_utf8(name: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ReportError::Decode {
        name: name.to_string(),
        reason: "not valid UTF-8".to_string(),
    })
}

/// Extract PDF text. Page breaks become newlines so pages with no
/// extractable text still contribute their separator (never null).
fn extract_pdf(name: &str, bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| ReportError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(text.replace('\x0C', "\n"))
}

/// Extract all visible paragraph text from a DOCX as one block.
fn extract_docx(name: &str, bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ReportError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children.iter() {
        if let DocumentChild::Paragraph(para) = child {
            let text: String = para
                .children
                .iter()
                .filter_map(|pc| match pc {
                    ParagraphChild::Run(run) => Some(
                        run.children
                            .iter()
                            .filter_map(|rc| match rc {
                                RunChild::Text(t) => Some(t.text.as_str()),
                                _ => None,
                            })
                            .collect::<String>(),
                    ),
                    _ => None,
                })
                .collect();
            if !text.is_empty() {
                paragraphs.push(text);
            }
        }
    }

    Ok(paragraphs.join("\n"))
}

/// Render the first worksheet row-per-line, cells tab-separated.
fn extract_xlsx(name: &str, bytes: &[u8]) -> Result<String> {
    use calamine::Reader;

    let cursor = std::io::Cursor::new(bytes.to_vec());
    let mut workbook = calamine::Xlsx::new(cursor).map_err(|e| ReportError::Decode {
        name: name.to_string(),
        reason: e.to_string(),
    })?;

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            return Err(ReportError::Decode {
                name: name.to_string(),
                reason: e.to_string(),
            })
        }
        None => return Ok(String::new()),
    };

    let lines: Vec<String> = range
        .rows()
        .map(|row| {
            row.iter()
                .map(cell_to_string)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect();

    Ok(lines.join("\n"))
}

/// Prefix-take at most `limit` characters (not bytes).
fn truncate_chars(text: String, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_decodes_directly() {
        let file = UploadedFile::new("notes.txt", b"quarterly review".to_vec());
        assert_eq!(extract_file(&file).unwrap(), "quarterly review");
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let file = UploadedFile::new("notes.md", vec![0xFF, 0xFE, 0x00]);
        let err = extract_file(&file).unwrap_err();
        assert!(matches!(err, ReportError::Decode { .. }));
    }

    #[test]
    fn unsupported_extension_is_a_silent_empty_string() {
        let file = UploadedFile::new("photo.jpg", vec![1, 2, 3]);
        assert_eq!(extract_file(&file).unwrap(), "");
    }

    #[test]
    fn file_without_extension_is_treated_as_unsupported() {
        let file = UploadedFile::new("README", b"text".to_vec());
        assert_eq!(extract_file(&file).unwrap(), "");
    }

    #[test]
    fn combine_preserves_upload_order_and_appends_pasted_text() {
        let files = vec![
            UploadedFile::new("a.txt", b"first".to_vec()),
            UploadedFile::new("b.md", b"second".to_vec()),
        ];
        let combined = combine_inputs(&files, Some("pasted")).unwrap();
        assert_eq!(combined, "first\nsecond\npasted");
    }

    #[test]
    fn combine_truncates_to_exactly_the_ceiling() {
        let big = "x".repeat(MAX_COMBINED_CHARS + 500);
        let files = vec![UploadedFile::new("big.txt", big.into_bytes())];
        let combined = combine_inputs(&files, None).unwrap();
        assert_eq!(combined.chars().count(), MAX_COMBINED_CHARS);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(text, 4), "éééé");
    }

    #[test]
    fn corrupt_docx_is_a_decode_error() {
        let file = UploadedFile::new("report.docx", b"not a zip archive".to_vec());
        assert!(matches!(
            extract_file(&file),
            Err(ReportError::Decode { .. })
        ));
    }
}
