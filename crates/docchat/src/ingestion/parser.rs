//! Text extraction for uploaded files

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

/// Ligatures and typographic glyphs PDF fonts commonly emit
const GLYPH_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{0000}', ""),
    ('\u{00A0}', " "),  // Non-breaking space
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
];

/// Clean up extracted PDF text; blank lines are kept since they delimit paragraphs
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match GLYPH_REPLACEMENTS.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, replacement)) => result.push_str(replacement),
            None => result.push(ch),
        }
    }

    result
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extracted document text
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Page texts concatenated in reading order
    pub content: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
}

/// Upload parser
pub struct FileParser;

impl FileParser {
    /// Extract text from a document based on its extension
    pub fn parse(document: &Document) -> Result<ParsedDocument> {
        let file_type = document.file_type();

        match file_type {
            FileType::Pdf => Self::parse_pdf(&document.filename, &document.data),
            FileType::Txt | FileType::Markdown => Ok(Self::parse_text(&document.data, file_type)),
            FileType::Unknown(ext) => Err(Error::UnsupportedFileType(format!(
                "'{}' (extension '{}'); upload a PDF, .txt or .md file",
                document.filename, ext
            ))),
        }
    }

    /// Extract PDF text page by page, each page followed by a newline
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let (content, total_pages) = match Self::extract_pages(data) {
            Ok((text, pages)) if !text.trim().is_empty() => (text, Some(pages)),
            Ok((_, pages)) => {
                tracing::debug!("Per-page extraction found no text in {}, trying pdf-extract", filename);
                (Self::extract_whole(filename, data)?, Some(pages))
            }
            Err(e) => {
                tracing::warn!("lopdf could not read {}: {}, trying pdf-extract", filename, e);
                (Self::extract_whole(filename, data)?, None)
            }
        };

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content: cleanup_pdf_text(&content),
            total_pages,
        })
    }

    fn extract_pages(data: &[u8]) -> std::result::Result<(String, u32), lopdf::Error> {
        let doc = lopdf::Document::load_mem(data)?;
        let pages = doc.get_pages();
        let mut text = String::new();

        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    tracing::debug!("Could not extract text from page {}: {}", page_number, e);
                }
            }
        }

        Ok((text, pages.len() as u32))
    }

    fn extract_whole(filename: &str, data: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("PDF text extraction failed: {}", e)))
    }

    fn parse_text(data: &[u8], file_type: FileType) -> ParsedDocument {
        ParsedDocument {
            file_type,
            content: String::from_utf8_lossy(data).replace("\r\n", "\n"),
            total_pages: None,
        }
    }
}
