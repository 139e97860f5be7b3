//! Uploaded documents and the chunks cut from them

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Supported upload types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Anything else, with the offending extension
    Unknown(String),
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" | "text" => Self::Txt,
            "md" | "markdown" => Self::Markdown,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Detect file type from a filename
    pub fn from_filename(filename: &str) -> Self {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Self::Unknown(String::new()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// An uploaded file; lives only for the duration of one indexing request
#[derive(Debug, Clone)]
pub struct Document {
    /// Filename as uploaded
    pub filename: String,
    /// Raw bytes
    pub data: Bytes,
}

impl Document {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }

    pub fn file_type(&self) -> FileType {
        FileType::from_filename(&self.filename)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A window of consecutive paragraphs, stored and retrieved as one unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// `{filename}_chunk_{ordinal}`, unique within a collection
    pub id: String,
    /// Position in reading order, starting at 0
    pub ordinal: usize,
    /// Paragraphs joined by a blank line
    pub content: String,
}

impl Chunk {
    pub fn new(filename: &str, ordinal: usize, content: String) -> Self {
        Self {
            id: format!("{}_chunk_{}", filename, ordinal),
            ordinal,
            content,
        }
    }
}
