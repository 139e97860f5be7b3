//! Document ingestion: text extraction and paragraph chunking

mod chunker;
mod parser;

pub use chunker::{ParagraphChunker, PARAGRAPH_SEPARATOR};
pub use parser::{FileParser, ParsedDocument};
