//! Paragraph-window chunking

use regex::Regex;
use std::sync::OnceLock;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::Chunk;

/// A newline, any whitespace-only lines, and another newline
fn paragraph_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"))
}

/// Separator placed between paragraphs inside a chunk
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits text into windows of `chunk_size` paragraphs that overlap by `overlap`
#[derive(Debug, Clone, Copy)]
pub struct ParagraphChunker {
    chunk_size: usize,
    overlap: usize,
}

impl ParagraphChunker {
    /// Create a new chunker; `overlap` must be smaller than `chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::Config("chunk size must be at least 1".into()));
        }
        if overlap >= chunk_size {
            return Err(Error::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                overlap, chunk_size
            )));
        }
        Ok(Self { chunk_size, overlap })
    }

    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    fn stride(&self) -> usize {
        self.chunk_size - self.overlap
    }

    /// Split on blank lines, trim, and drop empty paragraphs
    pub fn split_paragraphs(text: &str) -> Vec<&str> {
        paragraph_break()
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Join each window of paragraphs into one passage
    ///
    /// Windows start every `chunk_size - overlap` paragraphs and stop once a
    /// window reaches the last paragraph, so the final one may be short.
    pub fn window_paragraphs(&self, paragraphs: &[&str]) -> Vec<String> {
        let mut windows = Vec::new();
        let mut start = 0;

        while start < paragraphs.len() {
            let end = (start + self.chunk_size).min(paragraphs.len());
            windows.push(paragraphs[start..end].join(PARAGRAPH_SEPARATOR));
            if end == paragraphs.len() {
                break;
            }
            start += self.stride();
        }

        windows
    }

    /// Chunk extracted document text; ids derive from `filename` and position
    pub fn chunk_text(&self, filename: &str, text: &str) -> Vec<Chunk> {
        let paragraphs = Self::split_paragraphs(text);
        self.window_paragraphs(&paragraphs)
            .into_iter()
            .enumerate()
            .map(|(ordinal, content)| Chunk::new(filename, ordinal, content))
            .collect()
    }
}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            overlap: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn expected_count(n: usize, size: usize, overlap: usize) -> usize {
        if n == 0 {
            0
        } else if n <= overlap {
            1
        } else {
            (n - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn test_four_paragraphs() {
        let chunker = ParagraphChunker::default();
        let chunks = chunker.chunk_text("doc.pdf", "a\n\nb\n\nc\n\nd");
        let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["a\n\nb\n\nc", "c\n\nd"]);
        assert_eq!(chunks[0].id, "doc.pdf_chunk_0");
        assert_eq!(chunks[1].id, "doc.pdf_chunk_1");
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = ParagraphChunker::default();
        assert!(chunker.chunk_text("doc.pdf", "").is_empty());
        assert!(chunker.chunk_text("doc.pdf", "  \n\n \n\t\n").is_empty());
    }

    #[test]
    fn test_single_paragraph() {
        let chunker = ParagraphChunker::default();
        let chunks = chunker.chunk_text("doc.pdf", "  only one  ");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "only one");
    }

    #[test]
    fn test_split_handles_whitespace_lines_and_runs() {
        let paragraphs = ParagraphChunker::split_paragraphs("a\n  \nb\n\n\n\nc\r\n\r\nd\ne");
        assert_eq!(paragraphs, vec!["a", "b", "c", "d\ne"]);
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        assert!(ParagraphChunker::new(3, 3).is_err());
        assert!(ParagraphChunker::new(3, 4).is_err());
        assert!(ParagraphChunker::new(0, 0).is_err());
        assert!(ParagraphChunker::new(1, 0).is_ok());
    }

    #[test]
    fn test_no_overlap() {
        let chunker = ParagraphChunker::new(2, 0).unwrap();
        let windows = chunker.window_paragraphs(&["a", "b", "c", "d", "e"]);
        assert_eq!(windows, vec!["a\n\nb", "c\n\nd", "e"]);
    }

    proptest! {
        #[test]
        fn prop_chunk_count(n in 0usize..60, size in 1usize..8, overlap_seed in 0usize..8) {
            let overlap = overlap_seed % size;
            let chunker = ParagraphChunker::new(size, overlap).unwrap();
            let paragraphs: Vec<String> = (0..n).map(|i| format!("p{}", i)).collect();
            let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();

            let windows = chunker.window_paragraphs(&refs);
            prop_assert_eq!(windows.len(), expected_count(n, size, overlap));
        }

        #[test]
        fn prop_consecutive_chunks_share_overlap(n in 3usize..40) {
            let chunker = ParagraphChunker::default();
            let paragraphs: Vec<String> = (0..n).map(|i| format!("p{}", i)).collect();
            let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();

            let windows = chunker.window_paragraphs(&refs);
            for pair in windows.windows(2) {
                let prev: Vec<&str> = pair[0].split(PARAGRAPH_SEPARATOR).collect();
                let next: Vec<&str> = pair[1].split(PARAGRAPH_SEPARATOR).collect();
                prop_assert_eq!(prev.last(), next.first());
                prop_assert_ne!(prev.get(prev.len() - 2), next.get(1));
            }
        }

        #[test]
        fn prop_deterministic(text in "[a-z \n]{0,200}") {
            let chunker = ParagraphChunker::default();
            prop_assert_eq!(
                chunker.chunk_text("f.txt", &text),
                chunker.chunk_text("f.txt", &text)
            );
        }
    }
}
