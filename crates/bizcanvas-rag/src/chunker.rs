//! Token-aware paragraph chunking.
//!
//! Text splits on blank-line boundaries and paragraphs accumulate into
//! token-bounded chunks; each chunk after the first is seeded with the
//! decoded tail of its predecessor so retrieval never loses context that
//! straddles a cut. Paragraphs are kept whole: a single paragraph larger
//! than the budget produces an oversized chunk rather than a mid-sentence
//! split.

use bizcanvas_core::{ChunkMetadata, DocumentChunk, Result, chunk_id};
use uuid::Uuid;

use crate::TRACING_TARGET;
use crate::tokenizer::Tokenizer;

/// Options for chunking one document.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum chunk size in tokens.
    pub max_tokens: u32,

    /// Tokens of trailing context carried into the next chunk.
    pub overlap_tokens: u32,

    /// Source filename, recorded in chunk metadata.
    pub filename: String,

    /// Field scope tag applied to every chunk.
    pub field_key: Option<String>,
}

impl ChunkOptions {
    /// Creates options with the default token budget (800/100).
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            max_tokens: 800,
            overlap_tokens: 100,
            filename: filename.into(),
            field_key: None,
        }
    }

    /// Sets the maximum chunk size in tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the chunk overlap in tokens.
    pub fn with_overlap_tokens(mut self, overlap_tokens: u32) -> Self {
        self.overlap_tokens = overlap_tokens;
        self
    }

    /// Sets the field scope tag.
    pub fn with_field_key(mut self, field_key: impl Into<String>) -> Self {
        self.field_key = Some(field_key.into());
        self
    }
}

/// Splits extracted text into ordered, overlapping document chunks.
#[derive(Debug, Clone)]
pub struct Chunker {
    tokenizer: Tokenizer,
}

impl Chunker {
    /// Creates a chunker over the given tokenizer.
    pub fn new(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Returns the tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Chunks a document's text.
    ///
    /// Emits chunks with contiguous `chunk_index` values starting at 0 and
    /// `total_chunks` back-filled across the whole sequence. Empty input
    /// yields an empty list.
    pub fn chunk(
        &self,
        text: &str,
        document_id: Uuid,
        canvas_id: Option<Uuid>,
        options: &ChunkOptions,
    ) -> Result<Vec<DocumentChunk>> {
        let max_tokens = options.max_tokens as usize;
        let overlap_tokens = options.overlap_tokens as usize;

        let paragraphs: Vec<&str> = text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let mut chunks: Vec<DocumentChunk> = Vec::new();
        let mut buffer = String::new();
        let mut buffer_tokens = 0usize;

        for paragraph in paragraphs {
            let paragraph_tokens = self.tokenizer.count(paragraph);

            // The separator costs tokens too; include it in the bound so
            // closed chunks stay within budget.
            let joined_tokens = if buffer.is_empty() {
                paragraph_tokens
            } else {
                buffer_tokens + self.tokenizer.count("\n\n") + paragraph_tokens
            };

            if !buffer.is_empty() && joined_tokens > max_tokens {
                let closed = std::mem::take(&mut buffer);
                let overlap = self.tokenizer.tail(&closed, overlap_tokens)?;
                self.push_chunk(&mut chunks, closed, document_id, canvas_id, options);
                buffer = overlap;
            }

            if buffer.is_empty() {
                buffer.push_str(paragraph);
            } else {
                buffer.push_str("\n\n");
                buffer.push_str(paragraph);
            }
            buffer_tokens = self.tokenizer.count(&buffer);
        }

        if !buffer.trim().is_empty() {
            self.push_chunk(&mut chunks, buffer, document_id, canvas_id, options);
        }

        let total_chunks = chunks.len() as u32;
        for chunk in &mut chunks {
            chunk.metadata.total_chunks = total_chunks;
        }

        tracing::debug!(
            target: TRACING_TARGET,
            document_id = %document_id,
            chunks = %total_chunks,
            "Chunked document"
        );

        Ok(chunks)
    }

    fn push_chunk(
        &self,
        chunks: &mut Vec<DocumentChunk>,
        content: String,
        document_id: Uuid,
        canvas_id: Option<Uuid>,
        options: &ChunkOptions,
    ) {
        let chunk_index = chunks.len() as u32;
        let token_count = self.tokenizer.count(&content) as u32;

        chunks.push(DocumentChunk {
            id: chunk_id(&document_id, chunk_index),
            document_id,
            canvas_id,
            field_key: options.field_key.clone(),
            chunk_index,
            content,
            token_count,
            metadata: ChunkMetadata {
                filename: options.filename.clone(),
                chunk_index,
                // Back-filled once the full sequence is known.
                total_chunks: 0,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker() -> Chunker {
        Chunker::new(Tokenizer::cl100k().unwrap())
    }

    /// A paragraph of roughly `words` whitespace-separated words.
    fn paragraph(words: usize, seed: usize) -> String {
        (0..words)
            .map(|i| format!("word{}", (seed + i) % 97))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn document(paragraphs: usize, words_each: usize) -> String {
        (0..paragraphs)
            .map(|i| paragraph(words_each, i * 31))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let chunker = chunker();
        let options = ChunkOptions::new("empty.txt");

        let chunks = chunker
            .chunk("", Uuid::new_v4(), None, &options)
            .unwrap();
        assert!(chunks.is_empty());

        let chunks = chunker
            .chunk("\n\n  \n\n", Uuid::new_v4(), None, &options)
            .unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunker = chunker();
        let options = ChunkOptions::new("note.txt");
        let chunks = chunker
            .chunk("just one paragraph", Uuid::new_v4(), None, &options)
            .unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[0].content, "just one paragraph");
        assert_eq!(chunks[0].metadata.total_chunks, 1);
    }

    #[test]
    fn indices_are_contiguous_and_totals_back_filled() {
        let chunker = chunker();
        let options = ChunkOptions::new("doc.txt")
            .with_max_tokens(120)
            .with_overlap_tokens(20);
        let text = document(20, 40);

        let chunks = chunker
            .chunk(&text, Uuid::new_v4(), None, &options)
            .unwrap();
        assert!(chunks.len() > 1);

        let total = chunks.len() as u32;
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i as u32);
            assert_eq!(chunk.metadata.chunk_index, i as u32);
            assert_eq!(chunk.metadata.total_chunks, total);
            assert!(!chunk.content.is_empty());
        }
    }

    #[test]
    fn chunks_respect_the_token_bound() {
        let chunker = chunker();
        let options = ChunkOptions::new("doc.txt")
            .with_max_tokens(150)
            .with_overlap_tokens(25);
        let text = document(30, 30);

        let chunks = chunker
            .chunk(&text, Uuid::new_v4(), None, &options)
            .unwrap();
        for chunk in &chunks {
            assert!(
                chunk.token_count <= 150,
                "chunk {} has {} tokens",
                chunk.chunk_index,
                chunk.token_count
            );
        }
    }

    #[test]
    fn consecutive_chunks_share_overlap() {
        let chunker = chunker();
        let overlap = 15usize;
        let options = ChunkOptions::new("doc.txt")
            .with_max_tokens(100)
            .with_overlap_tokens(overlap as u32);
        let text = document(16, 35);

        let chunks = chunker
            .chunk(&text, Uuid::new_v4(), None, &options)
            .unwrap();
        assert!(chunks.len() >= 2);

        for pair in chunks.windows(2) {
            let tail = chunker
                .tokenizer()
                .tail(&pair[0].content, overlap)
                .unwrap();
            // The successor was seeded with the decoded tail verbatim.
            assert!(
                pair[1].content.starts_with(tail.as_str()),
                "chunk {} does not start with the tail of its predecessor",
                pair[1].chunk_index
            );
        }
    }

    #[test]
    fn oversized_paragraph_is_kept_whole() {
        let chunker = chunker();
        let options = ChunkOptions::new("doc.txt")
            .with_max_tokens(50)
            .with_overlap_tokens(10);

        let big = paragraph(200, 0);
        let text = format!("small intro\n\n{big}\n\nsmall outro");

        let chunks = chunker
            .chunk(&text, Uuid::new_v4(), None, &options)
            .unwrap();

        // The oversized paragraph lands intact in exactly one chunk.
        let holding: Vec<_> = chunks
            .iter()
            .filter(|c| c.content.contains(&big))
            .collect();
        assert_eq!(holding.len(), 1);
        assert!(holding[0].token_count > 50);
    }

    #[test]
    fn scoping_tags_are_applied_to_every_chunk() {
        let chunker = chunker();
        let canvas_id = Uuid::new_v4();
        let options = ChunkOptions::new("doc.txt")
            .with_max_tokens(80)
            .with_overlap_tokens(10)
            .with_field_key("problem_statement");
        let text = document(8, 40);

        let document_id = Uuid::new_v4();
        let chunks = chunker
            .chunk(&text, document_id, Some(canvas_id), &options)
            .unwrap();

        for chunk in &chunks {
            assert_eq!(chunk.document_id, document_id);
            assert_eq!(chunk.canvas_id, Some(canvas_id));
            assert_eq!(chunk.field_key.as_deref(), Some("problem_statement"));
            assert_eq!(chunk.id, chunk_id(&document_id, chunk.chunk_index));
        }
    }

    #[test]
    fn two_thousand_tokens_split_into_three_overlapping_chunks() {
        let chunker = chunker();
        let options = ChunkOptions::new("doc.txt"); // 800/100 defaults

        // Build paragraphs until the document measures ~2000 tokens.
        let mut text = String::new();
        while chunker.tokenizer().count(&text) < 2000 {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&paragraph(40, text.len()));
        }

        let chunks = chunker
            .chunk(&text, Uuid::new_v4(), None, &options)
            .unwrap();

        assert_eq!(chunks.len(), 3, "expected 3 chunks, got {}", chunks.len());
        assert!(chunks[0].token_count <= 800);
        assert!(chunks[0].token_count > 600);

        // Chunk 1 starts with the decoded tail of chunk 0.
        let tail = chunker.tokenizer().tail(&chunks[0].content, 100).unwrap();
        assert!(chunks[1].content.starts_with(tail.as_str()));
    }
}
