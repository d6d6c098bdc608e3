//! Tokenizer wrapper for chunk sizing and overlap extraction.
//!
//! Token counting and overlap extraction must use the same encoding so
//! that decoded overlap text round-trips consistently; both go through
//! this one type.

use std::sync::Arc;

use bizcanvas_core::{Error, Result};
use tiktoken_rs::CoreBPE;

/// Shared handle to a byte-pair encoding.
///
/// Cheap to clone; the underlying encoder is immutable and shared.
#[derive(Clone)]
pub struct Tokenizer {
    bpe: Arc<CoreBPE>,
}

impl Tokenizer {
    /// Creates the `cl100k_base` tokenizer, the encoding used by the
    /// supported OpenAI embedding models.
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(Error::tokenization)?;
        Ok(Self { bpe: Arc::new(bpe) })
    }

    /// Counts the tokens in a text.
    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }

    /// Returns the text of the last `n` tokens, decoded.
    ///
    /// Returns the whole text when it holds `n` tokens or fewer, and an
    /// empty string when `n` is zero.
    pub fn tail(&self, text: &str, n: usize) -> Result<String> {
        if n == 0 {
            return Ok(String::new());
        }

        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= n {
            return Ok(text.to_owned());
        }

        let tail = tokens[tokens.len() - n..].to_vec();
        self.bpe.decode(tail).map_err(Error::tokenization)
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").field("encoding", &"cl100k_base").finish()
    }
}
