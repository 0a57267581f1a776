// Embedding encoder module
// Defines the encoder capability and the Ollama-backed implementation.

pub mod ollama;

#[cfg(test)]
mod tests;

pub use ollama::OllamaClient;

use crate::Result;

/// Text-to-vector capability. Implementations must be deterministic for
/// identical input within one loaded model, and every vector they produce
/// must share a single fixed dimension.
pub trait Embedder: Send + Sync {
    /// Name of the loaded model, recorded in index snapshots so that an index
    /// is never silently queried with vectors from a different model.
    fn model_name(&self) -> &str;

    /// Encode a single text into a fixed-dimension vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Encode a batch of texts, returning one vector per input in order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Estimate the token count of a piece of text.
#[inline]
pub fn estimate_token_count(text: &str) -> usize {
    // Rough heuristic: 1 token ≈ 0.75 words for English text, with extra
    // weight for punctuation
    let word_count = text.split_whitespace().count();
    let punct_count = text.chars().filter(|c| c.is_ascii_punctuation()).count();

    (punct_count as f64).mul_add(0.1, word_count as f64 / 0.75) as usize
}

/// Truncate text at a word boundary so its estimated token count stays within
/// `max_tokens`. Oversized inputs are cut, never rejected.
#[inline]
pub fn truncate_to_token_budget(text: &str, max_tokens: usize) -> String {
    if estimate_token_count(text) <= max_tokens {
        return text.to_string();
    }

    let mut out = String::new();
    let mut word_count = 0usize;
    let mut punct_count = 0usize;

    for word in text.split_whitespace() {
        let next_words = word_count + 1;
        let next_punct = punct_count + word.chars().filter(|c| c.is_ascii_punctuation()).count();
        let estimate = (next_punct as f64).mul_add(0.1, next_words as f64 / 0.75) as usize;
        if estimate > max_tokens && !out.is_empty() {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        word_count = next_words;
        punct_count = next_punct;
    }

    out
}
