//! Text analytics
//!
//! Stateless word statistics derived from the stored files.

pub mod operations;
pub mod tokenizer;
pub mod word_index;

pub use operations::{frequent_words, word_count};
pub use tokenizer::{count_tokens, tokenize};
pub use word_index::{SortOrder, WordIndex};
