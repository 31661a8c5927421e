//! Word frequency index
//!
//! Ephemeral multiset of lowercased tokens, rebuilt for every request.

use std::collections::HashMap;

use crate::analytics::tokenizer::tokenize;

/// Requested ranking direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Descending,
    Ascending,
}

impl SortOrder {
    pub const DESCENDING_KEYWORD: &'static str = "dsc";
    pub const ASCENDING_KEYWORD: &'static str = "asc";

    /// Anything other than `dsc` ranks ascending.
    pub fn from_param(value: &str) -> Self {
        if value == Self::DESCENDING_KEYWORD {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }

    pub fn is_known_keyword(value: &str) -> bool {
        value == Self::DESCENDING_KEYWORD || value == Self::ASCENDING_KEYWORD
    }
}

#[derive(Debug, Clone, Copy)]
struct WordStats {
    count: u64,
    first_seen: usize,
}

#[derive(Debug, Default)]
pub struct WordIndex {
    words: HashMap<String, WordStats>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase `text` and add each of its tokens
    pub fn add_text(&mut self, text: &str) {
        let lowered = text.to_lowercase();
        for token in tokenize(&lowered) {
            let next_position = self.words.len();
            match self.words.get_mut(token) {
                Some(stats) => stats.count += 1,
                None => {
                    self.words.insert(
                        token.to_string(),
                        WordStats {
                            count: 1,
                            first_seen: next_position,
                        },
                    );
                }
            }
        }
    }

    pub fn distinct_words(&self) -> usize {
        self.words.len()
    }

    pub fn count_of(&self, word: &str) -> u64 {
        self.words.get(word).map_or(0, |stats| stats.count)
    }

    /// Top `limit` words by count. Equal counts keep first-seen order in
    /// both directions; a non-positive limit yields nothing.
    pub fn ranked(self, order: SortOrder, limit: i64) -> Vec<(String, u64)> {
        let Ok(limit) = usize::try_from(limit) else {
            return Vec::new();
        };

        let mut words: Vec<(String, WordStats)> = self.words.into_iter().collect();
        words.sort_by(|(_, a), (_, b)| {
            let by_count = match order {
                SortOrder::Descending => b.count.cmp(&a.count),
                SortOrder::Ascending => a.count.cmp(&b.count),
            };
            by_count.then(a.first_seen.cmp(&b.first_seen))
        });

        words
            .into_iter()
            .take(limit)
            .map(|(word, stats)| (word, stats.count))
            .collect()
    }
}
