//! Word tokenizer
//!
//! A token is a maximal run of letters, digits or underscores. Everything
//! else separates tokens and is discarded.

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split `text` into tokens, preserving case
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_word_char(c))
        .filter(|token| !token.is_empty())
}

pub fn count_tokens(text: &str) -> u64 {
    tokenize(text).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        let tokens: Vec<_> = tokenize("a-b c, d.e!").collect();
        assert_eq!(tokens, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn underscores_and_digits_are_word_chars() {
        let tokens: Vec<_> = tokenize("snake_case v2 __init__").collect();
        assert_eq!(tokens, vec!["snake_case", "v2", "__init__"]);
    }

    #[test]
    fn non_ascii_letters_are_word_chars() {
        let tokens: Vec<_> = tokenize("café naïve").collect();
        assert_eq!(tokens, vec!["café", "naïve"]);
    }

    #[test]
    fn counts_tokens() {
        assert_eq!(count_tokens("one two two"), 3);
        assert_eq!(count_tokens("a-b c"), 3);
        assert_eq!(count_tokens(""), 0);
        assert_eq!(count_tokens("--- !!! ..."), 0);
    }
}
