// Chunker - splits text into bounded pieces on word boundaries

use super::types::TextChunk;

/// Split `text` into chunks of at most `max_length` characters.
///
/// Words (whitespace-separated tokens) are packed greedily and joined by a
/// single space, which gives the fewest chunks an order-preserving split can
/// have. Words are never broken: a word longer than `max_length` becomes a
/// chunk of its own and exceeds the bound. Whitespace-only input yields no
/// chunks.
pub fn split(text: &str, max_length: usize) -> Vec<TextChunk> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len > 0 && current_len + 1 + word_len > max_length {
            chunks.push(TextChunk::new(std::mem::take(&mut current), chunks.len()));
            current_len = 0;
        }

        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 {
        chunks.push(TextChunk::new(current, chunks.len()));
    }

    chunks
}

/// First `n` words of `text` joined by single spaces
pub fn first_n_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}
