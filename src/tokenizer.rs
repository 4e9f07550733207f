//! Term normalization shared by indexing and querying.

/// Split `text` into lowercase terms.
///
/// Any character that is not alphanumeric acts as a separator, and empty
/// tokens are dropped. Indexing and querying both go through this function,
/// so a query term always lines up with the indexed form of the same word.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}
