//! Character-level text similarity for duplicate listing detection.

/// Lowercases, drops punctuation and collapses whitespace.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of matching characters: the longest common substring plus,
/// recursively, the matches to its left and right.
pub fn similar_chars(a: &[char], b: &[char]) -> usize {
    let (mut best_len, mut best_a, mut best_b) = (0, 0, 0);
    // previous row of common-suffix lengths
    let mut prev = vec![0usize; b.len() + 1];
    for i in 1..=a.len() {
        let mut row = vec![0usize; b.len() + 1];
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                row[j] = prev[j - 1] + 1;
                if row[j] > best_len {
                    best_len = row[j];
                    best_a = i - best_len;
                    best_b = j - best_len;
                }
            }
        }
        prev = row;
    }
    if best_len == 0 {
        return 0;
    }
    best_len
        + similar_chars(&a[..best_a], &b[..best_b])
        + similar_chars(&a[best_a + best_len..], &b[best_b + best_len..])
}

/// Similarity percentage (0.0 - 100.0) of two raw strings.
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    (similar_chars(&a, &b) * 2) as f64 * 100.0 / (a.len() + b.len()) as f64
}

/// Similarity of two listings after normalization.
pub fn listing_similarity(a: &str, b: &str) -> f64 {
    similarity_percent(&normalize(a), &normalize(b))
}
