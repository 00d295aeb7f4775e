//! Message-text normalization shared by the n-gram and hashtag analyses.

use regex::Regex;
use std::sync::OnceLock;

fn strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Keep lowercase alphanumerics, underscore and space; drop the rest.
    RE.get_or_init(|| Regex::new(r"[^a-z0-9_ ]").unwrap())
}

/// Lowercase and strip punctuation, then split on whitespace.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let cleaned = strip_re().replace_all(&lowered, "");
    cleaned.split_whitespace().map(|t| t.to_string()).collect()
}

/// Contiguous n-token sequences joined by a single space. `n == 1` yields
/// the tokens themselves.
pub fn ngrams(tokens: &[String], n: usize) -> Vec<String> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }
    tokens.windows(n).map(|w| w.join(" ")).collect()
}

/// Hashtags are counted on the raw lowercased text, split on spaces only:
/// the `#` sigil would not survive punctuation stripping.
pub fn count_hashtags(text: &str) -> u64 {
    text.to_lowercase()
        .split(' ')
        .filter(|tok| tok.starts_with('#'))
        .count() as u64
}
