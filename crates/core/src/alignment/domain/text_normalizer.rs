const STRIPPED_CHARS: &[char] = &['"', '\'', '.', ',', '?', '!'];

/// Normalizes text for comparison: strips quotes and sentence punctuation,
/// collapses whitespace runs to a single space, trims and lowercases.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for ch in text.chars().filter(|c| !STRIPPED_CHARS.contains(c)) {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_lowercase()
}

/// Splits already-normalized text into its words.
pub fn target_words(normalized: &str) -> Vec<&str> {
    normalized.split(' ').filter(|w| !w.is_empty()).collect()
}

/// Returns the first `n` characters of `s` (fewer if `s` is shorter).
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
