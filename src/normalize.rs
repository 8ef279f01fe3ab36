use crate::lemma;

/// Canonical form for a single-word query: lowercased, trimmed, lemma-reduced.
pub fn normalize_word(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    lemma::reduce(&lower)
}

/// Canonical form for a multi-word query. Tokens may arrive space- or
/// hyphen-joined; only the first token is lemma-reduced, the rest pass
/// through, and the result is always single-space joined.
pub fn normalize_lexical_unit(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    let mut tokens: Vec<String> = lower
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    if tokens.len() > 1 {
        tokens[0] = lemma::reduce(&tokens[0]);
    }

    tokens.join(" ")
}
