#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteKind {
    Word,
    LexicalUnit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteDecision {
    pub kind: RouteKind,
    pub normalized: String,
}

/// Splits traffic between the word page and the lexical-unit page.
/// Expects normalized input: a space means multi-word, nothing else does.
/// Hyphenated compounds like `mother-in-law` are words.
pub fn classify_route(input: &str) -> RouteDecision {
    let normalized = input.trim().to_lowercase();

    if normalized.contains(' ') {
        return RouteDecision {
            kind: RouteKind::LexicalUnit,
            normalized,
        };
    }

    RouteDecision {
        kind: RouteKind::Word,
        normalized,
    }
}
