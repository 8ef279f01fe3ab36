#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardReason {
    NonAlphabet,
    TooLong,
}

impl GuardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardReason::NonAlphabet => "NON_ALPHABET",
            GuardReason::TooLong => "TOO_LONG",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardVerdict {
    Ok { normalized: String },
    Rejected { reason: GuardReason },
}

/// First, cheapest gate on raw input. Decides only whether the string is
/// shaped like a query at all; whether it is a real English entry is someone
/// else's problem.
pub fn guard(raw: &str, max_length: usize) -> GuardVerdict {
    let q = raw.trim().to_lowercase();

    if q.chars()
        .any(|c| !(c.is_ascii_lowercase() || c.is_whitespace() || c == '-'))
    {
        return GuardVerdict::Rejected {
            reason: GuardReason::NonAlphabet,
        };
    }

    let len = q.chars().count();
    if len == 0 || len > max_length {
        return GuardVerdict::Rejected {
            reason: GuardReason::TooLong,
        };
    }

    GuardVerdict::Ok { normalized: q }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(raw: &str) -> GuardReason {
        match guard(raw, 60) {
            GuardVerdict::Rejected { reason } => reason,
            GuardVerdict::Ok { normalized } => panic!("{raw:?} passed as {normalized:?}"),
        }
    }

    fn accepted(raw: &str) -> String {
        match guard(raw, 60) {
            GuardVerdict::Ok { normalized } => normalized,
            GuardVerdict::Rejected { reason } => {
                panic!("{raw:?} rejected with {}", reason.as_str())
            }
        }
    }

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(accepted("  Apple "), "apple");
        assert_eq!(accepted("TAKE Over"), "take over");
    }

    #[test]
    fn spaces_and_hyphens_are_allowed() {
        assert_eq!(accepted("mother-in-law"), "mother-in-law");
        assert_eq!(accepted("take over"), "take over");
    }

    #[test]
    fn non_alphabet_input_is_rejected() {
        assert_eq!(rejected("caf3"), GuardReason::NonAlphabet);
        assert_eq!(rejected("café"), GuardReason::NonAlphabet);
        assert_eq!(rejected("it's"), GuardReason::NonAlphabet);
        assert_eq!(rejected("word!"), GuardReason::NonAlphabet);
        assert_eq!(rejected("こんにちは"), GuardReason::NonAlphabet);
    }

    #[test]
    fn empty_input_is_too_long() {
        assert_eq!(rejected(""), GuardReason::TooLong);
        assert_eq!(rejected("   "), GuardReason::TooLong);
    }

    #[test]
    fn length_limit_is_inclusive() {
        let at_limit = "a".repeat(60);
        assert_eq!(accepted(&at_limit), at_limit);
        assert_eq!(rejected(&"a".repeat(61)), GuardReason::TooLong);
    }

    #[test]
    fn uppercase_counts_as_alphabet() {
        assert_eq!(accepted("HELLO"), "hello");
    }
}
