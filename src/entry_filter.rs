use regex::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterReason {
    Noise,
    ProperNoun,
    NonEnglish,
    UnsafeToGenerate,
}

impl FilterReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterReason::Noise => "NOISE",
            FilterReason::ProperNoun => "PROPER_NOUN",
            FilterReason::NonEnglish => "NON_ENGLISH",
            FilterReason::UnsafeToGenerate => "UNSAFE_TO_GENERATE",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterVerdict {
    Ok { normalized: String },
    Suppressed {
        reason: FilterReason,
        note: Option<String>,
    },
}

const PROPER_NOUNS: &[&str] = &["chatgpt", "google", "youtube", "iphone"];

/// Decides whether a normalized query may become a dictionary entry.
///
/// A suppression here never blocks the search itself; it only stops entry
/// generation, and the caller surfaces the reason as a notice.
pub fn filter(input: &str) -> FilterVerdict {
    let normalized = input.trim().to_lowercase();

    let single_token = Regex::new(r"^[a-z]{5,}$").unwrap_or_else(|_| Regex::new("^$").unwrap());
    if single_token.is_match(&normalized) && distinct_chars(&normalized) <= 2 {
        return FilterVerdict::Suppressed {
            reason: FilterReason::Noise,
            note: Some("repetitive or meaningless string".to_string()),
        };
    }

    if PROPER_NOUNS.contains(&normalized.as_str()) {
        return FilterVerdict::Suppressed {
            reason: FilterReason::ProperNoun,
            note: Some("proper noun or product name".to_string()),
        };
    }

    let non_english = Regex::new(r"\b(raison|etre|d['’]etre)\b")
        .unwrap_or_else(|_| Regex::new("^$").unwrap());
    if non_english.is_match(&normalized) {
        return FilterVerdict::Suppressed {
            reason: FilterReason::NonEnglish,
            note: Some("likely non-English expression".to_string()),
        };
    }

    if has_long_run(&normalized) {
        return FilterVerdict::Suppressed {
            reason: FilterReason::UnsafeToGenerate,
            note: Some(format!(
                "possible misspelling of \"{}\"",
                collapse_runs(&normalized)
            )),
        };
    }

    FilterVerdict::Ok { normalized }
}

fn distinct_chars(s: &str) -> usize {
    let mut seen: Vec<char> = Vec::new();
    for c in s.chars() {
        if !seen.contains(&c) {
            seen.push(c);
        }
    }
    seen.len()
}

// Three or more of the same character in a row.
fn has_long_run(s: &str) -> bool {
    let mut run = 0usize;
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if Some(c) == prev {
            run += 1;
            if run >= 3 {
                return true;
            }
        } else {
            prev = Some(c);
            run = 1;
        }
    }
    false
}

fn collapse_runs(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if Some(c) != prev {
            out.push(c);
            prev = Some(c);
        }
    }
    out
}
