use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    AdjectivalNoun,
    Pronoun,
    Preposition,
    Conjunction,
    Interjection,
    Particle,
    Auxiliary,
    Article,
}

/// Folds free-form part-of-speech labels into the canonical enum.
///
/// Generated entries label senses inconsistently: Japanese names, English
/// abbreviations with or without dots, plurals, several labels run together
/// in one string. Unknown labels are dropped rather than guessed.
pub fn normalize_pos(raw: &str) -> Vec<PartOfSpeech> {
    // Longer names first so 動詞 never splits 形容動詞 or 助動詞.
    let jp_names = Regex::new(
        "(形容動詞|助動詞|代名詞|感嘆詞|形容詞|前置詞|接続詞|名詞|動詞|副詞|助詞|冠詞)",
    )
    .unwrap_or_else(|_| Regex::new("^$").unwrap());
    let spaced = jp_names.replace_all(raw, " ${1} ");

    let mut out = Vec::new();
    for token in
        spaced.split(|c: char| c.is_whitespace() || matches!(c, ',' | '/' | '／' | '・' | '|'))
    {
        let cleaned: String = token
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '.' | ':'))
            .collect();
        let cleaned = cleaned.strip_suffix('s').unwrap_or(&cleaned);
        if cleaned.is_empty() {
            continue;
        }
        if let Some(pos) = lookup(cleaned) {
            if !out.contains(&pos) {
                out.push(pos);
            }
        }
    }

    out
}

fn lookup(token: &str) -> Option<PartOfSpeech> {
    let pos = match token {
        "名詞" => PartOfSpeech::Noun,
        "動詞" => PartOfSpeech::Verb,
        "形容詞" => PartOfSpeech::Adjective,
        "形容動詞" => PartOfSpeech::AdjectivalNoun,
        "副詞" => PartOfSpeech::Adverb,
        "代名詞" => PartOfSpeech::Pronoun,
        "前置詞" => PartOfSpeech::Preposition,
        "接続詞" => PartOfSpeech::Conjunction,
        "感嘆詞" => PartOfSpeech::Interjection,
        "助詞" => PartOfSpeech::Particle,
        "助動詞" => PartOfSpeech::Auxiliary,
        "冠詞" => PartOfSpeech::Article,
        "n" | "noun" => PartOfSpeech::Noun,
        "v" | "verb" => PartOfSpeech::Verb,
        "adj" | "adjective" => PartOfSpeech::Adjective,
        "adv" | "adverb" => PartOfSpeech::Adverb,
        "adj-n" | "adj_n" => PartOfSpeech::AdjectivalNoun,
        "pron" | "pronoun" => PartOfSpeech::Pronoun,
        "prep" | "preposition" => PartOfSpeech::Preposition,
        "conj" | "conjunction" => PartOfSpeech::Conjunction,
        "interj" | "interjection" => PartOfSpeech::Interjection,
        "part" | "particle" => PartOfSpeech::Particle,
        "aux" | "auxiliary" => PartOfSpeech::Auxiliary,
        "art" | "article" => PartOfSpeech::Article,
        _ => return None,
    };
    Some(pos)
}
