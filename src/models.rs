use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pos::PartOfSpeech;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LexicalUnitType {
    PhrasalVerb,
    Idiom,
    FixedExpression,
    SpokenExpression,
    Collocation,
    Pattern,
}

impl LexicalUnitType {
    pub fn as_str(self) -> &'static str {
        match self {
            LexicalUnitType::PhrasalVerb => "phrasal_verb",
            LexicalUnitType::Idiom => "idiom",
            LexicalUnitType::FixedExpression => "fixed_expression",
            LexicalUnitType::SpokenExpression => "spoken_expression",
            LexicalUnitType::Collocation => "collocation",
            LexicalUnitType::Pattern => "pattern",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    Word,
    LexicalUnit { unit_type: LexicalUnitType },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HookType {
    A,
    B,
    C,
    D,
    #[serde(rename = "core_image")]
    CoreImage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EtymologyHook {
    #[serde(rename = "type")]
    pub hook_type: HookType,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Example {
    pub sentence: String,
    pub translation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sense {
    pub meaning: String,
    pub part_of_speech: Vec<PartOfSpeech>,
    pub examples: Vec<Example>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryEntry {
    pub query: String,
    pub normalized: String,
    #[serde(flatten)]
    pub kind: EntryKind,
    pub pronunciation: Option<String>,
    pub senses: Vec<Sense>,
    pub etymology_hook: Option<EtymologyHook>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveRequest {
    pub query: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub ok: bool,
    pub redirect_to: Option<String>,
    pub reason: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub session_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_kind_serializes_with_a_tag() {
        let word = serde_json::to_value(EntryKind::Word).unwrap();
        assert_eq!(word["kind"], "word");

        let unit = serde_json::to_value(EntryKind::LexicalUnit {
            unit_type: LexicalUnitType::PhrasalVerb,
        })
        .unwrap();
        assert_eq!(unit["kind"], "lexical_unit");
        assert_eq!(unit["unit_type"], "phrasal_verb");
    }

    #[test]
    fn hook_types_keep_their_letter_names() {
        assert_eq!(serde_json::to_value(HookType::A).unwrap(), "A");
        assert_eq!(
            serde_json::to_value(HookType::CoreImage).unwrap(),
            "core_image"
        );
    }

    #[test]
    fn entry_json_flattens_the_kind() {
        let entry = DictionaryEntry {
            query: "took over".to_string(),
            normalized: "take over".to_string(),
            kind: EntryKind::LexicalUnit {
                unit_type: LexicalUnitType::PhrasalVerb,
            },
            pronunciation: None,
            senses: vec![Sense {
                meaning: "支配権を手に入れる".to_string(),
                part_of_speech: vec![],
                examples: vec![Example {
                    sentence: "They took over the company.".to_string(),
                    translation: Some("彼らは会社を買収した。".to_string()),
                }],
            }],
            etymology_hook: None,
            generated_at: Utc::now(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["kind"], "lexical_unit");
        assert_eq!(json["normalized"], "take over");
        assert_eq!(json["senses"][0]["examples"][0]["sentence"], "They took over the company.");
    }
}
