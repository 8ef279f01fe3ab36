use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::{
    DictionaryEntry, EntryKind, EtymologyHook, Example, HookType, LexicalUnitType, Sense,
};
use crate::pos;
use crate::prompts;
use crate::route::{RouteDecision, RouteKind};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("chat response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed entry payload: {0}")]
    Malformed(String),
}

/// One opaque boundary for both the gate oracle and the entry generator.
/// The two concerns differ only in model name and decoding.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChatApi for LlmClient {
    async fn complete(
        &self,
        model: &str,
        prompt: &str,
        max_tokens: usize,
        temperature: f32,
    ) -> Result<String, LlmError> {
        #[derive(Serialize)]
        struct ChatReq<'a> {
            model: &'a str,
            prompt: &'a str,
            stream: bool,
            options: ChatOptions,
        }

        #[derive(Serialize)]
        struct ChatOptions {
            num_predict: usize,
            temperature: f32,
        }

        #[derive(Deserialize)]
        struct ChatResp {
            response: String,
        }

        let url = format!("{}/chat", self.base_url);
        let response = self
            .client
            .post(url)
            .json(&ChatReq {
                model,
                prompt,
                stream: false,
                options: ChatOptions {
                    num_predict: max_tokens,
                    temperature,
                },
            })
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status,
                body: normalize_err_body(&body),
            });
        }

        let body = response.text().await?;
        let parsed: ChatResp = serde_json::from_str(&body)?;
        Ok(parsed.response.trim().to_string())
    }
}

pub async fn generate_entry(
    api: &dyn ChatApi,
    config: &AppConfig,
    route: &RouteDecision,
    query: &str,
) -> Result<DictionaryEntry, LlmError> {
    let prompt = match route.kind {
        RouteKind::Word => prompts::word_entry_prompt(&route.normalized, config.limits.max_senses),
        RouteKind::LexicalUnit => prompts::lexical_unit_prompt(&route.normalized),
    };

    let raw = api
        .complete(
            &config.models.entry_model,
            &prompt,
            config.limits.max_output_tokens,
            0.1,
        )
        .await?;
    let cleaned = sanitize_model_output(raw);

    match route.kind {
        RouteKind::Word => parse_word_entry(&cleaned, config, route, query),
        RouteKind::LexicalUnit => parse_lexical_entry(&cleaned, config, route, query),
    }
}

#[derive(Deserialize)]
struct WordPayload {
    pronunciation: Option<String>,
    senses: Vec<WireSense>,
    #[serde(default, rename = "etymologyHook", alias = "etymology_hook")]
    etymology_hook: Option<WireHook>,
}

#[derive(Deserialize)]
struct WireSense {
    meaning: String,
    #[serde(default, rename = "partOfSpeech", alias = "part_of_speech")]
    part_of_speech: Option<PosField>,
    example: Option<String>,
    translation: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PosField {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct WireHook {
    #[serde(rename = "type")]
    hook_type: String,
    text: String,
}

#[derive(Deserialize)]
struct LexicalPayload {
    #[serde(default, alias = "lexicalUnitType")]
    lexical_unit_type: Option<String>,
    #[serde(default, rename = "coreImage", alias = "core_image")]
    core_image: Option<WireHook>,
    meanings: Vec<WireMeaning>,
}

#[derive(Deserialize)]
struct WireMeaning {
    meaning: String,
    #[serde(default)]
    examples: Vec<WireExample>,
}

#[derive(Deserialize)]
struct WireExample {
    sentence: String,
    translation: Option<String>,
}

fn parse_word_entry(
    text: &str,
    config: &AppConfig,
    route: &RouteDecision,
    query: &str,
) -> Result<DictionaryEntry, LlmError> {
    let payload: WordPayload = serde_json::from_str(text)?;

    let mut senses = Vec::new();
    for wire in payload.senses {
        let meaning = wire.meaning.trim().to_string();
        if meaning.is_empty() {
            return Err(LlmError::Malformed("sense without a meaning".into()));
        }

        let examples = match wire.example {
            Some(sentence) if !sentence.trim().is_empty() => vec![Example {
                sentence: sentence.trim().to_string(),
                translation: wire.translation.filter(|t| !t.trim().is_empty()),
            }],
            _ => Vec::new(),
        };

        senses.push(Sense {
            meaning,
            part_of_speech: pos::normalize_pos(&pos_text(wire.part_of_speech)),
            examples,
        });
    }

    if senses.is_empty() {
        return Err(LlmError::Malformed("entry carried no senses".into()));
    }
    senses.truncate(config.limits.max_senses);

    Ok(DictionaryEntry {
        query: query.to_string(),
        normalized: route.normalized.clone(),
        kind: EntryKind::Word,
        pronunciation: payload.pronunciation.filter(|p| !p.trim().is_empty()),
        senses,
        etymology_hook: payload.etymology_hook.and_then(hook_from_wire),
        generated_at: Utc::now(),
    })
}

fn parse_lexical_entry(
    text: &str,
    config: &AppConfig,
    route: &RouteDecision,
    query: &str,
) -> Result<DictionaryEntry, LlmError> {
    let payload: LexicalPayload = serde_json::from_str(text)?;

    let mut senses = Vec::new();
    for wire in payload.meanings {
        let meaning = wire.meaning.trim().to_string();
        if meaning.is_empty() {
            return Err(LlmError::Malformed("meaning without text".into()));
        }

        let mut examples: Vec<Example> = wire
            .examples
            .into_iter()
            .filter(|e| !e.sentence.trim().is_empty())
            .map(|e| Example {
                sentence: e.sentence.trim().to_string(),
                translation: e.translation.filter(|t| !t.trim().is_empty()),
            })
            .collect();
        examples.truncate(config.limits.max_examples);

        senses.push(Sense {
            meaning,
            part_of_speech: Vec::new(),
            examples,
        });
    }

    if senses.is_empty() {
        return Err(LlmError::Malformed("entry carried no meanings".into()));
    }
    senses.truncate(config.limits.max_senses);

    Ok(DictionaryEntry {
        query: query.to_string(),
        normalized: route.normalized.clone(),
        kind: EntryKind::LexicalUnit {
            unit_type: unit_type_from_wire(payload.lexical_unit_type),
        },
        pronunciation: None,
        senses,
        etymology_hook: payload.core_image.and_then(hook_from_wire),
        generated_at: Utc::now(),
    })
}

fn pos_text(field: Option<PosField>) -> String {
    match field {
        Some(PosField::One(s)) => s,
        Some(PosField::Many(items)) => items.join(" "),
        None => String::new(),
    }
}

fn hook_from_wire(hook: WireHook) -> Option<EtymologyHook> {
    let hook_type = match hook.hook_type.trim() {
        "A" => HookType::A,
        "B" => HookType::B,
        "C" => HookType::C,
        "D" => HookType::D,
        "core_image" => HookType::CoreImage,
        _ => return None,
    };

    let text = hook.text.trim();
    if text.is_empty() {
        return None;
    }

    Some(EtymologyHook {
        hook_type,
        text: text.to_string(),
    })
}

fn unit_type_from_wire(raw: Option<String>) -> LexicalUnitType {
    match raw.as_deref().map(str::trim) {
        Some("phrasal_verb") => LexicalUnitType::PhrasalVerb,
        Some("idiom") => LexicalUnitType::Idiom,
        Some("fixed_expression") => LexicalUnitType::FixedExpression,
        Some("spoken_expression") => LexicalUnitType::SpokenExpression,
        Some("collocation") => LexicalUnitType::Collocation,
        Some("pattern") => LexicalUnitType::Pattern,
        _ => LexicalUnitType::Idiom,
    }
}

pub(crate) fn sanitize_model_output(answer: String) -> String {
    let mut text = answer.trim().to_string();
    if text.starts_with("```") {
        let re = Regex::new(r"(?s)^```[a-zA-Z]*\n(.*)\n```$")
            .unwrap_or_else(|_| Regex::new("^$").unwrap());
        if let Some(caps) = re.captures(&text) {
            if let Some(body) = caps.get(1) {
                text = body.as_str().trim().to_string();
            }
        } else {
            text = text.replace("```", "").trim().to_string();
        }
    }
    text
}

fn normalize_err_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    if let Ok(json) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(err) = json.get("error").and_then(|v| v.as_str()) {
            return err.to_string();
        }
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::PartOfSpeech;
    use crate::route::classify_route;

    fn test_config() -> AppConfig {
        AppConfig::from_env()
    }

    #[test]
    fn word_payload_parses_into_an_entry() {
        let json = r#"{
            "pronunciation": "rʌn",
            "senses": [
                {
                    "meaning": "走る",
                    "partOfSpeech": ["verb"],
                    "example": "I run every morning.",
                    "translation": "私は毎朝走る。"
                },
                {
                    "meaning": "経営する",
                    "partOfSpeech": "verb"
                }
            ],
            "etymologyHook": { "type": "B", "text": "A hub image of continuous motion." }
        }"#;

        let route = classify_route("run");
        let entry = parse_word_entry(json, &test_config(), &route, "running").unwrap();

        assert_eq!(entry.query, "running");
        assert_eq!(entry.normalized, "run");
        assert_eq!(entry.kind, EntryKind::Word);
        assert_eq!(entry.pronunciation.as_deref(), Some("rʌn"));
        assert_eq!(entry.senses.len(), 2);
        assert_eq!(entry.senses[0].part_of_speech, vec![PartOfSpeech::Verb]);
        assert_eq!(entry.senses[0].examples.len(), 1);
        assert!(entry.senses[1].examples.is_empty());
        assert_eq!(entry.etymology_hook.as_ref().unwrap().hook_type, HookType::B);
    }

    #[test]
    fn sense_without_meaning_is_malformed() {
        let json = r#"{ "senses": [ { "meaning": "  ", "partOfSpeech": "noun" } ] }"#;
        let route = classify_route("apple");
        let err = parse_word_entry(json, &test_config(), &route, "apple").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[test]
    fn empty_sense_list_is_malformed() {
        let json = r#"{ "senses": [] }"#;
        let route = classify_route("apple");
        let err = parse_word_entry(json, &test_config(), &route, "apple").unwrap_err();
        assert!(matches!(err, LlmError::Malformed(_)));
    }

    #[test]
    fn senses_are_truncated_to_the_limit() {
        let sense = r#"{ "meaning": "意味", "partOfSpeech": "noun" }"#;
        let json = format!(
            r#"{{ "senses": [{0}, {0}, {0}, {0}, {0}, {0}] }}"#,
            sense
        );
        let route = classify_route("apple");
        let entry = parse_word_entry(&json, &test_config(), &route, "apple").unwrap();
        assert_eq!(entry.senses.len(), 4);
    }

    #[test]
    fn unknown_hook_type_is_dropped() {
        let json = r#"{
            "senses": [ { "meaning": "意味" } ],
            "etymologyHook": { "type": "A | B | C | D", "text": "unchosen" }
        }"#;
        let route = classify_route("apple");
        let entry = parse_word_entry(json, &test_config(), &route, "apple").unwrap();
        assert!(entry.etymology_hook.is_none());
    }

    #[test]
    fn lexical_payload_parses_with_core_image() {
        let json = r#"{
            "entry_type": "lexical_unit",
            "lexical_unit_type": "phrasal_verb",
            "coreImage": { "type": "core_image", "text": "支配や主導権が移る" },
            "meanings": [
                {
                    "id": 1,
                    "category": "social",
                    "meaning": "組織や事業の支配権を手に入れる",
                    "examples": [
                        { "sentence": "They took over the company.", "translation": "彼らは会社を買収した。" },
                        { "sentence": "A", "translation": "あ" },
                        { "sentence": "B", "translation": "い" },
                        { "sentence": "C", "translation": "う" }
                    ]
                }
            ]
        }"#;

        let route = classify_route("take over");
        let entry = parse_lexical_entry(json, &test_config(), &route, "took over").unwrap();

        assert_eq!(
            entry.kind,
            EntryKind::LexicalUnit {
                unit_type: LexicalUnitType::PhrasalVerb
            }
        );
        assert_eq!(entry.senses[0].examples.len(), 3);
        assert_eq!(
            entry.etymology_hook.as_ref().unwrap().hook_type,
            HookType::CoreImage
        );
    }

    #[test]
    fn missing_unit_type_falls_back_to_idiom() {
        let json = r#"{ "meanings": [ { "meaning": "意味" } ] }"#;
        let route = classify_route("kick the bucket");
        let entry = parse_lexical_entry(json, &test_config(), &route, "kick the bucket").unwrap();
        assert_eq!(
            entry.kind,
            EntryKind::LexicalUnit {
                unit_type: LexicalUnitType::Idiom
            }
        );
    }

    #[test]
    fn strips_markdown_fences() {
        let input = "```json\n{\"ok\":true}\n```".to_string();
        assert_eq!(sanitize_model_output(input), "{\"ok\":true}");
    }

    #[test]
    fn garbage_output_is_a_json_error() {
        let route = classify_route("apple");
        let err = parse_word_entry("not json at all", &test_config(), &route, "apple").unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
    }
}
