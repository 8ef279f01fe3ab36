use std::sync::Arc;

use serde::Deserialize;

use crate::config::AppConfig;
use crate::guard::{self, GuardVerdict};
use crate::llm::{self, ChatApi};
use crate::normalize;
use crate::prompts;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypoReason {
    Typo,
    Gibberish,
    NonEntry,
}

impl TypoReason {
    pub fn as_str(self) -> &'static str {
        match self {
            TypoReason::Typo => "TYPO",
            TypoReason::Gibberish => "GIBBERISH",
            TypoReason::NonEntry => "NON_ENTRY",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypoVerdict {
    Ok,
    Block {
        reason: TypoReason,
        candidates: Vec<String>,
    },
    Uncertain,
}

/// Asks a small gate model whether the query deserves a canonical entry.
/// Never fails the pipeline: anything short of a confident answer,
/// including transport trouble, comes back as `Uncertain`.
#[derive(Clone)]
pub struct TypoClassifier {
    api: Arc<dyn ChatApi>,
    model: String,
    max_query_len: usize,
}

#[derive(Deserialize)]
struct OracleDecision {
    decision: Decision,
    confidence: Confidence,
    #[serde(default)]
    reason: Option<TypoReason>,
    #[serde(default)]
    candidates: Vec<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum Decision {
    Ok,
    Block,
    Uncertain,
}

#[derive(Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Confidence {
    High,
    Medium,
    Low,
}

impl TypoClassifier {
    pub fn new(api: Arc<dyn ChatApi>, config: &AppConfig) -> Self {
        Self {
            api,
            model: config.models.gate_model.clone(),
            max_query_len: config.limits.max_query_len,
        }
    }

    pub async fn classify(&self, normalized: &str) -> TypoVerdict {
        if normalized.chars().count() < 3 {
            return TypoVerdict::Uncertain;
        }

        let prompt = prompts::typo_gate_prompt(normalized);
        let raw = match self.api.complete(&self.model, &prompt, 160, 0.0).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("typo gate unavailable for {normalized:?}: {err}");
                return TypoVerdict::Uncertain;
            }
        };

        let cleaned = llm::sanitize_model_output(raw);
        let parsed: OracleDecision = match serde_json::from_str(&cleaned) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!("typo gate returned undecodable output for {normalized:?}: {err}");
                return TypoVerdict::Uncertain;
            }
        };

        match (parsed.decision, parsed.confidence) {
            (Decision::Block, Confidence::High | Confidence::Medium) => TypoVerdict::Block {
                reason: parsed.reason.unwrap_or(TypoReason::NonEntry),
                candidates: self.usable_candidates(parsed.candidates),
            },
            (Decision::Ok, Confidence::High) => TypoVerdict::Ok,
            _ => TypoVerdict::Uncertain,
        }
    }

    // Candidates come from a model. Each one has to survive the same
    // guard and normalization as typed input before we redirect to it.
    fn usable_candidates(&self, raw: Vec<String>) -> Vec<String> {
        let mut out = Vec::new();
        for candidate in raw {
            let guarded = match guard::guard(&candidate, self.max_query_len) {
                GuardVerdict::Ok { normalized } => normalized,
                GuardVerdict::Rejected { .. } => continue,
            };

            let normalized = if guarded.split_whitespace().nth(1).is_some() {
                normalize::normalize_lexical_unit(&guarded)
            } else {
                normalize::normalize_word(&guarded)
            };

            if normalized.is_empty() || out.contains(&normalized) {
                continue;
            }

            out.push(normalized);
            if out.len() == 2 {
                break;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedOracle {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        calls: Mutex<usize>,
    }

    impl CannedOracle {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChatApi for CannedOracle {
        async fn complete(
            &self,
            _model: &str,
            _prompt: &str,
            _max_tokens: usize,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn classifier_with(
        replies: Vec<Result<String, LlmError>>,
    ) -> (TypoClassifier, Arc<CannedOracle>) {
        let oracle = Arc::new(CannedOracle::new(replies));
        let config = AppConfig::from_env();
        (TypoClassifier::new(oracle.clone(), &config), oracle)
    }

    #[tokio::test]
    async fn short_input_never_reaches_the_oracle() {
        let (classifier, oracle) = classifier_with(vec![]);
        assert_eq!(classifier.classify("ab").await, TypoVerdict::Uncertain);
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn confident_ok_passes() {
        let (classifier, _) = classifier_with(vec![Ok(
            r#"{"decision":"OK","confidence":"high"}"#.to_string(),
        )]);
        assert_eq!(classifier.classify("apple").await, TypoVerdict::Ok);
    }

    #[tokio::test]
    async fn medium_ok_downgrades_to_uncertain() {
        let (classifier, _) = classifier_with(vec![Ok(
            r#"{"decision":"OK","confidence":"medium"}"#.to_string(),
        )]);
        assert_eq!(classifier.classify("apple").await, TypoVerdict::Uncertain);
    }

    #[tokio::test]
    async fn low_confidence_block_downgrades_to_uncertain() {
        let (classifier, _) = classifier_with(vec![Ok(
            r#"{"decision":"BLOCK","confidence":"low","reason":"TYPO"}"#.to_string(),
        )]);
        assert_eq!(classifier.classify("takke").await, TypoVerdict::Uncertain);
    }

    #[tokio::test]
    async fn medium_block_is_honored_with_normalized_candidates() {
        let (classifier, _) = classifier_with(vec![Ok(
            r#"{"decision":"BLOCK","confidence":"medium","reason":"TYPO","candidates":["Took Over","caf3","heads"]}"#
                .to_string(),
        )]);

        let verdict = classifier.classify("takke over").await;
        assert_eq!(
            verdict,
            TypoVerdict::Block {
                reason: TypoReason::Typo,
                candidates: vec!["take over".to_string(), "head".to_string()],
            }
        );
    }

    #[tokio::test]
    async fn block_without_reason_defaults_to_non_entry() {
        let (classifier, _) = classifier_with(vec![Ok(
            r#"{"decision":"BLOCK","confidence":"high"}"#.to_string(),
        )]);

        match classifier.classify("zzzqqq").await {
            TypoVerdict::Block { reason, candidates } => {
                assert_eq!(reason, TypoReason::NonEntry);
                assert!(candidates.is_empty());
            }
            other => panic!("expected a block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_uncertain() {
        let (classifier, _) = classifier_with(vec![Err(LlmError::Malformed(
            "connection refused".to_string(),
        ))]);
        assert_eq!(classifier.classify("apple").await, TypoVerdict::Uncertain);
    }

    #[tokio::test]
    async fn fenced_oracle_output_still_parses() {
        let (classifier, _) = classifier_with(vec![Ok(
            "```json\n{\"decision\":\"OK\",\"confidence\":\"high\"}\n```".to_string(),
        )]);
        assert_eq!(classifier.classify("apple").await, TypoVerdict::Ok);
    }

    #[tokio::test]
    async fn undecodable_oracle_output_degrades_to_uncertain() {
        let (classifier, _) = classifier_with(vec![Ok("BLOCK".to_string())]);
        assert_eq!(classifier.classify("apple").await, TypoVerdict::Uncertain);
    }
}
