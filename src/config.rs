use std::env;

#[derive(Clone, Debug)]
pub struct ModelConfig {
    pub entry_model: String,
    pub gate_model: String,
}

#[derive(Clone, Debug)]
pub struct LimitConfig {
    pub max_query_len: usize,
    pub max_senses: usize,
    pub max_examples: usize,
    pub max_output_tokens: usize,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub llm_base_url: String,
    pub models: ModelConfig,
    pub limits: LimitConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("ROOTLINK_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            llm_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:11434".to_string()),
            models: ModelConfig {
                entry_model: env::var("ENTRY_MODEL")
                    .unwrap_or_else(|_| "qwen2.5:14b-instruct".to_string()),
                gate_model: env::var("GATE_MODEL")
                    .unwrap_or_else(|_| "qwen2.5:3b-instruct".to_string()),
            },
            limits: LimitConfig {
                max_query_len: env::var("MAX_QUERY_LEN")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
                max_senses: env::var("MAX_SENSES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(4),
                max_examples: env::var("MAX_EXAMPLES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3),
                max_output_tokens: env::var("MAX_OUTPUT_TOKENS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(700),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::from_env();
        assert_eq!(config.limits.max_query_len, 60);
        assert_eq!(config.limits.max_senses, 4);
        assert_eq!(config.limits.max_examples, 3);
        assert!(!config.models.entry_model.is_empty());
        assert!(!config.models.gate_model.is_empty());
    }
}
