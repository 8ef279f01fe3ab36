use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use rootlink::llm::{ChatApi, LlmClient};
use rootlink::{run_server, AppConfig, Resolver};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();

    let api: Arc<dyn ChatApi> = Arc::new(LlmClient::new(config.llm_base_url.clone()));
    let resolver = Resolver::new(api, config.clone());

    run_server(config, resolver).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
