pub mod config;
pub mod entry_filter;
pub mod guard;
pub mod lemma;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod pos;
pub mod prompts;
pub mod redirect;
pub mod resolver;
pub mod route;
pub mod server;
pub mod typo;

pub use config::AppConfig;
pub use resolver::Resolver;
pub use server::run_server;
