//! Builds the configured providers and picks the default one.

use std::collections::HashMap;
use std::sync::Arc;

use readpal_config::AppConfig;
use readpal_core::provider::Provider;
use tracing::warn;

use crate::openai_compat::{DEFAULT_TIMEOUT, OpenAiCompatProvider};

pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.get(&self.default_provider)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Register every `[providers.*]` entry plus the default provider.
///
/// A provider with neither an `api_url` nor a well-known name is skipped.
pub fn build_from_config(config: &AppConfig) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);

    let configured = config
        .providers
        .iter()
        .map(|(name, p)| (name.as_str(), p.api_url.clone(), p.api_key.clone()));
    let fallback_default = (!config.providers.contains_key(&config.default_provider))
        .then(|| (config.default_provider.as_str(), None, None));

    for (name, api_url, api_key) in configured.chain(fallback_default) {
        let Some(base_url) = api_url.or_else(|| known_base_url(name).map(String::from)) else {
            warn!(provider = name, "Unknown provider without api_url, skipping");
            continue;
        };
        let api_key = api_key.or_else(|| config.api_key.clone()).unwrap_or_default();

        router.register(
            name,
            Arc::new(OpenAiCompatProvider::new(name, base_url, api_key).with_timeout(DEFAULT_TIMEOUT)),
        );
    }

    router
}

fn known_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openai" => Some("https://api.openai.com/v1"),
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        _ => None,
    }
}
