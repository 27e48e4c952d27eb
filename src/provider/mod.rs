use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::cli::ProviderKind;
use crate::config::Config;
use crate::wire::{Completion, CompletionRequest};

pub mod openai;
pub mod anthropic;
pub mod ollama;

/// The hosted completion collaborator. One call, one completion text, no retry.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<Completion>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

pub fn make_provider(cfg: &Config) -> Result<DynProvider> {
    match cfg.provider {
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            cfg.openai_url.clone(),
            cfg.timeout(),
        )?)),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::new(
            cfg.anthropic_url.clone(),
            cfg.anthropic_version.clone(),
            cfg.max_tokens,
            cfg.timeout(),
        )?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(
            cfg.ollama_url.clone(),
            cfg.timeout(),
        )?)),
    }
}

fn api_key(var: &str) -> Result<String> {
    std::env::var(var)
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow!("{var} env var is not set"))
}
