use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::wire::{Completion, CompletionRequest};
use super::Provider;

pub struct Ollama {
    url: String,
    client: Client,
}

impl Ollama {
    pub fn new(url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { url, client })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: String,
}

fn to_body(req: &CompletionRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &req.model,
        messages: req
            .messages
            .iter()
            .map(|m| Msg { role: m.role.as_str(), content: &m.content })
            .collect(),
        stream: false,
    }
}

fn parse_body(text: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(text)
        .map_err(|e| anyhow!("ollama response parse error: {e}"))?;
    let content = parsed.message.content.trim().to_string();
    if content.is_empty() {
        return Err(anyhow!("ollama: empty content"));
    }
    Ok(content)
}

#[async_trait]
impl Provider for Ollama {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<Completion> {
        let url = format!("{}/api/chat", self.url.trim_end_matches('/'));
        let body = to_body(req);

        debug!(%url, model = %req.model, "sending ollama chat");
        if debug {
            eprintln!("debug/ollama: POST {}", url);
        }

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("ollama request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("ollama read body failed")?;

        if debug {
            eprintln!("debug/ollama: raw body:\n{}\n", text);
        }

        if !status.is_success() {
            return Err(anyhow!("ollama error ({}): {}", status, text));
        }

        Ok(Completion { text: parse_body(&text)? })
    }
}
