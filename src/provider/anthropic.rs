use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::wire::{Completion, CompletionRequest, Role};
use super::Provider;

pub struct Anthropic {
    client: Client,
    api_base: String,
    api_version: String,
    max_tokens: u32,
}

impl Anthropic {
    pub fn new(api_base: String, api_version: String, max_tokens: u32, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base, api_version, max_tokens })
    }
}

#[derive(Serialize)]
struct MsgRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Msg<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MsgResponse {
    content: Vec<Block>,
}

#[derive(Deserialize)]
struct Block {
    #[serde(default)]
    text: String,
    #[serde(default)]
    r#type: String,
}

/// The messages API takes the system prompt as a top-level field.
fn to_body<'a>(req: &'a CompletionRequest, max_tokens: u32) -> MsgRequest<'a> {
    let messages = req
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| Msg { role: m.role.as_str(), content: &m.content })
        .collect();
    MsgRequest {
        model: &req.model,
        max_tokens,
        messages,
        system: req.system_text(),
    }
}

fn parse_body(text: &str) -> Result<String> {
    let parsed: MsgResponse = serde_json::from_str(text)
        .map_err(|e| anyhow!("anthropic response parse error: {}", e))?;

    parsed
        .content
        .into_iter()
        .find(|b| b.r#type == "text" && !b.text.is_empty())
        .map(|b| b.text.trim().to_string())
        .ok_or_else(|| anyhow!("anthropic: empty content"))
}

#[async_trait]
impl Provider for Anthropic {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<Completion> {
        let api_key = super::api_key("ANTHROPIC_API_KEY")?;
        let url = format!("{}/v1/messages", self.api_base.trim_end_matches('/'));
        let body = to_body(req, self.max_tokens);

        debug!(%url, model = %req.model, "sending messages request");
        if debug {
            eprintln!("debug/anthropic: POST {}", url);
        }

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .context("anthropic request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("anthropic read body failed")?;
        if debug {
            eprintln!("debug/anthropic: raw body:\n{}\n", text);
        }

        if !status.is_success() {
            return Err(anyhow!("anthropic API error ({}): {}", status, text));
        }

        Ok(Completion { text: parse_body(&text)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::ChatMessage;

    #[test]
    fn system_message_moves_to_top_level() {
        let req = CompletionRequest {
            model: "claude".into(),
            messages: vec![ChatMessage::system("be kind"), ChatMessage::user("hello")],
        };
        let body = serde_json::to_value(to_body(&req, 256)).unwrap();
        assert_eq!(body["system"], "be kind");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn picks_first_text_block() {
        let body = r#"{"content": [{"type": "thinking", "text": ""}, {"type": "text", "text": " Breathe. "}]}"#;
        assert_eq!(parse_body(body).unwrap(), "Breathe.");
    }

    #[test]
    fn no_text_block_is_an_error() {
        assert!(parse_body(r#"{"content": []}"#).is_err());
    }
}
