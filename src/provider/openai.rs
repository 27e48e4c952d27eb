use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::wire::{Completion, CompletionRequest};

/// OpenAI chat completions. The key is read from `OPENAI_API_KEY` on every
/// call so it never has to live in the config file.
pub struct OpenAIProvider {
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(api_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { api_base, client })
    }
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

fn parse_chat_response(text: &str) -> Result<String> {
    let parsed: ChatResponse = serde_json::from_str(text)
        .map_err(|e| anyhow!("failed to parse OpenAI response: {e}\nRaw: {text}"))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .ok_or_else(|| anyhow!("OpenAI response had no message content"))
}

#[async_trait]
impl super::Provider for OpenAIProvider {
    async fn complete(&self, req: &CompletionRequest, debug: bool) -> Result<Completion> {
        let api_key = super::api_key("OPENAI_API_KEY")?;
        let url = format!("{}/v1/chat/completions", self.api_base.trim_end_matches('/'));

        let messages: Vec<_> = req
            .messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();
        let body = json!({
            "model": req.model,
            "messages": messages,
        });

        debug!(%url, model = %req.model, "sending chat completion");
        if debug {
            eprintln!(
                "debug[openai]: HTTP POST {} body:\n{}",
                url,
                serde_json::to_string_pretty(&body)?
            );
        }

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;

        if debug {
            eprintln!("debug[openai]: raw status: {}", status);
            eprintln!("debug[openai]: raw response:\n{}", &text);
        }

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({}): {}", status, text));
        }

        Ok(Completion { text: parse_chat_response(&text)? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_choice_and_trims() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "  Take a short walk.\n"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 5}
        }"#;
        assert_eq!(parse_chat_response(body).unwrap(), "Take a short walk.");
    }

    #[test]
    fn empty_choices_is_an_error() {
        assert!(parse_chat_response(r#"{"choices": []}"#).is_err());
    }

    #[test]
    fn null_content_is_an_error() {
        let body = r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#;
        assert!(parse_chat_response(body).is_err());
    }

    #[test]
    fn garbage_is_an_error() {
        let err = parse_chat_response("<html>bad gateway</html>").unwrap_err();
        assert!(err.to_string().contains("failed to parse OpenAI response"));
    }
}
