//! Conversational state for one interactive session.
//!
//! A [`Session`] owns the [`Transcript`] and the currently selected
//! [`ResponseMode`]. Whenever a different mode is observed the transcript is
//! cleared before anything else in that step runs.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::CoachError;
use crate::profile::UserProfile;
use crate::prompt::{self, ResponseMode};
use crate::provider::Provider;
use crate::wire::{Completion, CompletionRequest};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    User {
        text: String,
    },
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::User { text: text.into() }
    }

    pub fn assistant(text: impl Into<String>, explanation: Option<String>) -> Self {
        Turn::Assistant { text: text.into(), explanation }
    }
}

/// Append-only log of turns. Unbounded for the life of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// One completed submission, handed back so callers can render or archive it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    pub seq: usize,
    pub mode: ResponseMode,
    pub request: CompletionRequest,
    pub reply: Completion,
    pub explanation: String,
}

#[derive(Debug)]
pub struct Session {
    id: Uuid,
    current_mode: Option<ResponseMode>,
    transcript: Transcript,
    exchanges: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            current_mode: None,
            transcript: Transcript::new(),
            exchanges: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn current_mode(&self) -> Option<ResponseMode> {
        self.current_mode
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Feed the selector's current value. Returns true when the mode changed
    /// and the transcript was reset.
    pub fn observe_mode(&mut self, mode: ResponseMode) -> bool {
        if self.current_mode == Some(mode) {
            return false;
        }
        if !self.transcript.is_empty() {
            info!(
                session = %self.id,
                from = ?self.current_mode,
                to = ?mode,
                dropped = self.transcript.len(),
                "response mode changed, clearing transcript"
            );
        }
        self.transcript.reset();
        self.current_mode = Some(mode);
        true
    }

    /// Run one submission: apply the mode rule, compose, make a single
    /// completion call, then append the user and assistant turns.
    ///
    /// Blank input is suppressed and yields `Ok(None)`. On any error the
    /// transcript is left exactly as the mode rule left it.
    pub async fn submit(
        &mut self,
        mode: ResponseMode,
        text: &str,
        profile: Option<&UserProfile>,
        provider: &dyn Provider,
        model: &str,
        debug: bool,
    ) -> Result<Option<Exchange>, CoachError> {
        self.observe_mode(mode);

        if text.trim().is_empty() {
            debug!(session = %self.id, "blank input suppressed");
            return Ok(None);
        }

        let composition = prompt::compose(mode, text, profile)?;
        let request = composition.to_request(model);
        debug!(session = %self.id, mode = mode.name(), prompt = %composition.prompt, "composed prompt");

        let reply = provider.complete(&request, debug).await.map_err(|e| {
            warn!(session = %self.id, error = %e, "completion failed");
            CoachError::CompletionFailed(format!("{e:#}"))
        })?;

        self.transcript.append(Turn::user(text));
        self.transcript.append(Turn::assistant(
            reply.text.clone(),
            Some(composition.explanation.clone()),
        ));
        self.exchanges += 1;

        Ok(Some(Exchange {
            seq: self.exchanges,
            mode,
            request,
            reply,
            explanation: composition.explanation,
        }))
    }
}
