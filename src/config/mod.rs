use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::cli::{Args, ProviderKind};
use crate::errors::CoachError;
use crate::profile::UserProfile;
use crate::prompt::ResponseMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub image_path: String,
    pub audio_path: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            image_path: "example2.jpg".into(),
            audio_path: "example.mp3".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub root: String,
    pub provider: ProviderKind,
    pub model: String,
    pub mode: ResponseMode,
    pub timeout_secs: u64,
    pub openai_url: String,
    pub ollama_url: String,
    pub anthropic_url: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub media: MediaConfig,
    pub profile: UserProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: ".".into(),
            provider: ProviderKind::OpenAI,
            model: "gpt-3.5-turbo".into(),
            mode: ResponseMode::Plain,
            timeout_secs: 120,
            openai_url: "https://api.openai.com".into(),
            ollama_url: "http://localhost:11434".into(),
            anthropic_url: "https://api.anthropic.com".into(),
            anthropic_version: "2023-06-01".into(),
            max_tokens: 1024,
            media: MediaConfig::default(),
            profile: UserProfile::default(),
        }
    }
}

impl Config {
    /// Read a TOML config file. Keys that are absent keep their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&raw)
            .map_err(|e| CoachError::Config(format!("{}: {e}", path.display())))?;
        Ok(cfg)
    }

    /// Defaults, then the optional config file, then explicit CLI flags.
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::from_file(Path::new(p))?,
            None => Self::default(),
        };
        cfg.apply_args(args);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(r) = &args.root {
            self.root = r.clone();
        }
        if let Some(p) = args.provider {
            self.provider = p;
        }
        if let Some(m) = &args.model {
            self.model = m.clone();
        }
        if let Some(m) = args.mode {
            self.mode = m;
        }
        if let Some(t) = args.timeout_secs {
            self.timeout_secs = t;
        }
    }

    pub fn validate(&self) -> Result<(), CoachError> {
        if self.model.trim().is_empty() {
            return Err(CoachError::Config("model must not be empty".into()));
        }
        if self.timeout_secs == 0 {
            return Err(CoachError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
