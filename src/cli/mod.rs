use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::prompt::ResponseMode;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
}

/// Flags left unset fall back to the config file, then to built-in defaults.
#[derive(Parser, Debug, Default)]
#[command(name = "wellbeing_coach", version, about = "Interactive mental well-being coach over a hosted chat-completion API")]
pub struct Args {
    /// Directory under which `.coach/` exchange artifacts are written.
    #[arg(long)]
    pub root: Option<String>,

    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    #[arg(long)]
    pub model: Option<String>,

    /// Initial response mode.
    #[arg(long, value_enum)]
    pub mode: Option<ResponseMode>,

    /// Submit a single input, print the reply and exit.
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub save_exchanges: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mode_and_provider() {
        let args = Args::try_parse_from([
            "wellbeing_coach",
            "--mode",
            "data-and-ux",
            "--provider",
            "open-ai",
            "--input",
            "hello",
        ])
        .unwrap();
        assert_eq!(args.mode, Some(ResponseMode::DataAndUx));
        assert_eq!(args.provider, Some(ProviderKind::OpenAI));
        assert_eq!(args.input.as_deref(), Some("hello"));
        assert!(args.progress);
        assert!(!args.save_exchanges);
        assert_eq!(args.root, None);
    }

    #[test]
    fn mode_aliases_are_accepted() {
        let args = Args::try_parse_from(["wellbeing_coach", "--mode", "ux"]).unwrap();
        assert_eq!(args.mode, Some(ResponseMode::UxOnly));
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Args::try_parse_from(["wellbeing_coach", "--mode", "astrology"]).is_err());
    }

    #[test]
    fn progress_can_be_disabled() {
        let args = Args::try_parse_from(["wellbeing_coach", "--progress", "false"]).unwrap();
        assert!(!args.progress);
    }
}
