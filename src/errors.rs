use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachError {
    #[error("unsupported mode: {0}")] UnsupportedMode(String),
    #[error("missing mode name")] MissingMode,
    #[error("completion failed: {0}")] CompletionFailed(String),
    #[error("profile unavailable: {0}")] ProfileUnavailable(String),
    #[error("config error: {0}")] Config(String),
}
