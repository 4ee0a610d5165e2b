use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON input: {0}")]
    Input(#[from] serde_json::Error),
    #[error("failed to read stdin: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid protected branch pattern: {0}")]
    Pattern(#[from] regex::Error),
}
