use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("content not available")]
    ContentNotAvailable,
    #[error("unsupported content: {0}")]
    UnsupportedContent(String),
    #[error("other: {0}")]
    Other(String),
}
