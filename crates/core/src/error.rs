use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("assistant endpoint returned {status}: {details}")]
    Endpoint { status: String, details: String },

    #[error("assistant response had no readable text")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = CorpusError> = std::result::Result<T, E>;
