use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with HTTP {status}: {message}{}", request_suffix(.request_id))]
    Status {
        status: u16,
        code: Option<i64>,
        message: String,
        request_id: Option<String>,
    },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("response did not contain a result")]
    MissingResult,

    #[error("codec configuration type {0} cannot be created by this workflow")]
    UnsupportedCodec(String),
}

fn request_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (request {})", id),
        None => String::new(),
    }
}
