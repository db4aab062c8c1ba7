#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Provider responded with HTTP {status} for {url}.")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to parse API response: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("Invalid data from API: missing field `{field}`.")]
    MissingField { field: String },

    #[error("Feed API error: {message}")]
    ApiError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Unknown provider `{id}`.")]
    UnknownProvider { id: String },

    #[error("Unexpected error: {message}")]
    UnexpectedResult { message: String },
}

impl From<wreq::Error> for FeedError {
    fn from(e: wreq::Error) -> Self {
        FeedError::RequestFailed(Box::new(e))
    }
}
