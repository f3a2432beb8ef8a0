//! Errors raised while building or sending a request

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to read upload file {path}: {source}")]
    UploadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled while the request was in flight
    #[error("Request canceled")]
    Canceled,
}

impl HttpError {
    /// Whether the error reflects benchmark shutdown rather than a target defect
    pub fn is_canceled(&self) -> bool {
        matches!(self, HttpError::Canceled)
    }

    /// Whether the request ran into the agent's timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::NetworkError(e) => e.is_timeout(),
            _ => false,
        }
    }
}

impl From<url::ParseError> for HttpError {
    fn from(e: url::ParseError) -> Self {
        HttpError::InvalidUrl(e.to_string())
    }
}
