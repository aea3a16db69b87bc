use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Every missing or invalid setting found during startup validation,
    /// reported together so one run of the tool surfaces all of them.
    #[error("invalid configuration: {}", problems.join("; "))]
    Configuration { problems: Vec<String> },

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed report: {0}")]
    MalformedReport(String),

    #[error("grade {0:?} is not a number")]
    Format(String),

    #[error("cache corrupted: {0}")]
    CacheCorruption(String),

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
