#[derive(thiserror::Error, Debug)]
pub enum StationsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    /// The provider answered, but with an error message instead of data
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type StationsResult<T> = Result<T, StationsError>;
