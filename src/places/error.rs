use super::entities::SearchTextRequestBuilderError;

#[derive(thiserror::Error, Debug)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Request(#[from] SearchTextRequestBuilderError),

    /// Rate limited or out of quota, retrying later may help
    #[error("Quota exceeded: {0}")]
    Quota(u16),

    #[error("Error response: {0} {1}")]
    Status(u16, String),
}

impl PlacesError {
    pub fn is_quota(&self) -> bool {
        matches!(self, PlacesError::Quota(_))
    }
}

pub type PlacesResult<T> = Result<T, PlacesError>;
