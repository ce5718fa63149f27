use std::time::Duration;

use derivative::Derivative;
use reqwest::StatusCode;
use url::Url;

use super::{
    entities::{SearchTextRequest, SearchTextResponse, FIELD_MASK},
    error::{PlacesError, PlacesResult},
};
use crate::entities::Place;

const SEARCH_TEXT_URL: &str = "https://places.googleapis.com/v1/places:searchText";

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct PlacesClient {
    #[derivative(Debug = "ignore")]
    client: reqwest::Client,
    #[derivative(Debug = "ignore")]
    api_key: Option<String>,
    url: Url,
}

impl PlacesClient {
    pub fn new(api_key: Option<String>) -> PlacesResult<PlacesClient> {
        let client = PlacesClient {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
            api_key,
            url: Url::parse(SEARCH_TEXT_URL).expect("search URL is valid"),
        };

        Ok(client)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Free text search, biased towards the request's location if set.
    ///
    /// Without an API key there is nothing to search, so the result is empty.
    pub async fn search_text(&self, request: &SearchTextRequest) -> PlacesResult<Vec<Place>> {
        let Some(api_key) = &self.api_key else {
            log::warn!("No places API key, skipping search for {}", request.text_query);
            return Ok(vec![]);
        };

        log::debug!("Searching places for {}", request.text_query);
        let response = self
            .client
            .post(self.url.clone())
            .header("X-Goog-Api-Key", api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            log::warn!("Places quota exhausted: {}", status);
            return Err(PlacesError::Quota(status.as_u16()));
        }

        let data_str = response.text().await?;
        if !status.is_success() {
            return Err(PlacesError::Status(status.as_u16(), data_str));
        }

        log::trace!("Response: {}", data_str);
        let data: SearchTextResponse = serde_json::from_str(&data_str)?;

        Ok(data.places.into_iter().map(Place::from).collect())
    }
}

#[cfg(test)]
mod test {

    use crate::places::entities::SearchTextRequestBuilder;

    use super::*;

    #[tokio::test]
    async fn test_unconfigured_returns_nothing() {
        let client = PlacesClient::new(None).unwrap();
        assert!(!client.is_configured());

        let request = SearchTextRequestBuilder::default()
            .text_query("新宿 がっつり")
            .build()
            .unwrap();
        let places = client.search_text(&request).await.unwrap();
        assert!(places.is_empty());
    }

    #[test]
    fn test_debug_hides_key() {
        let client = PlacesClient::new(Some("secret-key".to_string())).unwrap();
        assert!(!format!("{:?}", client).contains("secret-key"));
    }
}
