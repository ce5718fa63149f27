use std::{collections::HashMap, time::Duration};

use derivative::Derivative;
use serde::Deserialize;
use url::Url;

const WIKIPEDIA_API_URL: &str = "https://ja.wikipedia.org/w/api.php";
const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialize error: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Image search unavailable: {0}")]
    Unavailable(u16),
}

pub type ImageResult<T> = Result<T, ImageError>;

#[derive(Deserialize, Debug)]
struct WikipediaResponse {
    query: WikipediaQuery,
}

#[derive(Deserialize, Debug)]
struct WikipediaQuery {
    pages: HashMap<String, WikipediaPage>,
}

#[derive(Deserialize, Debug)]
struct WikipediaPage {
    thumbnail: Option<WikipediaThumbnail>,
}

#[derive(Deserialize, Debug)]
struct WikipediaThumbnail {
    source: String,
}

#[derive(Deserialize, Debug)]
struct CustomSearchResponse {
    #[serde(default)]
    items: Vec<CustomSearchItem>,
}

#[derive(Deserialize, Debug)]
struct CustomSearchItem {
    link: String,
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ImagesClient {
    #[derivative(Debug = "ignore")]
    client: reqwest::Client,
    #[derivative(Debug = "ignore")]
    custom_search_key: Option<String>,
    custom_search_cx: Option<String>,
    custom_search_url: Url,
}

impl ImagesClient {
    pub fn new(
        custom_search_key: Option<String>,
        custom_search_cx: Option<String>,
    ) -> ImageResult<ImagesClient> {
        Ok(ImagesClient {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
            custom_search_key,
            custom_search_cx,
            custom_search_url: Url::parse(CUSTOM_SEARCH_URL)
                .expect("custom search URL is valid"),
        })
    }

    async fn request<T: serde::de::DeserializeOwned>(&self, url: Url) -> ImageResult<T> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        Ok(serde_json::from_str(&data_str)?)
    }

    fn station_image_url(station: &str) -> Url {
        let title = format!("{}駅", station);
        Url::parse_with_params(
            WIKIPEDIA_API_URL,
            &[
                ("action", "query"),
                ("titles", title.as_str()),
                ("prop", "pageimages"),
                ("format", "json"),
                ("pithumbsize", "1000"),
            ],
        )
        .expect("Wikipedia URL is valid")
    }

    /// Thumbnail of the station's Wikipedia article, if it has one
    pub async fn get_station_image(&self, station: &str) -> ImageResult<Option<String>> {
        let url = Self::station_image_url(station);
        log::debug!("Requesting {}", url);

        let response: WikipediaResponse = self.request(url).await?;
        Ok(first_thumbnail(response))
    }

    /// First image search hit for `query`, nothing if image search isn't set up.
    ///
    /// A non-success status from the search (usually quota) is
    /// [`ImageError::Unavailable`] so callers can answer without an image
    /// while leaving the miss uncached.
    pub async fn get_restaurant_image(&self, query: &str) -> ImageResult<Option<String>> {
        let (Some(key), Some(cx)) = (&self.custom_search_key, &self.custom_search_cx) else {
            return Ok(None);
        };

        let mut url = self.custom_search_url.clone();
        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("cx", cx)
            .append_pair("q", query)
            .append_pair("searchType", "image")
            .append_pair("num", "1");
        log::debug!("Searching image for {}", query);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("Image search for {} returned {}", query, status);
            return Err(ImageError::Unavailable(status.as_u16()));
        }

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let response: CustomSearchResponse = serde_json::from_str(&data_str)?;
        Ok(response.items.into_iter().next().map(|i| i.link))
    }
}

fn first_thumbnail(response: WikipediaResponse) -> Option<String> {
    // a single title was asked for, so there is at most one page that matters
    response
        .query
        .pages
        .into_values()
        .find_map(|p| p.thumbnail)
        .map(|t| t.source)
}
