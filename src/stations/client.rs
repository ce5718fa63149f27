use std::time::Duration;

use itertools::Itertools;
use serde::de::DeserializeOwned;
use url::Url;

use super::{
    entities::{HeartRailsEnvelope, HeartRailsResponse, LineList, PrefectureList, Station, StationList},
    error::{StationsError, StationsResult},
};

const HEART_RAILS_URL: &str = "https://express.heartrails.com/api/json";

#[derive(Clone, Debug)]
pub struct StationsClient {
    client: reqwest::Client,
}

impl StationsClient {
    pub fn new() -> StationsResult<StationsClient> {
        let client = StationsClient {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()?,
        };

        Ok(client)
    }

    fn url(method: &str, params: &[(&str, &str)]) -> Url {
        let mut url = Url::parse(HEART_RAILS_URL).expect("station API URL is valid");
        url.query_pairs_mut()
            .append_pair("method", method)
            .extend_pairs(params);
        url
    }

    async fn request<T>(&self, url: Url) -> StationsResult<T>
    where
        T: DeserializeOwned,
    {
        log::debug!("Requesting {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;

        let data_str = response.text().await?;
        log::trace!("Response: {}", data_str);
        let envelope: HeartRailsEnvelope<T> = serde_json::from_str(&data_str)?;

        match envelope.response {
            HeartRailsResponse::Data(data) => Ok(data),
            HeartRailsResponse::Error { error } => Err(StationsError::NotFound(error)),
        }
    }

    pub async fn get_prefectures(&self) -> StationsResult<Vec<String>> {
        let url = Self::url("getPrefectures", &[]);
        let PrefectureList { prefecture } = self.request(url).await?;
        Ok(prefecture)
    }

    pub async fn get_lines(&self, prefecture: &str) -> StationsResult<Vec<String>> {
        let url = Self::url("getLines", &[("prefecture", prefecture)]);
        let LineList { line } = self.request(url).await?;
        Ok(line)
    }

    pub async fn get_stations_by_line(&self, line: &str) -> StationsResult<Vec<Station>> {
        let url = Self::url("getStations", &[("line", line)]);
        let StationList { station } = self.request(url).await?;
        Ok(station)
    }

    /// One entry per line the station is on
    pub async fn get_stations_by_name(&self, name: &str) -> StationsResult<Vec<Station>> {
        let url = Self::url("getStations", &[("name", name)]);
        let StationList { station } = self.request(url).await?;
        Ok(station)
    }

    /// Closest stations first
    pub async fn get_nearby_stations(&self, lat: f64, lon: f64) -> StationsResult<Vec<Station>> {
        let x = lon.to_string();
        let y = lat.to_string();
        let url = Self::url("getStations", &[("x", x.as_str()), ("y", y.as_str())]);
        let StationList { station } = self.request(url).await?;
        Ok(station)
    }

    pub async fn get_station_lines(&self, name: &str) -> StationsResult<Vec<String>> {
        let stations = self.get_stations_by_name(name).await?;
        Ok(station_lines(&stations))
    }
}

pub fn station_lines(stations: &[Station]) -> Vec<String> {
    stations
        .iter()
        .map(|s| s.line.clone())
        .filter(|l| !l.is_empty())
        .unique()
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;

    fn station(name: &str, line: &str) -> Station {
        Station {
            name: name.to_string(),
            prefecture: "東京都".to_string(),
            line: line.to_string(),
            x: 139.700258,
            y: 35.690921,
            distance: None,
        }
    }

    #[test]
    fn test_url() {
        let url = StationsClient::url("getStations", &[("line", "JR山手線")]);
        assert_eq!(url.host_str(), Some("express.heartrails.com"));

        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                ("method".to_string(), "getStations".to_string()),
                ("line".to_string(), "JR山手線".to_string()),
            ]
        );
    }

    #[test]
    fn test_station_lines_are_unique() {
        let stations = [
            station("新宿", "JR山手線"),
            station("新宿", "JR中央線"),
            station("新宿", "JR山手線"),
            station("新宿", ""),
        ];

        assert_eq!(station_lines(&stations), vec!["JR山手線", "JR中央線"]);
    }
}
