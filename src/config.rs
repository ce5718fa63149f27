use std::{env, fmt::Display, str::FromStr, time::Duration};

use derivative::Derivative;

use crate::ranking::DEFAULT_WALK_MINUTES_CEILING;

const DAY_SECONDS: u64 = 24 * 60 * 60;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// One places search for all stations
    Combined,
    /// One places search per station, run concurrently and merged
    PerStation,
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "combined" => Ok(SearchMode::Combined),
            "per-station" => Ok(SearchMode::PerStation),
            other => Err(format!("unknown search mode '{}'", other)),
        }
    }
}

#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct Config {
    pub listen_address: String,
    pub allow_origin: Option<String>,
    #[derivative(Debug = "ignore")]
    pub google_api_key: Option<String>,
    #[derivative(Debug = "ignore")]
    pub custom_search_api_key: Option<String>,
    pub custom_search_cx: Option<String>,
    /// SQLite file for the response cache, in memory when unset
    pub cache_path: Option<String>,
    pub cache_ttl: Duration,
    pub cache_purge_interval: Duration,
    pub walk_minutes_ceiling: u32,
    pub search_mode: SearchMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_address: "127.0.0.1:8080".to_string(),
            allow_origin: None,
            google_api_key: None,
            custom_search_api_key: None,
            custom_search_cx: None,
            cache_path: None,
            cache_ttl: Duration::from_secs(DAY_SECONDS),
            cache_purge_interval: Duration::from_secs(60 * 60),
            walk_minutes_ceiling: DEFAULT_WALK_MINUTES_CEILING,
            search_mode: SearchMode::Combined,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &'static str) -> ConfigResult<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| ConfigError::Invalid(key, e.to_string()))
        })
        .transpose()
}

impl Config {
    /// Reads configuration from the environment, falling back to defaults
    pub fn load() -> ConfigResult<Config> {
        let defaults = Config::default();

        let config = Config {
            listen_address: var("LISTEN_ADDRESS").unwrap_or(defaults.listen_address),
            allow_origin: var("ALLOW_ORIGIN"),
            google_api_key: var("GOOGLE_API_KEY"),
            custom_search_api_key: var("GOOGLE_CUSTOM_SEARCH_API_KEY"),
            custom_search_cx: var("GOOGLE_CUSTOM_SEARCH_CX"),
            cache_path: var("CACHE_PATH"),
            cache_ttl: parse_var("CACHE_TTL_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            cache_purge_interval: parse_var("CACHE_PURGE_INTERVAL_SECONDS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_purge_interval),
            walk_minutes_ceiling: parse_var("WALK_MINUTES_CEILING")?
                .unwrap_or(defaults.walk_minutes_ceiling),
            search_mode: parse_var("PLACES_SEARCH_MODE")?.unwrap_or(defaults.search_mode),
        };

        if config.google_api_key.is_none() {
            log::warn!("GOOGLE_API_KEY not set, restaurant searches will return nothing");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.walk_minutes_ceiling, 15);
        assert_eq!(config.cache_ttl, Duration::from_secs(86400));
        assert_eq!(config.search_mode, SearchMode::Combined);
    }

    #[test]
    fn test_search_mode_from_str() {
        assert_eq!("combined".parse::<SearchMode>(), Ok(SearchMode::Combined));
        assert_eq!("per-station".parse::<SearchMode>(), Ok(SearchMode::PerStation));
        assert!("both".parse::<SearchMode>().is_err());
    }

    #[test]
    fn test_debug_hides_keys() {
        let config = Config {
            google_api_key: Some("very-secret".to_string()),
            ..Config::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("listen_address"));
    }
}
