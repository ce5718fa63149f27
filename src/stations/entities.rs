use serde::{Deserialize, Serialize};

use crate::serde_helpers::deserialize_maybe_string;

#[derive(Deserialize, Debug)]
pub struct HeartRailsEnvelope<T> {
    pub response: HeartRailsResponse<T>,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum HeartRailsResponse<T> {
    Error { error: String },
    Data(T),
}

#[derive(Deserialize, Debug)]
pub struct PrefectureList {
    pub prefecture: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct LineList {
    pub line: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct StationList {
    pub station: Vec<Station>,
}

/// Station as returned by the station lookup provider, and in the API
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    #[serde(default)]
    pub prefecture: String,
    #[serde(default)]
    pub line: String,
    /// Longitude
    #[serde(deserialize_with = "deserialize_maybe_string")]
    pub x: f64,
    /// Latitude
    #[serde(deserialize_with = "deserialize_maybe_string")]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_parse_stations() {
        let data = r#"{"response":{"station":[
            {"name":"新宿","prefecture":"東京都","line":"JR山手線","x":139.700258,"y":35.690921,"postal":"1600022","prev":"代々木","next":"新大久保"},
            {"name":"新宿","prefecture":"東京都","line":"JR中央線","x":"139.700258","y":"35.690921"}
        ]}}"#;

        let envelope: HeartRailsEnvelope<StationList> = serde_json::from_str(data).unwrap();
        let HeartRailsResponse::Data(list) = envelope.response else {
            panic!("expected data");
        };

        assert_eq!(list.station.len(), 2);
        assert_eq!(list.station[1].line, "JR中央線");
        assert_eq!(list.station[1].y, 35.690921);
        assert_eq!(list.station[0].x, 139.700258);
    }

    #[test]
    fn test_parse_nearby_stations() {
        let data = r#"{"response":{"station":[
            {"name":"西新宿","prefecture":"東京都","line":"東京メトロ丸ノ内線","x":139.692778,"y":35.694444,"distance":"320m"}
        ]}}"#;

        let envelope: HeartRailsEnvelope<StationList> = serde_json::from_str(data).unwrap();
        let HeartRailsResponse::Data(list) = envelope.response else {
            panic!("expected data");
        };
        assert_eq!(list.station[0].distance.as_deref(), Some("320m"));
    }

    #[test]
    fn test_parse_error() {
        let data = r#"{"response":{"error":"Station not found."}}"#;

        let envelope: HeartRailsEnvelope<StationList> = serde_json::from_str(data).unwrap();
        assert!(matches!(
            envelope.response,
            HeartRailsResponse::Error { error } if error == "Station not found."
        ));
    }

    #[test]
    fn test_parse_lines() {
        let data = r#"{"response":{"line":["JR山手線","都営大江戸線"]}}"#;

        let envelope: HeartRailsEnvelope<LineList> = serde_json::from_str(data).unwrap();
        let HeartRailsResponse::Data(list) = envelope.response else {
            panic!("expected data");
        };
        assert_eq!(list.line, vec!["JR山手線", "都営大江戸線"]);
    }
}
