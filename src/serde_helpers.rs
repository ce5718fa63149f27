use std::{fmt::Display, str::FromStr};

use serde::de::Deserializer;
use serde::Deserialize;

/// Some providers send numbers as strings, some as numbers, some both
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MaybeStringWrapped<T> {
    Val(T),
    Str(String),
}

impl<T: FromStr> MaybeStringWrapped<T> {
    pub fn into_inner(self) -> Result<T, T::Err> {
        match self {
            MaybeStringWrapped::Str(s) => s.trim().parse(),
            MaybeStringWrapped::Val(v) => Ok(v),
        }
    }
}

pub fn deserialize_maybe_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    let wrapped: MaybeStringWrapped<T> = Deserialize::deserialize(deserializer)?;
    wrapped.into_inner().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod test {

    use super::*;

    #[derive(Deserialize)]
    struct Coordinate {
        #[serde(deserialize_with = "deserialize_maybe_string")]
        x: f64,
    }

    #[test]
    fn test_number() {
        let c: Coordinate = serde_json::from_str(r#"{"x": 139.700258}"#).unwrap();
        assert_eq!(c.x, 139.700258);
    }

    #[test]
    fn test_string() {
        let c: Coordinate = serde_json::from_str(r#"{"x": "139.700258"}"#).unwrap();
        assert_eq!(c.x, 139.700258);
    }

    #[test]
    fn test_garbage() {
        assert!(serde_json::from_str::<Coordinate>(r#"{"x": "east"}"#).is_err());
    }
}
