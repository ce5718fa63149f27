use geo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for Point {
    fn from(c: Coordinates) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

impl From<Point> for Coordinates {
    fn from(p: Point) -> Self {
        Coordinates {
            latitude: p.y(),
            longitude: p.x(),
        }
    }
}

/// A candidate restaurant, already validated at the provider boundary
/// as opposed to a [`crate::places::entities::GooglePlace`]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub name: String,
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub location: Option<Coordinates>,
    pub summary: Option<String>,
}

/// A station the user searched from
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Origin {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Origin {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Origin {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    pub fn point(&self) -> Option<Point> {
        let p = Point::new(self.longitude, self.latitude);
        crate::geo::is_valid(&p).then_some(p)
    }
}

/// Place as returned in the API
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub id: String,
    pub name: String,
    pub genre: crate::genre::Genre,
    pub address: String,
    pub station: String,
    pub walk_minutes: u32,
    pub description: String,
    pub rating: f64,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
    pub gatsu_tags: Vec<String>,
    pub gatsu_index: u32,
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_origin_point() {
        let origin = Origin::new("新宿", 35.690921, 139.700258);
        let p = origin.point().unwrap();
        assert_eq!(p.x(), 139.700258);
        assert_eq!(p.y(), 35.690921);

        assert!(Origin::new("新宿", f64::NAN, 139.7).point().is_none());
        assert!(Origin::new("新宿", 35.6, f64::INFINITY).point().is_none());
    }

    #[test]
    fn test_coordinates_round_trip_point() {
        let c = Coordinates {
            latitude: 35.0,
            longitude: 139.0,
        };
        let p: Point = c.into();
        assert_eq!(Coordinates::from(p), c);
    }
}
