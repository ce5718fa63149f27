use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::entities::{Coordinates, Place};

/// Fields requested from the places provider, everything else is left out
/// of the response (and the bill)
pub const FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.rating,places.userRatingCount,places.location,places.types,places.primaryType,places.editorialSummary";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    pub text: String,
    pub language_code: Option<String>,
}

/// Place as returned by the places provider
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GooglePlace {
    pub id: String,
    pub display_name: Option<LocalizedText>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_rating_count: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    pub primary_type: Option<String>,
    pub location: Option<Coordinates>,
    pub editorial_summary: Option<LocalizedText>,
}

impl From<GooglePlace> for Place {
    fn from(place: GooglePlace) -> Self {
        Place {
            id: place.id,
            name: place.display_name.map(|n| n.text).unwrap_or_default(),
            types: place.types,
            primary_type: place.primary_type.filter(|t| !t.is_empty()),
            address: place.formatted_address.unwrap_or_default(),
            rating: place.rating.filter(|r| r.is_finite()),
            review_count: place.user_rating_count,
            location: place
                .location
                .filter(|l| l.latitude.is_finite() && l.longitude.is_finite()),
            summary: place.editorial_summary.map(|s| s.text),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SearchTextResponse {
    #[serde(default)]
    pub places: Vec<GooglePlace>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Circle {
    pub center: Coordinates,
    pub radius: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LocationBias {
    pub circle: Circle,
}

#[derive(Serialize, Debug, Clone, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct SearchTextRequest {
    pub text_query: String,
    #[builder(default = "\"ja\".to_string()")]
    pub language_code: String,
    #[builder(default = "20")]
    pub max_result_count: u32,
    #[builder(default = "Some(3.0)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_bias: Option<LocationBias>,
}
