use futures_util::future::join_all;
use geo::Point;
use itertools::Itertools;
use serde::Deserialize;

use crate::{
    cache::ResponseCacheEx,
    config::SearchMode,
    entities::{Origin, Place, RankedResult},
    error::{GatsuError, GatsuResult},
    geo::search_centre,
    places::{
        entities::{Circle, LocationBias, SearchTextRequest, SearchTextRequestBuilder},
        error::PlacesResult,
    },
    ranking::rank_by_proximity,
    ContextData,
};

/// Added to every places search so the provider leans towards hearty food
pub const SEARCH_KEYWORDS: [&str; 3] = ["がっつり", "デカ盛り", "大盛り"];

pub const SEARCH_RADIUS_METRES: f64 = 2000.0;

/// Station name used by the site before a real station has been picked
pub const NEARBY_PLACEHOLDER: &str = "周辺";

#[derive(Deserialize, Debug, Default)]
pub struct RestaurantsQuery {
    /// Comma separated station names
    pub station: Option<String>,
    /// Comma separated latitudes, one per station
    pub lat: Option<String>,
    /// Comma separated longitudes, one per station
    pub lng: Option<String>,
    /// Walk time in minutes, results at or beyond this are dropped
    pub ceiling: Option<u32>,
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => raw.split(',').map(str::trim).collect(),
        _ => vec![],
    }
}

fn parse_coordinate(raw: &str) -> f64 {
    raw.parse().unwrap_or(f64::NAN)
}

/// Pair up station names with their coordinates by position.
///
/// A coordinate that is missing or doesn't parse becomes NaN, which the
/// ranker skips. At least one usable origin is required.
pub fn parse_origins(query: &RestaurantsQuery) -> GatsuResult<Vec<Origin>> {
    let names = split_list(query.station.as_deref());
    let lats = split_list(query.lat.as_deref());
    let lngs = split_list(query.lng.as_deref());

    let count = names.len().max(lats.len()).max(lngs.len());
    let origins = (0..count)
        .map(|i| {
            Origin::new(
                names.get(i).copied().unwrap_or_default(),
                lats.get(i).map_or(f64::NAN, |v| parse_coordinate(v)),
                lngs.get(i).map_or(f64::NAN, |v| parse_coordinate(v)),
            )
        })
        .collect::<Vec<_>>();

    if origins.iter().all(|o| o.point().is_none()) {
        return Err(GatsuError::BadRequest("No coordinates".to_string()));
    }

    Ok(origins)
}

/// Key identifying a search by its station names and coordinates
pub fn cache_key(origins: &[Origin]) -> String {
    let names = origins.iter().map(|o| o.name.as_str()).join(",");
    let coordinates = origins
        .iter()
        .map(|o| format!("{},{}", o.latitude, o.longitude))
        .join(";");
    format!("places:{}|{}", names, coordinates)
}

fn text_query<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names
        .filter(|n| !n.is_empty())
        .chain(SEARCH_KEYWORDS)
        .join(" ")
}

fn search_request(names: &[&str], points: &[Point]) -> PlacesResult<SearchTextRequest> {
    let mut builder = SearchTextRequestBuilder::default();
    builder.text_query(text_query(names.iter().copied()));

    if let Some(centre) = search_centre(points) {
        builder.location_bias(LocationBias {
            circle: Circle {
                center: centre.into(),
                radius: SEARCH_RADIUS_METRES,
            },
        });
    }

    Ok(builder.build()?)
}

async fn search_places_cached(
    ctx: &ContextData,
    key: &str,
    request: &SearchTextRequest,
) -> PlacesResult<Vec<Place>> {
    if let Some(places) = ctx.cache.get_json::<Vec<Place>>(key) {
        return Ok(places);
    }

    let places = ctx.places_client.search_text(request).await?;

    // nothing to remember when the provider wasn't asked
    if ctx.places_client.is_configured() {
        ctx.cache.set_json(key, &places, ctx.config.cache_ttl);
    }

    Ok(places)
}

/// One search covering every station, biased to their centre
async fn search_combined(ctx: &ContextData, origins: &[Origin]) -> PlacesResult<Vec<Place>> {
    let names = origins.iter().map(|o| o.name.as_str()).collect::<Vec<_>>();
    let points = origins.iter().filter_map(Origin::point).collect::<Vec<_>>();

    let request = search_request(&names, &points)?;
    search_places_cached(ctx, &cache_key(origins), &request).await
}

/// One search per station, all at once. A station whose search fails
/// contributes nothing rather than failing the whole request.
async fn search_per_station(ctx: &ContextData, origins: &[Origin]) -> PlacesResult<Vec<Place>> {
    let searches = origins
        .iter()
        .filter_map(|o| o.point().map(|p| (o, p)))
        .map(|(origin, point)| async move {
            let request = search_request(&[origin.name.as_str()], &[point])?;
            let key = cache_key(std::slice::from_ref(origin));
            search_places_cached(ctx, &key, &request).await
        });

    let results = join_all(searches).await;

    let places = results
        .into_iter()
        .zip(origins.iter().filter(|o| o.point().is_some()))
        .flat_map(|(result, origin)| match result {
            Ok(places) => places,
            Err(e) if e.is_quota() => {
                log::warn!("Skipping places near {}: {}", origin.name, e);
                vec![]
            }
            Err(e) => {
                log::error!("Error searching places near {}: {}", origin.name, e);
                vec![]
            }
        })
        .unique_by(|p| p.id.clone())
        .collect();

    Ok(places)
}

pub async fn search_restaurants(
    ctx: &ContextData,
    query: &RestaurantsQuery,
) -> GatsuResult<Vec<RankedResult>> {
    if query.station.as_deref() == Some(NEARBY_PLACEHOLDER) {
        return Ok(vec![]);
    }

    let origins = parse_origins(query)?;

    let places = match ctx.config.search_mode {
        SearchMode::Combined => search_combined(ctx, &origins).await?,
        SearchMode::PerStation => search_per_station(ctx, &origins).await?,
    };

    let ceiling = query.ceiling.unwrap_or(ctx.config.walk_minutes_ceiling);
    let results = rank_by_proximity(&places, &origins, ceiling);

    log::debug!(
        "{} of {} places within {} minutes of {}",
        results.len(),
        places.len(),
        ceiling,
        cache_key(&origins)
    );

    Ok(results)
}
