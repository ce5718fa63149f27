use std::cmp::Reverse;

use geo::Point;
use itertools::Itertools;

use crate::{
    entities::{Origin, Place, RankedResult},
    genre::classify_genre,
    geo::walk_minutes,
    tags::{detect_gatsu_tags, gatsu_index},
};

pub const DEFAULT_WALK_MINUTES_CEILING: u32 = 15;

/// Station name used when no origin could be measured against
pub const STATION_PLACEHOLDER: &str = "駅";

struct Nearest<'a> {
    name: &'a str,
    walk_minutes: u32,
}

fn nearest_origin<'a>(location: Point, origins: &'a [(&'a str, Point)]) -> Option<Nearest<'a>> {
    let mut nearest: Option<Nearest> = None;

    for &(name, origin) in origins {
        let minutes = walk_minutes(origin, location);
        // strictly less, the first origin wins a tie
        if nearest.as_ref().map_or(true, |n| minutes < n.walk_minutes) {
            nearest = Some(Nearest {
                name,
                walk_minutes: minutes,
            });
        }
    }

    nearest
}

fn station_label(nearest: Option<&Nearest>, origin_count: usize) -> String {
    let name = nearest.map_or(STATION_PLACEHOLDER, |n| n.name);
    if origin_count > 1 {
        format!("{}駅(近)", name)
    } else {
        format!("{}駅", name)
    }
}

pub fn describe(rating: f64, review_count: u32) -> String {
    format!("評価: ★{} ({}件の口コミ)", rating, review_count)
}

fn rank_one(place: &Place, origins: &[(&str, Point)], origin_count: usize) -> RankedResult {
    let nearest = place
        .location
        .and_then(|location| nearest_origin(location.into(), origins));

    let walk_minutes = nearest.as_ref().map_or(0, |n| n.walk_minutes);
    let station = station_label(nearest.as_ref(), origin_count);

    let genre = classify_genre(
        &place.name,
        &place.types,
        place.primary_type.as_deref().unwrap_or_default(),
    );

    let rating = place.rating.unwrap_or(0.0);
    let review_count = place.review_count.unwrap_or(0);

    let tag_text = match &place.summary {
        Some(summary) => format!("{} {}", place.name, summary),
        None => place.name.clone(),
    };

    RankedResult {
        id: place.id.clone(),
        name: place.name.clone(),
        genre,
        address: place.address.clone(),
        station,
        walk_minutes,
        description: describe(rating, review_count),
        rating,
        review_count,
        location: place.location,
        gatsu_tags: detect_gatsu_tags(&tag_text)
            .into_iter()
            .map(String::from)
            .collect(),
        gatsu_index: gatsu_index(genre, rating, review_count, walk_minutes),
    }
}

/// Attach genre and walk time to each place, keep those within
/// `walk_minutes_ceiling` (exclusive) of their nearest origin and order by
/// review count, most reviewed first.
///
/// Places with equal review counts keep the order they came in. A place with
/// no location, or searched without any usable origin, gets a walk time of 0
/// and is never filtered out.
pub fn rank_by_proximity(
    places: &[Place],
    origins: &[Origin],
    walk_minutes_ceiling: u32,
) -> Vec<RankedResult> {
    let valid_origins = origins
        .iter()
        .filter_map(|o| o.point().map(|p| (o.name.as_str(), p)))
        .collect::<Vec<_>>();

    places
        .iter()
        .map(|place| rank_one(place, &valid_origins, origins.len()))
        .filter(|r| r.walk_minutes < walk_minutes_ceiling)
        .sorted_by_key(|r| Reverse(r.review_count))
        .collect()
}
