use geo::{Centroid, MultiPoint, Point};

/// Mean earth radius used for all walk time estimates
pub const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Assumed walking speed, roughly 4.8km/h
pub const WALK_METRES_PER_MINUTE: f64 = 80.0;

/// Great-circle distance between two points on a spherical earth.
///
/// Points are (x = longitude, y = latitude) in degrees.
pub fn haversine_distance(from: Point, to: Point) -> f64 {
    let phi_1 = from.y().to_radians();
    let phi_2 = to.y().to_radians();
    let delta_phi = (to.y() - from.y()).to_radians();
    let delta_lambda = (to.x() - from.x()).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi_1.cos() * phi_2.cos() * (delta_lambda / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METRES * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn walk_minutes_for_distance(distance_metres: f64) -> u32 {
    (distance_metres / WALK_METRES_PER_MINUTE).ceil() as u32
}

pub fn walk_minutes(from: Point, to: Point) -> u32 {
    walk_minutes_for_distance(haversine_distance(from, to))
}

pub fn is_valid(point: &Point) -> bool {
    point.x().is_finite() && point.y().is_finite()
}

/// Centre used to bias a places search towards several stations at once
pub fn search_centre(points: &[Point]) -> Option<Point> {
    let valid: MultiPoint = points.iter().copied().filter(is_valid).collect();
    valid.centroid()
}

#[cfg(test)]
mod test {

    use geo::HaversineDestination;

    use super::*;

    #[test]
    fn test_distance_one_degree_latitude() {
        let from = Point::new(139.0, 35.0);
        let to = Point::new(139.0, 36.0);

        let expected = EARTH_RADIUS_METRES * 1f64.to_radians();
        assert!((haversine_distance(from, to) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let shinjuku = Point::new(139.700258, 35.690921);
        let shibuya = Point::new(139.701636, 35.658034);

        let there = haversine_distance(shinjuku, shibuya);
        let back = haversine_distance(shibuya, shinjuku);
        assert!((there - back).abs() < 1e-9);
        // roughly 3.7km apart
        assert!(there > 3_500.0 && there < 3_800.0, "{}", there);
    }

    #[test]
    fn test_distance_same_point() {
        let p = Point::new(139.0, 35.0);
        assert_eq!(haversine_distance(p, p), 0.0);
        assert_eq!(walk_minutes(p, p), 0);
    }

    #[test]
    fn test_walk_minutes_exact() {
        assert_eq!(walk_minutes_for_distance(800.0), 10);
        assert_eq!(walk_minutes_for_distance(800.5), 11);
        assert_eq!(walk_minutes_for_distance(1.0), 1);
        assert_eq!(walk_minutes_for_distance(0.0), 0);
    }

    #[test]
    fn test_walk_minutes_at_800_metres() {
        let origin = Point::new(139.0, 35.0);
        // due north along a meridian, so the distance is just R * delta phi
        let delta_lat = (800.0 / EARTH_RADIUS_METRES).to_degrees();
        let place = Point::new(139.0, 35.0 + delta_lat);

        let distance = haversine_distance(origin, place);
        assert!((distance - 800.0).abs() < 1e-6, "{}", distance);
        // the degree round trip can land a hair above 800, which ceil would
        // turn into 11; the exact boundary is covered by test_walk_minutes_exact
        assert_eq!(walk_minutes_for_distance(distance.round()), 10);
        // a hair short of 800m walks through the full pipeline
        let short = Point::new(139.0, 35.0 + delta_lat * (1.0 - 1e-9));
        assert_eq!(walk_minutes(origin, short), 10);
    }

    #[test]
    fn test_walk_minutes_monotonic() {
        let origin = Point::new(139.0, 35.0);

        let mut last = 0;
        for metres in (0..3000).step_by(37) {
            let place = origin.haversine_destination(60.0, metres as f64);
            let minutes = walk_minutes(origin, place);
            assert!(minutes >= last, "{} < {} at {}m", minutes, last, metres);
            last = minutes;
        }
    }

    #[test]
    fn test_search_centre_ignores_invalid() {
        let points = [
            Point::new(139.0, 35.0),
            Point::new(f64::NAN, 35.5),
            Point::new(140.0, 36.0),
        ];

        let centre = search_centre(&points).unwrap();
        assert!((centre.x() - 139.5).abs() < 1e-9);
        assert!((centre.y() - 35.5).abs() < 1e-9);
    }

    #[test]
    fn test_search_centre_empty() {
        assert!(search_centre(&[]).is_none());
        assert!(search_centre(&[Point::new(f64::NAN, f64::NAN)]).is_none());
    }
}
