//! Spherical primitive tests.

use lovemap_core::{
    geo::{self, Bounds, EARTH_RADIUS_M},
    types::GeoPoint,
};

const LONDON: GeoPoint = GeoPoint::new(51.5074, -0.1278);
const PARIS: GeoPoint = GeoPoint::new(48.8566, 2.3522);

fn close(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

#[test]
fn london_to_paris_is_about_344_km() {
    let d = geo::distance(LONDON, PARIS);
    assert!(
        (340_000.0..348_000.0).contains(&d),
        "London→Paris distance out of range: {d:.0} m"
    );
    assert!(close(d, geo::distance(PARIS, LONDON), 1e-6), "distance must be symmetric");
}

#[test]
fn quarter_meridian_is_quarter_circumference() {
    let d = geo::distance(GeoPoint::new(0.0, 0.0), GeoPoint::new(90.0, 0.0));
    let expected = std::f64::consts::FRAC_PI_2 * EARTH_RADIUS_M;
    assert!(close(d, expected, 1e-3), "got {d}, expected {expected}");
}

#[test]
fn cardinal_bearings() {
    let origin = GeoPoint::new(0.0, 0.0);
    assert!(close(geo::bearing(origin, GeoPoint::new(10.0, 0.0)), 0.0, 1e-9));
    assert!(close(geo::bearing(origin, GeoPoint::new(0.0, 10.0)), 90.0, 1e-9));
    assert!(close(geo::bearing(origin, GeoPoint::new(0.0, -10.0)), -90.0, 1e-9));
    let south = geo::bearing(origin, GeoPoint::new(-10.0, 0.0));
    assert!(close(south, -180.0, 1e-9), "due south wraps to -180, got {south}");
}

#[test]
fn bearing_of_coincident_points_is_finite() {
    let b = geo::bearing(PARIS, PARIS);
    assert!(b.is_finite());
    assert!((-180.0..180.0).contains(&b));
}

#[test]
fn interpolate_endpoints_and_midpoint() {
    let a = GeoPoint::new(0.0, 0.0);
    let b = GeoPoint::new(0.0, 10.0);

    let start = geo::interpolate(a, b, 0.0);
    let end = geo::interpolate(a, b, 1.0);
    let mid = geo::interpolate(a, b, 0.5);

    assert!(close(start.lat, a.lat, 1e-9) && close(start.lng, a.lng, 1e-9));
    assert!(close(end.lat, b.lat, 1e-9) && close(end.lng, b.lng, 1e-9));
    assert!(close(mid.lat, 0.0, 1e-9) && close(mid.lng, 5.0, 1e-9), "mid = {mid:?}");
}

#[test]
fn interpolate_midpoint_is_equidistant() {
    let mid = geo::interpolate(LONDON, PARIS, 0.5);
    let d1 = geo::distance(LONDON, mid);
    let d2 = geo::distance(mid, PARIS);
    assert!(close(d1, d2, 0.01), "{d1} vs {d2}");
}

#[test]
fn interpolate_coincident_points_is_exact() {
    let p = GeoPoint::new(-33.8688, 151.2093);
    assert_eq!(geo::interpolate(p, p, 0.37), p);
}

#[test]
fn bounds_grow_to_cover_points() {
    let bounds = Bounds::from_points([LONDON, PARIS, GeoPoint::new(0.0, 0.0)]).unwrap();
    assert_eq!(bounds.south, 0.0);
    assert_eq!(bounds.north, LONDON.lat);
    assert_eq!(bounds.west, -0.1278);
    assert_eq!(bounds.east, PARIS.lng);
    assert!(bounds.contains(GeoPoint::new(50.0, 1.0)));
    assert!(!bounds.contains(GeoPoint::new(60.0, 1.0)));
    assert!(Bounds::from_points(Vec::<GeoPoint>::new()).is_none());
}

#[test]
fn normalize_clamps_latitude_and_wraps_longitude() {
    assert_eq!(geo::normalize(92.2, 183.0), GeoPoint::new(90.0, -177.0));
    assert_eq!(geo::normalize(-95.0, -190.0), GeoPoint::new(-90.0, 170.0));
    assert_eq!(geo::normalize(10.0, 180.0).lng, -180.0);
    assert!(geo::normalize(0.0, 4.88e16).is_valid());
}
