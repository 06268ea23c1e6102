//! Heart curve and connector tests.

use lovemap_core::{
    config::HeartConfig,
    geo,
    heart::{self, heart_size},
    types::GeoPoint,
};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

const NEW_YORK: GeoPoint = GeoPoint::new(40.7128, -74.0060);
const LISBON: GeoPoint = GeoPoint::new(38.7223, -9.1393);

fn assert_near(a: GeoPoint, b: GeoPoint, what: &str) {
    assert!(
        (a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9,
        "{what}: {a:?} vs {b:?}"
    );
}

fn random_point(rng: &mut Pcg64Mcg) -> GeoPoint {
    GeoPoint::new(rng.gen_range(-70.0..70.0), rng.gen_range(-179.0..179.0))
}

#[test]
fn path_has_fixed_point_counts() {
    let config = HeartConfig::default();
    let path = heart::heart_path(NEW_YORK, LISBON, &config);

    assert_eq!(path.heart.points.len(), 51, "loop carries 51 points");
    assert_eq!(path.start_connector().len(), 21);
    assert_eq!(path.end_connector().len(), 21);
    assert_eq!(path.len(), 93, "21 + 51 + 21");
    assert_eq!(path.loop_points(), path.heart.points.as_slice());
}

#[test]
fn connector_ordering_matches_prepend_order() {
    let path = heart::heart_path(NEW_YORK, LISBON, &HeartConfig::default());
    let loop_first = path.heart.points[0];
    let loop_last = *path.heart.points.last().unwrap();

    // Start connector is stored reverse-t: loop[0] first, the person last.
    assert_near(path.points[0], loop_first, "path[0] is the t=1 start blend");
    assert_near(path.points[20], NEW_YORK, "path[20] is the t=0 start blend");
    assert_eq!(path.points[21], loop_first, "loop starts right after the connector");

    // End connector runs forward: loop[last] first, the person last.
    assert_near(path.points[72], loop_last, "first end blend sits on loop[last]");
    assert_near(*path.points.last().unwrap(), LISBON, "path ends at the second person");
}

#[test]
fn loop_is_centred_on_midpoint_and_closed() {
    let path = heart::heart_path(NEW_YORK, LISBON, &HeartConfig::default());
    let first = path.heart.points[0];
    let last = *path.heart.points.last().unwrap();
    assert_near(first, last, "angle 0 and 2π give the same point");

    let expected_mid = geo::interpolate(NEW_YORK, LISBON, 0.5);
    assert_eq!(path.heart.midpoint, expected_mid);
    assert_eq!(path.heart.heading, geo::bearing(NEW_YORK, LISBON));
}

#[test]
fn coincident_endpoints_collapse_to_midpoint() {
    let p = GeoPoint::new(35.6762, 139.6503);
    let heart = heart::heart_loop(p, p, &HeartConfig::default());

    assert_eq!(heart.size, 0.0);
    assert_eq!(heart.distance, 0.0);
    for (i, point) in heart.points.iter().enumerate() {
        assert!(point.is_finite(), "loop point {i} is not finite: {point:?}");
        assert_eq!(*point, heart.midpoint, "loop point {i} left the midpoint");
    }

    let path = heart::heart_path(p, p, &HeartConfig::default());
    assert!(path.points.iter().all(GeoPoint::is_finite), "no NaN anywhere on the path");
}

#[test]
fn heart_size_is_linear_in_distance() {
    let config = HeartConfig::default();
    for d in [0.0, 1.0, 1_234.5, 5_570_000.0] {
        for k in [0.5, 2.0, 10.0] {
            let scaled = heart_size(d * k, &config);
            let expected = heart_size(d, &config) * k;
            assert!(
                (scaled - expected).abs() <= 1e-9 * expected.max(1.0),
                "heart_size({d}·{k}) = {scaled}, expected {expected}"
            );
        }
    }
}

#[test]
fn heart_size_follows_distance_for_random_pairs() {
    let config = HeartConfig::default();
    let mut rng = Pcg64Mcg::seed_from_u64(0x4EA2_7000);

    for _ in 0..200 {
        let (a, b) = (random_point(&mut rng), random_point(&mut rng));
        let heart = heart::heart_loop(a, b, &config);
        let expected = geo::distance(a, b) * 0.15;
        assert!(
            (heart.size - expected).abs() < 1e-6,
            "size {} vs {expected} for {a:?} → {b:?}",
            heart.size
        );
        assert!(heart.points.iter().all(GeoPoint::is_finite));
    }
}

#[test]
fn path_is_deterministic() {
    let config = HeartConfig::default();
    let a = heart::heart_path(NEW_YORK, LISBON, &config);
    let b = heart::heart_path(NEW_YORK, LISBON, &config);
    assert_eq!(a, b);
}

#[test]
fn custom_point_counts_are_honoured() {
    let config = HeartConfig {
        loop_points: 10,
        connector_points: 4,
        ..HeartConfig::default()
    };
    let path = heart::heart_path(NEW_YORK, LISBON, &config);
    assert_eq!(path.heart.points.len(), 11);
    assert_eq!(path.len(), 5 + 11 + 5);
}

#[test]
fn loop_across_the_antimeridian_wraps_longitude() {
    let path = heart::heart_path(
        GeoPoint::new(0.0, 170.0),
        GeoPoint::new(0.0, -170.0),
        &HeartConfig::default(),
    );

    for p in &path.points {
        assert!(p.is_valid(), "off the globe: {p:?}");
        assert!(p.lng < 180.0, "longitude wraps into [-180, 180): {p:?}");
    }
    let far_east = path.heart.points.iter().filter(|p| p.lng > 170.0).count();
    let far_west = path.heart.points.iter().filter(|p| p.lng < -170.0).count();
    assert!(far_east > 0 && far_west > 0, "the loop straddles the antimeridian");
}

#[test]
fn loop_centred_on_a_pole_stays_on_the_globe() {
    let path = heart::heart_path(
        GeoPoint::new(80.0, 0.0),
        GeoPoint::new(80.0, 180.0),
        &HeartConfig::default(),
    );

    assert!(path.heart.midpoint.lat > 89.999, "midpoint is the pole");
    for p in &path.points {
        assert!(p.is_valid(), "off the globe: {p:?}");
    }
}

#[test]
fn random_pairs_never_leave_the_globe() {
    let mut rng = Pcg64Mcg::seed_from_u64(7);
    let config = HeartConfig::default();
    for _ in 0..200 {
        let start = GeoPoint::new(rng.gen_range(-89.0..89.0), rng.gen_range(-180.0..180.0));
        let end = GeoPoint::new(rng.gen_range(-89.0..89.0), rng.gen_range(-180.0..180.0));
        let path = heart::heart_path(start, end, &config);
        assert!(
            path.points.iter().all(|p| p.is_valid()),
            "{start:?} → {end:?} produced an invalid point"
        );
    }
}
