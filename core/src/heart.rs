//! Heart-shaped path between two people.
//!
//! Two stages, both recomputed from scratch on every call:
//!   1. The loop: the classic parametric heart, centred on the great-circle
//!      midpoint, rotated to the start→end bearing and sized from the distance.
//!   2. The connectors: nested spherical interpolation (a cheap quadratic
//!      Bezier look-alike) joining each person to the nearest end of the loop.
//!
//! Final ordering: start connector in reverse-t order (loop[0] … start),
//! then the loop, then the end connector in t order (loop[last] … end).

use crate::{config::HeartConfig, geo, types::GeoPoint};
use std::f64::consts::PI;

/// Meters per degree of latitude in the equirectangular offset.
pub const METERS_PER_DEGREE: f64 = 111_111.0;

/// Loop geometry before connectors are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct HeartLoop {
    pub midpoint: GeoPoint,
    /// Bearing from start to end, degrees.
    pub heading:  f64,
    /// Great-circle distance from start to end, meters.
    pub distance: f64,
    /// Heart size in meters (`distance × size_ratio`).
    pub size:     f64,
    pub points:   Vec<GeoPoint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeartPath {
    pub start:          GeoPoint,
    pub end:            GeoPoint,
    pub heart:          HeartLoop,
    /// Full polyline: start connector, loop, end connector.
    pub points:         Vec<GeoPoint>,
    connector_len:      usize,
}

impl HeartPath {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The prepended start connector, as stored (reverse-t order).
    pub fn start_connector(&self) -> &[GeoPoint] {
        &self.points[..self.connector_len]
    }

    pub fn loop_points(&self) -> &[GeoPoint] {
        let end = self.connector_len + self.heart.points.len();
        &self.points[self.connector_len..end]
    }

    pub fn end_connector(&self) -> &[GeoPoint] {
        &self.points[self.points.len() - self.connector_len..]
    }
}

/// Heart size for a given separation. Linear in `distance`.
pub fn heart_size(distance: f64, config: &HeartConfig) -> f64 {
    distance * config.size_ratio
}

/// Planar offset (x east, y north, in heart units) of the parametric heart.
fn heart_offset(angle: f64) -> (f64, f64) {
    let x = 16.0 * angle.sin().powi(3);
    let y = 13.0 * angle.cos()
        - 5.0 * (2.0 * angle).cos()
        - 2.0 * (3.0 * angle).cos()
        - (4.0 * angle).cos();
    (x, y)
}

/// Build the heart loop for `start`/`end`.
///
/// Every point is clamped/wrapped back onto the globe, so loops that cross
/// the antimeridian or sit over a pole stay valid coordinates.
/// Callers gate on both locations being set; coincident points are fine
/// and collapse every loop point onto the midpoint.
pub fn heart_loop(start: GeoPoint, end: GeoPoint, config: &HeartConfig) -> HeartLoop {
    let midpoint = geo::interpolate(start, end, 0.5);
    let heading = geo::bearing(start, end);
    let distance = geo::distance(start, end);
    let size = heart_size(distance, config);

    let scale = size / 16.0;
    let theta = heading * PI / 180.0;
    let (sin_h, cos_h) = theta.sin_cos();
    let meters_per_lng = METERS_PER_DEGREE * midpoint.lat.to_radians().cos();

    let n = config.loop_points;
    let points = (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let (x, y) = heart_offset(2.0 * PI * t);
            let rx = x * cos_h - y * sin_h;
            let ry = x * sin_h + y * cos_h;
            geo::normalize(
                midpoint.lat + (ry * scale) / METERS_PER_DEGREE,
                midpoint.lng + (rx * scale) / meters_per_lng,
            )
        })
        .collect();

    HeartLoop { midpoint, heading, distance, size, points }
}

/// Quadratic blend `from → control → to` via nested great-circle interpolation.
fn blend(from: GeoPoint, control: GeoPoint, to: GeoPoint, t: f64) -> GeoPoint {
    geo::interpolate(
        geo::interpolate(from, control, t),
        geo::interpolate(control, to, t),
        t,
    )
}

/// Full heart path: loop plus both connectors.
pub fn heart_path(start: GeoPoint, end: GeoPoint, config: &HeartConfig) -> HeartPath {
    let heart = heart_loop(start, end, config);

    let start_control = geo::interpolate(start, heart.midpoint, config.control_fraction);
    let end_control = geo::interpolate(end, heart.midpoint, config.control_fraction);
    // The loop always has at least two points (0..=n with n > 0).
    let loop_first = heart.points[0];
    let loop_last = heart.points[heart.points.len() - 1];

    let n = config.connector_points;
    let mut start_connector = Vec::with_capacity(n + 1);
    let mut end_connector = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let t = i as f64 / n as f64;
        start_connector.push(blend(start, start_control, loop_first, t));
        end_connector.push(blend(loop_last, end_control, end, t));
    }
    // Prepending one at a time leaves the start connector reversed.
    start_connector.reverse();

    let connector_len = start_connector.len();
    let mut points = start_connector;
    points.extend_from_slice(&heart.points);
    points.extend(end_connector);

    log::debug!(
        "heart path: distance={:.0}m heading={:.1}° size={:.0}m points={}",
        heart.distance,
        heart.heading,
        heart.size,
        points.len()
    );

    HeartPath { start, end, heart, points, connector_len }
}
