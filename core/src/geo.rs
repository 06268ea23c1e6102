//! Spherical geometry primitives.
//!
//! Everything the heart path and the animation need from a mapping
//! provider: great-circle interpolation, initial bearing and distance.
//! The sphere radius matches the one web map SDKs use, so distances
//! agree with what a rendered map would report.

use crate::types::GeoPoint;
use serde::{Deserialize, Serialize};

/// Mean equatorial radius used by web mapping SDKs, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Below this, two points are treated as coincident and interpolated linearly.
const COINCIDENT_SIN_ANGLE: f64 = 1e-6;

/// Central angle between two points in radians (haversine form).
fn angle_between(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (to.lng - from.lng).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * a.sqrt().min(1.0).asin()
}

/// Great-circle distance in meters.
pub fn distance(from: GeoPoint, to: GeoPoint) -> f64 {
    angle_between(from, to) * EARTH_RADIUS_M
}

/// Initial bearing from `from` toward `to`, in degrees within [-180, 180).
/// Coincident points yield 0.
pub fn bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let dlng = (to.lng - from.lng).to_radians();

    let y = dlng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlng.cos();
    wrap_degrees(y.atan2(x).to_degrees())
}

/// Point at `fraction` of the way along the great circle from `from` to `to`.
///
/// Nearly coincident points fall back to plain linear interpolation of the
/// coordinates, which keeps `interpolate(p, p, t) == p` exact.
pub fn interpolate(from: GeoPoint, to: GeoPoint, fraction: f64) -> GeoPoint {
    let angle = angle_between(from, to);
    let sin_angle = angle.sin();
    if sin_angle < COINCIDENT_SIN_ANGLE {
        return GeoPoint::new(
            from.lat + fraction * (to.lat - from.lat),
            from.lng + fraction * (to.lng - from.lng),
        );
    }

    let a = ((1.0 - fraction) * angle).sin() / sin_angle;
    let b = (fraction * angle).sin() / sin_angle;

    let (lat1, lng1) = (from.lat.to_radians(), from.lng.to_radians());
    let (lat2, lng2) = (to.lat.to_radians(), to.lng.to_radians());

    let x = a * lat1.cos() * lng1.cos() + b * lat2.cos() * lng2.cos();
    let y = a * lat1.cos() * lng1.sin() + b * lat2.cos() * lng2.sin();
    let z = a * lat1.sin() + b * lat2.sin();

    GeoPoint::new(
        z.atan2((x * x + y * y).sqrt()).to_degrees(),
        y.atan2(x).to_degrees(),
    )
}

/// Latitude clamped to ±90, longitude wrapped into [-180, 180).
pub fn normalize(lat: f64, lng: f64) -> GeoPoint {
    GeoPoint::new(lat.clamp(-90.0, 90.0), wrap_degrees(lng))
}

fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = (deg + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can land exactly on the upper edge through rounding.
    if wrapped >= 180.0 { wrapped - 360.0 } else { wrapped }
}

/// Axis-aligned box that the map is fitted to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub south: f64,
    pub west:  f64,
    pub north: f64,
    pub east:  f64,
}

impl Bounds {
    pub fn around(point: GeoPoint) -> Self {
        Self {
            south: point.lat,
            west:  point.lng,
            north: point.lat,
            east:  point.lng,
        }
    }

    /// Grow to include `point`. Longitudes are treated linearly; the map
    /// fits whatever box results, antimeridian wrap is not attempted.
    pub fn extend(&mut self, point: GeoPoint) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }

    pub fn from_points<I: IntoIterator<Item = GeoPoint>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let mut bounds = Bounds::around(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }
}
