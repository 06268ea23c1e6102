//! Whimsical facts derived from a single distance.
//!
//! Pure functions of the distance in meters; nothing here is persisted.

use crate::config::FactsConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Plane,
    Train,
    Car,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Plane, TravelMode::Train, TravelMode::Car];

    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Plane => "By Plane",
            TravelMode::Train => "By Train",
            TravelMode::Car   => "By Car",
        }
    }

    pub fn speed_kmh(&self, config: &FactsConfig) -> f64 {
        match self {
            TravelMode::Plane => config.plane_kmh,
            TravelMode::Train => config.train_kmh,
            TravelMode::Car   => config.car_kmh,
        }
    }
}

/// Travel time, reported in minutes below one hour and in hours otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "value", rename_all = "snake_case")]
pub enum TravelTime {
    Minutes(u64),
    Hours(u64),
}

impl std::fmt::Display for TravelTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelTime::Minutes(m) => write!(f, "{m} minutes"),
            TravelTime::Hours(h) => write!(f, "{h} hours"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceFacts {
    pub meters:             f64,
    pub kilometers:         u64,
    /// Kilometers over Earth's circumference, two decimals.
    pub times_around_earth: String,
    pub steps:              u64,
    pub travel:             Vec<(TravelMode, TravelTime)>,
}

/// Non-finite or negative input counts as zero.
fn sanitize(meters: f64) -> f64 {
    if meters.is_finite() && meters > 0.0 { meters } else { 0.0 }
}

pub fn kilometers(meters: f64) -> u64 {
    (sanitize(meters) / 1000.0).round() as u64
}

/// Uses the rounded kilometer figure, as displayed alongside it.
pub fn times_around_earth(meters: f64, config: &FactsConfig) -> String {
    format!("{:.2}", kilometers(meters) as f64 / config.earth_circumference_km)
}

pub fn steps(meters: f64, config: &FactsConfig) -> u64 {
    (sanitize(meters) / config.step_length_m).round() as u64
}

pub fn travel_time(meters: f64, speed_kmh: f64) -> TravelTime {
    let hours = sanitize(meters) / (speed_kmh * 1000.0);
    if hours < 1.0 {
        TravelTime::Minutes((hours * 60.0).round() as u64)
    } else {
        TravelTime::Hours(hours.round() as u64)
    }
}

impl DistanceFacts {
    pub fn compute(meters: f64, config: &FactsConfig) -> Self {
        let travel = TravelMode::ALL
            .iter()
            .map(|mode| (*mode, travel_time(meters, mode.speed_kmh(config))))
            .collect();
        Self {
            meters: sanitize(meters),
            kilometers: kilometers(meters),
            times_around_earth: times_around_earth(meters, config),
            steps: steps(meters, config),
            travel,
        }
    }

    pub fn travel_time(&self, mode: TravelMode) -> Option<TravelTime> {
        self.travel.iter().find(|(m, _)| *m == mode).map(|(_, t)| *t)
    }
}

/// `1234567` → `"1,234,567"`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
