//! Shared value types: points, people, memories and the persisted blob.
//!
//! RULE: (0, 0) means "not yet provided" for a person's location only.
//! A memory at (0, 0) is a real memory at (0, 0).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier of a memory (UUID v4, hyphenated).
pub type MemoryId = String;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Finite, latitude within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// One of the two people on the map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat:   f64,
    pub lng:   f64,
    pub name:  String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Location {
    pub fn new(name: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            lat: point.lat,
            lng: point.lng,
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }

    /// False while the location still holds the (0, 0) sentinel.
    pub fn is_set(&self) -> bool {
        !(self.lat == 0.0 && self.lng == 0.0)
    }
}

/// A dated entry on the shared timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id:          MemoryId,
    pub date:        NaiveDate,
    pub title:       String,
    pub description: String,
    pub location:    GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image:       Option<String>,
}

/// A memory before it has been given an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryDraft {
    pub date:        NaiveDate,
    pub title:       String,
    pub description: String,
    pub location:    GeoPoint,
    #[serde(default)]
    pub image:       Option<String>,
}

impl MemoryDraft {
    /// Blank draft dated today, placed at (0, 0).
    pub fn today() -> Self {
        Self {
            date: chrono::Local::now().date_naive(),
            title: String::new(),
            description: String::new(),
            location: GeoPoint::default(),
            image: None,
        }
    }

    pub(crate) fn into_memory(self, id: MemoryId) -> Memory {
        Memory {
            id,
            date: self.date,
            title: self.title,
            description: self.description,
            location: self.location,
            // An empty image field in the form means "no image".
            image: self.image.filter(|s| !s.is_empty()),
        }
    }
}

/// Everything persisted under the storage key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoredData {
    pub person1:  Location,
    pub person2:  Location,
    #[serde(default)]
    pub memories: Vec<Memory>,
}

/// Which of the two people an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Person {
    First,
    Second,
}

impl std::str::FromStr for Person {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "first" | "person1" => Ok(Person::First),
            "2" | "second" | "person2" => Ok(Person::Second),
            other => Err(format!("unknown person '{other}' (expected 1 or 2)")),
        }
    }
}
