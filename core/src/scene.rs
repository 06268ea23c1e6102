//! One full recompute of what the map shows.
//!
//! Building a scene is pure and may fail; applying it only happens after a
//! successful build, so a failed recompute leaves the previous overlays in
//! place.

use crate::{
    config::LoveMapConfig,
    error::{LoveError, LoveResult},
    facts::DistanceFacts,
    geo::{self, Bounds},
    heart::{self, HeartPath},
    overlay::{MapSurface, Overlay, OverlaySet},
    types::{GeoPoint, StoredData},
};
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub overlays: Vec<Overlay>,
    pub bounds:   Bounds,
    pub distance: f64,
    pub facts:    DistanceFacts,
    pub path:     HeartPath,
}

impl Scene {
    /// Requires both people to have a location; memories may sit anywhere,
    /// including (0, 0).
    pub fn build(data: &StoredData, config: &LoveMapConfig) -> LoveResult<Self> {
        if !data.person1.is_set() || !data.person2.is_set() {
            return Err(LoveError::LocationsUnset);
        }
        let start = data.person1.point();
        let end = data.person2.point();
        for p in [start, end] {
            if !p.is_valid() {
                return Err(LoveError::InvalidCoordinate { lat: p.lat, lng: p.lng });
            }
        }

        let path = heart::heart_path(start, end, &config.heart);
        if let Some(p) = path.points.iter().find(|p| !p.is_valid()) {
            return Err(anyhow::anyhow!("heart path left the globe at {p:?}").into());
        }

        let bounds = Bounds::from_points(
            [start, end]
                .into_iter()
                .chain(data.memories.iter().map(|m| m.location)),
        )
        .unwrap_or_else(|| Bounds::around(start));

        let mut overlays = Vec::with_capacity(3 + data.memories.len());
        for person in [&data.person1, &data.person2] {
            overlays.push(Overlay::PersonMarker {
                position: person.point(),
                name:     person.name.clone(),
                image:    person.image.clone(),
            });
        }
        for memory in &data.memories {
            overlays.push(Overlay::MemoryPin {
                position:    memory.location,
                title:       memory.title.clone(),
                description: memory.description.clone(),
            });
        }
        overlays.push(Overlay::HeartLine { path: path.points.clone() });

        let distance = geo::distance(start, end);
        let facts = DistanceFacts::compute(distance, &config.facts);

        Ok(Self { overlays, bounds, distance, facts, path })
    }

    /// Release `owned`, then attach this scene's overlays into it.
    pub fn apply(&self, surface: &mut dyn MapSurface, owned: &mut OverlaySet) {
        owned.release(surface);
        surface.fit_bounds(self.bounds);
        for overlay in &self.overlays {
            owned.attach(surface, overlay.clone());
        }
        log::debug!("scene applied: {} overlays", owned.len());
    }

    pub fn start(&self) -> GeoPoint {
        self.path.start
    }

    pub fn end(&self) -> GeoPoint {
        self.path.end
    }

    /// GeoJSON FeatureCollection of everything drawn (coordinates `[lng, lat]`).
    pub fn to_geojson(&self) -> Value {
        fn coord(p: &GeoPoint) -> Value {
            json!([p.lng, p.lat])
        }

        let features: Vec<Value> = self
            .overlays
            .iter()
            .filter_map(|overlay| match overlay {
                Overlay::PersonMarker { position, name, image } => Some(json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": coord(position) },
                    "properties": { "kind": "person", "name": name, "image": image },
                })),
                Overlay::MemoryPin { position, title, description } => Some(json!({
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": coord(position) },
                    "properties": { "kind": "memory", "title": title, "description": description },
                })),
                Overlay::HeartLine { path } => Some(json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": path.iter().map(coord).collect::<Vec<_>>(),
                    },
                    "properties": {
                        "kind": "heart",
                        "distance_m": self.distance,
                        "kilometers": self.facts.kilometers,
                    },
                })),
                Overlay::AnimatedHeart { .. } => None,
            })
            .collect();

        json!({ "type": "FeatureCollection", "features": features })
    }
}
