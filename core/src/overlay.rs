//! Map surface seam and overlay ownership.
//!
//! RULE: Every overlay attached during one recompute pass is tracked in one
//! OverlaySet. The whole set is released before the next pass attaches
//! anything. Overlays are never patched in place.

use crate::{geo::Bounds, types::GeoPoint};
use serde::{Deserialize, Serialize};

/// Opaque id the surface hands back for an attached overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayHandle(pub u64);

/// Anything drawn on top of the base map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Overlay {
    /// A person: round photo when an image is known, a heart glyph otherwise.
    PersonMarker {
        position: GeoPoint,
        name:     String,
        image:    Option<String>,
    },
    /// A timeline memory, with its info-window text.
    MemoryPin {
        position:    GeoPoint,
        title:       String,
        description: String,
    },
    /// The heart-shaped line between the two people.
    HeartLine { path: Vec<GeoPoint> },
    /// The floating heart moved by the animation.
    AnimatedHeart { position: GeoPoint },
}

/// What the core needs from a rendered map.
pub trait MapSurface {
    fn attach(&mut self, overlay: Overlay) -> OverlayHandle;

    /// Detaching an unknown handle is a no-op.
    fn detach(&mut self, handle: OverlayHandle);

    fn fit_bounds(&mut self, bounds: Bounds);
}

/// Handles acquired during one pass, released together.
#[derive(Debug, Default)]
pub struct OverlaySet {
    handles: Vec<OverlayHandle>,
}

impl OverlaySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, surface: &mut dyn MapSurface, overlay: Overlay) -> OverlayHandle {
        let handle = surface.attach(overlay);
        self.handles.push(handle);
        handle
    }

    /// Detach everything this set owns and leave it empty.
    pub fn release(&mut self, surface: &mut dyn MapSurface) {
        for handle in self.handles.drain(..) {
            surface.detach(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// In-memory surface: remembers what is attached and the last fitted bounds.
/// Used headless, where there is no real map to draw on.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    next_id:      u64,
    attached:     Vec<(OverlayHandle, Overlay)>,
    pub bounds:   Option<Bounds>,
    pub attaches: u64,
    pub detaches: u64,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attached(&self) -> impl Iterator<Item = &Overlay> {
        self.attached.iter().map(|(_, o)| o)
    }

    pub fn attached_count(&self) -> usize {
        self.attached.len()
    }
}

impl MapSurface for RecordingSurface {
    fn attach(&mut self, overlay: Overlay) -> OverlayHandle {
        self.next_id += 1;
        self.attaches += 1;
        let handle = OverlayHandle(self.next_id);
        self.attached.push((handle, overlay));
        handle
    }

    fn detach(&mut self, handle: OverlayHandle) {
        let before = self.attached.len();
        self.attached.retain(|(h, _)| *h != handle);
        if self.attached.len() != before {
            self.detaches += 1;
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.bounds = Some(bounds);
    }
}
