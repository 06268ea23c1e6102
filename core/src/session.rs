//! The love map session: owner of all state.
//!
//! ORDER OF A STATE CHANGE (fixed):
//!   1. Validate input.
//!   2. Mutate in-memory state.
//!   3. Save the whole blob under the storage key; on failure steps 2-3
//!      are undone and the error is returned.
//!   4. Recompute the map if both people are placed.
//!
//! RULES:
//!   - Every recompute releases all overlays from the previous pass first.
//!   - A failed recompute leaves the previous scene attached and sets the
//!     error banner; it never applies half a scene.
//!   - At most one animation runs; a recompute restarts it.

use crate::{
    animation::{self, AnimationDriver, Clock, ManualClock, StopHandle, SystemClock},
    config::LoveMapConfig,
    error::{LoveError, LoveResult, MapFailure},
    overlay::{MapSurface, OverlaySet, RecordingSurface},
    scene::Scene,
    store::LoveStore,
    timeline::Timeline,
    types::{GeoPoint, Location, Memory, MemoryDraft, MemoryId, Person, StoredData},
};
use std::path::Path;
use std::time::Duration;

/// Called when the map provider reports a failure.
pub type MapFailureCallback = Box<dyn FnMut(&MapFailure)>;

pub struct LoveMap<S: MapSurface> {
    pub config:     LoveMapConfig,
    store:          LoveStore,
    person1:        Location,
    person2:        Location,
    timeline:       Timeline,
    surface:        S,
    overlays:       OverlaySet,
    animation:      AnimationDriver,
    clock:          Box<dyn Clock>,
    scene:          Option<Scene>,
    error_banner:   Option<String>,
    on_map_failure: Option<MapFailureCallback>,
}

impl<S: MapSurface> LoveMap<S> {
    /// Open the store from `config.db_path` and load any saved state.
    pub fn open(config: LoveMapConfig, surface: S) -> LoveResult<Self> {
        let store = LoveStore::open(&config.db_path)?;
        Self::with_store(config, store, surface, Box::new(SystemClock::new()))
    }

    /// Load saved state from `store`, or start empty.
    pub fn with_store(
        config: LoveMapConfig,
        store: LoveStore,
        surface: S,
        clock: Box<dyn Clock>,
    ) -> LoveResult<Self> {
        let data = match store.load_data(&config.storage_key)? {
            Some(data) => {
                log::info!(
                    "loaded '{}': {} memories",
                    config.storage_key,
                    data.memories.len()
                );
                data
            }
            None => {
                log::info!("no saved state under '{}', starting empty", config.storage_key);
                StoredData::default()
            }
        };

        Ok(Self {
            config,
            store,
            person1: data.person1,
            person2: data.person2,
            timeline: Timeline::new(data.memories),
            surface,
            overlays: OverlaySet::new(),
            animation: AnimationDriver::new(),
            clock,
            scene: None,
            error_banner: None,
            on_map_failure: None,
        })
    }

    /// Inject the map-provider failure hook.
    pub fn on_map_failure(&mut self, callback: MapFailureCallback) {
        self.on_map_failure = Some(callback);
    }

    // ── Accessors ──────────────────────────────────────────────

    pub fn person(&self, who: Person) -> &Location {
        match who {
            Person::First => &self.person1,
            Person::Second => &self.person2,
        }
    }

    pub fn memories(&self) -> &[Memory] {
        self.timeline.memories()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn error_banner(&self) -> Option<&str> {
        self.error_banner.as_deref()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    /// The blob as it would be saved right now.
    pub fn data(&self) -> StoredData {
        StoredData {
            person1: self.person1.clone(),
            person2: self.person2.clone(),
            memories: self.timeline.memories().to_vec(),
        }
    }

    // ── State changes ──────────────────────────────────────────

    /// Replace one person's location. (0, 0) clears it back to "unset".
    pub fn set_person(&mut self, who: Person, location: Location) -> LoveResult<()> {
        let point = location.point();
        if location.is_set() && !point.is_valid() {
            log::warn!("rejected location for {who:?}: {point:?}");
            return Err(LoveError::InvalidCoordinate { lat: point.lat, lng: point.lng });
        }
        self.commit(|map| {
            match who {
                Person::First => map.person1 = location,
                Person::Second => map.person2 = location,
            }
            Ok(())
        })?;
        log::info!("updated {who:?}");
        Ok(())
    }

    /// Embed a local image file as the person's picture.
    pub fn set_person_image(&mut self, who: Person, path: &Path) -> LoveResult<()> {
        let url = crate::image::data_url_from_file(path)?;
        let location = self.person(who).clone().with_image(url);
        self.set_person(who, location)
    }

    pub fn add_memory(&mut self, draft: MemoryDraft) -> LoveResult<MemoryId> {
        let id = self.commit(|map| map.timeline.add(draft)).inspect_err(|e| {
            log::warn!("memory not added: {e}");
        })?;
        log::info!("added memory {id}");
        self.refresh_if_placed();
        Ok(id)
    }

    pub fn delete_memory(&mut self, id: &str) -> LoveResult<Memory> {
        let removed = self.commit(|map| map.timeline.delete(id))?;
        log::info!("deleted memory {id}");
        self.refresh_if_placed();
        Ok(removed)
    }

    /// Apply `change` and save the result. If either step fails, people and
    /// timeline are put back as they were, so memory never runs ahead of
    /// the store.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Self) -> LoveResult<T>) -> LoveResult<T> {
        let before = (self.person1.clone(), self.person2.clone(), self.timeline.clone());
        let saved = change(self).and_then(|value| {
            self.store.save_data(&self.config.storage_key, &self.data())?;
            Ok(value)
        });
        if saved.is_err() {
            (self.person1, self.person2, self.timeline) = before;
        }
        saved
    }

    // ── Map ────────────────────────────────────────────────────

    /// Recompute the whole map: markers, memory pins, heart line, bounds,
    /// distance facts, animation. Fails with `LocationsUnset` until both
    /// people are placed.
    pub fn show_connection(&mut self) -> LoveResult<&Scene> {
        let scene = match Scene::build(&self.data(), &self.config) {
            Ok(scene) => scene,
            Err(e) => {
                log::warn!("map update failed: {e}");
                self.error_banner = Some(e.user_message());
                return Err(e);
            }
        };

        self.animation.stop(&mut self.surface);
        scene.apply(&mut self.surface, &mut self.overlays);
        self.animation.start(
            scene.start(),
            scene.end(),
            &scene.path.points,
            self.clock.now_ms(),
            &self.config.animation,
            &mut self.surface,
        );
        log::info!(
            "connection shown: {} km, {} memories",
            scene.facts.kilometers,
            self.timeline.len()
        );
        self.error_banner = None;
        let scene: &Scene = self.scene.insert(scene);
        Ok(scene)
    }

    /// Recompute whenever both people are placed.
    fn refresh_if_placed(&mut self) {
        if self.person1.is_set() && self.person2.is_set() {
            if let Err(e) = self.show_connection() {
                log::debug!("refresh after change failed: {e}");
            }
        }
    }

    /// Draw one animation frame at the current clock time.
    pub fn frame(&mut self) -> Option<GeoPoint> {
        let now = self.clock.now_ms();
        self.animation.frame(now, &mut self.surface)
    }

    /// Run the cooperative frame loop for at most `max_frames` frames.
    pub fn run_animation(&mut self, max_frames: u64) -> u64 {
        let interval = Duration::from_millis(self.config.animation.frame_interval_ms);
        animation::run_frames(
            &mut self.animation,
            self.clock.as_ref(),
            &mut self.surface,
            interval,
            max_frames,
        )
    }

    /// Restart the animation from the current time. The returned handle
    /// cancels it from elsewhere. `None` until a connection is shown.
    pub fn restart_animation(&mut self) -> Option<StopHandle> {
        let scene = self.scene.as_ref()?;
        Some(self.animation.start(
            scene.start(),
            scene.end(),
            &scene.path.points,
            self.clock.now_ms(),
            &self.config.animation,
            &mut self.surface,
        ))
    }

    pub fn stop_animation(&mut self) {
        self.animation.stop(&mut self.surface);
    }

    /// Entry point for the map provider's failure notifications.
    /// Non-fatal: the banner is set and everything already drawn stays.
    pub fn report_map_failure(&mut self, failure: MapFailure) {
        log::warn!("map provider failure: {failure:?}");
        self.error_banner = Some(LoveError::MapProvider(failure.clone()).user_message());
        if let Some(callback) = self.on_map_failure.as_mut() {
            callback(&failure);
        }
    }

    /// Stop the animation and detach every overlay.
    pub fn teardown(&mut self) {
        self.animation.stop(&mut self.surface);
        self.overlays.release(&mut self.surface);
        self.scene = None;
    }
}

impl<S: MapSurface> Drop for LoveMap<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl LoveMap<RecordingSurface> {
    /// In-memory store, recording surface and a manual clock at 0 ms.
    /// Returns the clock so tests can move time forward.
    pub fn build_test() -> LoveResult<(Self, ManualClock)> {
        let clock = ManualClock::new(0);
        let map = Self::with_store(
            LoveMapConfig::default_test(),
            LoveStore::in_memory()?,
            RecordingSurface::new(),
            Box::new(clock.clone()),
        )?;
        Ok((map, clock))
    }
}
