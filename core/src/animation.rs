//! Animated heart marker.
//!
//! The marker position is a pure function of elapsed wall-clock time:
//!   progress = ((now - start) mod period) / period
//! so dropped or late frames never change where it is, only how often it
//! is redrawn. Each frame detaches the previous marker and attaches a new
//! one. A StopHandle ends the loop; starting a new animation always stops
//! the previous one first.

use crate::{
    config::{AnimationConfig, AnimationTrack},
    geo,
    overlay::{MapSurface, Overlay, OverlayHandle},
    types::GeoPoint,
};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

// ── Clocks ─────────────────────────────────────────────────────────

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Milliseconds since the clock was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now: Arc::new(AtomicU64::new(start_ms)) }
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

// ── Cancellation ───────────────────────────────────────────────────

/// Cancels one animation loop. Clones cancel the same loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Fraction of the current cycle in [0, 1).
pub fn progress(start_ms: u64, now_ms: u64, period_ms: u64) -> f64 {
    if period_ms == 0 {
        return 0.0;
    }
    let elapsed = now_ms.saturating_sub(start_ms);
    (elapsed % period_ms) as f64 / period_ms as f64
}

/// Position at `fraction` along a polyline, by vertex index.
/// Each segment gets an equal share regardless of its length.
fn along_polyline(points: &[GeoPoint], fraction: f64) -> GeoPoint {
    match points {
        [] => GeoPoint::default(),
        [only] => *only,
        _ => {
            let scaled = fraction.clamp(0.0, 1.0) * (points.len() - 1) as f64;
            let i = (scaled.floor() as usize).min(points.len() - 2);
            geo::interpolate(points[i], points[i + 1], scaled - i as f64)
        }
    }
}

// ── Animation ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct HeartAnimation {
    track:      Vec<GeoPoint>,
    started_at: u64,
    period_ms:  u64,
    stop:       StopHandle,
    marker:     Option<OverlayHandle>,
}

impl HeartAnimation {
    /// `track` is the raw `[start, end]` pair for a straight track,
    /// or the whole heart path.
    pub fn new(track: Vec<GeoPoint>, started_at: u64, period_ms: u64) -> Self {
        Self {
            track,
            started_at,
            period_ms,
            stop: StopHandle::new(),
            marker: None,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_cancelled()
    }

    pub fn position_at(&self, now_ms: u64) -> GeoPoint {
        let t = progress(self.started_at, now_ms, self.period_ms);
        if self.track.len() == 2 {
            geo::interpolate(self.track[0], self.track[1], t)
        } else {
            along_polyline(&self.track, t)
        }
    }

    /// Redraw the marker for `now_ms`. Returns `None` once cancelled,
    /// after removing the last marker.
    pub fn frame(&mut self, now_ms: u64, surface: &mut dyn MapSurface) -> Option<GeoPoint> {
        if let Some(prev) = self.marker.take() {
            surface.detach(prev);
        }
        if self.stop.is_cancelled() {
            return None;
        }
        let position = self.position_at(now_ms);
        self.marker = Some(surface.attach(Overlay::AnimatedHeart { position }));
        Some(position)
    }

    pub fn cancel(&mut self, surface: &mut dyn MapSurface) {
        self.stop.cancel();
        if let Some(prev) = self.marker.take() {
            surface.detach(prev);
        }
    }
}

/// Owns at most one running animation.
#[derive(Debug, Default)]
pub struct AnimationDriver {
    current: Option<HeartAnimation>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating along `path`, cancelling whatever ran before.
    pub fn start(
        &mut self,
        start: GeoPoint,
        end: GeoPoint,
        path: &[GeoPoint],
        now_ms: u64,
        config: &AnimationConfig,
        surface: &mut dyn MapSurface,
    ) -> StopHandle {
        self.stop(surface);
        let track = match config.track {
            AnimationTrack::Straight => vec![start, end],
            AnimationTrack::HeartPath => path.to_vec(),
        };
        let animation = HeartAnimation::new(track, now_ms, config.period_ms);
        let handle = animation.stop_handle();
        self.current = Some(animation);
        log::debug!("animation started at {now_ms}ms, track={:?}", config.track);
        handle
    }

    pub fn frame(&mut self, now_ms: u64, surface: &mut dyn MapSurface) -> Option<GeoPoint> {
        let animation = self.current.as_mut()?;
        let position = animation.frame(now_ms, surface);
        if position.is_none() {
            self.current = None;
        }
        position
    }

    pub fn stop(&mut self, surface: &mut dyn MapSurface) {
        if let Some(mut animation) = self.current.take() {
            animation.cancel(surface);
            log::debug!("animation stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(HeartAnimation::is_running)
    }
}

/// Cooperative frame loop: one frame per interval until cancelled or
/// `max_frames` have been drawn. Returns the number of frames drawn.
pub fn run_frames(
    driver: &mut AnimationDriver,
    clock: &dyn Clock,
    surface: &mut dyn MapSurface,
    interval: Duration,
    max_frames: u64,
) -> u64 {
    let mut frames = 0;
    while frames < max_frames {
        if driver.frame(clock.now_ms(), surface).is_none() {
            break;
        }
        frames += 1;
        if !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
    frames
}
