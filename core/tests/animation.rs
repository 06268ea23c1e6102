//! Animation driver tests. All timing comes from a manual clock.

use lovemap_core::{
    animation::{self, AnimationDriver, Clock, HeartAnimation, ManualClock, StopHandle},
    config::{AnimationConfig, AnimationTrack},
    geo,
    overlay::{Overlay, RecordingSurface},
    types::GeoPoint,
};
use std::time::Duration;

const A: GeoPoint = GeoPoint::new(0.0, 0.0);
const B: GeoPoint = GeoPoint::new(0.0, 20.0);

fn near(a: GeoPoint, b: GeoPoint) -> bool {
    (a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9
}

#[test]
fn progress_wraps_every_period() {
    assert_eq!(animation::progress(0, 0, 3000), 0.0);
    assert_eq!(animation::progress(0, 1500, 3000), 0.5);
    assert_eq!(animation::progress(0, 3000, 3000), 0.0);
    assert_eq!(animation::progress(1000, 1750, 3000), 0.25);
    assert_eq!(animation::progress(0, 7500, 3000), 0.5);
    // A clock reading before the start is treated as the start.
    assert_eq!(animation::progress(500, 100, 3000), 0.0);
    assert_eq!(animation::progress(0, 100, 0), 0.0);
}

#[test]
fn straight_track_interpolates_between_raw_endpoints() {
    let anim = HeartAnimation::new(vec![A, B], 0, 3000);
    assert!(near(anim.position_at(0), A));
    assert!(near(anim.position_at(1500), geo::interpolate(A, B, 0.5)));
    assert!(near(anim.position_at(4500), geo::interpolate(A, B, 0.5)), "frame-count independent");
}

#[test]
fn each_frame_replaces_the_marker() {
    let mut surface = RecordingSurface::new();
    let mut anim = HeartAnimation::new(vec![A, B], 0, 3000);

    for now in [0, 16, 33, 50] {
        anim.frame(now, &mut surface).expect("running");
        assert_eq!(surface.attached_count(), 1, "one marker at a time");
    }
    let last = surface.attached().next().unwrap();
    assert!(matches!(last, Overlay::AnimatedHeart { .. }));
    assert_eq!(surface.attaches, 4);
    assert_eq!(surface.detaches, 3);
}

#[test]
fn cancelled_animation_removes_marker_and_stops() {
    let mut surface = RecordingSurface::new();
    let mut anim = HeartAnimation::new(vec![A, B], 0, 3000);
    let stop = anim.stop_handle();

    anim.frame(0, &mut surface);
    stop.cancel();
    assert!(anim.frame(16, &mut surface).is_none());
    assert_eq!(surface.attached_count(), 0);
    assert!(!anim.is_running());
}

#[test]
fn starting_again_cancels_the_previous_loop() {
    let mut surface = RecordingSurface::new();
    let mut driver = AnimationDriver::new();
    let config = AnimationConfig::default();

    let first = driver.start(A, B, &[], 0, &config, &mut surface);
    driver.frame(10, &mut surface);
    let second = driver.start(A, B, &[], 20, &config, &mut surface);

    assert!(first.is_cancelled(), "old loop must be cancelled");
    assert!(!second.is_cancelled());
    assert_eq!(surface.attached_count(), 0, "old marker detached on restart");

    driver.frame(30, &mut surface);
    assert_eq!(surface.attached_count(), 1);
}

#[test]
fn heart_path_track_follows_the_polyline() {
    let path = vec![A, GeoPoint::new(10.0, 0.0), GeoPoint::new(10.0, 10.0)];
    let config = AnimationConfig {
        track: AnimationTrack::HeartPath,
        ..AnimationConfig::default()
    };
    let mut surface = RecordingSurface::new();
    let mut driver = AnimationDriver::new();
    driver.start(A, B, &path, 0, &config, &mut surface);

    let at_half = driver.frame(1500, &mut surface).unwrap();
    assert!(near(at_half, path[1]), "halfway along two equal-share segments: {at_half:?}");
}

#[test]
fn frame_loop_runs_until_budget_or_cancel() {
    let clock = ManualClock::new(0);
    let mut surface = RecordingSurface::new();
    let mut driver = AnimationDriver::new();
    let stop: StopHandle = driver.start(A, B, &[], clock.now_ms(), &AnimationConfig::default(), &mut surface);

    let drawn = animation::run_frames(&mut driver, &clock, &mut surface, Duration::ZERO, 5);
    assert_eq!(drawn, 5);

    stop.cancel();
    let drawn = animation::run_frames(&mut driver, &clock, &mut surface, Duration::ZERO, 5);
    assert_eq!(drawn, 0);
    assert!(!driver.is_running());
    assert_eq!(surface.attached_count(), 0);
}

#[test]
fn manual_clock_clones_share_time() {
    let clock = ManualClock::new(100);
    let other = clock.clone();
    clock.advance(50);
    assert_eq!(other.now_ms(), 150);
    other.set(10);
    assert_eq!(clock.now_ms(), 10);
}
