//! Animation Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic sampling and cursor reuse
//! - Interpolatable implementations (Quat, MorphWeightData)
//! - AnimationAction loop modes, clamping and events
//! - AnimationAction weight fades (fade in / fade out / reset)
//! - AnimationClip duration and malformed tracks

use std::f32::consts::PI;
use std::sync::Arc;

use glam::{Quat, Vec3};

use marionette::animation::action::{ActionEvent, AnimationAction, LoopMode, TrackValue};
use marionette::animation::binding::TargetPath;
use marionette::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use marionette::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
use marionette::animation::values::{Interpolatable, MorphWeightData};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn ramp(times: Vec<f32>, values: Vec<f32>, mode: InterpolationMode) -> KeyframeTrack<f32> {
    KeyframeTrack::new(times, values, mode)
}

// ============================================================================
// KeyframeTrack sampling
// ============================================================================

#[test]
fn linear_track_interpolates_between_keys() {
    let track = ramp(vec![0.0, 1.0, 3.0], vec![0.0, 10.0, 30.0], InterpolationMode::Linear);

    assert!(approx(track.sample(0.5), 5.0));
    assert!(approx(track.sample(1.0), 10.0));
    assert!(approx(track.sample(2.0), 20.0));
}

#[test]
fn linear_track_clamps_outside_key_range() {
    let track = ramp(vec![1.0, 2.0], vec![10.0, 20.0], InterpolationMode::Linear);

    assert!(approx(track.sample(-3.0), 10.0), "before first key");
    assert!(approx(track.sample(9.0), 20.0), "after last key");
}

#[test]
fn step_track_holds_until_next_key() {
    let track = ramp(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0], InterpolationMode::Step);

    assert!(approx(track.sample(0.99), 1.0));
    assert!(approx(track.sample(1.0), 2.0));
    assert!(approx(track.sample(1.7), 2.0));
}

#[test]
fn cubic_track_hits_keys_exactly() {
    // [in_tangent, value, out_tangent] per key
    let track = ramp(
        vec![0.0, 2.0],
        vec![0.0, 4.0, 1.0, -1.0, 8.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    assert!(approx(track.sample(0.0), 4.0));
    assert!(approx(track.sample(2.0), 8.0));
}

#[test]
fn cubic_track_with_flat_tangents_is_symmetric() {
    let track = ramp(
        vec![0.0, 1.0],
        vec![0.0, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    let mid = track.sample(0.5);
    assert!(approx(mid, 5.0), "flat Hermite midpoint should be 5, got {mid}");
    assert!(track.sample(0.25) < 2.5, "ease-in should lag linear");
}

#[test]
fn vec3_track_interpolates_componentwise() {
    let track = KeyframeTrack::new(
        vec![0.0, 2.0],
        vec![Vec3::ZERO, Vec3::new(2.0, -4.0, 8.0)],
        InterpolationMode::Linear,
    );

    let v = track.sample(0.5);
    assert!(approx(v.x, 0.5) && approx(v.y, -1.0) && approx(v.z, 2.0), "got {v}");
}

#[test]
fn quat_track_slerps() {
    let end = Quat::from_rotation_y(PI / 2.0);
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Quat::IDENTITY, end],
        InterpolationMode::Linear,
    );

    let q = track.sample(0.5);
    let expected = Quat::from_rotation_y(PI / 4.0);
    assert!(q.angle_between(expected) < 1e-3);
}

#[test]
fn empty_track_samples_default() {
    let track = ramp(vec![], vec![], InterpolationMode::Linear);
    assert!(track.is_empty());
    assert!(approx(track.sample(1.0), 0.0));
}

#[test]
fn cursor_sampling_matches_stateless_sampling() {
    let track = ramp(
        vec![0.0, 0.5, 1.0, 2.0, 4.0],
        vec![0.0, 3.0, -1.0, 6.0, 2.0],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    // forward playback, then a jump back to the start
    let times = (0..=44).map(|i| i as f32 * 0.1).chain([0.2, 3.9, 0.0]);
    for t in times {
        let a = track.sample_with_cursor(t, &mut cursor);
        let b = track.sample(t);
        assert!(approx(a, b), "t={t}: cursor {a} != stateless {b}");
    }
}

#[test]
fn stale_cursor_from_longer_track_is_safe() {
    let long = ramp(
        (0..10).map(|i| i as f32).collect(),
        (0..10).map(|i| i as f32).collect(),
        InterpolationMode::Linear,
    );
    let short = ramp(vec![0.0, 1.0], vec![5.0, 6.0], InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    long.sample_with_cursor(8.5, &mut cursor);
    assert!(approx(short.sample_with_cursor(0.5, &mut cursor), 5.5));
}

// ============================================================================
// Interpolatable
// ============================================================================

#[test]
fn quat_linear_takes_shortest_path() {
    let a = Quat::from_rotation_z(0.1);
    let b = -Quat::from_rotation_z(0.3); // same rotation, opposite hemisphere
    let mid = Quat::interpolate_linear(a, b, 0.5);
    assert!(mid.angle_between(Quat::from_rotation_z(0.2)) < 1e-3);
}

#[test]
fn morph_weights_interpolate_per_target() {
    let a = MorphWeightData::from_slice(&[0.0, 1.0, 0.5]);
    let b = MorphWeightData::from_slice(&[1.0, 0.0, 0.5]);

    let mid = MorphWeightData::interpolate_linear(a, b, 0.25);
    assert!(approx(mid.weights[0], 0.25));
    assert!(approx(mid.weights[1], 0.75));
    assert!(approx(mid.weights[2], 0.5));
    assert!(approx(mid.weights[3], 0.0), "unused slots stay zero");
}

#[test]
fn morph_weights_from_slice_truncates() {
    let long: Vec<f32> = (0..64).map(|i| i as f32).collect();
    let data = MorphWeightData::from_slice(&long);
    assert!(approx(data.weights[31], 31.0));
}

// ============================================================================
// AnimationAction: loop modes
// ============================================================================

fn clip(name: &str, duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        name,
        vec![Track {
            meta: TrackMeta {
                node_name: "Bone".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, Vec3::new(duration, 0.0, 0.0)],
                InterpolationMode::Linear,
            )),
        }],
    ))
}

fn playing(duration: f32, mode: LoopMode) -> AnimationAction {
    let mut action = AnimationAction::new(clip("test", duration));
    action.loop_mode = mode;
    action.play();
    action
}

#[test]
fn unscheduled_action_does_not_advance() {
    let mut action = AnimationAction::new(clip("idle", 2.0));
    assert_eq!(action.update_time(0.5), None);
    assert!(approx(action.time, 0.0));
    assert!(approx(action.effective_weight(), 0.0));
}

#[test]
fn once_with_clamp_pauses_on_last_frame() {
    let mut action = playing(2.0, LoopMode::Once);
    action.clamp_when_finished = true;

    assert_eq!(action.update_time(1.5), None);
    assert_eq!(action.update_time(1.0), Some(ActionEvent::Finished));
    assert!(approx(action.time, 2.0));
    assert!(action.paused);
    assert!(action.enabled, "clamped action keeps contributing");
    assert!(approx(action.effective_weight(), 1.0));

    // Finished is reported once
    assert_eq!(action.update_time(1.0), None);
}

#[test]
fn once_without_clamp_disables() {
    let mut action = playing(1.0, LoopMode::Once);

    assert_eq!(action.update_time(1.2), Some(ActionEvent::Finished));
    assert!(!action.enabled);
    assert!(approx(action.effective_weight(), 0.0));
}

#[test]
fn loop_wraps_and_reports() {
    let mut action = playing(2.0, LoopMode::Loop);

    assert_eq!(action.update_time(2.5), Some(ActionEvent::Loop));
    assert!(approx(action.time, 0.5), "got {}", action.time);
    assert!(!action.paused);
}

#[test]
fn loop_reverse_wraps_from_start() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.time = 0.5;
    action.time_scale = -1.0;

    assert_eq!(action.update_time(1.0), Some(ActionEvent::Loop));
    assert!(approx(action.time, 1.5), "got {}", action.time);
}

#[test]
fn pingpong_reflects_at_ends() {
    let mut action = playing(2.0, LoopMode::PingPong);

    assert_eq!(action.update_time(1.5), None);
    assert_eq!(action.update_time(1.5), Some(ActionEvent::Loop));
    assert!(approx(action.time, 1.0), "3s into a 2s pingpong is 1s, got {}", action.time);
}

#[test]
fn paused_action_holds_time() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.paused = true;
    action.time = 0.5;

    assert_eq!(action.update_time(1.0), None);
    assert!(approx(action.time, 0.5));
}

#[test]
fn time_scale_multiplies_delta() {
    let mut action = playing(4.0, LoopMode::Once);
    action.set_effective_time_scale(2.0);

    action.update_time(1.0);
    assert!(approx(action.time, 2.0));
}

#[test]
fn sample_track_follows_time() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.update_time(0.5);

    match action.sample_track(0) {
        Some(TrackValue::Vector3(v)) => assert!(approx(v.x, 0.5), "got {v}"),
        other => panic!("expected a Vector3 sample, got {other:?}"),
    }
    assert!(action.sample_track(7).is_none());
}

// ============================================================================
// AnimationAction: weight fades
// ============================================================================

#[test]
fn fade_in_ramps_from_zero_to_full() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.fade_in(1.0);

    assert!(approx(action.effective_weight(), 0.0));
    action.update_weight(0.25);
    assert!(approx(action.effective_weight(), 0.25));
    action.update_weight(0.75);
    assert!(approx(action.effective_weight(), 1.0));
    assert!(!action.is_fading());
}

#[test]
fn fade_out_disables_when_complete() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.fade_out(0.5);

    action.update_weight(0.25);
    assert!(approx(action.effective_weight(), 0.5));
    assert!(action.enabled);

    action.update_weight(0.25);
    assert!(!action.enabled);
    assert!(approx(action.effective_weight(), 0.0));
}

#[test]
fn fade_out_starts_from_current_factor() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.fade_in(1.0);
    action.update_weight(0.25);

    action.fade_out(1.0);
    assert!(approx(action.effective_weight(), 0.25), "no jump back to full weight");
    action.update_weight(0.5);
    assert!(approx(action.effective_weight(), 0.125));
}

#[test]
fn zero_length_fade_out_disables_immediately() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.fade_out(0.0);
    assert!(!action.enabled);
    assert!(!action.is_fading());
}

#[test]
fn fade_advances_while_paused() {
    let mut action = playing(1.0, LoopMode::Once);
    action.clamp_when_finished = true;
    action.update_time(2.0);
    assert!(action.paused);

    action.fade_out(0.2);
    action.update_weight(0.2);
    assert!(approx(action.effective_weight(), 0.0));
}

#[test]
fn weight_scales_fade_factor() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.weight = 0.5;
    action.fade_in(1.0);
    action.update_weight(0.5);
    assert!(approx(action.effective_weight(), 0.25));
}

#[test]
fn reset_rewinds_and_clears_fade() {
    let mut action = playing(1.0, LoopMode::Once);
    action.clamp_when_finished = true;
    action.update_time(5.0);
    action.fade_out(1.0);
    action.update_weight(0.5);

    action.reset();
    assert!(approx(action.time, 0.0));
    assert!(!action.paused);
    assert!(action.enabled);
    assert!(!action.is_fading());
    assert!(approx(action.effective_weight(), 1.0));
}

#[test]
fn set_effective_weight_cancels_fade() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.fade_in(1.0);
    action.set_effective_weight(0.8);
    assert!(!action.is_fading());
    assert!(approx(action.effective_weight(), 0.8));
}

#[test]
fn stop_unschedules() {
    let mut action = playing(2.0, LoopMode::Loop);
    action.update_time(0.5);
    action.stop();
    assert!(!action.is_scheduled());
    assert!(approx(action.time, 0.0));
    assert!(approx(action.effective_weight(), 0.0));
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_longest_track() {
    let clip = AnimationClip::new(
        "two_tracks",
        vec![
            Track {
                meta: TrackMeta {
                    node_name: "a".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(KeyframeTrack::new(
                    vec![0.0, 1.5],
                    vec![Vec3::ZERO, Vec3::X],
                    InterpolationMode::Linear,
                )),
            },
            Track {
                meta: TrackMeta {
                    node_name: "b".to_string(),
                    target: TargetPath::Rotation,
                },
                data: TrackData::Quaternion(KeyframeTrack::new(
                    vec![0.0, 3.0],
                    vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
                    InterpolationMode::Linear,
                )),
            },
        ],
    );

    assert!(approx(clip.duration, 3.0));
    assert!(approx(AnimationClip::new("empty", vec![]).duration, 0.0));
}

#[test]
fn malformed_tracks_are_detected() {
    let vec3 = |times: Vec<f32>, n: usize, mode| {
        TrackData::Vector3(KeyframeTrack::new(times, vec![Vec3::ZERO; n], mode))
    };
    let short = vec3(vec![0.0, 1.0], 1, InterpolationMode::Linear);
    let cubic_ok = vec3(vec![0.0, 1.0], 6, InterpolationMode::CubicSpline);
    let cubic_short = vec3(vec![0.0, 1.0], 2, InterpolationMode::CubicSpline);
    let empty = vec3(vec![], 0, InterpolationMode::Step);

    assert!(!short.is_well_formed());
    assert!(cubic_ok.is_well_formed());
    assert!(!cubic_short.is_well_formed());
    assert!(!empty.is_well_formed());
}
