use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    MorphWeightData,
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

/// Fades shorter than this complete immediately.
const MIN_FADE_DURATION: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once, then stop (or clamp on the last frame).
    Once,
    Loop,
    PingPong,
}

/// What happened to an action's clock during one advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEvent {
    /// A `Once` action reached its end (or start, when reversed).
    Finished,
    /// A repeating action wrapped around.
    Loop,
}

/// Linear ramp of the weight multiplier from `from` to `to`.
#[derive(Debug, Clone, Copy)]
struct WeightFade {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
}

/// A playable, stateful wrapper around one clip.
///
/// The effective weight is `weight * fade factor`; crossfades only ever move
/// the fade factor, so `weight` remains the user-set target.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    /// When a `Once` action finishes: hold the last pose (pause) instead of
    /// disabling the action.
    pub clamp_when_finished: bool,
    pub paused: bool,
    pub enabled: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,

    scheduled: bool,
    fade: Option<WeightFade>,
    fade_factor: f32,
    pingpong_phase: f32,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            clamp_when_finished: false,
            paused: false,
            enabled: true,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
            scheduled: false,
            fade: None,
            fade_factor: 1.0,
            pingpong_phase: 0.0,
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    // ========================================================================
    // Playback control (chainable)
    // ========================================================================

    /// Schedules the action so the mixer advances and applies it.
    pub fn play(&mut self) -> &mut Self {
        self.scheduled = true;
        self
    }

    /// Unschedules and resets the action.
    pub fn stop(&mut self) -> &mut Self {
        self.scheduled = false;
        self.reset()
    }

    /// Rewinds to the start, unpauses, re-enables and cancels any fade.
    pub fn reset(&mut self) -> &mut Self {
        self.paused = false;
        self.enabled = true;
        self.time = 0.0;
        self.pingpong_phase = 0.0;
        self.stop_fading();
        for cursor in &mut self.track_cursors {
            *cursor = KeyframeCursor::default();
        }
        self
    }

    pub fn set_effective_time_scale(&mut self, time_scale: f32) -> &mut Self {
        self.time_scale = time_scale;
        self
    }

    /// Sets the weight and cancels any fade in progress.
    pub fn set_effective_weight(&mut self, weight: f32) -> &mut Self {
        self.weight = weight;
        self.stop_fading();
        self
    }

    /// Ramps the weight multiplier from 0 to 1 over `duration` seconds.
    pub fn fade_in(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(0.0, 1.0, duration);
        self
    }

    /// Ramps the weight multiplier from its current value to 0 over
    /// `duration` seconds; the action is disabled when the ramp completes.
    pub fn fade_out(&mut self, duration: f32) -> &mut Self {
        self.schedule_fade(self.fade_factor, 0.0, duration);
        self
    }

    pub fn stop_fading(&mut self) -> &mut Self {
        self.fade = None;
        self.fade_factor = 1.0;
        self
    }

    fn schedule_fade(&mut self, from: f32, to: f32, duration: f32) {
        if duration <= MIN_FADE_DURATION {
            self.fade = None;
            self.fade_factor = to;
            if to <= 0.0 {
                self.enabled = false;
            }
            return;
        }
        self.fade_factor = from;
        self.fade = Some(WeightFade {
            from,
            to,
            elapsed: 0.0,
            duration,
        });
    }

    // ========================================================================
    // State queries
    // ========================================================================

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Scheduled, enabled, not paused and with a non-zero time scale.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.scheduled && self.enabled && !self.paused && self.time_scale != 0.0
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Weight this action contributes to the blended pose right now.
    #[must_use]
    pub fn effective_weight(&self) -> f32 {
        if self.scheduled && self.enabled {
            self.weight * self.fade_factor
        } else {
            0.0
        }
    }

    // ========================================================================
    // Per-frame update
    // ========================================================================

    /// Advances the weight fade. Runs even while paused so a clamped action
    /// can still be faded out.
    pub fn update_weight(&mut self, dt: f32) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };

        fade.elapsed += dt.abs();
        let progress = fade.elapsed / fade.duration;
        if progress >= 1.0 - MIN_FADE_DURATION {
            self.fade_factor = fade.to;
            let faded_out = fade.to <= 0.0;
            self.fade = None;
            if faded_out {
                self.enabled = false;
            }
        } else {
            self.fade_factor = fade.from + (fade.to - fade.from) * progress;
        }
    }

    /// Advances the clock by `dt` (already scaled by the mixer) and applies
    /// the loop mode.
    pub fn update_time(&mut self, dt: f32) -> Option<ActionEvent> {
        if self.paused || !self.enabled || !self.scheduled {
            return None;
        }

        let delta = dt * self.time_scale;
        if delta == 0.0 {
            return None;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            // A single-key clip is a pose: a one-shot finishes on its first step.
            if self.loop_mode != LoopMode::Once {
                return None;
            }
            self.time = 0.0;
            return Some(self.finish());
        }

        match self.loop_mode {
            LoopMode::Once => {
                self.time += delta;
                let finished = if self.time >= duration {
                    self.time = duration;
                    true
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    true
                } else {
                    false
                };

                finished.then(|| self.finish())
            }
            LoopMode::Loop => {
                self.time += delta;
                if self.time >= duration || self.time < 0.0 {
                    self.time = self.time.rem_euclid(duration);
                    return Some(ActionEvent::Loop);
                }
                None
            }
            LoopMode::PingPong => {
                let before = (self.pingpong_phase / duration).floor();
                self.pingpong_phase += delta;
                let after = (self.pingpong_phase / duration).floor();

                let double_duration = duration * 2.0;
                let mut t = self.pingpong_phase.rem_euclid(double_duration);
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;

                (before != after).then_some(ActionEvent::Loop)
            }
        }
    }

    fn finish(&mut self) -> ActionEvent {
        if self.clamp_when_finished {
            self.paused = true;
        } else {
            self.enabled = false;
        }
        ActionEvent::Finished
    }

    /// Gets the value of the specified track at the current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
            TrackData::MorphWeights(t) => {
                TrackValue::MorphWeights(Box::new(t.sample_with_cursor(self.time, cursor)))
            }
        })
    }
}

#[derive(Debug, Clone)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
    MorphWeights(Box<MorphWeightData>),
}
