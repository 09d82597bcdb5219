use glam::{Quat, Vec3};

use crate::animation::binding::TargetPath;
use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
use crate::animation::values::MorphWeightData;

#[derive(Debug, Clone)]
pub struct TrackMeta {
    /// Name of the scene node this track animates.
    pub node_name: String,
    pub target: TargetPath,
}

#[derive(Debug, Clone)]
pub enum TrackData {
    Vector3(KeyframeTrack<Vec3>),
    Quaternion(KeyframeTrack<Quat>),
    MorphWeights(KeyframeTrack<MorphWeightData>),
}

impl TrackData {
    #[must_use]
    pub fn end_time(&self) -> f32 {
        match self {
            TrackData::Vector3(t) => t.end_time(),
            TrackData::Quaternion(t) => t.end_time(),
            TrackData::MorphWeights(t) => t.end_time(),
        }
    }

    /// Whether the value count matches the keyframe count for the
    /// interpolation mode. Malformed tracks are dropped at load time.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        fn check<T: crate::animation::values::Interpolatable>(t: &KeyframeTrack<T>) -> bool {
            let per_key = match t.interpolation {
                InterpolationMode::CubicSpline => 3,
                _ => 1,
            };
            !t.times.is_empty() && t.values.len() == t.times.len() * per_key
        }
        match self {
            TrackData::Vector3(t) => check(t),
            TrackData::Quaternion(t) => check(t),
            TrackData::MorphWeights(t) => check(t),
        }
    }
}

/// A track: what it animates plus the keyframes.
#[derive(Debug, Clone)]
pub struct Track {
    pub meta: TrackMeta,
    pub data: TrackData,
}

/// A named, fixed-duration keyframe sequence. Shared immutably between
/// actions once loaded.
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    /// Duration is the end time of the longest track.
    #[must_use]
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks
            .iter()
            .map(|t| t.data.end_time())
            .fold(0.0_f32, f32::max);

        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }
}
