// Keyframe animation: node tracks and single-shot playback.

use glam::{Mat4, Quat, Vec3};

/// Local transform of a scene node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl NodeTransform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Keyframe values of one animated property.
#[derive(Clone, Debug)]
pub enum Channel {
    Translation(Vec<Vec3>),
    Rotation(Vec<Quat>),
    Scale(Vec<Vec3>),
}

impl Channel {
    fn len(&self) -> usize {
        match self {
            Channel::Translation(v) | Channel::Scale(v) => v.len(),
            Channel::Rotation(v) => v.len(),
        }
    }
}

/// Keyframes driving one property of one node. `times` are ascending seconds.
#[derive(Clone, Debug)]
pub struct Track {
    pub node: usize,
    pub times: Vec<f32>,
    pub channel: Channel,
}

impl Track {
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    // (lower key, upper key, blend) for time `t`, clamped to the key range
    fn locate(&self, t: f32) -> Option<(usize, usize, f32)> {
        let n = self.times.len().min(self.channel.len());
        if n == 0 {
            return None;
        }
        if n == 1 || t <= self.times[0] {
            return Some((0, 0, 0.0));
        }
        if t >= self.times[n - 1] {
            return Some((n - 1, n - 1, 0.0));
        }
        let hi = self.times[..n].partition_point(|&k| k <= t);
        let lo = hi - 1;
        let span = self.times[hi] - self.times[lo];
        let f = if span > 0.0 {
            (t - self.times[lo]) / span
        } else {
            0.0
        };
        Some((lo, hi, f))
    }

    /// Write the sampled value at `t` into `target`.
    pub fn apply(&self, t: f32, target: &mut NodeTransform) {
        let Some((lo, hi, f)) = self.locate(t) else {
            return;
        };
        match &self.channel {
            Channel::Translation(v) => target.translation = v[lo].lerp(v[hi], f),
            Channel::Rotation(v) => target.rotation = v[lo].slerp(v[hi], f).normalize(),
            Channel::Scale(v) => target.scale = v[lo].lerp(v[hi], f),
        }
    }
}

/// A named set of tracks. Duration is the latest key time over all tracks.
#[derive(Clone, Debug)]
pub struct AnimationClip {
    pub name: String,
    pub duration: f32,
    pub tracks: Vec<Track>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<Track>) -> Self {
        let duration = tracks.iter().map(Track::end_time).fold(0.0_f32, f32::max);
        Self {
            name: name.into(),
            duration,
            tracks,
        }
    }

    /// Overwrite animated properties of `poses` (indexed by node) with the
    /// clip's values at `t`. Tracks targeting nodes outside `poses` are skipped.
    pub fn sample_into(&self, t: f32, poses: &mut [NodeTransform]) {
        for track in &self.tracks {
            if let Some(pose) = poses.get_mut(track.node) {
                track.apply(t, pose);
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Running,
    Finished,
}

/// Single-shot playback cursor over a clip of known duration.
#[derive(Clone, Debug)]
pub struct ClipPlayback {
    duration: f32,
    time: f32,
    time_scale: f32,
    clamp_when_finished: bool,
    state: PlaybackState,
}

impl ClipPlayback {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            time: 0.0,
            time_scale: 1.0,
            clamp_when_finished: false,
            state: PlaybackState::Stopped,
        }
    }

    /// Rewind and start playing once.
    pub fn play_once(&mut self, time_scale: f32, clamp_when_finished: bool) {
        self.time = 0.0;
        self.time_scale = time_scale;
        self.clamp_when_finished = clamp_when_finished;
        self.state = PlaybackState::Running;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Advance by `dt_sec` scaled by the time scale.
    ///
    /// Returns `true` on the one update that reaches the end of the clip.
    pub fn update(&mut self, dt_sec: f32) -> bool {
        if self.state != PlaybackState::Running {
            return false;
        }
        self.time += dt_sec.max(0.0) * self.time_scale;
        if self.time >= self.duration {
            self.time = self.duration;
            self.state = PlaybackState::Finished;
            return true;
        }
        false
    }

    /// Clip time to pose the model at, or `None` for the rest pose.
    pub fn pose_time(&self) -> Option<f32> {
        match self.state {
            PlaybackState::Running => Some(self.time),
            PlaybackState::Finished if self.clamp_when_finished => Some(self.duration),
            _ => None,
        }
    }
}
