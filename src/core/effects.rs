// Frame-driven visual effects: backdrop blur ramps, camera shake and the
// bloom settings handed to the renderer.
//
// Both effects are plain records advanced by the render loop. Starting a new
// effect replaces the one in flight.

use glam::Vec3;
use rand::Rng;

use super::constants::{
    BLOOM_RADIUS, BLOOM_STRENGTH_DESKTOP, BLOOM_STRENGTH_MOBILE, BLOOM_THRESHOLD, SHAKE_SETTLE_LERP,
};

/// Request to ramp the backdrop blur radius.
///
/// `from: None` starts from whatever radius is currently applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurCue {
    pub from: Option<f32>,
    pub to: f32,
    pub duration_ms: f64,
}

/// Request to shake the camera rig.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeCue {
    pub duration_sec: f32,
    pub intensity: f32,
}

/// Viewport-dependent shake intensities for the entry and terminal bursts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShakeTuning {
    pub entry: f32,
    pub terminal: f32,
}

/// Glow laid over the rendered scene once the transition starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BloomSettings {
    pub strength: f32,
    pub radius: f32,
    pub threshold: f32,
}

impl BloomSettings {
    pub fn for_viewport(mobile: bool) -> Self {
        Self {
            strength: if mobile {
                BLOOM_STRENGTH_MOBILE
            } else {
                BLOOM_STRENGTH_DESKTOP
            },
            radius: BLOOM_RADIUS,
            threshold: BLOOM_THRESHOLD,
        }
    }
}

/// Linear blur ramp anchored to wall-clock milliseconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlurRamp {
    pub from: f32,
    pub to: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl BlurRamp {
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
        }
    }

    /// Normalised progress in [0, 1]. A non-positive duration is complete at once.
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    pub fn value_at(&self, now_ms: f64) -> f32 {
        self.from + (self.to - self.from) * self.progress(now_ms)
    }

    pub fn is_done(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}

/// Remaining time and strength of a camera shake.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShakeBurst {
    pub remaining_sec: f32,
    pub intensity: f32,
}

impl ShakeBurst {
    pub fn new(duration_sec: f32, intensity: f32) -> Self {
        Self {
            remaining_sec: duration_sec,
            intensity,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining_sec > 0.0
    }
}

/// Camera rig transform: a resting position plus the current, possibly
/// shaken, position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    pub rest: Vec3,
    pub position: Vec3,
}

impl CameraRig {
    pub fn new(rest: Vec3) -> Self {
        Self {
            rest,
            position: rest,
        }
    }

    /// Move the rig to a new resting position (layout change). Any shake
    /// offset is dropped.
    pub fn place(&mut self, rest: Vec3) {
        self.rest = rest;
        self.position = rest;
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.position - self.rest
    }
}

/// Advances the blur ramp and shake burst once per rendered frame.
#[derive(Clone, Debug, Default)]
pub struct EffectsDriver {
    blur: Option<BlurRamp>,
    blur_px: f32,
    shake: ShakeBurst,
}

impl EffectsDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a blur ramp at `now_ms`, replacing any ramp still in flight.
    pub fn start_blur(&mut self, cue: BlurCue, now_ms: f64) {
        let from = cue.from.unwrap_or(self.blur_px);
        self.blur = Some(BlurRamp::new(from, cue.to, now_ms, cue.duration_ms));
    }

    /// Re-arm the shake burst. A burst in flight is overwritten, not extended.
    pub fn start_shake(&mut self, cue: ShakeCue) {
        self.shake = ShakeBurst::new(cue.duration_sec, cue.intensity);
    }

    pub fn blur_px(&self) -> f32 {
        self.blur_px
    }

    pub fn blur_ramp(&self) -> Option<&BlurRamp> {
        self.blur.as_ref()
    }

    pub fn shake(&self) -> &ShakeBurst {
        &self.shake
    }

    /// Advance both effects.
    ///
    /// Returns the blur radius to apply when a ramp produced a value this
    /// frame; `None` when no ramp is in flight. The ramp is retired on the
    /// frame that reaches its target, after writing that final value.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        now_ms: f64,
        dt_sec: f32,
        rng: &mut R,
        rig: &mut CameraRig,
    ) -> Option<f32> {
        let mut blur = None;
        if let Some(ramp) = self.blur {
            self.blur_px = ramp.value_at(now_ms);
            if ramp.is_done(now_ms) {
                self.blur = None;
            }
            blur = Some(self.blur_px);
        }

        if self.shake.is_active() {
            self.shake.remaining_sec -= dt_sec;
            let intensity = self.shake.intensity;
            rig.position.x = rig.rest.x + (rng.gen::<f32>() - 0.5) * intensity;
            rig.position.y = rig.rest.y + (rng.gen::<f32>() - 0.5) * intensity;
        } else {
            rig.position = rig.position.lerp(rig.rest, SHAKE_SETTLE_LERP);
        }

        blur
    }
}
