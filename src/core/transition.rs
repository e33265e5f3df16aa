// Portal transition sequencer.
//
// `enter_portal` switches bloom on, starts the clip and the sound, and arms
// two completion flags. Navigation is gated on both flags: whichever completion arrives
// second starts the terminal sequence (stronger blur, second shake, flash),
// and navigation follows `REDIRECT_DELAY_MS` later. The sequencer never
// touches the DOM, audio or GPU; it pushes [`Cue`]s that the frame loop
// applies.
//
// Each call to `enter_portal` opens a new [`Generation`]. Completions are
// tagged with the generation they were started under, and only the current
// generation's completions count. The terminal sequence is latched, so it
// runs once per transition no matter how many completions arrive late.

use smallvec::SmallVec;
use thiserror::Error;

use super::assets::{AssetBoard, AssetError};
use super::constants::*;
use super::effects::{BloomSettings, BlurCue, ShakeCue, ShakeTuning};

/// Side effects requested by the sequencer, applied by the frame loop in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    CloseConfirmModal,
    DisableOrbit,
    EnableBloom(BloomSettings),
    PlayAnimation {
        time_scale: f32,
        clamp_when_finished: bool,
    },
    PlayAudio,
    Blur(BlurCue),
    Shake(ShakeCue),
    Flash,
    Navigate(&'static str),
}

pub type Cues = SmallVec<[Cue; 8]>;

/// Completion flags of the transition in progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionState {
    pub animation_finished: bool,
    pub audio_finished: bool,
    pub active: bool,
}

impl TransitionState {
    fn armed() -> Self {
        Self {
            animation_finished: false,
            audio_finished: false,
            active: true,
        }
    }

    #[inline]
    pub fn both_done(&self) -> bool {
        self.animation_finished && self.audio_finished
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing started yet.
    Idle,
    /// Clip and sound playing; waiting for one or both completions.
    Armed,
    /// Terminal effects running; navigation pending.
    Redirecting,
    /// Navigation cue emitted. The page is expected to unload.
    Navigated,
}

/// Identifies one `enter_portal` invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u32);

/// Readiness of the assets the transition needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Readiness {
    pub model: bool,
    pub audio: bool,
}

/// Why `enter_portal` left the state untouched.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EnterError {
    #[error("portal model or its animation is not loaded yet")]
    ModelNotReady,
    #[error("portal sound is not loaded yet")]
    AudioNotReady,
    #[error("redirect already in progress")]
    AlreadyRedirecting,
}

impl EnterError {
    /// The load failure that keeps this precondition from ever holding, as
    /// opposed to an asset that is still on its way.
    pub fn asset_failure<'a>(&self, assets: &'a AssetBoard) -> Option<&'a AssetError> {
        match self {
            EnterError::ModelNotReady => assets.model.error(),
            EnterError::AudioNotReady => assets.audio.error(),
            EnterError::AlreadyRedirecting => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Completion {
    Animation,
    Audio,
}

#[derive(Debug)]
pub struct PortalSequencer {
    state: TransitionState,
    phase: Phase,
    generation: Generation,
    redirect_at_ms: Option<f64>,
    shake: ShakeTuning,
    bloom: BloomSettings,
}

impl PortalSequencer {
    pub fn new(shake: ShakeTuning) -> Self {
        Self {
            state: TransitionState::default(),
            phase: Phase::Idle,
            generation: Generation(0),
            redirect_at_ms: None,
            shake,
            bloom: BloomSettings::for_viewport(false),
        }
    }

    /// Bloom requested by the next `enter_portal`.
    pub fn set_bloom(&mut self, bloom: BloomSettings) {
        self.bloom = bloom;
    }

    /// Update shake intensities after a viewport change.
    pub fn set_shake_tuning(&mut self, shake: ShakeTuning) {
        self.shake = shake;
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Time at which navigation is due, once the terminal sequence began.
    pub fn redirect_at_ms(&self) -> Option<f64> {
        self.redirect_at_ms
    }

    /// Whether a completion tagged with `generation` would still count.
    #[inline]
    pub fn accepts(&self, generation: Generation) -> bool {
        generation == self.generation && self.phase == Phase::Armed
    }

    /// Start (or restart) the transition.
    ///
    /// With either asset missing, or once the terminal sequence has begun,
    /// nothing changes and no cue is pushed. Calling this while already armed
    /// restarts the flags and both effects; completions belonging to the
    /// earlier call are ignored from then on.
    pub fn enter_portal(
        &mut self,
        ready: Readiness,
        out: &mut Cues,
    ) -> Result<Generation, EnterError> {
        if !ready.model {
            return Err(EnterError::ModelNotReady);
        }
        if !ready.audio {
            return Err(EnterError::AudioNotReady);
        }
        match self.phase {
            Phase::Redirecting | Phase::Navigated => return Err(EnterError::AlreadyRedirecting),
            Phase::Armed => log::warn!(
                "[portal] re-entered while armed (generation {}), restarting",
                self.generation.0
            ),
            Phase::Idle => {}
        }

        self.generation = Generation(self.generation.0.wrapping_add(1));
        self.state = TransitionState::armed();
        self.phase = Phase::Armed;

        out.push(Cue::CloseConfirmModal);
        out.push(Cue::DisableOrbit);
        out.push(Cue::EnableBloom(self.bloom));
        out.push(Cue::PlayAnimation {
            time_scale: PORTAL_TIME_SCALE,
            clamp_when_finished: PORTAL_CLAMP_WHEN_FINISHED,
        });
        out.push(Cue::PlayAudio);
        out.push(Cue::Shake(ShakeCue {
            duration_sec: ENTRY_SHAKE_SEC,
            intensity: self.shake.entry,
        }));
        out.push(Cue::Blur(BlurCue {
            from: Some(ENTRY_BLUR_FROM_PX),
            to: ENTRY_BLUR_TO_PX,
            duration_ms: ENTRY_BLUR_MS,
        }));
        log::info!("[portal] armed (generation {})", self.generation.0);
        Ok(self.generation)
    }

    /// The single-shot clip of `generation` reached its end.
    ///
    /// Returns `true` when this completion started the terminal sequence.
    pub fn on_animation_finished(
        &mut self,
        generation: Generation,
        now_ms: f64,
        out: &mut Cues,
    ) -> bool {
        self.complete(Completion::Animation, generation, now_ms, out)
    }

    /// Playback of the portal sound for `generation` ended.
    ///
    /// Returns `true` when this completion started the terminal sequence.
    pub fn on_audio_finished(&mut self, generation: Generation, now_ms: f64, out: &mut Cues) -> bool {
        self.complete(Completion::Audio, generation, now_ms, out)
    }

    fn complete(
        &mut self,
        which: Completion,
        generation: Generation,
        now_ms: f64,
        out: &mut Cues,
    ) -> bool {
        if !self.accepts(generation) {
            log::debug!(
                "[portal] ignoring {:?} completion (generation {}, current {}, {:?})",
                which,
                generation.0,
                self.generation.0,
                self.phase
            );
            return false;
        }
        match which {
            Completion::Animation => self.state.animation_finished = true,
            Completion::Audio => self.state.audio_finished = true,
        }
        self.try_redirect(now_ms, out)
    }

    /// Join check: start the terminal sequence once both completions are in.
    ///
    /// No-op unless armed with both flags set, so the sequence runs at most
    /// once per transition.
    pub fn try_redirect(&mut self, now_ms: f64, out: &mut Cues) -> bool {
        if self.phase != Phase::Armed || !self.state.both_done() {
            return false;
        }
        self.phase = Phase::Redirecting;
        self.redirect_at_ms = Some(now_ms + REDIRECT_DELAY_MS);

        out.push(Cue::Blur(BlurCue {
            from: None,
            to: TERMINAL_BLUR_TO_PX,
            duration_ms: TERMINAL_BLUR_MS,
        }));
        out.push(Cue::Shake(ShakeCue {
            duration_sec: TERMINAL_SHAKE_SEC,
            intensity: self.shake.terminal,
        }));
        out.push(Cue::Flash);
        log::info!(
            "[portal] both completions in, navigating at {:.0} ms",
            now_ms + REDIRECT_DELAY_MS
        );
        true
    }

    /// Advance the pending navigation. Pushes `Cue::Navigate` exactly once,
    /// on the first tick at or after the redirect deadline.
    pub fn tick(&mut self, now_ms: f64, out: &mut Cues) {
        if self.phase != Phase::Redirecting {
            return;
        }
        match self.redirect_at_ms {
            Some(at) if now_ms >= at => {
                self.phase = Phase::Navigated;
                self.state.active = false;
                out.push(Cue::Navigate(PORTAL_DESTINATION));
            }
            _ => {}
        }
    }
}
