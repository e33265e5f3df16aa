//! Page-side actions of the portal: the confirm modal and the transition,
//! and the translation of sequencer cues into DOM, audio and scene calls.

use crate::constants::{MODAL_CLOSE_MS, MODAL_CLOSE_ON_ENTER_MS};
use crate::core::{Cue, Cues, EnterError, Generation, Phase};
use crate::dom;
use crate::frame::{FrameContext, SharedFrame};
use crate::overlay;
use std::rc::Rc;

pub fn open_modal(shared: &SharedFrame) {
    let mut ctx = shared.borrow_mut();
    if matches!(ctx.sequencer.phase(), Phase::Redirecting | Phase::Navigated) {
        return;
    }
    ctx.orbit.enabled = false;
    overlay::open_confirm(&ctx.document);
}

pub fn close_modal(shared: &SharedFrame) {
    let mut ctx = shared.borrow_mut();
    overlay::close_confirm(&ctx.document, MODAL_CLOSE_MS);
    if ctx.sequencer.phase() == Phase::Idle {
        ctx.orbit.enabled = true;
    }
}

/// Start the portal transition if both assets are ready.
pub fn enter_portal(shared: &SharedFrame) {
    let now_ms = dom::now_ms();
    let mut ctx = shared.borrow_mut();
    let ready = ctx.readiness();
    let mut cues = Cues::new();
    match ctx.sequencer.enter_portal(ready, &mut cues) {
        Ok(generation) => log::info!("[portal] entering (generation {})", generation.0),
        Err(e) => {
            match e.asset_failure(&ctx.assets) {
                Some(cause) => {
                    log::error!("[portal] cannot enter: {}: {}", e, cause);
                    overlay::set_popup_status(&ctx.document, Some(failure_notice(&e)));
                }
                None => log::warn!("[portal] enter ignored: {}", e),
            }
            return;
        }
    }
    apply_cues(shared, &mut ctx, &cues, now_ms);
}

fn failure_notice(e: &EnterError) -> &'static str {
    match e {
        EnterError::AudioNotReady => "The portal sound failed to load.",
        _ => "The portal failed to load.",
    }
}

/// Carry out `cues` in order against the page.
pub fn apply_cues(shared: &SharedFrame, ctx: &mut FrameContext<'static>, cues: &Cues, now_ms: f64) {
    for cue in cues {
        match *cue {
            Cue::CloseConfirmModal => overlay::close_confirm(&ctx.document, MODAL_CLOSE_ON_ENTER_MS),
            Cue::DisableOrbit => ctx.orbit.enabled = false,
            Cue::EnableBloom(bloom) => match &mut ctx.gpu {
                Some(gpu) => gpu.set_bloom(bloom),
                None => log::debug!("[render] no GPU, bloom skipped"),
            },
            Cue::PlayAnimation {
                time_scale,
                clamp_when_finished,
            } => {
                ctx.clip_generation = ctx.sequencer.generation();
                if let Some(model) = &mut ctx.model {
                    model.play_once(time_scale, clamp_when_finished);
                }
            }
            Cue::PlayAudio => play_sound(shared, ctx, now_ms),
            Cue::Blur(blur) => ctx.effects.start_blur(blur, now_ms),
            Cue::Shake(shake) => ctx.effects.start_shake(shake),
            Cue::Flash => overlay::flash(&ctx.document),
            Cue::Navigate(path) => {
                log::info!("[portal] navigating to {}", path);
                dom::navigate_to(path);
            }
        }
    }
}

fn play_sound(shared: &SharedFrame, ctx: &mut FrameContext<'static>, now_ms: f64) {
    let generation = ctx.sequencer.generation();
    let Some(sound) = &ctx.sound else {
        return;
    };
    let weak = Rc::downgrade(shared);
    let started = sound.play(move || {
        if let Some(shared) = weak.upgrade() {
            on_sound_ended(&shared, generation);
        }
    });
    if let Err(e) = started {
        // without playback there is no ended event; count the sound as done
        log::error!("[audio] portal sound failed to start: {:?}", e);
        finish_sound(shared, ctx, generation, now_ms);
    }
}

fn on_sound_ended(shared: &SharedFrame, generation: Generation) {
    let now_ms = dom::now_ms();
    let mut ctx = shared.borrow_mut();
    finish_sound(shared, &mut ctx, generation, now_ms);
}

fn finish_sound(
    shared: &SharedFrame,
    ctx: &mut FrameContext<'static>,
    generation: Generation,
    now_ms: f64,
) {
    if ctx.sequencer.accepts(generation) {
        log::info!("[audio] portal sound finished (generation {})", generation.0);
    }
    let mut cues = Cues::new();
    ctx.sequencer.on_audio_finished(generation, now_ms, &mut cues);
    apply_cues(shared, ctx, &cues, now_ms);
}
