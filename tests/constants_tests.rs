// Host-side tests for constants and their relationships.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod core_constants {
    include!("../src/core/constants.rs");
}

use constants::*;
use core_constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn effect_timings_are_positive() {
    assert!(ENTRY_SHAKE_SEC > 0.0);
    assert!(TERMINAL_SHAKE_SEC > 0.0);
    assert!(ENTRY_BLUR_MS > 0.0);
    assert!(TERMINAL_BLUR_MS > 0.0);
    assert!(REDIRECT_DELAY_MS > 0.0);
    assert!(PORTAL_TIME_SCALE > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn terminal_effects_are_stronger_than_entry() {
    assert!(TERMINAL_BLUR_TO_PX > ENTRY_BLUR_TO_PX);
    assert!(TERMINAL_SHAKE_DESKTOP > ENTRY_SHAKE_DESKTOP);
    assert!(TERMINAL_SHAKE_MOBILE > ENTRY_SHAKE_MOBILE);
    assert!(ENTRY_SHAKE_MOBILE < ENTRY_SHAKE_DESKTOP);
    assert!(TERMINAL_SHAKE_MOBILE < TERMINAL_SHAKE_DESKTOP);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn bloom_tuning_is_in_range() {
    assert!(BLOOM_STRENGTH_MOBILE < BLOOM_STRENGTH_DESKTOP);
    assert!(BLOOM_THRESHOLD > 0.0 && BLOOM_THRESHOLD < 1.0);
    assert!(BLOOM_RADIUS >= 0.0 && BLOOM_RADIUS <= 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn orbit_limits_are_ordered_and_contain_rest_positions() {
    assert!(ORBIT_MIN_POLAR < ORBIT_MAX_POLAR);
    assert!(ORBIT_MAX_POLAR < std::f32::consts::FRAC_PI_2);
    assert!(ORBIT_DAMPING > 0.0 && ORBIT_DAMPING < 1.0);
    for rest in [RIG_REST_DESKTOP, RIG_REST_MOBILE] {
        let offset = glam::Vec3::from_array(rest) - glam::Vec3::from_array(ORBIT_TARGET);
        let polar = (offset.y / offset.length()).acos();
        assert!(polar >= ORBIT_MIN_POLAR && polar <= ORBIT_MAX_POLAR);
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn modal_close_on_enter_is_quicker_than_cancel() {
    assert!(MODAL_CLOSE_ON_ENTER_MS < MODAL_CLOSE_MS);
    assert!(LOADER_FADE_MS > 0 && WELCOME_FADE_MS > 0);
}

#[test]
fn dom_ids_are_distinct() {
    let ids = [
        CANVAS_ID,
        BLUR_LAYER_ID,
        FLASH_ID,
        OVERLAY_ID,
        POPUP_ID,
        POPUP_STATUS_ID,
        LOADER_ID,
        LOADER_BAR_ID,
        LOADER_TEXT_ID,
        WELCOME_MODAL_ID,
        PORTAL_ENTER_BUTTON_ID,
        PORTAL_CANCEL_BUTTON_ID,
        WELCOME_CLOSE_BUTTON_ID,
    ];
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn destination_and_urls_are_absolute_paths() {
    assert_eq!(PORTAL_DESTINATION, "/portal");
    assert!(MODEL_URL.starts_with('/'));
    assert!(AUDIO_URL.starts_with('/'));
}
