// Host-side tests for viewport-dependent layout.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod portal {
    pub mod constants {
        include!("../src/core/constants.rs");
    }
    pub mod effects {
        include!("../src/core/effects.rs");
    }
    pub mod viewport {
        include!("../src/core/viewport.rs");
    }
}

use glam::Vec3;
use portal::constants::*;
use portal::viewport::*;

#[test]
fn breakpoint_selects_mobile_below_768() {
    assert!(ViewportProfile::for_size(767.0, 1000.0, 1.0).mobile);
    assert!(!ViewportProfile::for_size(768.0, 1000.0, 1.0).mobile);
    assert!(!ViewportProfile::for_size(1920.0, 1080.0, 1.0).mobile);
}

#[test]
fn pixel_ratio_is_capped_per_class() {
    assert_eq!(ViewportProfile::for_size(1920.0, 1080.0, 3.0).pixel_ratio, 1.5);
    assert_eq!(ViewportProfile::for_size(1920.0, 1080.0, 1.0).pixel_ratio, 1.0);
    assert_eq!(ViewportProfile::for_size(390.0, 844.0, 3.0).pixel_ratio, 1.2);
}

#[test]
fn backing_size_scales_css_size() {
    let p = ViewportProfile::for_size(1000.0, 500.0, 2.0);
    assert_eq!(p.backing_size(), (1500, 750));
    assert!((p.aspect() - 2.0).abs() < 1e-6);
    let degenerate = ViewportProfile::for_size(0.0, 0.0, 1.0);
    assert_eq!(degenerate.backing_size(), (1, 1));
    assert!(degenerate.aspect().is_finite());
}

#[test]
fn layout_values_follow_class() {
    let desktop = ViewportProfile::for_size(1440.0, 900.0, 1.0);
    let mobile = ViewportProfile::for_size(390.0, 844.0, 1.0);
    assert_eq!(desktop.rig_rest(), Vec3::from_array(RIG_REST_DESKTOP));
    assert_eq!(mobile.rig_rest(), Vec3::from_array(RIG_REST_MOBILE));
    assert_eq!(desktop.shake_tuning().entry, 0.12);
    assert_eq!(desktop.shake_tuning().terminal, 0.18);
    assert_eq!(mobile.shake_tuning().entry, 0.05);
    assert_eq!(mobile.shake_tuning().terminal, 0.08);
    assert_eq!(desktop.orbit_target(), mobile.orbit_target());
}

#[test]
fn bloom_is_weaker_on_mobile() {
    let desktop = ViewportProfile::for_size(1280.0, 800.0, 1.0).bloom();
    let mobile = ViewportProfile::for_size(390.0, 844.0, 1.0).bloom();
    assert_eq!(desktop.strength, 1.1);
    assert_eq!(mobile.strength, 0.6);
    assert!(mobile.strength < desktop.strength);
    for b in [desktop, mobile] {
        assert_eq!(b.radius, 0.4);
        assert_eq!(b.threshold, 0.85);
    }
}
