// Host-side tests for asset load state and the loader readout.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod assets {
    include!("../src/core/assets.rs");
}

use assets::*;

#[test]
fn percent_floors_and_clamps() {
    assert_eq!(loader_percent(0.0, 200.0), Some(0));
    assert_eq!(loader_percent(199.0, 200.0), Some(99));
    assert_eq!(loader_percent(200.0, 200.0), Some(100));
    assert_eq!(loader_percent(300.0, 200.0), Some(100));
    assert_eq!(loader_percent(1.0, 3.0), Some(33));
}

#[test]
fn unknown_total_gives_no_percent() {
    assert_eq!(loader_percent(10.0, 0.0), None);
    assert_eq!(loader_percent(10.0, -1.0), None);
    assert_eq!(loader_percent(10.0, f64::NAN), None);
}

#[test]
fn label_matches_loader_text() {
    assert_eq!(loader_label(0), "Loading 0%");
    assert_eq!(loader_label(42), "Loading 42%");
}

#[test]
fn board_starts_pending_and_reports_failures() {
    let mut board = AssetBoard::default();
    assert_eq!(board.model, AssetStatus::Pending);
    assert_eq!(board.audio, AssetStatus::Pending);
    assert!(board.audio.error().is_none());

    board.model = AssetStatus::Loading {
        progress: Some(0.5),
    };
    assert!(!board.model.is_ready());
    board.model = AssetStatus::Ready;
    assert!(board.model.is_ready());
    assert!(board.model.error().is_none());

    board.audio = AssetStatus::Failed(AssetError::HttpStatus {
        url: "/assets/portal.mp3".into(),
        status: 404,
    });
    assert!(!board.audio.is_ready());
    assert_eq!(
        board.audio.error().map(|e| e.to_string()),
        Some("/assets/portal.mp3 answered HTTP 404".to_string())
    );
}
