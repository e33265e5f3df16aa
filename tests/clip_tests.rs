// Host-side tests for keyframe sampling and single-shot playback.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod clip {
    include!("../src/core/clip.rs");
}

use clip::*;
use glam::{Quat, Vec3};

fn bob_clip() -> AnimationClip {
    AnimationClip::new(
        "bob",
        vec![
            Track {
                node: 0,
                times: vec![0.0, 1.0, 2.0],
                channel: Channel::Translation(vec![
                    Vec3::ZERO,
                    Vec3::new(0.0, 2.0, 0.0),
                    Vec3::new(0.0, 0.0, 4.0),
                ]),
            },
            Track {
                node: 1,
                times: vec![0.0, 3.0],
                channel: Channel::Rotation(vec![
                    Quat::IDENTITY,
                    Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
                ]),
            },
        ],
    )
}

#[test]
fn clip_duration_is_latest_key() {
    assert_eq!(bob_clip().duration, 3.0);
    assert_eq!(AnimationClip::new("empty", Vec::new()).duration, 0.0);
}

#[test]
fn sampling_interpolates_between_keys_and_clamps_outside() {
    let clip = bob_clip();
    let mut poses = vec![NodeTransform::default(); 2];
    clip.sample_into(0.5, &mut poses);
    assert!((poses[0].translation - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);

    clip.sample_into(1.5, &mut poses);
    assert!((poses[0].translation - Vec3::new(0.0, 1.0, 2.0)).length() < 1e-5);

    clip.sample_into(-1.0, &mut poses);
    assert_eq!(poses[0].translation, Vec3::ZERO);

    clip.sample_into(10.0, &mut poses);
    assert_eq!(poses[0].translation, Vec3::new(0.0, 0.0, 4.0));
    let expected = Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    assert!(poses[1].rotation.angle_between(expected) < 1e-4);
}

#[test]
fn rotation_samples_stay_normalised() {
    let clip = bob_clip();
    let mut poses = vec![NodeTransform::default(); 2];
    for i in 0..=30 {
        clip.sample_into(i as f32 * 0.1, &mut poses);
        assert!((poses[1].rotation.length() - 1.0).abs() < 1e-5);
    }
}

#[test]
fn tracks_for_missing_nodes_are_skipped() {
    let clip = bob_clip();
    let mut poses = vec![NodeTransform::default(); 1];
    clip.sample_into(1.0, &mut poses);
    assert_eq!(poses[0].translation, Vec3::new(0.0, 2.0, 0.0));
}

#[test]
fn playback_reports_finish_exactly_once() {
    let mut playback = ClipPlayback::new(3.0);
    assert_eq!(playback.state(), PlaybackState::Stopped);
    assert!(!playback.update(1.0));
    assert_eq!(playback.pose_time(), None);

    playback.play_once(0.5, true);
    let mut finishes = 0;
    let mut frames = 0;
    for _ in 0..1000 {
        if playback.update(1.0 / 60.0) {
            finishes += 1;
        }
        if playback.is_running() {
            frames += 1;
        }
    }
    assert_eq!(finishes, 1);
    // 3 s of clip at half speed is about 6 s of frames
    assert!((358..=361).contains(&frames));
    assert_eq!(playback.state(), PlaybackState::Finished);
    assert_eq!(playback.time(), 3.0);
}

#[test]
fn clamped_playback_holds_last_frame() {
    let mut playback = ClipPlayback::new(1.0);
    playback.play_once(1.0, true);
    assert_eq!(playback.pose_time(), Some(0.0));
    playback.update(0.25);
    assert_eq!(playback.pose_time(), Some(0.25));
    playback.update(5.0);
    assert_eq!(playback.pose_time(), Some(1.0));

    let mut unclamped = ClipPlayback::new(1.0);
    unclamped.play_once(1.0, false);
    unclamped.update(2.0);
    assert_eq!(unclamped.pose_time(), None);
}

#[test]
fn replay_rewinds() {
    let mut playback = ClipPlayback::new(1.0);
    playback.play_once(1.0, true);
    assert!(playback.update(2.0));
    playback.play_once(0.5, true);
    assert_eq!(playback.time(), 0.0);
    assert!(playback.is_running());
    assert!(!playback.update(1.0));
    assert!(playback.update(1.0));
}

#[test]
fn zero_length_clip_finishes_on_first_update() {
    let mut playback = ClipPlayback::new(0.0);
    playback.play_once(0.5, true);
    assert!(playback.update(0.0));
}
