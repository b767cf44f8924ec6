//! Animation Playback Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation keyed in frames, key validation
//! - KeyframeCursor forward scan and binary search fallback
//! - AnimationClip length and bone channel sampling
//! - AnimationResult in-place reset and copy
//! - AnimatorState validated setters and scoping
//! - ActorAnimator request building
//! - LayerAction play modes and LayerMixer layering and cursor sampling

mod common;

use std::sync::Arc;

use glam::{Quat, Vec3};

use myth_animgraph::animation::{
    ActionTarget, ActorAnimator, AnimationClip, AnimationResult, Animator, AnimatorState, BlendMode,
    InterpolationMode, KeyframeCursor, KeyframeTrack, LayerAction, LayerMixer, PlayMode, PlayRequest, Track,
};
use myth_animgraph::errors::AnimGraphError;

use common::{ROOT, RecordingTarget, approx, approx_vec3, moving_clip, still_clip};

fn request(clip: &Arc<AnimationClip>, layer: u32, priority: u32, weight: f32) -> PlayRequest {
    PlayRequest {
        clip: Arc::clone(clip),
        start_frame: 0.0,
        end_frame: clip.duration_in_frames(),
        layer,
        priority,
        blend_in: 0.0,
        play_mode: PlayMode::Play,
        layer_weight: weight,
        speed: 1.0,
        blend_mode: BlendMode::Blend,
    }
}

fn constant_clip(name: &str, value: Vec3) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::with_length(
        name,
        10.0,
        vec![Track::translation(ROOT, KeyframeTrack::constant(value))],
    ))
}

// ============================================================================
// KeyframeTrack
// ============================================================================

#[test]
fn track_linear_midpoint() {
    let track = KeyframeTrack::new(vec![0.0, 10.0], vec![0.0_f32, 10.0], InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    let value = track.sample_with_cursor(5.0, &mut cursor).unwrap();
    assert!(approx(value, 5.0), "Expected 5.0, got {value}");
}

#[test]
fn track_linear_clamps_outside_range() {
    let track = KeyframeTrack::new(vec![10.0, 20.0], vec![1.0_f32, 2.0], InterpolationMode::Linear).unwrap();

    assert!(approx(track.sample(0.0).unwrap(), 1.0));
    assert!(approx(track.sample(50.0).unwrap(), 2.0));
}

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![0.0_f32, 100.0, 200.0],
        InterpolationMode::Step,
    )
    .unwrap();

    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.5, &mut cursor).unwrap(), 0.0));
    assert!(approx(track.sample_with_cursor(0.99, &mut cursor).unwrap(), 0.0));
    assert!(approx(track.sample_with_cursor(1.0, &mut cursor).unwrap(), 100.0));
    assert!(approx(track.sample_with_cursor(1.5, &mut cursor).unwrap(), 100.0));
}

#[test]
fn track_cubic_with_flat_tangents() {
    // [in_tangent, value, out_tangent] per key
    let track = KeyframeTrack::new(
        vec![0.0, 2.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    )
    .unwrap();

    assert!(approx(track.sample(0.0).unwrap(), 0.0));
    assert!(approx(track.sample(1.0).unwrap(), 5.0));
    assert!(approx(track.sample(2.0).unwrap(), 10.0));
}

#[test]
fn track_empty_samples_nothing() {
    let track: KeyframeTrack<Vec3> = KeyframeTrack::new(Vec::new(), Vec::new(), InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    assert!(track.sample(1.0).is_none());
    assert!(track.sample_with_cursor(1.0, &mut cursor).is_none());
}

#[test]
fn track_rejects_mismatched_values() {
    let short = KeyframeTrack::new(vec![0.0, 10.0], vec![1.0_f32], InterpolationMode::Linear);
    assert!(matches!(short, Err(AnimGraphError::InvalidTrack(_))));

    // Cubic keys carry a tangent on each side
    let cubic = KeyframeTrack::new(vec![0.0, 10.0], vec![0.0_f32, 1.0], InterpolationMode::CubicSpline);
    assert!(matches!(cubic, Err(AnimGraphError::InvalidTrack(_))));

    let unsorted = KeyframeTrack::new(vec![10.0, 0.0], vec![0.0_f32, 1.0], InterpolationMode::Linear);
    assert!(matches!(unsorted, Err(AnimGraphError::InvalidTrack(_))));
}

#[test]
fn cursor_tracks_sequential_playback() {
    let frames: Vec<f32> = (0..20).map(|i| i as f32).collect();
    let values: Vec<f32> = (0..20).map(|i| i as f32 * 2.0).collect();
    let track = KeyframeTrack::new(frames, values, InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    for step in 0..38 {
        let frame = step as f32 * 0.5;
        let value = track.sample_with_cursor(frame, &mut cursor).unwrap();
        assert!(approx(value, frame * 2.0), "frame {frame}: got {value}");
    }
    assert_eq!(cursor.last_index, 18);
}

#[test]
fn cursor_falls_back_on_jump() {
    let frames: Vec<f32> = (0..100).map(|i| i as f32).collect();
    let values: Vec<f32> = (0..100).map(|i| i as f32).collect();
    let track = KeyframeTrack::new(frames, values, InterpolationMode::Linear).unwrap();

    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(80.5, &mut cursor).unwrap(), 80.5));
    assert_eq!(cursor.last_index, 80);

    // Backwards (loop reset)
    assert!(approx(track.sample_with_cursor(3.25, &mut cursor).unwrap(), 3.25));
    assert_eq!(cursor.last_index, 3);
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_length_is_last_key() {
    let position = KeyframeTrack::new(vec![0.0, 30.0], vec![Vec3::ZERO, Vec3::X], InterpolationMode::Linear).unwrap();
    let rotation = KeyframeTrack::new(
        vec![0.0, 45.0],
        vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
        InterpolationMode::Linear,
    )
    .unwrap();
    let clip = AnimationClip::new(
        "Walk",
        vec![Track::translation(ROOT, position), Track::rotation("Spine", rotation)],
    );

    assert!(approx(clip.duration_in_frames(), 45.0));
}

#[test]
fn clip_samples_bone_channels() {
    let clip = moving_clip("Walk", 60.0, Vec3::new(0.0, 0.5, 0.0));

    assert!(approx_vec3(clip.sample_translation(ROOT, 10.0).unwrap(), Vec3::new(0.0, 5.0, 0.0)));
    assert!(clip.sample_translation("Spine", 10.0).is_none());
    assert!(clip.sample_rotation(ROOT, 10.0).is_none());
}

#[test]
fn clip_explicit_length_is_never_negative() {
    let clip = AnimationClip::with_length("Broken", -5.0, Vec::new());
    assert!(approx(clip.duration_in_frames(), 0.0));
}

// ============================================================================
// AnimationResult
// ============================================================================

#[test]
fn result_reset_always_yields_zero() {
    for value in [Vec3::ZERO, Vec3::ONE, Vec3::new(-3.0, 1e6, 0.25)] {
        let mut result = AnimationResult::new();
        result.set_offset(value).unwrap();
        result.reset();
        assert_eq!(result.offset(), Vec3::ZERO);
    }
}

#[test]
fn result_copy_overwrites_target() {
    let mut source = AnimationResult::new();
    source.set_offset(Vec3::new(1.0, 2.0, 3.0)).unwrap();

    let mut target = AnimationResult::new();
    target.set_offset(Vec3::splat(9.0)).unwrap();

    let copied = source.copy_to(&mut target);
    assert_eq!(copied.offset(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(target, source);
}

#[test]
fn result_rejects_non_finite_offset() {
    let mut result = AnimationResult::new();
    result.set_offset(Vec3::ONE).unwrap();

    let err = result.set_offset(Vec3::new(f32::NAN, 0.0, 0.0)).unwrap_err();
    assert!(matches!(err, AnimGraphError::InvalidParameter { name: "offset", .. }));
    assert_eq!(result.offset(), Vec3::ONE);
}

// ============================================================================
// AnimatorState
// ============================================================================

#[test]
fn state_rejects_out_of_range_values() {
    let mut state = AnimatorState::default();

    assert!(state.set_weight(1.5).is_err());
    assert!(state.set_weight(-0.1).is_err());
    assert!(state.set_blend(2.0).is_err());
    assert!(state.set_time_delta(-1.0).is_err());
    assert!(state.set_time_delta(f32::INFINITY).is_err());

    // Nothing was clamped
    assert!(approx(state.weight(), 1.0));
    assert!(approx(state.blend(), 0.0));
    assert!(approx(state.time_delta(), 0.0));
}

#[test]
fn state_accepts_domain_bounds() {
    let mut state = AnimatorState::default();

    state.set_weight(0.0).unwrap();
    state.set_blend(1.0).unwrap();
    state.set_time_delta(0.0).unwrap();
    state.set_speed(-2.0);

    assert!(approx(state.weight(), 0.0));
    assert!(approx(state.blend(), 1.0));
    assert!(approx(state.speed(), -2.0));
}

#[test]
fn state_scope_restores_overrides() {
    let mut state = AnimatorState::new(Some(ROOT.to_string()));
    state.set_layer(4);
    state.set_weight(0.8).unwrap();

    let scope = state.scope();
    state.set_layer(1);
    state.set_weight(0.2).unwrap();
    state.set_play_mode(PlayMode::Loop);
    state.set_blend_mode(BlendMode::Add);
    state.restore(scope);

    assert_eq!(state.layer(), 4);
    assert!(approx(state.weight(), 0.8));
    assert_eq!(state.play_mode(), PlayMode::Play);
    assert_eq!(state.blend_mode(), BlendMode::Blend);
    assert_eq!(state.root_bone(), Some(ROOT));
}

// ============================================================================
// ActorAnimator
// ============================================================================

#[test]
fn animator_rejects_invalid_fps() {
    assert!(ActorAnimator::new(RecordingTarget::new(), 0.0, None).is_err());
    assert!(ActorAnimator::new(RecordingTarget::new(), f32::NAN, None).is_err());
}

#[test]
fn animator_play_uses_current_state() {
    let clip = still_clip("Idle", 48.0);
    let mut animator = ActorAnimator::new(RecordingTarget::new(), 24.0, None).unwrap();
    {
        let state = animator.state_mut();
        state.set_layer(3);
        state.set_weight(0.4).unwrap();
        state.set_priority(2);
        state.set_blend_mode(BlendMode::Add);
    }

    animator.play(&clip, None, None);

    let request = &animator.target().requests[0];
    assert_eq!(request.layer, 3);
    assert_eq!(request.priority, 2);
    assert_eq!(request.blend_mode, BlendMode::Add);
    assert!(approx(request.layer_weight, 0.4));
    assert!(approx(request.start_frame, 0.0));
    assert!(approx(request.end_frame, 48.0));

    assert!(animator.playing());
    assert_eq!(animator.action().map(|c| c.name.clone()), Some("Idle".to_string()));

    animator.stop();
    assert!(!animator.playing());
    assert_eq!(animator.target().stopped, vec![3]);
}

// ============================================================================
// LayerAction
// ============================================================================

#[test]
fn action_play_stops_at_end() {
    let clip = still_clip("Jump", 10.0);
    let mut action = LayerAction::new(request(&clip, 0, 0, 1.0));

    action.update(12.0);
    assert!(approx(action.frame, 10.0));
    assert!(!action.playing);
}

#[test]
fn action_loop_wraps_in_range() {
    let clip = still_clip("Run", 10.0);
    let mut action = LayerAction::new(PlayRequest {
        play_mode: PlayMode::Loop,
        ..request(&clip, 0, 0, 1.0)
    });

    action.update(12.0);
    assert!(approx(action.frame, 2.0));
    assert!(action.playing);
}

#[test]
fn action_ping_pong_reflects() {
    let clip = still_clip("Sway", 10.0);
    let mut action = LayerAction::new(PlayRequest {
        play_mode: PlayMode::PingPong,
        ..request(&clip, 0, 0, 1.0)
    });

    action.update(12.0);
    assert!(approx(action.frame, 8.0));
    action.update(10.0);
    assert!(approx(action.frame, 2.0));
}

#[test]
fn action_blend_in_ramps_weight() {
    let clip = still_clip("Wave", 10.0);
    let mut action = LayerAction::new(PlayRequest {
        blend_in: 4.0,
        ..request(&clip, 0, 0, 1.0)
    });

    assert!(approx(action.effective_weight(), 0.0));
    action.update(2.0);
    assert!(approx(action.effective_weight(), 0.5));
    action.update(4.0);
    assert!(approx(action.effective_weight(), 1.0));
}

#[test]
fn action_set_frame_clamps_to_range() {
    let clip = still_clip("Walk", 10.0);
    let mut action = LayerAction::new(request(&clip, 0, 0, 1.0));

    action.set_frame(25.0);
    assert!(approx(action.frame, 10.0));
    action.set_frame(-1.0);
    assert!(approx(action.frame, 0.0));
}

// ============================================================================
// LayerMixer
// ============================================================================

#[test]
fn mixer_blends_layers_bottom_up() {
    let base = constant_clip("Base", Vec3::X);
    let over = constant_clip("Over", Vec3::Y);

    let mut mixer = LayerMixer::new(24.0);
    mixer.play_action(request(&base, 0, 0, 1.0));
    mixer.play_action(request(&over, 1, 0, 0.25));

    let blended = mixer.sample_translation(ROOT).unwrap();
    assert!(approx_vec3(blended, Vec3::new(0.75, 0.25, 0.0)), "got {blended}");
}

#[test]
fn mixer_samples_follow_looping_playback() {
    let frames: Vec<f32> = (0..=20).map(|i| i as f32).collect();
    let values: Vec<Vec3> = frames.iter().map(|&f| Vec3::new(f, f * f, 0.0)).collect();
    let track = KeyframeTrack::new(frames, values, InterpolationMode::Linear).unwrap();
    let clip = Arc::new(AnimationClip::new("Walk", vec![Track::translation(ROOT, track)]));

    let mut mixer = LayerMixer::new(24.0);
    mixer.play_action(PlayRequest {
        play_mode: PlayMode::Loop,
        ..request(&clip, 0, 0, 1.0)
    });

    // Sequential steps and the wrap back to frame 0 both go through the
    // layer's cursors
    for _ in 0..40 {
        mixer.update(1.5 / 24.0);
        let frame = mixer.layer(0).unwrap().frame;
        let sampled = mixer.sample_translation(ROOT).unwrap();
        let expected = clip.sample_translation(ROOT, frame).unwrap();
        assert!(approx_vec3(sampled, expected), "frame {frame}: {sampled} vs {expected}");
    }
}

#[test]
fn mixer_adds_additive_layers() {
    let base = constant_clip("Base", Vec3::X);
    let over = constant_clip("Over", Vec3::Y);

    let mut mixer = LayerMixer::new(24.0);
    mixer.play_action(request(&base, 0, 0, 1.0));
    mixer.play_action(PlayRequest {
        blend_mode: BlendMode::Add,
        ..request(&over, 1, 0, 0.25)
    });

    let blended = mixer.sample_translation(ROOT).unwrap();
    assert!(approx_vec3(blended, Vec3::new(1.0, 0.25, 0.0)), "got {blended}");
}

#[test]
fn mixer_keeps_higher_priority_action() {
    let first = still_clip("Attack", 10.0);
    let second = still_clip("Idle", 10.0);

    let mut mixer = LayerMixer::new(24.0);
    mixer.play_action(request(&first, 0, 0, 1.0));
    mixer.play_action(request(&second, 0, 1, 1.0));
    assert_eq!(mixer.action(0).unwrap().name, "Attack");

    // Same priority replaces
    mixer.play_action(request(&second, 0, 0, 1.0));
    assert_eq!(mixer.action(0).unwrap().name, "Idle");
}

#[test]
fn mixer_update_advances_in_frames() {
    let clip = still_clip("Walk", 48.0);

    let mut mixer = LayerMixer::new(24.0);
    mixer.play_action(request(&clip, 2, 0, 1.0));
    mixer.update(0.5);

    assert!(approx(mixer.action_frame(2), 12.0));
    assert!(mixer.is_playing_action(2));

    mixer.stop_action(2);
    assert!(!mixer.is_playing_action(2));
    assert_eq!(mixer.layers().count(), 0);
}
