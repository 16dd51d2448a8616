use morph_core::gesture::*;
use morph_core::state::{ControlState, Rotation};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

/// 21 landmarks at the frame center, with the wrist and the two pinch tips
/// placed explicitly.
fn hand(wrist: (f32, f32), thumb: (f32, f32), index: (f32, f32)) -> Vec<Landmark> {
    let mut lms = vec![Landmark::new(0.5, 0.5); HAND_LANDMARK_COUNT];
    lms[WRIST] = Landmark::new(wrist.0, wrist.1);
    lms[THUMB_TIP] = Landmark::new(thumb.0, thumb.1);
    lms[INDEX_TIP] = Landmark::new(index.0, index.1);
    lms
}

/// A centered hand whose pinch distance is exactly `distance` along x.
fn pinching(distance: f32) -> Vec<Landmark> {
    hand((0.5, 0.5), (0.4, 0.5), (0.4 + distance, 0.5))
}

// ---------------------------------------------------------------------------
// Pinch mapping
// ---------------------------------------------------------------------------

#[test]
fn test_pinch_threshold_boundary() {
    assert_eq!(pinch_target(0.12, 0.12), 0.0, "distance at threshold is not a pinch");
    assert_eq!(pinch_target(0.5, 0.12), 0.0);
    assert_eq!(pinch_target(0.119_99, 0.12), 1.0, "just below threshold is a pinch");
    assert_eq!(pinch_target(0.0, 0.12), 1.0);
}

#[test]
fn test_pinch_distance_is_euclidean() {
    let lms = hand((0.5, 0.5), (0.1, 0.1), (0.4, 0.5));
    assert!((pinch_distance(&lms) - 0.5).abs() < 1e-6, "3-4-5 triangle scaled by 0.1");
}

// ---------------------------------------------------------------------------
// Smoothing
// ---------------------------------------------------------------------------

#[test]
fn test_transition_converges_monotonically() {
    let controller = GestureController::default();
    let lms = pinching(0.05);
    let mut state = ControlState::default();

    for tick in 0..60 {
        let next = controller.on_frame(state, Some(&lms)).state;
        let expected = state.transition + 0.15 * (1.0 - state.transition);
        assert!(
            next.transition > state.transition,
            "tick {tick}: {} should exceed {}",
            next.transition,
            state.transition
        );
        assert!(next.transition <= 1.0, "tick {tick}: overshoot to {}", next.transition);
        assert!((next.transition - expected).abs() < 1e-6);
        state = next;
    }

    for _ in 0..200 {
        state = controller.on_frame(state, Some(&lms)).state;
    }
    assert!(state.transition > 0.9999 && state.transition <= 1.0);
}

#[test]
fn test_transition_stays_in_unit_range() {
    let controller = GestureController::default();
    let pinch = pinching(0.05);
    let open = pinching(0.3);
    let mut rng = StdRng::seed_from_u64(1234);
    let mut state = ControlState::default();

    for _ in 0..5000 {
        let lms = if rng.gen_bool(0.5) { &pinch } else { &open };
        state = controller.on_frame(state, Some(lms)).state;
        assert!(
            (0.0..=1.0).contains(&state.transition),
            "transition left [0,1]: {}",
            state.transition
        );
    }
}

#[test]
fn test_ten_pinch_frames_follow_geometric_law() {
    let controller = GestureController::default();
    let lms = pinching(0.05);
    let mut state = ControlState::default();

    for k in 1..=10 {
        state = controller.on_frame(state, Some(&lms)).state;
        let expected = 1.0 - 0.85_f32.powi(k);
        assert!(
            (state.transition - expected).abs() < 1e-5,
            "frame {k}: {} != {expected}",
            state.transition
        );
    }
    assert!((state.transition - 0.803).abs() < 1e-3, "after 10 frames: {}", state.transition);
}

#[test]
fn test_release_decays_toward_zero() {
    let controller = GestureController::default();
    let lms = pinching(0.4);
    let state = ControlState {
        transition: 1.0,
        ..Default::default()
    };
    let next = controller.on_frame(state, Some(&lms));
    assert!((next.state.transition - 0.85).abs() < 1e-6);
    assert_eq!(
        next.kind,
        FrameKind::Tracked {
            pinch_distance: pinch_distance(&lms),
            pinch_target: 0.0
        }
    );
}

// ---------------------------------------------------------------------------
// Rotation
// ---------------------------------------------------------------------------

#[test]
fn test_wrist_maps_to_yaw_and_pitch() {
    let controller = GestureController::default();
    let lms = hand((0.75, 0.5), (0.4, 0.5), (0.9, 0.5));
    let next = controller.on_frame(ControlState::default(), Some(&lms)).state;

    assert!((next.rotation.yaw - 1.5708).abs() < 1e-3, "yaw {}", next.rotation.yaw);
    assert_eq!(next.rotation.pitch, 0.0);
}

#[test]
fn test_rotation_is_not_smoothed() {
    let controller = GestureController::default();
    let start = ControlState {
        transition: 0.3,
        rotation: Rotation { yaw: 2.0, pitch: -2.0 },
    };
    let lms = hand((0.0, 1.0), (0.4, 0.5), (0.9, 0.5));
    let next = controller.on_frame(start, Some(&lms)).state;

    assert!((next.rotation.yaw + std::f32::consts::PI).abs() < 1e-5);
    assert!((next.rotation.pitch - std::f32::consts::PI).abs() < 1e-5);
}

// ---------------------------------------------------------------------------
// Missing and malformed frames
// ---------------------------------------------------------------------------

#[test]
fn test_no_hand_leaves_state_bit_identical() {
    let controller = GestureController::default();
    let state = ControlState {
        transition: 0.123_456_7,
        rotation: Rotation { yaw: -0.987_654_3, pitch: 1.000_001 },
    };
    let update = controller.on_frame(state, None);

    assert_eq!(update.kind, FrameKind::NoHand);
    assert!(!update.has_hand());
    assert_eq!(update.state.transition.to_bits(), state.transition.to_bits());
    assert_eq!(update.state.rotation.yaw.to_bits(), state.rotation.yaw.to_bits());
    assert_eq!(update.state.rotation.pitch.to_bits(), state.rotation.pitch.to_bits());
}

#[test]
fn test_short_landmark_set_is_skipped() {
    let controller = GestureController::default();
    let state = ControlState {
        transition: 0.4,
        ..Default::default()
    };
    let lms = vec![Landmark::new(0.5, 0.5); 9];
    let update = controller.on_frame(state, Some(&lms));

    assert!(matches!(update.kind, FrameKind::Skipped(_)), "got {:?}", update.kind);
    assert_eq!(update.state, state);
}

#[test]
fn test_non_finite_landmark_is_skipped() {
    let controller = GestureController::default();
    let mut lms = pinching(0.05);
    lms[THUMB_TIP].x = f32::NAN;
    let update = controller.on_frame(ControlState::default(), Some(&lms));

    assert!(matches!(update.kind, FrameKind::Skipped(_)));
    assert_eq!(update.state, ControlState::default());
}

#[test]
fn test_custom_threshold_and_smoothing() {
    let controller = GestureController {
        pinch_threshold: 0.2,
        smoothing: 0.5,
    };
    let update = controller.on_frame(ControlState::default(), Some(&pinching(0.15)));
    assert!((update.state.transition - 0.5).abs() < 1e-6);
}
