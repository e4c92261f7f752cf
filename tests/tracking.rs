use overlay_wasm::tracking::{pointer_ratio, Border, TrackingState};

#[test]
fn starts_tracking() {
    let state = TrackingState::default();
    assert_eq!(state, TrackingState::Tracking);
    assert!(state.accepts_pointer());
}

#[test]
fn click_freezes_and_changes_border() {
    let frozen = TrackingState::default().toggled();
    assert_eq!(frozen, TrackingState::Frozen);
    assert!(!frozen.accepts_pointer());
    assert_eq!(frozen.border(), Border { style: "solid", color: "blue" });
    assert_ne!(frozen.border(), TrackingState::Tracking.border());
}

#[test]
fn double_toggle_restores_state_and_border() {
    let start = TrackingState::default();
    let back = start.toggled().toggled();
    assert_eq!(back, start);
    assert_eq!(back.border(), start.border());
    assert_eq!(back.border(), Border { style: "double", color: "grey" });
    assert!(back.accepts_pointer());
}

#[test]
fn pointer_ratio_is_relative_to_canvas_left() {
    assert_eq!(pointer_ratio(100.0, 100.0, 400), 0.0);
    assert_eq!(pointer_ratio(300.0, 100.0, 400), 0.5);
    assert_eq!(pointer_ratio(500.0, 100.0, 400), 1.0);
}

#[test]
fn pointer_ratio_may_overshoot_at_edges() {
    assert!(pointer_ratio(501.0, 100.0, 400) > 1.0);
    assert!(pointer_ratio(99.0, 100.0, 400) < 0.0);
}

#[test]
fn zero_width_canvas_gives_midpoint() {
    assert_eq!(pointer_ratio(10.0, 0.0, 0), 0.5);
}
