pub mod test_utils;
use assert_float_eq::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use travelmap_core::config::ZoomConfig;
use travelmap_core::coordinates::Coordinate;
use travelmap_core::input::{Modifiers, PointerButton};
use travelmap_core::viewport::Viewport;

#[test]
fn scale_stays_in_bounds_under_repeated_zoom() {
    let config = ZoomConfig::default();
    let mut viewport = Viewport::new(config);
    for _ in 0..200 {
        viewport.zoom_in();
        assert!(viewport.scale() <= config.max_scale);
    }
    assert_eq!(viewport.scale(), config.max_scale);
    assert!(!viewport.zoom_in());

    for _ in 0..200 {
        viewport.wheel(120.0);
        assert!(viewport.scale() >= config.min_scale);
    }
    assert_eq!(viewport.scale(), config.min_scale);
    assert!(!viewport.zoom_out());
}

#[test]
fn random_zoom_sequence_stays_in_bounds() {
    let config = ZoomConfig::default();
    let mut viewport = Viewport::new(config);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..1000 {
        let factor = rng.random_range(0.01..20.0);
        viewport.zoom(factor);
        assert!(viewport.scale() >= config.min_scale);
        assert!(viewport.scale() <= config.max_scale);
    }
}

#[test]
fn invalid_factors_are_ignored() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(!viewport.zoom(factor));
        assert_eq!(viewport.scale(), 1.0);
    }
}

#[test]
fn position_is_compensated_by_applied_factor() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    assert!(viewport.begin_drag(0.0, 0.0, PointerButton::Middle, Modifiers::none()));
    viewport.drag_to(40.0, -20.0);
    viewport.end_drag();

    assert!(viewport.zoom_in());
    assert_float_absolute_eq!(viewport.position().x, 48.0, 1e-9);
    assert_float_absolute_eq!(viewport.position().y, -24.0, 1e-9);

    // clamped step: only 15 / 14.4 of the requested factor is applied
    let mut viewport = Viewport::new(ZoomConfig::default());
    viewport.zoom(14.4);
    viewport.begin_drag(0.0, 0.0, PointerButton::Middle, Modifiers::none());
    viewport.drag_to(10.0, 10.0);
    viewport.end_drag();
    viewport.zoom(2.0);
    assert_eq!(viewport.scale(), 15.0);
    assert_float_absolute_eq!(viewport.position().x, 10.0 * 15.0 / 14.4, 1e-9);
}

#[test]
fn only_pan_gestures_start_a_drag() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    assert!(!viewport.begin_drag(5.0, 5.0, PointerButton::Primary, Modifiers::none()));
    assert!(!viewport.begin_drag(5.0, 5.0, PointerButton::Secondary, Modifiers::ctrl()));
    assert!(!viewport.drag_to(50.0, 50.0));
    assert_eq!(viewport.position(), Coordinate::default());

    let meta = Modifiers {
        ctrl: false,
        meta: true,
    };
    assert!(viewport.begin_drag(5.0, 5.0, PointerButton::Primary, meta));
    assert!(viewport.drag_to(15.0, 25.0));
    assert_eq!(viewport.position(), Coordinate::new(10.0, 20.0));
    assert!(viewport.end_drag());
    assert!(!viewport.is_dragging());
    assert!(!viewport.drag_to(100.0, 100.0));
}

#[test]
fn drag_keeps_grab_offset() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    viewport.begin_drag(0.0, 0.0, PointerButton::Primary, Modifiers::ctrl());
    viewport.drag_to(30.0, 30.0);
    viewport.end_drag();

    viewport.begin_drag(100.0, 100.0, PointerButton::Primary, Modifiers::ctrl());
    viewport.drag_to(110.0, 90.0);
    assert_eq!(viewport.position(), Coordinate::new(40.0, 20.0));
}

#[test]
fn wheel_is_suppressed_over_menu() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    viewport.set_menu_hover(true);
    assert!(!viewport.wheel(-120.0));
    assert_eq!(viewport.scale(), 1.0);

    viewport.set_menu_hover(false);
    assert!(viewport.wheel(-120.0));
    assert_float_absolute_eq!(viewport.scale(), 1.1, 1e-12);
}

#[test]
fn reset_zoom_restores_identity() {
    let mut viewport = Viewport::new(ZoomConfig::default());
    assert!(!viewport.reset_zoom());
    viewport.zoom_out();
    viewport.begin_drag(0.0, 0.0, PointerButton::Middle, Modifiers::none());
    viewport.drag_to(3.0, 4.0);
    viewport.end_drag();

    assert!(viewport.reset_zoom());
    assert_eq!(viewport.scale(), 1.0);
    assert_eq!(viewport.position(), Coordinate::default());
}
