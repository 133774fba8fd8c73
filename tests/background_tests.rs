//! Background lifecycle tests
//!
//! Drive the element through its attribute boundary and check the surface,
//! the controller and the frame scheduler agree.

mod common;

use common::BackdropHarness;
use wos_host::{BackgroundError, BackgroundType};
use wos_renderer::{AnimationOptions, SurfaceCall, SurfaceFill};
use wos_theme::Color;

// === Scenarios ===

#[test]
fn test_animation_name_turns_on_animation() {
    let mut h = BackdropHarness::new(640, 480);
    assert_eq!(h.element.background_type(), BackgroundType::Color);
    assert_eq!(h.element.background_color(), "transparent");

    h.element.set_background_animation("matrix").unwrap();

    assert_eq!(h.element.background_type(), BackgroundType::Animated);
    h.assert_running("matrix");
    assert_eq!(h.element.attribute("background-type"), Some("animated"));
}

#[test]
fn test_color_replaces_running_animation() {
    let mut h = BackdropHarness::new(640, 480);
    h.element.set_background_animation("matrix").unwrap();
    h.frames(3);
    h.clear_calls();

    h.element.set_background_color("#ff0000").unwrap();

    h.assert_idle();
    assert_eq!(h.element.background_type(), BackgroundType::Color);
    assert_eq!(
        h.calls(),
        vec![
            SurfaceCall::AnimationStopped("matrix"),
            SurfaceCall::Cleared,
            SurfaceCall::Painted(SurfaceFill::Solid(Color::rgb(1.0, 0.0, 0.0))),
        ]
    );

    // A late redraw callback reaches nobody
    h.frames(2);
    assert_eq!(h.delivered_frames(), 3);
}

#[test]
fn test_unregistered_animation_rejected() {
    let mut h = BackdropHarness::new(640, 480);
    let err = h.element.set_background_animation("sparkle").unwrap_err();

    assert_eq!(err, BackgroundError::UnknownAnimation("sparkle".into()));
    h.assert_idle();
    assert!(h.calls().is_empty());
    assert_eq!(h.element.background_type(), BackgroundType::Color);
    assert_eq!(h.element.attribute("background-animation"), None);
}

#[test]
fn test_resize_burst_restarts_once() {
    let mut h = BackdropHarness::new(640, 480);
    h.element.set_background_animation("mesh").unwrap();
    assert_eq!(h.element.background_animation_debounce(), 100);
    let starts = h.starts();

    h.resize_at(0, 300, 200);
    h.resize_at(30, 350, 250);
    h.resize_at(60, 400, 300);

    for t in (0..160).step_by(10) {
        assert!(!h.poll_at(t), "fired early at {}ms", t);
    }
    assert!(h.poll_at(160));
    assert!(!h.poll_at(1000));

    assert_eq!(h.starts(), starts + 1);
    assert_eq!(h.surface().borrow().size(), (400, 300));
    assert_eq!(
        h.calls()
            .iter()
            .filter(|c| matches!(c, SurfaceCall::Resized { .. }))
            .count(),
        1
    );
    h.assert_running("mesh");
}

#[test]
fn test_malformed_options_keep_previous() {
    let mut h = BackdropHarness::new(640, 480);
    h.element
        .set_attribute("background-animation-options", r#"{"count": 7}"#)
        .unwrap();
    h.element.set_background_animation("orbs").unwrap();

    let err = h
        .element
        .set_attribute("background-animation-options", "{bad json")
        .unwrap_err();

    assert!(matches!(err, BackgroundError::OptionsParse(_)));
    assert_eq!(h.element.background_animation_options().get_usize("count"), Some(7));
    assert_eq!(h.element.attribute("background-animation-options"), Some(r#"{"count": 7}"#));
    h.assert_running("orbs");
}

// === Properties ===

#[test]
fn test_swaps_never_overlap() {
    let mut h = BackdropHarness::new(320, 240);
    for name in ["matrix", "mesh", "orbs", "matrix"] {
        h.element.set_background_animation(name).unwrap();
        h.frames(2);
        h.assert_running(name);
    }

    // Every start after the first is preceded by the stop of the previous one
    let calls = h.calls();
    let mut running: Option<&str> = None;
    for call in &calls {
        match call {
            SurfaceCall::AnimationStarted(name) => {
                assert!(running.is_none(), "{} started while {:?} running", name, running);
                running = Some(*name);
            }
            SurfaceCall::AnimationStopped(name) => {
                assert_eq!(running, Some(*name));
                running = None;
            }
            SurfaceCall::Frame(name) => assert_eq!(running, Some(*name)),
            _ => {}
        }
    }
}

#[test]
fn test_matrix_stopped_before_mesh_started() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_animation("matrix").unwrap();
    h.element.set_background_animation("mesh").unwrap();

    let surface = h.surface().borrow();
    let stop = surface.position_of(&SurfaceCall::AnimationStopped("matrix")).unwrap();
    let start = surface.position_of(&SurfaceCall::AnimationStarted("mesh")).unwrap();
    assert!(stop < start);
}

#[test]
fn test_detach_twice_same_as_once() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_animation("orbs").unwrap();

    h.element.on_detach();
    let after_one = h.calls();
    h.element.on_detach();

    assert_eq!(h.calls(), after_one);
    h.assert_idle();
    assert!(h.surface().borrow().is_blank());
}

#[test]
fn test_fields_round_trip() {
    let mut h = BackdropHarness::new(320, 240);
    let writes = [
        ("background-size", "contain"),
        ("background-position", "top right"),
        ("background-image", "file:///wallpaper.png"),
        ("background-color", "hsl(120, 100%, 50%)"),
        ("background-animation-debounce", "250"),
        ("background-animation-options", r#"{"spacing": 48}"#),
        ("background-animation", "mesh"),
        ("background-type", "image"),
    ];
    for (name, value) in writes {
        h.element.set_attribute(name, value).unwrap();
        assert_eq!(h.element.attribute(name), Some(value));
    }

    assert_eq!(h.element.background_size(), "contain");
    assert_eq!(h.element.background_position(), "top right");
    assert_eq!(h.element.background_image(), "file:///wallpaper.png");
    assert_eq!(h.element.background_color(), "hsl(120, 100%, 50%)");
    assert_eq!(h.element.background_animation_debounce(), 250);
    assert_eq!(h.element.background_animation(), "mesh");
    assert_eq!(h.element.background_type(), BackgroundType::Image);
    h.assert_idle();
}

#[test]
fn test_returned_options_are_a_copy() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_animation("matrix").unwrap();

    let mut opts = AnimationOptions::new();
    opts.insert("density", 2.0);
    h.element.set_background_animation_options(&opts).unwrap();

    let mut returned = h.element.background_animation_options();
    assert_eq!(returned, opts);
    returned.insert("density", 0.5);
    assert_eq!(h.element.background_animation_options(), opts);
}

#[test]
fn test_unchanged_writes_have_no_effect() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_animation("orbs").unwrap();
    h.clear_calls();
    let starts = h.starts();

    let changes = h.element.set_background_animation("orbs").unwrap();
    assert!(changes.is_empty());
    assert!(h.element.set_background_type(BackgroundType::Animated).unwrap().is_empty());
    assert!(h
        .element
        .on_attribute_changed("background-color", Some("not-a-color"), Some("not-a-color"))
        .unwrap()
        .is_empty());

    assert_eq!(h.starts(), starts);
    assert!(h.calls().is_empty());
    h.assert_running("orbs");
}

#[test]
fn test_resize_without_animation_only_resizes() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_color("navy").unwrap();
    h.clear_calls();

    h.resize_at(0, 800, 600);
    assert!(h.poll_at(100));

    assert_eq!(h.starts(), 0);
    assert_eq!(h.surface().borrow().size(), (800, 600));
    assert_eq!(h.calls()[0], SurfaceCall::Resized { width: 800, height: 600 });
}

#[test]
fn test_debounce_change_waits_for_next_report() {
    let mut h = BackdropHarness::new(320, 240);
    h.element.set_background_animation("matrix").unwrap();

    h.resize_at(0, 400, 400);
    h.element.set_background_animation_debounce(300).unwrap();
    assert!(h.poll_at(100));

    h.resize_at(200, 500, 500);
    assert!(!h.poll_at(400));
    assert!(h.poll_at(500));
    assert_eq!(h.surface().borrow().size(), (500, 500));
}

#[test]
fn test_declared_attributes_applied_on_attach() {
    let mut h = BackdropHarness::detached(320, 240);
    h.element.set_attribute("background-image", "bg.png").unwrap();
    h.element.set_attribute("background-size", "contain").unwrap();
    h.element.set_attribute("background-position", "left").unwrap();
    assert!(h.calls().is_empty());

    h.element.on_attach().unwrap();
    assert_eq!(h.element.background_type(), BackgroundType::Image);
    match h.surface().borrow().fill() {
        SurfaceFill::Image { url, .. } => assert_eq!(url, "bg.png"),
        other => panic!("expected image fill, got {:?}", other),
    }
}
