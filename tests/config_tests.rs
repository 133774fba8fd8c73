//! Configuration tests
//!
//! Load config files from an isolated directory and apply their
//! background section to an element, as the runner does.

mod common;

use common::{BackdropHarness, TestEnvironment};
use wos_config::{Config, ConfigError};
use wos_host::BackgroundType;
use wos_renderer::SurfaceFill;

fn apply(h: &mut BackdropHarness, config: &Config) {
    for (name, value) in config.background.attributes().unwrap() {
        let _ = h.element.set_attribute(name, &value);
    }
}

#[test]
fn test_missing_config_is_created() {
    let env = TestEnvironment::new();
    assert!(!env.config_path().exists());

    let config = Config::load_or_create_in(&env.config_dir).unwrap();
    assert!(env.config_path().exists());
    assert_eq!(config, Config::default());

    // The generated file loads back to the same thing
    assert_eq!(Config::load_from(&env.config_path()).unwrap(), config);
}

#[test]
fn test_animated_config_starts_animation_on_attach() {
    let env = TestEnvironment::new();
    let path = env.write_config(
        r#"
        [background]
        type = "animated"
        animation = "orbs"
        debounce_ms = 40

        [background.animation_options]
        count = 6
        glow = 0.8
        "#,
    );
    let config = Config::load_from(&path).unwrap();

    let mut h = BackdropHarness::detached(config.window.width, config.window.height);
    apply(&mut h, &config);
    h.element.on_attach().unwrap();

    h.assert_running("orbs");
    assert_eq!(h.element.background_animation_debounce(), 40);
    let options = h.element.background_animation_options();
    assert_eq!(options.get_usize("count"), Some(6));
    assert_eq!(options.get_f64("glow"), Some(0.8));
}

#[test]
fn test_type_in_config_overrides_retained_animation() {
    let env = TestEnvironment::new();
    let path = env.write_config(
        r##"
        [background]
        type = "color"
        color = "#102030"
        animation = "matrix"
        "##,
    );
    let config = Config::load_from(&path).unwrap();

    let mut h = BackdropHarness::new(200, 100);
    apply(&mut h, &config);

    h.assert_idle();
    assert_eq!(h.element.background_type(), BackgroundType::Color);
    assert_eq!(h.element.background_animation(), "matrix");
    assert!(matches!(h.surface().borrow().fill(), SurfaceFill::Solid(_)));
}

#[test]
fn test_reload_switches_background() {
    let env = TestEnvironment::new();
    let mut h = BackdropHarness::new(200, 100);

    env.write_config("[background]\ntype = \"animated\"\nanimation = \"matrix\"\n");
    apply(&mut h, &Config::load_from(&env.config_path()).unwrap());
    h.assert_running("matrix");

    env.write_config("[background]\ntype = \"image\"\nimage = \"dunes.jpg\"\nanimation = \"matrix\"\n");
    apply(&mut h, &Config::load_from(&env.config_path()).unwrap());
    h.assert_idle();
    assert_eq!(h.element.background_type(), BackgroundType::Image);

    env.write_config("[background]\ntype = \"animated\"\nanimation = \"mesh\"\n");
    apply(&mut h, &Config::load_from(&env.config_path()).unwrap());
    h.assert_running("mesh");
}

#[test]
fn test_invalid_values_in_config_are_skipped() {
    let env = TestEnvironment::new();
    let path = env.write_config(
        r#"
        [background]
        type = "animated"
        color = "not a color"
        animation = "sparkle"
        "#,
    );
    let config = Config::load_from(&path).unwrap();

    let mut h = BackdropHarness::detached(200, 100);
    apply(&mut h, &config);
    assert!(h.element.on_attach().is_err());

    h.assert_idle();
    assert_eq!(h.element.background_type(), BackgroundType::Color);
}

#[test]
fn test_malformed_file_reports_parse_error() {
    let env = TestEnvironment::new();
    let path = env.write_config("[background\n");
    assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseError(_, _))));
}
