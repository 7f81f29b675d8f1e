use gravmon_config::load_toml;

#[test]
fn rejects_zero_fps() {
    let toml = r#"
[sampler]
fps = 0
deadband = 0.01

[filter]
window = 3
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject fps=0");
    assert!(format!("{err}").contains("sampler.fps must be > 0"));
}

#[test]
fn accepts_typical_config() {
    let toml = r#"
[sampler]
fps = 100
deadband = 0.01

[filter]
window = 8

[logging]
level = "debug"
"#;

    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config");
    assert_eq!(cfg.sampler.fps, 100);
    assert_eq!(cfg.filter.window, 8);
    assert_eq!(cfg.logging.level.as_deref(), Some("debug"));
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let cfg = load_toml("").expect("empty TOML parses");
    cfg.validate().expect("defaults are valid");
    assert_eq!(cfg.sampler.fps, 60);
    assert_eq!(cfg.sampler.deadband, 0.01);
    assert_eq!(cfg.filter.window, 0);
}

#[test]
fn rejects_negative_deadband() {
    let toml = r#"
[sampler]
deadband = -0.5
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject negative deadband");
    assert!(format!("{err}").contains("deadband"));
}

#[test]
fn rejects_absurd_window() {
    let toml = r#"
[filter]
window = 100000
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject huge window");
    assert!(format!("{err}").contains("filter.window"));
}

#[test]
fn rejects_absurd_fps() {
    let toml = r#"
[sampler]
fps = 100000
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject huge fps");
    assert!(format!("{err}").contains("sampler.fps"));
}
