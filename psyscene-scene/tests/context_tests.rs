mod common;

use common::{Script, harness};
use psyscene_scene::{Datum, SceneConfig, SceneError};

#[test]
fn fixation_draws_one_cross_for_its_duration() {
    let h = harness(Script::default());
    let mut scene = h.ctx.fixation(0.05).unwrap();
    assert_eq!(scene.duration(), Some(0.05));
    scene.show(()).unwrap();

    assert_eq!(scene.frames(), 3);
    assert!(h.presented.borrow().frames.iter().all(|&n| n == 1));
}

#[test]
fn blank_draws_nothing_until_closed() {
    let h = harness(Script {
        keys: vec![(0.04, "space")],
        ..Script::default()
    });
    let mut scene = h.ctx.blank(None).unwrap();
    scene.config(SceneConfig::new().close_on("key_space")).unwrap();
    assert_eq!(scene.duration(), None);
    scene.show(()).unwrap();

    assert!(h.presented.borrow().frames.iter().all(|&n| n == 0));
    assert_eq!(scene.events().unwrap()[0].label(), "space");
}

#[test]
fn text_without_font_fails() {
    let h = harness(Script::default());
    assert!(matches!(h.ctx.text("GO"), Err(SceneError::FontMissing)));
}

#[test]
fn add_row_records_one_row_per_call() {
    let h = harness(Script::default());
    h.ctx.add_row([("trial", Datum::from(1)), ("rt", Datum::from(0.31))]);
    h.ctx.add_row([("trial", Datum::from(2)), ("rt", Datum::from(None::<f64>))]);

    let exp = h.ctx.experiment();
    assert_eq!(exp.len(), 2);
    assert_eq!(exp.rows()[0].get("rt"), Some(&Datum::Number(0.31)));
    assert_eq!(exp.rows()[1].get("rt"), Some(&Datum::Null));
    assert_eq!(exp.rows()[1].keys().collect::<Vec<_>>(), ["trial", "rt"]);
}

#[test]
fn config_rejects_unprefixed_listener() {
    let h = harness(Script::default());
    let mut scene = h.ctx.scene();
    let err = scene
        .config(SceneConfig::new().listener("key_space", |_| Ok(())))
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidListenerParam(ref p) if p == "key_space"));
}

#[test]
fn config_rejects_bad_event_after_prefix() {
    let h = harness(Script::default());
    let mut scene = h.ctx.scene();
    let err = scene
        .config(SceneConfig::new().listener("on_key_Space", |_| Ok(())))
        .unwrap_err();
    assert!(matches!(err, SceneError::InvalidEventName(ref n) if n == "key_Space"));
}

#[test]
fn overlapping_close_on_across_configs_fails() {
    let h = harness(Script::default());
    let mut scene = h.ctx.scene();
    scene
        .config(SceneConfig::new().close_on(["key_escape", "mouse_right"]))
        .unwrap();
    let err = scene
        .config(SceneConfig::new().close_on("mouse_right"))
        .unwrap_err();
    assert!(matches!(err, SceneError::DuplicateListener(ref n) if n == "mouse_right"));
}

#[test]
fn config_always_overwrites_duration() {
    let h = harness(Script::default());
    let mut scene = h.ctx.fixation(1.0).unwrap();
    scene.config(SceneConfig::new()).unwrap();
    assert_eq!(scene.duration(), None);
}
