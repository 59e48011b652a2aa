use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::model::script::{Effect, Layer, Scene};

const HEADER: &str = r#"{"slideList":["intro","body"],"slideWidth":1024,"slideHeight":768}"#;

fn slide(widths: &[f64]) -> SlideScript {
    SlideScript {
        events: widths
            .iter()
            .map(|w| {
                let mut base = Layer::default();
                base.initial_state.width = *w;
                Scene {
                    base_layer: base,
                    ..Scene::default()
                }
            })
            .collect(),
        ..SlideScript::default()
    }
}

fn opts(variant: RendererVariant, viewport: Size) -> SessionOpts {
    SessionOpts {
        variant,
        viewport,
        ..SessionOpts::default()
    }
}

#[test]
fn session_becomes_ready_once_every_slide_reported() {
    let viewport = Size::new(800.0, 400.0);
    let mut session =
        ShowSession::from_header_json(HEADER, opts(RendererVariant::WebKit, viewport)).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    session.set_view_scale_hook(move |k| sink.borrow_mut().push(k));

    assert_eq!(
        session.slide_loaded("body", slide(&[10.0, 20.0])).unwrap(),
        SessionState::Loading
    );
    assert!(session.drain_events().is_empty());
    assert_eq!(session.scene_index_from_slide(0), None);
    assert_eq!(
        session.slide_loaded("intro", slide(&[768.0])).unwrap(),
        SessionState::Ready
    );

    let k = 400.0 / 768.0;
    let events = session.drain_events();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        ShowEvent::ScriptReady {
            scenes: 3,
            slides: 2
        }
    );
    let ShowEvent::ShowSizeChanged { width, height } = events[1] else {
        panic!("expected a size event, got {:?}", events[1]);
    };
    assert!((height - 400.0).abs() < 1e-9);
    assert!((width - 1024.0 * k).abs() < 1e-9);
    assert_eq!(seen.borrow().len(), 1);
    assert!((seen.borrow()[0] - k).abs() < 1e-12);

    let script = session.script().unwrap();
    assert!(script.quirks_applied());
    assert!((script.scenes()[0].base_layer.initial_state.width - 400.0).abs() < 1e-9);
    assert_eq!(session.scene_index_from_slide(1), Some(1));
    assert_eq!(session.slide_index_from_scene(2), Some(1));
    assert_eq!(session.slide_index_from_scene(3), None);
}

#[test]
fn zero_viewport_keeps_authoring_size() {
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    session.slide_loaded("intro", slide(&[1.0])).unwrap();
    session.slide_loaded("body", slide(&[])).unwrap();
    assert_eq!(session.scale_factor(), Some(1.0));
    assert_eq!(
        session.script().unwrap().slide_size(),
        Size::new(1024.0, 768.0)
    );
}

#[test]
fn a_failed_slide_abandons_the_script() {
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    assert_eq!(
        session.slide_failed("intro", "HTTP 404").unwrap(),
        SessionState::Loading
    );
    assert_eq!(
        session.slide_loaded("body", slide(&[1.0])).unwrap(),
        SessionState::Failed
    );
    let events = session.drain_events();
    assert!(matches!(
        events.as_slice(),
        [ShowEvent::ScriptDidNotLoad { reason }] if reason.contains("HTTP 404")
    ));
    assert!(session.script().is_none());
    assert_eq!(session.scene_index_from_slide(0), None);
}

#[test]
fn timeout_is_treated_as_a_load_failure() {
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    session.slide_loaded("intro", slide(&[1.0])).unwrap();
    assert_eq!(session.poll_timeout(Instant::now()), SessionState::Loading);

    let later = Instant::now() + Duration::from_secs(31);
    assert_eq!(session.poll_timeout(later), SessionState::Failed);
    let events = session.drain_events();
    assert!(matches!(
        events.as_slice(),
        [ShowEvent::ScriptDidNotLoad { reason }] if reason.contains("1 of 2")
    ));

    // Late arrivals are ignored.
    assert_eq!(
        session.slide_loaded("body", slide(&[1.0])).unwrap(),
        SessionState::Failed
    );
    assert!(session.script().is_none());
}

#[test]
fn resize_rescales_from_the_original_and_notifies() {
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    let calls = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&calls);
    session.set_view_scale_hook(move |_| *counter.borrow_mut() += 1);
    session.slide_loaded("intro", slide(&[300.0])).unwrap();
    session.slide_loaded("body", slide(&[])).unwrap();
    session.drain_events();

    let k = session.resize(Size::new(512.0, 2000.0)).unwrap();
    assert_eq!(k, 0.5);
    session.resize(Size::new(2048.0, 1536.0)).unwrap();
    let k = session.resize(Size::new(512.0, 2000.0)).unwrap();
    assert_eq!(k, 0.5);

    let script = session.script().unwrap();
    assert_eq!(script.scenes()[0].base_layer.initial_state.width, 150.0);
    assert_eq!(*calls.borrow(), 4);
    let sizes: Vec<ShowEvent> = session.drain_events();
    assert_eq!(sizes.len(), 3);
    assert_eq!(
        sizes[2],
        ShowEvent::ShowSizeChanged {
            width: 512.0,
            height: 384.0
        }
    );
}

#[test]
fn resize_before_ready_is_rejected() {
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    assert!(matches!(
        session.resize(Size::new(100.0, 100.0)),
        Err(ShowError::Validation(_))
    ));
    assert!(session.resize(Size::new(-1.0, 100.0)).is_err());
}

#[test]
fn a_viewport_with_one_zero_side_is_rejected() {
    for viewport in [Size::new(800.0, 0.0), Size::new(0.0, 600.0)] {
        assert!(matches!(
            ShowSession::from_header_json(HEADER, opts(RendererVariant::Reference, viewport)),
            Err(ShowError::Validation(_))
        ));
    }

    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    session.slide_loaded("intro", slide(&[300.0])).unwrap();
    session.slide_loaded("body", slide(&[])).unwrap();
    session.resize(Size::new(512.0, 384.0)).unwrap();
    assert!(matches!(
        session.resize(Size::new(800.0, 0.0)),
        Err(ShowError::Validation(_))
    ));
    assert_eq!(session.scale_factor(), Some(0.5));

    assert_eq!(session.resize(Size::ZERO).unwrap(), 1.0);
    assert_eq!(session.script().unwrap().slide_size(), Size::new(1024.0, 768.0));
}

#[test]
fn bad_headers_and_unknown_slides_are_errors() {
    assert!(matches!(
        ShowSession::from_header_json("{not json", SessionOpts::default()),
        Err(ShowError::Header(_))
    ));
    assert!(matches!(
        ShowSession::from_header_json(
            r#"{"slideList":[],"slideWidth":1024,"slideHeight":768}"#,
            SessionOpts::default()
        ),
        Err(ShowError::Header(_))
    ));
    let mut session = ShowSession::from_header_json(HEADER, SessionOpts::default()).unwrap();
    assert!(matches!(
        session.slide_loaded("outro", slide(&[])),
        Err(ShowError::Validation(_))
    ));
}

#[test]
fn a_malformed_effect_fails_the_session_fast() {
    let mut broken = slide(&[1.0]);
    broken.events[0].effects.push(Effect {
        name: "apple:doorway".to_string(),
        kind: "transition".to_string(),
        ..Effect::default()
    });
    let mut session =
        ShowSession::from_header_json(HEADER, opts(RendererVariant::Legacy, Size::ZERO)).unwrap();
    session.slide_loaded("intro", broken).unwrap();
    assert!(matches!(
        session.slide_loaded("body", slide(&[])),
        Err(ShowError::Structure(_))
    ));
    assert_eq!(session.state(), SessionState::Failed);
    assert!(matches!(
        session.drain_events().as_slice(),
        [ShowEvent::ScriptDidNotLoad { .. }]
    ));
}
