pub mod common;

use mapmark::{
    app::{ClickOutcome, MapApp, Mode, DEFAULT_MARKER_TITLE, LOCATION_TITLE, ZOOM_TO_LOCATION},
    map_view::{MapView, TileStyle, VIEW_STORAGE_KEY},
    storage::MemoryStorage,
    store::{StoreError, STORAGE_KEY, ZOOM_TO_MARKER},
    utils::location::Position,
};
use ui_common::{Severity, DEFAULT_ICON};

use crate::common::utils::{create, titles, Harness, MapCall};

const EIFFEL_TOWER: Position = Position {
    lat: 48.8584,
    lng: 2.2945,
};
const BIG_BEN: Position = Position {
    lat: 51.5007,
    lng: -0.1246,
};

fn never_asked(_: &str, _: &str) -> Option<String> {
    panic!("no title prompt expected");
}

#[test]
fn modes_toggle_and_notify() {
    let h = Harness::new();
    let notifier = h.notifier.clone();
    let mut app = MapApp::new(h.store);
    assert_eq!(app.mode(), Mode::Browse);

    assert_eq!(app.toggle_add_mode(), Mode::AddMarker);
    assert!(notifier.contains("Click map to add marker", Severity::Info));
    assert_eq!(app.toggle_add_mode(), Mode::Browse);
    assert!(notifier.contains("Add marker cancelled", Severity::Info));

    assert_eq!(app.toggle_measure_mode(), Mode::Measure(None));
    assert!(notifier.contains("Click two points to measure", Severity::Info));
    // Switching tools replaces the active one
    assert_eq!(app.toggle_add_mode(), Mode::AddMarker);
    assert_eq!(app.toggle_measure_mode(), Mode::Measure(None));
    assert_eq!(app.toggle_measure_mode(), Mode::Browse);
    assert!(notifier.contains("Measure tool off", Severity::Info));
}

#[test]
fn browsing_clicks_do_nothing() {
    let h = Harness::new();
    let map = h.map.clone();
    let mut app = MapApp::new(h.store);

    assert_eq!(
        app.click(EIFFEL_TOWER, &mut never_asked),
        ClickOutcome::Ignored
    );
    assert!(map.calls().is_empty());
}

#[test]
fn click_in_add_mode_creates_a_marker() {
    let h = Harness::new();
    let sidebar = h.sidebar.clone();
    let mut app = MapApp::new(h.store);
    app.toggle_add_mode();

    let mut asked = vec![];
    let mut prompt = |message: &str, default: &str| {
        asked.push((message.to_string(), default.to_string()));
        Some("  Picnic spot ".to_string())
    };
    let outcome = app.click(EIFFEL_TOWER, &mut prompt);

    let ClickOutcome::Created(created) = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert_eq!(asked, vec![("Marker title".to_string(), DEFAULT_MARKER_TITLE.to_string())]);

    let marker = app.store().get(created.index).unwrap();
    assert_eq!(marker.title, "Picnic spot");
    assert_eq!(marker.position, EIFFEL_TOWER);
    assert_eq!(marker.icon, DEFAULT_ICON);
    assert_eq!(sidebar.rows(), vec![(0, "Picnic spot".to_string())]);
    // One marker per click
    assert_eq!(app.mode(), Mode::Browse);
}

#[test]
fn cancelled_prompt_adds_nothing() {
    let h = Harness::new();
    let map = h.map.clone();
    let mut app = MapApp::new(h.store);

    for answer in [None, Some(String::new()), Some("   ".to_string())] {
        app.toggle_add_mode();
        let mut prompt = |_: &str, _: &str| answer.clone();
        assert_eq!(app.click(BIG_BEN, &mut prompt), ClickOutcome::Cancelled);
        assert_eq!(app.mode(), Mode::Browse);
    }

    assert_eq!(app.store().count(), 0);
    assert_eq!(map.live_visuals(), 0);
}

#[test]
fn invalid_click_position_is_reported() {
    let h = Harness::new();
    let notifier = h.notifier.clone();
    let mut app = MapApp::new(h.store);
    app.toggle_add_mode();

    let mut prompt = |_: &str, _: &str| Some("Nowhere".to_string());
    assert_eq!(
        app.click(Position::new(120.0, 0.0), &mut prompt),
        ClickOutcome::Cancelled
    );
    assert_eq!(app.store().count(), 0);
    assert!(notifier
        .messages()
        .iter()
        .any(|(_, severity)| *severity == Severity::Warning));
}

#[test]
fn measuring_two_clicks() {
    let h = Harness::new();
    let notifier = h.notifier.clone();
    let mut app = MapApp::new(h.store);
    app.toggle_measure_mode();

    assert_eq!(
        app.click(EIFFEL_TOWER, &mut never_asked),
        ClickOutcome::MeasureStarted
    );
    assert_eq!(app.mode(), Mode::Measure(Some(EIFFEL_TOWER)));

    let ClickOutcome::Measured(distance) = app.click(BIG_BEN, &mut never_asked) else {
        panic!("expected a measurement");
    };
    assert!((distance.as_km() - 340.54).abs() < 0.01, "{distance:?}");
    assert!(notifier.contains("Distance: 340.54 km", Severity::Info));
    assert_eq!(app.mode(), Mode::Browse);
    // Measuring never adds markers
    assert_eq!(app.store().count(), 0);
}

#[test]
fn locate_marks_the_position() {
    let h = Harness::new();
    let map = h.map.clone();
    let mut app = MapApp::new(h.store);

    let here = Position::new(14.5995, 120.9842);
    let created = app.locate(here).unwrap();

    assert_eq!(app.store().get(created.index).unwrap().title, LOCATION_TITLE);
    assert_eq!(app.view().center, here);
    assert_eq!(app.view().zoom, ZOOM_TO_LOCATION);
    assert!(map.calls().contains(&MapCall::Recenter(here, ZOOM_TO_LOCATION)));

    assert!(matches!(
        app.locate(Position::new(f64::NAN, 0.0)),
        Err(StoreError::InvalidPosition { .. })
    ));
    assert_eq!(app.view().center, here);
    assert_eq!(app.store().count(), 1);
}

#[test]
fn measure_between_markers() {
    let mut h = Harness::new();
    create(&mut h.store, EIFFEL_TOWER.lat, EIFFEL_TOWER.lng, "Eiffel Tower");
    create(&mut h.store, BIG_BEN.lat, BIG_BEN.lng, "Big Ben");
    let app = MapApp::new(h.store);

    let distance = app.measure(0, 1).unwrap();
    assert!((distance.as_km() - app.measure(1, 0).unwrap().as_km()).abs() < 1e-9);
    assert!((distance.as_km() - 340.54).abs() < 0.01);
    assert!(app.measure(0, 0).unwrap().is_zero());
    assert_eq!(app.measure(0, 2), None);
}

#[test]
fn zoom_to_moves_the_view() {
    let mut h = Harness::new();
    create(&mut h.store, EIFFEL_TOWER.lat, EIFFEL_TOWER.lng, "Eiffel Tower");
    let map = h.map.clone();
    let mut app = MapApp::new(h.store);

    assert!(app.zoom_to(0));
    assert_eq!(app.view().center, EIFFEL_TOWER);
    assert_eq!(app.view().zoom, ZOOM_TO_MARKER);
    assert_eq!(map.last_call(), Some(MapCall::OpenPopup(0)));

    let view = *app.view();
    assert!(!app.zoom_to(3));
    assert_eq!(*app.view(), view);
}

#[test]
fn share_link_follows_the_view() {
    let h = Harness::new();
    let mut app = MapApp::new(h.store);
    app.locate(BIG_BEN).unwrap();
    app.set_style(TileStyle::Dark);
    assert_eq!(app.view().style, TileStyle::Dark);

    let url = app.share_url("http://localhost:8080/").unwrap();
    assert_eq!(url, "http://localhost:8080/?lat=51.5007&lng=-0.1246&z=13");

    let shared = MapView::from_share_url(&url);
    assert_eq!(shared.center, BIG_BEN);
    assert_eq!(shared.zoom, ZOOM_TO_LOCATION);

    assert!(app.share_url("not a url").is_err());
}

#[test]
fn start_keeps_stored_markers() {
    let mut first = Harness::new();
    create(&mut first.store, 1.0, 2.0, "Home");

    let second = Harness::with_storage(first.storage.clone());
    let map = second.map.clone();
    let app = MapApp::start(second.store, true);

    assert_eq!(titles(app.store()), vec!["Home"]);
    assert_eq!(
        map.last_call(),
        Some(MapCall::Recenter(MapView::default().center, MapView::default().zoom))
    );
}

#[test]
fn map_view_survives_a_restart() {
    let first = Harness::new();
    let storage = first.storage.clone();
    let mut app = MapApp::start(first.store, false);
    app.set_style(TileStyle::Dark);
    app.locate(BIG_BEN).unwrap();
    drop(app);

    let second = Harness::with_storage(storage);
    let map = second.map.clone();
    let app = MapApp::start(second.store, false);

    assert_eq!(app.view().style, TileStyle::Dark);
    assert_eq!(app.view().center, BIG_BEN);
    assert_eq!(
        app.share_url("http://localhost:8080/").unwrap(),
        "http://localhost:8080/?lat=51.5007&lng=-0.1246&z=13"
    );
    assert_eq!(map.last_call(), Some(MapCall::Recenter(BIG_BEN, ZOOM_TO_LOCATION)));
}

#[test]
fn zooming_to_a_marker_is_remembered() {
    let mut first = Harness::new();
    create(&mut first.store, EIFFEL_TOWER.lat, EIFFEL_TOWER.lng, "Eiffel Tower");
    let storage = first.storage.clone();
    let mut app = MapApp::start(first.store, false);
    assert!(app.zoom_to(0));
    drop(app);

    let app = MapApp::start(Harness::with_storage(storage).store, false);
    assert_eq!(app.view().center, EIFFEL_TOWER);
    assert_eq!(app.view().zoom, ZOOM_TO_MARKER);
}

#[test]
fn unreadable_stored_view_opens_the_default() {
    let storage = MemoryStorage::with_entry(VIEW_STORAGE_KEY, "{\"center\":");
    let app = MapApp::start(Harness::with_storage(storage).store, false);
    assert_eq!(*app.view(), MapView::default());
}

#[test]
fn shared_link_opens_the_map_there() {
    let h = Harness::new();
    let storage = h.storage.clone();
    let mut app = MapApp::start(h.store, false);

    app.open_share_url("http://localhost:8080/?lat=48.8584&lng=2.2945&z=16");
    assert_eq!(app.view().center, EIFFEL_TOWER);
    assert_eq!(app.view().zoom, 16);

    let mut app = MapApp::start(Harness::with_storage(storage.clone()).store, false);
    assert_eq!(app.view().center, EIFFEL_TOWER);

    app.open_share_url("http://localhost:8080/?lat=abc");
    assert_eq!(app.view().center, MapView::default().center);
    // Markers are never touched by the view
    assert_eq!(storage.peek(STORAGE_KEY), None);
}
