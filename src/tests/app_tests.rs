// src/tests/app_tests.rs
use super::utils::{make_db, page, record, test_config, ScriptedSource};
use crate::api::{ApiError, FetchCompletion, ListingFilter, ListingQuery};
use crate::app::{HeatmapApp, LoadOrigin, FALLBACK_CENTER, INITIAL_ZOOM};
use crate::coordinator::FetchOutcome;
use crate::db::load_fresh_snapshot;
use crate::geometry::{PixelSize, Projection, ScreenPoint};
use crate::interaction::{PointerSample, TooltipUpdate};
use crate::render::Surface;
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use std::time::Duration;

const NOW_MS: i64 = 1_700_000_000_000;

fn container() -> PixelSize {
    PixelSize::new(400, 300)
}

fn seeded() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn good_page() -> Result<crate::api::ListingsPage, ApiError> {
    let mut p = page(vec![
        record("a", 48.0, 2.0, &["01/01/2020|100", "01/01/2021|150"]),
        record("b", 49.0, 3.0, &["01/01/2020|200", "01/01/2021|100"]),
        record("broken", 50.0, 4.0, &["yesterday|100"]),
    ]);
    p.count = 950;
    Ok(p)
}

/// Bootstrapped app with listings loaded but the map not yet ready.
fn loaded_app() -> HeatmapApp {
    let source = ScriptedSource::new(vec![good_page()]);
    let mut app = HeatmapApp::new(&test_config(), container());
    app.bootstrap(&source, None, NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();
    app
}

#[test]
fn bootstrap_fetches_centers_and_saves_snapshot() {
    let db = make_db("app_bootstrap");
    let source = ScriptedSource::new(vec![good_page()]);
    let mut app = HeatmapApp::new(&test_config(), container());

    let report = app
        .bootstrap(&source, Some(&db), NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();

    assert_eq!(report.origin, LoadOrigin::Network);
    assert_eq!((report.kept, report.skipped), (2, 1));
    assert_eq!(source.queries(), vec![ListingQuery::All { limit: 300 }]);
    assert_eq!(app.store().total_count(), 950);

    // centered on the whole batch, malformed listing included
    let view = app.view().unwrap();
    assert!((view.center().lat - 49.0).abs() < 1e-9);
    assert!((view.center().lon - 3.0).abs() < 1e-9);
    assert_eq!(view.zoom(), INITIAL_ZOOM);

    let snapshot = load_fresh_snapshot(&db, NOW_MS, 120_000).unwrap().unwrap();
    assert_eq!(snapshot.records.len(), 3);
    assert_eq!(snapshot.total_count, 950);
}

#[test]
fn fresh_snapshot_skips_the_network() {
    let db = make_db("app_snapshot");
    let first = ScriptedSource::new(vec![good_page()]);
    HeatmapApp::new(&test_config(), container())
        .bootstrap(&first, Some(&db), NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();

    let second = ScriptedSource::new(Vec::new());
    let mut app = HeatmapApp::new(&test_config(), container());
    let report = app
        .bootstrap(&second, Some(&db), NOW_MS + 60_000, 120_000, &mut seeded(), |_| {})
        .unwrap();

    assert_eq!(report.origin, LoadOrigin::Snapshot);
    assert_eq!(second.calls(), 0);
    assert_eq!(app.store().len(), 2);
}

#[test]
fn stale_snapshot_refetches() {
    let db = make_db("app_stale");
    let first = ScriptedSource::new(vec![good_page()]);
    HeatmapApp::new(&test_config(), container())
        .bootstrap(&first, Some(&db), NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();

    let second = ScriptedSource::new(vec![good_page()]);
    let report = HeatmapApp::new(&test_config(), container())
        .bootstrap(&second, Some(&db), NOW_MS + 120_001, 120_000, &mut seeded(), |_| {})
        .unwrap();

    assert_eq!(report.origin, LoadOrigin::Network);
    assert_eq!(second.calls(), 1);
}

#[test]
fn failed_bulk_load_retries_then_shows_banner() {
    let source = ScriptedSource::new(vec![
        Err(ApiError::Network("down".into())),
        Err(ApiError::Network("down".into())),
        Err(ApiError::Status {
            status: 503,
            body: String::new(),
        }),
    ]);
    let mut app = HeatmapApp::new(&test_config(), container());
    let mut waits = Vec::new();

    let result = app.bootstrap(&source, None, NOW_MS, 120_000, &mut seeded(), |d: Duration| {
        waits.push(d)
    });

    assert!(result.is_err());
    assert_eq!(source.calls(), 3);
    assert_eq!(waits.len(), 2);
    assert!(app.view().is_none());
    assert!(app.store().is_empty());

    let banner = app.error_banner_html().unwrap();
    assert!(banner.contains("load any listings."));
    assert!(banner.contains("503"));
}

#[test]
fn nothing_paints_until_the_map_is_ready() {
    let mut app = loaded_app();
    assert!(app.scheduler().is_scheduled());

    assert_eq!(app.on_animation_frame(), None);
    assert_eq!(app.renderer().repaints(), 0);

    app.on_map_ready();
    let stats = app.on_animation_frame().unwrap();
    assert_eq!(stats.drawn, 2);
    assert!(app.canvas().painted_pixels() > 0);

    // no pending redraw, no paint
    assert_eq!(app.on_animation_frame(), None);
    assert_eq!(app.renderer().repaints(), 1);
}

#[test]
fn continuous_moves_coalesce_into_one_paint() {
    let mut app = loaded_app();
    app.on_map_ready();
    app.on_animation_frame();

    for _ in 0..5 {
        app.pan_by(3.0, -2.0);
    }
    app.set_zoom(7.0);

    assert!(app.on_animation_frame().is_some());
    assert!(app.on_animation_frame().is_none());
    assert_eq!(app.renderer().repaints(), 2);
}

#[test]
fn settled_view_fetches_bounds_and_redraws() {
    let mut app = loaded_app();
    app.on_map_ready();
    app.on_animation_frame();

    app.on_view_settled(1_000);
    assert!(app.tick(1_399).fetch.is_none());
    let ticket = app.tick(1_400).fetch.unwrap();

    match &ticket.query {
        ListingQuery::Bounds { bounds, limit, .. } => {
            assert_eq!(Some(*bounds), app.viewport_bounds());
            assert_eq!(*limit, 300);
        }
        other => panic!("unexpected query {other:?}"),
    }

    let outcome = app.on_fetch_complete(FetchCompletion {
        epoch: ticket.epoch,
        result: Ok(page(vec![record("c", 49.0, 3.0, &["01/01/2020|100"])])),
    });
    assert!(matches!(outcome, FetchOutcome::Applied { kept: 1, .. }));
    assert_eq!(app.store().len(), 1);
    assert!(app.scheduler().is_scheduled());
}

#[test]
fn filter_change_refetches_current_bounds() {
    let mut app = loaded_app();
    app.on_map_ready();

    let filter = ListingFilter {
        min_price: Some(100_000),
        ..Default::default()
    };
    app.on_filter_changed(filter.clone(), 0);
    let ticket = app.tick(400).fetch.unwrap();

    match ticket.query {
        ListingQuery::Bounds { filter: f, .. } => assert_eq!(f, filter),
        other => panic!("unexpected query {other:?}"),
    }
}

#[test]
fn failed_bounds_fetch_keeps_data_and_sets_banner() {
    let mut app = loaded_app();
    app.on_view_settled(0);
    let ticket = app.tick(400).fetch.unwrap();

    let outcome = app.on_fetch_complete(FetchCompletion {
        epoch: ticket.epoch,
        result: Err(ApiError::Network("reset".into())),
    });

    assert!(matches!(outcome, FetchOutcome::Failed(_)));
    assert_eq!(app.store().len(), 2);
    assert!(app
        .error_banner_html()
        .unwrap()
        .contains("Showing the last listings we could load."));
}

#[test]
fn hidden_container_resize_is_ignored() {
    let mut app = loaded_app();
    app.on_map_ready();
    app.on_animation_frame();

    app.on_resize(PixelSize::new(0, 0));
    assert!(!app.scheduler().is_scheduled());
    assert_eq!(app.canvas().size(), container());

    app.on_resize(PixelSize::new(640, 480));
    assert_eq!(app.canvas().size(), PixelSize::new(640, 480));
    assert_eq!(app.view().unwrap().pixel_size(), PixelSize::new(640, 480));
    assert!(app.on_animation_frame().is_some());
}

#[test]
fn hovering_a_marker_shows_its_tooltip() {
    let mut app = loaded_app();
    app.on_map_ready();

    let target = app.store().get_all()[0].clone();
    let at = app.view().unwrap().project(target.position());
    let origin = ScreenPoint::new(20.0, 40.0);
    let sample = PointerSample {
        client: ScreenPoint::new(at.x + origin.x + 2.0, at.y + origin.y),
        container_origin: origin,
        window: PixelSize::new(1280, 800),
    };

    match app.on_pointer_move(0, sample) {
        TooltipUpdate::Show(tooltip) => {
            assert_eq!(tooltip.key, target.key);
            assert!(tooltip.html.contains("50.00%"));
        }
        other => panic!("expected tooltip, got {other:?}"),
    }

    assert_eq!(app.on_pointer_leave(), TooltipUpdate::Hide);
    assert!(app.tooltip().visible().is_none());
}

#[test]
fn touch_tooltip_expiry_is_reported_by_tick() {
    let mut app = loaded_app();
    app.on_map_ready();

    let target = app.store().get_all()[0].clone();
    let at = app.view().unwrap().project(target.position());
    let sample = PointerSample {
        client: at,
        container_origin: ScreenPoint::new(0.0, 0.0),
        window: PixelSize::new(1280, 800),
    };

    assert!(matches!(app.on_touch(1_000, sample), TooltipUpdate::Show(_)));
    assert_eq!(app.tick(3_999).tooltip, TooltipUpdate::Unchanged);

    let out = app.tick(4_000);
    assert_eq!(out.tooltip, TooltipUpdate::Hide);
    assert!(out.fetch.is_none());
    assert!(app.tooltip().visible().is_none());
}

#[test]
fn settled_views_during_a_fetch_are_dropped() {
    let mut app = loaded_app();
    app.on_view_settled(0);
    let first = app.tick(400).fetch.unwrap();

    app.pan_by(40.0, 0.0);
    app.on_view_settled(500);
    assert!(app.tick(900).fetch.is_none());
    assert_eq!(app.coordinator().current_epoch(), first.epoch);

    let outcome = app.on_fetch_complete(FetchCompletion {
        epoch: first.epoch,
        result: Ok(page(vec![record("c", 49.0, 3.0, &["01/01/2020|100"])])),
    });
    assert!(matches!(outcome, FetchOutcome::Applied { .. }));

    // once idle, the next settle goes out again
    app.on_view_settled(1_000);
    let next = app.tick(1_400).fetch.unwrap();
    assert!(next.epoch > first.epoch);
}

#[test]
fn empty_bulk_load_still_opens_the_map() {
    let source = ScriptedSource::new(vec![Ok(page(Vec::new()))]);
    let mut app = HeatmapApp::new(&test_config(), container());

    let report = app
        .bootstrap(&source, None, NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();

    assert_eq!((report.kept, report.skipped), (0, 0));
    assert!(app.error_banner_html().is_none());
    let view = app.view().unwrap();
    assert_eq!(view.center(), FALLBACK_CENTER);
    assert_eq!(view.zoom(), INITIAL_ZOOM);

    app.on_view_settled(0);
    assert!(app.tick(400).fetch.is_some());
}

#[test]
fn schema_mismatch_skips_only_the_bad_record() {
    let mixed: crate::api::ListingsPage = serde_json::from_value(json!({
        "count": "2",
        "data": [
            { "_id": "ok", "lat": 48.0, "lon": 2.0, "prices": ["01/01/2020|100", "01/01/2021|120"] },
            { "_id": "bad", "lat": 48.5, "lon": 2.5, "beds": null, "prices": ["01/01/2020|100"] }
        ]
    }))
    .unwrap();
    let source = ScriptedSource::new(vec![Ok(mixed)]);
    let mut app = HeatmapApp::new(&test_config(), container());

    let report = app
        .bootstrap(&source, None, NOW_MS, 120_000, &mut seeded(), |_| {})
        .unwrap();

    assert_eq!((report.kept, report.skipped), (1, 1));
    assert_eq!(app.store().get_all()[0].percent_change, 20.0);
}
