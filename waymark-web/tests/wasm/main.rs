use chrono::{TimeZone, Utc};
use gloo::storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use waymark_web::download::{document, js_error_message};
use waymark_web::tracker::{
    backup_file_name, BrowserClock, Clock, DataLoader, RandomizerKind, Session, SessionId,
    SessionStore, WebDataLoader, WebSessionStore, WorldSide,
};

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    LocalStorage::delete("waymark.sessions");
    LocalStorage::delete("waymark.last_export");
}

#[wasm_bindgen_test]
fn embedded_world_catalog_parses() {
    let world = WebDataLoader.load_world().expect("world catalog");
    assert_eq!(world.len(), 147);
    assert_eq!(world.side_of("1"), Some(WorldSide::Light));
    assert_eq!(world.side_of("91"), Some(WorldSide::Dark));
}

#[wasm_bindgen_test]
fn embedded_check_catalog_parses() {
    let checks = WebDataLoader.load_checks().expect("check catalog");
    assert_eq!(checks.len(), 216);
    assert!(!checks.checks_for(1045).is_empty(), "eastern palace checks");
}

#[wasm_bindgen_test]
fn fresh_browser_reads_empty_state() {
    clear_storage();
    let store = WebSessionStore;
    assert!(store.load_sessions().expect("no list yet").is_empty());
    assert!(store.load_last_export().expect("no export yet").is_none());
}

#[wasm_bindgen_test]
fn session_list_round_trips_through_local_storage() {
    clear_storage();
    let store = WebSessionStore;
    let created = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("timestamp");
    let session = Session::new(
        SessionId(1_700_000_000_000),
        "browser run".to_string(),
        RandomizerKind::Crossed,
        true,
        created,
    );

    store.save_sessions(&[session.clone()]).expect("save");
    let loaded = store.load_sessions().expect("load");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, session.id);
    assert_eq!(loaded[0].name, "browser run");
    assert_eq!(loaded[0].randomizer_type, RandomizerKind::Crossed);
    assert!(loaded[0].is_inverted);
}

#[wasm_bindgen_test]
fn last_export_round_trips_through_local_storage() {
    clear_storage();
    let store = WebSessionStore;
    let at = Utc.timestamp_millis_opt(1_700_000_000_000).single().expect("timestamp");
    store.save_last_export(at).expect("save");
    assert_eq!(store.load_last_export().expect("load"), Some(at));
}

#[wasm_bindgen_test]
fn browser_clock_reads_current_time() {
    let now = BrowserClock.now();
    let y2020 = Utc.timestamp_millis_opt(1_577_836_800_000).single().expect("timestamp");
    assert!(now > y2020, "clock should be past 2020, got {now}");
}

#[wasm_bindgen_test]
fn document_is_reachable_in_the_browser() {
    let doc = document();
    assert!(doc.body().is_some());
}

#[wasm_bindgen_test]
fn js_errors_render_as_readable_text() {
    assert_eq!(js_error_message(&JsValue::from_str("plain")), "plain");

    let error = js_sys::Error::new("quota exceeded");
    assert_eq!(js_error_message(&error.into()), "quota exceeded");

    // Anything without a string form falls back to the debug rendering.
    let opaque = JsValue::from_f64(42.0);
    assert!(js_error_message(&opaque).starts_with("JsValue"));
}

#[wasm_bindgen_test]
fn backup_file_name_is_dated() {
    let name = backup_file_name(BrowserClock.now());
    assert!(name.starts_with("waymark-backup-"), "{name}");
    assert!(name.ends_with(".json"), "{name}");
}
