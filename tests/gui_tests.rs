use eframe::egui;
use egui_kittest::Harness;
use egui_kittest::kittest::Queryable;
use egui_ping_dashboard::app::PingDashboard;
use egui_ping_dashboard::logic::lock_state;
use egui_ping_dashboard::model::*;
use std::sync::{Arc, Mutex};

// --- Helper ---

fn result(ip: &str, name: &str, status: &str, ping_time: f64) -> PingResult {
    PingResult {
        ip: ip.to_string(),
        name: name.to_string(),
        status: status.to_string(),
        ping_time,
        last_success: "2024-03-01T12:34:56Z".to_string(),
        created: "2024-02-01T08:00:00Z".to_string(),
    }
}

fn make_state(rows: Vec<PingResult>) -> Arc<Mutex<AppState>> {
    let state = Arc::new(Mutex::new(AppState::default()));
    {
        let mut s = state.lock().unwrap();
        s.begin_fetch();
        s.apply_fetch::<()>(1, Ok(rows));
    }
    state
}

fn sample_rows() -> Vec<PingResult> {
    vec![
        result("172.17.0.2", "/web", "Up 2 hours", 0.42),
        result("172.17.0.3", "/db", "Exited (137) 5 minutes ago", 1500.0),
    ]
}

// === Table contents ===

#[test]
fn test_rows_rendered() {
    let state = make_state(sample_rows());
    let mut app = PingDashboard::from_state(state.clone());
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1400.0, 600.0));
    harness.run();

    harness.get_by_label("web");
    harness.get_by_label("db");
    harness.get_by_label("172.17.0.2");
    harness.get_by_label("172.17.0.3");
    harness.get_by_label("Up 2 hours");
    harness.get_by_label("Exited (137) 5 minutes ago");
    harness.get_by_label("0.42");
    harness.get_by_label("1500.00");
    harness.get_by_label("Containers: 2");
}

#[test]
fn test_headers_rendered() {
    let state = make_state(Vec::new());
    let mut app = PingDashboard::from_state(state);
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1400.0, 600.0));
    harness.run();

    harness.get_by_label("Docker container monitoring");
    for header in [
        "Container",
        "IP address",
        "Status",
        "Ping time (ms)",
        "Last successful ping",
        "Created",
    ] {
        harness.get_by_label(header);
    }
}

#[test]
fn test_leading_slash_hidden() {
    let state = make_state(vec![result("10.0.0.5", "/abc", "Up 1 second", 1.0)]);
    let mut app = PingDashboard::from_state(state.clone());
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1400.0, 600.0));
    harness.run();

    harness.get_by_label("abc");
    assert!(harness.query_by_label("/abc").is_none());
    // Stored data keeps the slash.
    assert_eq!(lock_state(&state).snapshot[0].name, "/abc");
}

#[test]
fn test_empty_snapshot_shows_no_data() {
    let state = Arc::new(Mutex::new(AppState::default()));
    let mut app = PingDashboard::from_state(state);
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.run();

    harness.get_by_label("No data");
    harness.get_by_label("Containers: 0");
}

#[test]
fn test_loading_hides_no_data() {
    let state = Arc::new(Mutex::new(AppState::default()));
    state.lock().unwrap().begin_fetch();

    let mut app = PingDashboard::from_state(state);
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    // The spinner keeps requesting repaints, so step a single frame.
    harness.step();

    assert!(harness.query_by_label("No data").is_none());
}

#[test]
fn test_startup_shows_spinner_not_no_data() {
    let state = Arc::new(Mutex::new(AppState::starting()));

    let mut app = PingDashboard::from_state(state.clone());
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.step();
    assert!(harness.query_by_label("No data").is_none());

    // The first fetch fails with nothing to show.
    {
        let mut s = lock_state(&state);
        s.begin_fetch();
        s.apply_fetch(1, Err("connection refused"));
    }
    harness.run();
    harness.get_by_label("No data");
}

// === Snapshot updates ===

#[test]
fn test_failed_fetch_keeps_rows() {
    let state = make_state(sample_rows());
    let mut app = PingDashboard::from_state(state.clone());
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1400.0, 600.0));
    harness.run();
    harness.get_by_label("web");

    {
        let mut s = state.lock().unwrap();
        s.begin_fetch();
        s.apply_fetch(2, Err("connection refused"));
    }
    harness.run();

    harness.get_by_label("web");
    harness.get_by_label("db");
    harness.get_by_label("Containers: 2");
}

#[test]
fn test_new_snapshot_replaces_rows() {
    let state = make_state(sample_rows());
    let mut app = PingDashboard::from_state(state.clone());
    let mut harness = Harness::new(|ctx| app.ui_layout(ctx));
    harness.set_size(egui::vec2(1400.0, 600.0));
    harness.run();

    {
        let mut s = state.lock().unwrap();
        s.begin_fetch();
        s.apply_fetch::<()>(2, Ok(vec![result(
            "172.17.0.9",
            "/cache",
            "Restarting (1) 2 seconds ago",
            3.0,
        )]));
    }
    harness.run();

    harness.get_by_label("cache");
    harness.get_by_label("Restarting (1) 2 seconds ago");
    assert!(harness.query_by_label("web").is_none());
    assert!(harness.query_by_label("db").is_none());
    harness.get_by_label("Containers: 1");
}
