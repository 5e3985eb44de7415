//! Integration tests for the headless scenario runner
//!
//! Replays the scenario and page config shipped in `demos/` and checks the
//! JSON report of a failing run.

use folio_app::{
    run_loaded_scenario, run_scenario, Page, PageConfig, ReportStatus, RunConfig, Scenario,
};
use folio_theme::ThemeStore;
use std::path::PathBuf;
use std::rc::Rc;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn page(config: PageConfig) -> Page {
    Page::with_theme(config, Rc::new(ThemeStore::default()))
}

#[test]
fn test_demo_config_matches_builtin_layout() {
    let config = PageConfig::load(&demo("portfolio.toml")).unwrap();
    let builtin = PageConfig::portfolio();

    let loaded = page(config);
    let expected = page(builtin);
    assert_eq!(
        loaded.layout().content_height(),
        expected.layout().content_height()
    );
    assert_eq!(loaded.layout().nodes().len(), expected.layout().nodes().len());
}

#[test]
fn test_demo_tour_passes() {
    let config = PageConfig::load(&demo("portfolio.toml")).unwrap();
    let scenario = Scenario::from_path(&demo("tour.json")).unwrap();

    let mut page = page(config);
    let outcome = run_loaded_scenario(&scenario, &mut page, RunConfig::default()).unwrap();

    let report = outcome.report();
    assert_eq!(report.status, ReportStatus::Passed, "{:?}", report.message);
    assert_eq!(report.page.theme, folio_theme::ThemePreference::Dark);
    assert_eq!(report.page.active_section.as_deref(), Some("hero"));
}

#[test]
fn test_failed_report_json() {
    let mut page = page(PageConfig::portfolio());
    let outcome = run_scenario(
        r#"{
            "steps": [
                { "type": "tick", "frames": 2 },
                { "type": "scroll_to", "y": 5000 },
                { "type": "tick", "frames": 1 },
                { "type": "assert_hidden", "id": "contact-content" }
            ]
        }"#,
        &mut page,
    )
    .unwrap();
    assert!(outcome.is_failed());

    let mut out = Vec::new();
    outcome.report().write_to_writer(&mut out).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(json["status"], "failed");
    assert_eq!(json["failed_step_index"], 3);
    assert_eq!(json["assertion"], "assert_hidden");
    assert_eq!(json["code"], "already_revealed");
    assert_eq!(json["elapsed_frames"], 3);
    assert_eq!(json["elapsed_ms"], 48);
    assert_eq!(json["page"]["scroll_y"], 4540.0);
    assert_eq!(json["page"]["active_section"], "contact");
}
