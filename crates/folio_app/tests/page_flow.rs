//! Integration tests for the page coordinator
//!
//! These tests verify that:
//! - The active section follows scrolling and prefers the earliest section
//! - Smooth scrolling only changes state on later frames
//! - Content blocks reveal once and stay revealed
//! - The theme preference survives a reload through the file store

use folio_app::{Page, PageConfig};
use folio_core::{NodeHandle, RegionKind};
use folio_theme::{ThemePreference, ThemeStore};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

const FRAME_MS: f32 = 16.0;

fn page() -> Page {
    let mut page = Page::with_theme(
        PageConfig::portfolio(),
        Rc::new(ThemeStore::in_memory(ThemePreference::Light)),
    );
    page.frame(FRAME_MS);
    page
}

fn settle(page: &mut Page) {
    page.run_until_idle(FRAME_MS, 500);
}

fn temp_path(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    std::env::temp_dir()
        .join(format!("folio-page-{}-{}", std::process::id(), nanos))
        .join(name)
}

#[test]
fn test_sections_register_in_document_order() {
    let page = page();
    let sections: Vec<_> = page
        .nav_links()
        .into_iter()
        .map(|link| link.section)
        .collect();
    assert_eq!(sections, ["hero", "about", "projects", "contact"]);
}

#[test]
fn test_active_section_follows_scroll() {
    let mut page = page();
    assert_eq!(page.active_section(), Some("hero"));

    page.scroll_to(720.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("about"));

    page.scroll_to(3000.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("projects"));

    page.scroll_to(0.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("hero"));
}

#[test]
fn test_earliest_intersecting_section_wins() {
    let mut page = page();
    page.scroll_to(720.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("about"));

    // about 520/2000 and projects 480/1900 both cross 0.2
    page.resize(1280.0, 1000.0);
    page.scroll_to(2200.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("about"));
}

#[test]
fn test_active_section_holds_between_sections() {
    let mut page = page();
    page.scroll_to(720.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("about"));

    // Deep inside about: no section changes state, nothing new to report
    page.scroll_to(1500.0);
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("about"));
}

#[test]
fn test_nav_click_scrolls_on_later_frames() {
    let mut page = page();

    assert!(page.scroll_to_section("contact"));
    assert_eq!(page.active_section(), Some("hero"));
    assert_eq!(page.scroll_y(), 0.0);

    page.frame(FRAME_MS);
    assert!(page.scroll_y() > 0.0);
    assert!(page.scroll_y() < page.max_scroll());

    settle(&mut page);
    assert_eq!(page.scroll_y(), page.max_scroll());
    assert_eq!(page.active_section(), Some("contact"));
    assert!(page.is_header_scrolled());

    let active: Vec<_> = page.nav_links().into_iter().filter(|l| l.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].label, "Contact");
}

#[test]
fn test_zero_duration_scroll_jumps_on_next_frame() {
    let config = PageConfig::from_toml(
        r#"
        [scroll]
        duration_ms = 0

        [[sections]]
        id = "a"
        label = "A"
        height = 720.0

        [[sections]]
        id = "b"
        label = "B"
        height = 720.0
        "#,
    )
    .unwrap();
    let mut page = Page::with_theme(config, Rc::new(ThemeStore::default()));
    page.frame(FRAME_MS);
    assert_eq!(page.active_section(), Some("a"));

    assert!(page.scroll_to_section("b"));
    assert_eq!(page.scroll_y(), 0.0);

    page.frame(FRAME_MS);
    assert_eq!(page.scroll_y(), 720.0);
    assert_eq!(page.active_section(), Some("b"));
    assert!(!page.is_smooth_scrolling());
}

#[test]
fn test_missing_target_is_ignored() {
    let mut page = page();
    assert!(page.unmount("projects"));

    assert!(!page.scroll_to_section("projects"));
    assert!(!page.scroll_to_section("does-not-exist"));
    assert!(!page.is_smooth_scrolling());
    assert_eq!(page.scroll_y(), 0.0);
}

#[test]
fn test_block_reveals_once_scrolled_into_view() {
    let mut page = page();

    // about-intro spans 948..1308: 18px (5%) visible
    page.scroll_to(246.0);
    page.frame(FRAME_MS);
    assert!(!page.is_revealed("about-intro"));

    // 72px (20%) visible
    page.scroll_to(300.0);
    page.frame(FRAME_MS);
    assert!(page.is_revealed("about-intro"));

    page.scroll_to(4000.0);
    page.frame(FRAME_MS);
    page.scroll_to(0.0);
    page.frame(FRAME_MS);
    assert!(page.is_revealed("about-intro"));
}

#[test]
fn test_unvisited_blocks_stay_hidden() {
    let mut page = page();
    for _ in 0..100 {
        page.frame(FRAME_MS);
    }

    let hidden = page.config().reveal.hidden();
    assert!(!page.is_revealed("contact-content"));
    assert_eq!(page.reveal_style("contact-content"), hidden);
}

#[test]
fn test_blocks_in_a_section_stagger() {
    let mut page = page();
    page.resize(1280.0, 2000.0);
    page.frame(FRAME_MS);

    assert!(page.is_revealed("about-heading"));
    assert!(page.is_revealed("about-skills"));

    // 240ms in: heading (100ms delay) is moving, skills (300ms delay) is not
    for _ in 0..15 {
        page.frame(FRAME_MS);
    }
    let heading = page.reveal_style("about-heading");
    let skills = page.reveal_style("about-skills");
    assert!(heading.opacity > 0.0);
    assert_eq!(skills.opacity, 0.0);

    settle(&mut page);
    assert_eq!(page.reveal_style("about-skills").opacity, 1.0);
}

#[test]
fn test_dynamic_registration_is_observed() {
    let mut page = page();

    // An unknown node handle has no layout: never reported
    page.register_region("late-card", NodeHandle(9999), RegionKind::Block);
    page.frame(FRAME_MS);
    assert!(!page.is_revealed("late-card"));
    assert!(page.is_registered("late-card"));

    assert!(page.unregister_region("late-card"));
    assert!(!page.unregister_region("late-card"));
}

#[test]
fn test_theme_toggle_is_an_involution() {
    let theme = Rc::new(ThemeStore::in_memory(ThemePreference::Light));
    let page = Page::with_theme(PageConfig::portfolio(), theme.clone());

    assert_eq!(page.toggle_theme(), ThemePreference::Dark);
    assert_eq!(theme.root_class(), "dark");
    assert_eq!(page.toggle_theme(), ThemePreference::Light);
    assert_eq!(theme.root_class(), "");
}

#[test]
fn test_theme_survives_reload() {
    let path = temp_path("theme.toml");
    let mut config = PageConfig::portfolio();
    config.theme.store = Some(path.clone());

    let page = Page::new(config.clone());
    assert_eq!(page.theme().preference(), ThemePreference::Light);
    assert!(page.theme().is_persistent());
    page.toggle_theme();
    drop(page);

    let reloaded = Page::new(config);
    assert_eq!(reloaded.theme().preference(), ThemePreference::Dark);

    if let Some(dir) = path.parent() {
        let _ = std::fs::remove_dir_all(dir);
    }
}
