//! Page coordinator
//!
//! Wires the shared visibility observer to the reveal controller and the
//! section tracker, and exposes the registration, query, and command APIs the
//! page's components use.
//!
//! Everything runs on one thread. Scrolls and resizes only mark the page for
//! observation; the observation pass and delivery of its batches happen in the
//! next [`Page::frame`], so no query reflects a scroll until a frame has run.
//!
//! ```
//! use folio_app::{Page, PageConfig};
//!
//! let mut page = Page::new(PageConfig::portfolio());
//! page.frame(16.0);
//! assert_eq!(page.active_section(), Some("hero"));
//!
//! page.scroll_to_section("projects");
//! // Smooth scroll: nothing changes until frames run
//! assert_eq!(page.active_section(), Some("hero"));
//!
//! page.run_until_idle(16.0, 600);
//! assert_eq!(page.active_section(), Some("projects"));
//! ```

use crate::config::{PageConfig, ThemeConfig};
use crate::layout::PageLayout;
use crate::nav::{NavLinkState, NavigationSurface};
use folio_animation::{RevealStyle, Tween, TweenId, TweenScheduler};
use folio_core::{
    IntersectionBatch, LayoutSource, NodeHandle, Rect, RegionId, RegionKind, RevealController,
    SectionTracker, Size, VisibilityObserver, REVEAL_THRESHOLD,
};
use folio_theme::{FileStorage, MemoryStorage, ThemePreference, ThemeStore};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::rc::Rc;

/// Scroll targets closer than this snap instead of animating
const SCROLL_SNAP_DISTANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Registration {
    kind: RegionKind,
    node: NodeHandle,
}

/// Observable page state, used by scenario assertions and the CLI
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub scroll_y: f32,
    pub active_section: Option<String>,
    pub header_scrolled: bool,
    pub menu_open: bool,
    pub theme: ThemePreference,
    pub root_class: String,
    pub theme_toggle_label: String,
    pub links: Vec<NavLinkState>,
    /// Revealed blocks in document order
    pub revealed: Vec<String>,
    /// Blocks still hidden, in document order
    pub hidden: Vec<String>,
}

/// Open the theme store described by the config: file-backed when a store path
/// is set, otherwise in memory.
pub fn open_theme_store(config: &ThemeConfig) -> ThemeStore {
    match &config.store {
        Some(path) => ThemeStore::load(FileStorage::new(path)),
        None => ThemeStore::load(MemoryStorage::new()),
    }
}

pub struct Page {
    config: PageConfig,
    layout: PageLayout,
    observer: VisibilityObserver,
    reveal: RevealController,
    tracker: SectionTracker,
    registrations: FxHashMap<RegionId, Registration>,
    /// Position of each block within its section, for the reveal stagger
    stagger: FxHashMap<RegionId, usize>,
    nav: NavigationSurface,
    theme: Rc<ThemeStore>,
    animations: TweenScheduler,
    scroll_tween: Option<TweenId>,
    reveal_tweens: FxHashMap<RegionId, TweenId>,
    viewport: Size,
    scroll_y: f32,
    needs_observation: bool,
}

impl Page {
    /// Build the page with the theme store named in the config
    pub fn new(config: PageConfig) -> Self {
        let theme = Rc::new(open_theme_store(&config.theme));
        Self::with_theme(config, theme)
    }

    /// Build the page around an existing theme store and mount every section
    /// and block in document order.
    pub fn with_theme(config: PageConfig, theme: Rc<ThemeStore>) -> Self {
        let viewport = Size::new(config.viewport.width, config.viewport.height);
        let layout = PageLayout::build(&config, viewport.width);
        let nav = NavigationSurface::from_config(&config);

        let stagger = layout
            .blocks()
            .map(|block| (block.id.clone(), block.index))
            .collect();

        let mut page = Self {
            config,
            layout,
            observer: VisibilityObserver::new(),
            reveal: RevealController::new(),
            tracker: SectionTracker::new(),
            registrations: FxHashMap::default(),
            stagger,
            nav,
            theme,
            animations: TweenScheduler::new(),
            scroll_tween: None,
            reveal_tweens: FxHashMap::default(),
            viewport,
            scroll_y: 0.0,
            needs_observation: true,
        };

        let mounts: Vec<(RegionId, NodeHandle, RegionKind)> = page
            .layout
            .nodes()
            .iter()
            .map(|node| (node.id.clone(), node.node, node.kind))
            .collect();
        for (id, node, kind) in mounts {
            page.register_region(id, node, kind);
        }

        page
    }

    // ========== Registration ==========

    /// Register a section or content block.
    ///
    /// Registering an id twice replaces the earlier registration.
    pub fn register_region(&mut self, id: impl Into<RegionId>, node: NodeHandle, kind: RegionKind) {
        let id = id.into();

        if let Some(previous) = self.registrations.get(&id).map(|r| r.kind) {
            tracing::debug!("page: '{}' registered again, replacing", id);
            if previous != kind {
                self.unregister_region(id.as_str());
            }
        }

        match kind {
            RegionKind::Section => {
                self.observer
                    .register(id.clone(), node, self.config.observer.section_threshold);
                self.tracker.register(id.clone());
            }
            RegionKind::Block => {
                if self.reveal.mount(id.clone()) {
                    self.observer.register(id.clone(), node, REVEAL_THRESHOLD);
                } else {
                    // Already revealed, nothing left to observe
                    self.observer.unregister_region(id.as_str());
                }
            }
        }

        self.registrations.insert(id, Registration { kind, node });
        self.needs_observation = true;
    }

    /// Unregister a region. Events already observed for it are dropped.
    pub fn unregister_region(&mut self, id: &str) -> bool {
        let Some(registration) = self.registrations.remove(id) else {
            return false;
        };

        self.observer.unregister_region(id);
        match registration.kind {
            RegionKind::Section => {
                self.tracker.unregister(id);
            }
            RegionKind::Block => {
                self.reveal.unmount(id);
                if let Some(tween) = self.reveal_tweens.remove(id) {
                    self.animations.remove(tween);
                }
            }
        }

        tracing::debug!("page: unregistered '{}'", id);
        true
    }

    /// Remove a region's node from the document and unregister it
    pub fn unmount(&mut self, id: &str) -> bool {
        let Some(node) = self.registrations.get(id).map(|r| r.node) else {
            return false;
        };
        self.layout.remove(node);
        self.unregister_region(id)
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registrations.contains_key(id)
    }

    // ========== Commands ==========

    /// Smoothly scroll a section into view.
    ///
    /// Returns false (and does nothing else) when the section is unknown or
    /// its node is gone. The active section updates only as later frames
    /// observe the new position.
    pub fn scroll_to_section(&mut self, id: &str) -> bool {
        let Some(top) = self.section_top(id) else {
            tracing::debug!("page: no section '{}' to scroll to", id);
            return false;
        };

        self.nav.follow();
        self.animate_scroll_to(top);
        true
    }

    /// Smoothly scroll back to the top of the page
    pub fn scroll_to_top(&mut self) {
        self.animate_scroll_to(0.0);
    }

    /// Jump to an offset, as a user scroll does. Cancels any smooth scroll.
    pub fn scroll_to(&mut self, y: f32) {
        self.cancel_smooth_scroll();
        self.set_scroll(y);
    }

    pub fn scroll_by(&mut self, dy: f32) {
        self.scroll_to(self.scroll_y + dy);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Size::new(width.max(0.0), height.max(0.0));
        self.layout.set_width(self.viewport.width);
        self.set_scroll(self.scroll_y);
        self.needs_observation = true;
    }

    pub fn toggle_theme(&self) -> ThemePreference {
        self.theme.toggle()
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.nav.toggle_menu()
    }

    // ========== Frame loop ==========

    /// Advance animations by `dt_ms`, then run an observation pass if the
    /// page moved and deliver its batches.
    ///
    /// Returns true while animations are still running.
    pub fn frame(&mut self, dt_ms: f32) -> bool {
        self.animations.tick(dt_ms);

        if let Some(id) = self.scroll_tween {
            match self.animations.get(id) {
                Some(tween) if tween.is_finished() => {
                    let target = tween.target();
                    self.animations.remove(id);
                    self.scroll_tween = None;
                    self.set_scroll(target);
                }
                Some(tween) => {
                    let y = tween.value();
                    self.set_scroll(y);
                }
                None => self.scroll_tween = None,
            }
        }

        self.prune_reveal_tweens();

        if self.needs_observation {
            self.needs_observation = false;
            self.observe();
        }

        self.is_animating()
    }

    /// Run frames until animations settle, up to `max_frames`.
    ///
    /// Returns the number of frames run.
    pub fn run_until_idle(&mut self, dt_ms: f32, max_frames: u32) -> u32 {
        for frame in 1..=max_frames {
            if !self.frame(dt_ms) {
                return frame;
            }
        }
        max_frames
    }

    pub fn is_animating(&self) -> bool {
        self.scroll_tween.is_some() || self.animations.has_active()
    }

    pub fn is_smooth_scrolling(&self) -> bool {
        self.scroll_tween.is_some()
    }

    // ========== Queries ==========

    /// Section whose nav link is highlighted
    pub fn active_section(&self) -> Option<&str> {
        self.tracker.active_section().map(RegionId::as_str)
    }

    pub fn is_revealed(&self, id: &str) -> bool {
        self.reveal.is_revealed(id)
    }

    /// Presentation of a block: hidden until revealed, then transitioning
    pub fn reveal_style(&self, id: &str) -> RevealStyle {
        if !self.reveal.is_revealed(id) {
            return self.config.reveal.hidden();
        }

        match self
            .reveal_tweens
            .get(id)
            .and_then(|tween| self.animations.value(*tween))
        {
            Some(progress) => self.config.reveal.style_at(progress),
            None => RevealStyle::SHOWN,
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport.width, self.viewport.height)
    }

    pub fn max_scroll(&self) -> f32 {
        (self.layout.content_height() - self.viewport.height).max(0.0)
    }

    pub fn is_header_scrolled(&self) -> bool {
        self.scroll_y > self.config.header.scrolled_after
    }

    pub fn is_menu_open(&self) -> bool {
        self.nav.is_menu_open()
    }

    pub fn nav_links(&self) -> Vec<NavLinkState> {
        self.nav.render(self.tracker.active_section())
    }

    pub fn theme(&self) -> &Rc<ThemeStore> {
        &self.theme
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PageSnapshot {
        let (revealed, hidden): (Vec<_>, Vec<_>) = self
            .layout
            .blocks()
            .filter(|block| self.registrations.contains_key(&block.id))
            .map(|block| block.id.to_string())
            .partition(|id| self.reveal.is_revealed(id));

        PageSnapshot {
            scroll_y: self.scroll_y,
            active_section: self.active_section().map(str::to_string),
            header_scrolled: self.is_header_scrolled(),
            menu_open: self.is_menu_open(),
            theme: self.theme.preference(),
            root_class: self.theme.root_class().to_string(),
            theme_toggle_label: NavigationSurface::theme_toggle_label(
                self.theme.preference().is_dark(),
            )
            .to_string(),
            links: self.nav_links(),
            revealed,
            hidden,
        }
    }

    // ========== Internals ==========

    fn section_top(&self, id: &str) -> Option<f32> {
        let registration = self.registrations.get(id)?;
        if registration.kind != RegionKind::Section {
            return None;
        }
        self.layout.bounds(registration.node).map(|bounds| bounds.top())
    }

    fn animate_scroll_to(&mut self, target: f32) {
        self.cancel_smooth_scroll();

        let target = target.clamp(0.0, self.max_scroll());
        if (target - self.scroll_y).abs() < SCROLL_SNAP_DISTANCE {
            self.set_scroll(target);
            return;
        }

        let scroll = self.config.scroll;
        let tween = Tween::new(self.scroll_y, target, scroll.duration_ms).easing(scroll.easing);
        self.scroll_tween = Some(self.animations.add(tween));
        tracing::debug!("page: smooth scroll {:.0} -> {:.0}", self.scroll_y, target);
    }

    fn cancel_smooth_scroll(&mut self) {
        if let Some(id) = self.scroll_tween.take() {
            self.animations.remove(id);
        }
    }

    fn set_scroll(&mut self, y: f32) {
        let y = y.clamp(0.0, self.max_scroll());
        if y != self.scroll_y {
            self.scroll_y = y;
            self.needs_observation = true;
        }
    }

    /// Drop finished tweens; revealed blocks without one render as shown
    fn prune_reveal_tweens(&mut self) {
        if self.animations.prune_finished() == 0 {
            return;
        }
        let animations = &self.animations;
        self.reveal_tweens.retain(|_, tween| animations.get(*tween).is_some());
    }

    fn observe(&mut self) {
        let viewport = self.viewport();
        let batches = self.observer.observe(viewport, &self.layout);
        for batch in batches {
            self.deliver(batch);
        }
    }

    fn deliver(&mut self, mut batch: IntersectionBatch) {
        let registrations = &self.registrations;
        batch.retain(|id| registrations.contains_key(id));

        let mut sections = IntersectionBatch {
            threshold: batch.threshold,
            ordinal: batch.ordinal,
            ..Default::default()
        };

        for event in batch.events {
            let Some(kind) = self.registrations.get(&event.region_id).map(|r| r.kind) else {
                continue;
            };

            match kind {
                RegionKind::Section => sections.events.push(event),
                RegionKind::Block => {
                    if self.reveal.on_intersection(&event) {
                        self.observer.unregister_region(event.region_id.as_str());
                        self.start_reveal(&event.region_id);
                    }
                }
            }
        }

        if !sections.is_empty() && self.tracker.on_batch(&sections) {
            tracing::debug!("page: active section is now {:?}", self.active_section());
        }
    }

    fn start_reveal(&mut self, id: &RegionId) {
        let index = self.stagger.get(id).copied().unwrap_or(0);
        let tween = self.animations.add(self.config.reveal.tween_for(index));
        if let Some(previous) = self.reveal_tweens.insert(id.clone(), tween) {
            self.animations.remove(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f32 = 16.0;

    fn page() -> Page {
        let mut page = Page::with_theme(
            PageConfig::portfolio(),
            Rc::new(ThemeStore::in_memory(ThemePreference::Light)),
        );
        page.frame(FRAME_MS);
        page
    }

    #[test]
    fn test_nothing_is_active_before_first_frame() {
        let page = Page::with_theme(PageConfig::portfolio(), Rc::new(ThemeStore::default()));
        assert_eq!(page.active_section(), None);
        assert!(!page.is_revealed("hero-content"));
    }

    #[test]
    fn test_first_frame_activates_hero() {
        let page = page();
        assert_eq!(page.active_section(), Some("hero"));
        assert!(page.is_revealed("hero-content"));
        assert!(!page.is_revealed("about-heading"));
        assert_eq!(page.observer().group_count(), 2);
    }

    #[test]
    fn test_scroll_to_section_is_deferred() {
        let mut page = page();

        assert!(page.scroll_to_section("projects"));
        assert!(page.is_smooth_scrolling());
        assert_eq!(page.scroll_y(), 0.0);
        assert_eq!(page.active_section(), Some("hero"));

        page.run_until_idle(FRAME_MS, 200);
        assert_eq!(page.scroll_y(), 2720.0);
        assert_eq!(page.active_section(), Some("projects"));
    }

    #[test]
    fn test_scroll_target_is_clamped() {
        let mut page = page();
        page.scroll_to_section("contact");
        page.run_until_idle(FRAME_MS, 200);

        assert_eq!(page.scroll_y(), page.max_scroll());
        assert_eq!(page.active_section(), Some("contact"));
    }

    #[test]
    fn test_unknown_section_is_a_no_op() {
        let mut page = page();
        page.toggle_menu();

        assert!(!page.scroll_to_section("blog"));
        assert!(!page.is_smooth_scrolling());
        assert!(page.is_menu_open());
        assert_eq!(page.active_section(), Some("hero"));
    }

    #[test]
    fn test_following_a_link_closes_menu() {
        let mut page = page();
        page.toggle_menu();
        assert!(page.scroll_to_section("about"));
        assert!(!page.is_menu_open());
    }

    #[test]
    fn test_user_scroll_cancels_smooth_scroll() {
        let mut page = page();
        page.scroll_to_section("contact");
        page.frame(FRAME_MS);

        page.scroll_to(800.0);
        assert!(!page.is_smooth_scrolling());
        page.run_until_idle(FRAME_MS, 200);
        assert_eq!(page.scroll_y(), 800.0);
    }

    #[test]
    fn test_scroll_to_top() {
        let mut page = page();
        page.scroll_to(3000.0);
        page.frame(FRAME_MS);

        page.scroll_to_top();
        page.run_until_idle(FRAME_MS, 200);
        assert_eq!(page.scroll_y(), 0.0);
        assert_eq!(page.active_section(), Some("hero"));
    }

    #[test]
    fn test_header_scrolled_after_threshold() {
        let mut page = page();
        page.scroll_to(10.0);
        assert!(!page.is_header_scrolled());
        page.scroll_by(1.0);
        assert!(page.is_header_scrolled());
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let mut page = page();

        page.scroll_to(300.0);
        page.frame(FRAME_MS);
        assert!(page.is_revealed("about-heading"));
        assert!(!page.observer().is_observing("about-heading"));

        page.scroll_to(0.0);
        page.frame(FRAME_MS);
        assert!(page.is_revealed("about-heading"));
    }

    #[test]
    fn test_reveal_style_transitions_to_shown() {
        let mut page = page();
        let hidden = page.config().reveal.hidden();
        assert_eq!(page.reveal_style("about-heading"), hidden);

        // Still inside the 100ms delay
        assert_eq!(page.reveal_style("hero-content"), hidden);

        page.run_until_idle(FRAME_MS, 200);
        assert_eq!(page.reveal_style("hero-content"), RevealStyle::SHOWN);
    }

    #[test]
    fn test_remount_keeps_revealed_block_unobserved() {
        let mut page = page();
        let node = page.layout().find("hero-content").unwrap().node;

        page.register_region("hero-content", node, RegionKind::Block);
        assert!(page.is_revealed("hero-content"));
        assert!(!page.observer().is_observing("hero-content"));
    }

    #[test]
    fn test_unmounted_section_cannot_be_scrolled_to() {
        let mut page = page();
        assert!(page.unmount("contact"));
        assert!(!page.is_registered("contact"));
        assert!(!page.scroll_to_section("contact"));
        assert!(!page.unmount("contact"));
    }

    #[test]
    fn test_unregistering_active_section_falls_back() {
        let mut page = page();
        page.resize(1280.0, 2000.0);
        page.frame(FRAME_MS);
        assert_eq!(page.active_section(), Some("hero"));

        page.unregister_region("hero");
        assert_eq!(page.active_section(), Some("about"));
    }

    #[test]
    fn test_resize_triggers_observation() {
        let mut page = page();
        assert!(!page.is_revealed("about-intro"));

        page.resize(1280.0, 2000.0);
        assert!(!page.is_revealed("about-intro"));
        page.frame(FRAME_MS);
        assert!(page.is_revealed("about-intro"));
    }

    #[test]
    fn test_nav_links_follow_active_section() {
        let mut page = page();
        page.scroll_to(2000.0);
        page.frame(FRAME_MS);

        let active: Vec<_> = page
            .nav_links()
            .into_iter()
            .filter(|link| link.active)
            .map(|link| link.section)
            .collect();
        assert_eq!(active, vec!["about".to_string()]);
    }

    #[test]
    fn test_theme_toggle_is_shared() {
        let theme = Rc::new(ThemeStore::in_memory(ThemePreference::Light));
        let page = Page::with_theme(PageConfig::portfolio(), theme.clone());

        assert_eq!(page.toggle_theme(), ThemePreference::Dark);
        assert_eq!(theme.preference(), ThemePreference::Dark);
        let snapshot = page.snapshot();
        assert_eq!(snapshot.root_class, "dark");
        assert_eq!(snapshot.theme_toggle_label, "Switch to light mode");
    }

    #[test]
    fn test_snapshot_lists_blocks_in_document_order() {
        let page = page();
        let snapshot = page.snapshot();

        assert_eq!(snapshot.revealed, vec!["hero-content".to_string()]);
        assert_eq!(snapshot.hidden.first().map(String::as_str), Some("about-heading"));
        assert_eq!(snapshot.hidden.last().map(String::as_str), Some("contact-content"));
        assert_eq!(snapshot.active_section.as_deref(), Some("hero"));
    }
}
