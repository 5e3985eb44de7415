//! Folio Application
//!
//! Page coordinator for a single-page site: lays out sections and content
//! blocks, feeds scroll and resize through the shared visibility observer,
//! highlights the active section in the navigation, reveals content blocks
//! once, and keeps the light/dark preference.
//!
//! # Example
//!
//! ```rust
//! use folio_app::prelude::*;
//!
//! let mut page = Page::new(PageConfig::portfolio());
//! page.frame(16.0);
//!
//! let outcome = run_scenario(
//!     r#"{ "steps": [
//!         { "type": "navigate", "section": "contact" },
//!         { "type": "wait", "ms": 800 },
//!         { "type": "assert_active", "section": "contact" }
//!     ] }"#,
//!     &mut page,
//! )?;
//! assert!(!outcome.is_failed());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod assert;
pub mod config;
pub mod error;
pub mod layout;
pub mod nav;
pub mod page;
pub mod report;
pub mod runner;
pub mod scenario;

pub use config::PageConfig;
pub use error::{ConfigError, Result};
pub use layout::{LayoutNode, PageLayout};
pub use nav::{NavLink, NavLinkState, NavigationSurface};
pub use page::{open_theme_store, Page, PageSnapshot};
pub use report::{ReportStatus, ScenarioReport};
pub use runner::{run_loaded_scenario, run_scenario, RunConfig, RunOutcome};
pub use scenario::{Scenario, ScenarioStep};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::config::PageConfig;
    pub use crate::page::{Page, PageSnapshot};
    pub use crate::runner::{run_scenario, RunOutcome};

    pub use folio_animation::{Easing, RevealStyle};
    pub use folio_core::{NodeHandle, Rect, RegionId, RegionKind};
    pub use folio_theme::{ThemePreference, ThemeStore};
}
