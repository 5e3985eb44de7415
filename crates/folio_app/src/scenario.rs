//! Scenario definition for headless page runs.

use anyhow::{Context, Result};
use folio_theme::ThemePreference;
use serde::Deserialize;
use std::path::Path;

/// Sequence of steps replayed against a page.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from JSON text.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Load a scenario from file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("invalid scenario {}", path.display()))
    }
}

/// User actions, frame advances, and assertions.
///
/// Actions never advance frames on their own; follow them with `tick` or
/// `wait` to let the page observe the result.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScenarioStep {
    ScrollTo { y: f32 },
    ScrollBy { dy: f32 },
    /// Follow a nav link
    Navigate { section: String },
    ScrollToTop,
    Resize { width: f32, height: f32 },
    Tick { frames: u32 },
    Wait { ms: u64 },
    ToggleTheme,
    ToggleMenu,
    /// `null` asserts that no section is active
    AssertActive { section: Option<String> },
    AssertRevealed { id: String },
    AssertHidden { id: String },
    AssertTheme { theme: ThemePreference },
    AssertHeaderScrolled { scrolled: bool },
    AssertMenuOpen { open: bool },
}

impl ScenarioStep {
    /// Assertion name used in reports, `None` for actions
    pub fn assertion_name(&self) -> Option<&'static str> {
        match self {
            ScenarioStep::AssertActive { .. } => Some("assert_active"),
            ScenarioStep::AssertRevealed { .. } => Some("assert_revealed"),
            ScenarioStep::AssertHidden { .. } => Some("assert_hidden"),
            ScenarioStep::AssertTheme { .. } => Some("assert_theme"),
            ScenarioStep::AssertHeaderScrolled { .. } => Some("assert_header_scrolled"),
            ScenarioStep::AssertMenuOpen { .. } => Some("assert_menu_open"),
            _ => None,
        }
    }
}
