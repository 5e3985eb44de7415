//! Page configuration (folio.toml)
//!
//! Describes the viewport, observer thresholds, animation timing, theme
//! persistence, and the ordered sections of the page with their content blocks.

use crate::error::{ConfigError, Result};
use folio_animation::{Easing, RevealTransition};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level page configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub header: HeaderConfig,
    #[serde(default)]
    pub observer: ObserverConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub reveal: RevealTransition,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1280.0
}

fn default_height() -> f32 {
    720.0
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct HeaderConfig {
    /// Scroll offset past which the header switches to its "scrolled" style
    #[serde(default = "default_scrolled_after")]
    pub scrolled_after: f32,
}

fn default_scrolled_after() -> f32 {
    10.0
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            scrolled_after: default_scrolled_after(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ObserverConfig {
    /// Visible fraction at which a section counts as intersecting
    #[serde(default = "default_section_threshold")]
    pub section_threshold: f32,
}

fn default_section_threshold() -> f32 {
    0.2
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            section_threshold: default_section_threshold(),
        }
    }
}

/// Smooth scroll timing
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScrollConfig {
    #[serde(default = "default_scroll_duration")]
    pub duration_ms: u32,
    #[serde(default = "default_scroll_easing")]
    pub easing: Easing,
}

fn default_scroll_duration() -> u32 {
    600
}

fn default_scroll_easing() -> Easing {
    Easing::EaseInOut
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_scroll_duration(),
            easing: default_scroll_easing(),
        }
    }
}

/// Placement of content blocks inside their section
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct LayoutConfig {
    #[serde(default = "default_section_padding")]
    pub section_padding: f32,
    #[serde(default = "default_block_gap")]
    pub block_gap: f32,
}

fn default_section_padding() -> f32 {
    80.0
}

fn default_block_gap() -> f32 {
    48.0
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            section_padding: default_section_padding(),
            block_gap: default_block_gap(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// File holding the persisted preference; in-memory only when unset
    #[serde(default)]
    pub store: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionConfig {
    pub id: String,
    /// Navigation label; sections without one are not linked
    #[serde(default)]
    pub label: Option<String>,
    pub height: f32,
    #[serde(default)]
    pub blocks: Vec<BlockConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BlockConfig {
    pub id: String,
    pub height: f32,
}

impl PageConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(input: &str) -> Result<Self> {
        let config: PageConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot describe a page
    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(ConfigError::Invalid("page has no sections".into()));
        }
        if !is_positive(self.viewport.width) || !is_positive(self.viewport.height) {
            return Err(ConfigError::Invalid("viewport must have a positive size".into()));
        }
        if !(0.0..=1.0).contains(&self.observer.section_threshold) {
            return Err(ConfigError::Invalid(format!(
                "section_threshold {} is outside [0, 1]",
                self.observer.section_threshold
            )));
        }

        let spacing = [
            ("header.scrolled_after", self.header.scrolled_after),
            ("layout.section_padding", self.layout.section_padding),
            ("layout.block_gap", self.layout.block_gap),
            ("reveal.offset_y", self.reveal.offset_y),
        ];
        for (name, value) in spacing {
            if !is_non_negative(value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a finite, non-negative length, got {value}"
                )));
            }
        }
        check_easing("scroll.easing", self.scroll.easing)?;
        check_easing("reveal.easing", self.reveal.easing)?;

        let mut seen = FxHashSet::default();
        for section in &self.sections {
            check_region(&mut seen, &section.id, section.height)?;
            for block in &section.blocks {
                check_region(&mut seen, &block.id, block.height)?;
            }
        }

        Ok(())
    }

    /// The built-in portfolio page: hero, about, projects, contact
    pub fn portfolio() -> Self {
        fn blocks(entries: &[(&str, f32)]) -> Vec<BlockConfig> {
            entries
                .iter()
                .map(|(id, height)| BlockConfig {
                    id: (*id).to_string(),
                    height: *height,
                })
                .collect()
        }

        Self {
            viewport: ViewportConfig::default(),
            header: HeaderConfig::default(),
            observer: ObserverConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealTransition::default(),
            layout: LayoutConfig::default(),
            theme: ThemeConfig::default(),
            sections: vec![
                SectionConfig {
                    id: "hero".into(),
                    label: Some("Home".into()),
                    height: 720.0,
                    blocks: blocks(&[("hero-content", 520.0)]),
                },
                SectionConfig {
                    id: "about".into(),
                    label: Some("About".into()),
                    height: 2000.0,
                    blocks: blocks(&[
                        ("about-heading", 100.0),
                        ("about-intro", 360.0),
                        ("about-skills", 360.0),
                        ("about-education", 340.0),
                        ("about-experience", 340.0),
                    ]),
                },
                SectionConfig {
                    id: "projects".into(),
                    label: Some("Projects".into()),
                    height: 1900.0,
                    blocks: blocks(&[
                        ("projects-heading", 100.0),
                        ("project-ecommerce", 340.0),
                        ("project-tasks", 340.0),
                        ("project-weather", 340.0),
                        ("project-portfolio", 340.0),
                    ]),
                },
                SectionConfig {
                    id: "contact".into(),
                    label: Some("Contact".into()),
                    height: 640.0,
                    blocks: blocks(&[("contact-content", 420.0)]),
                },
            ],
        }
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Control points of a cubic bezier must be finite, with x in `[0, 1]`
fn check_easing(name: &str, easing: Easing) -> Result<()> {
    if let Easing::CubicBezier(x1, y1, x2, y2) = easing {
        let valid = [x1, y1, x2, y2].iter().all(|v| v.is_finite())
            && (0.0..=1.0).contains(&x1)
            && (0.0..=1.0).contains(&x2);
        if !valid {
            return Err(ConfigError::Invalid(format!(
                "{name} has invalid control points ({x1}, {y1}, {x2}, {y2})"
            )));
        }
    }
    Ok(())
}

fn check_region<'a>(seen: &mut FxHashSet<&'a str>, id: &'a str, height: f32) -> Result<()> {
    if id.is_empty() {
        return Err(ConfigError::Invalid("region id must not be empty".into()));
    }
    if !seen.insert(id) {
        return Err(ConfigError::Invalid(format!("duplicate region id '{id}'")));
    }
    if !is_positive(height) {
        return Err(ConfigError::Invalid(format!(
            "region '{id}' must have a positive height"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portfolio_is_valid() {
        let config = PageConfig::portfolio();
        assert!(config.validate().is_ok());

        let ids: Vec<&str> = config.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "about", "projects", "contact"]);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config = PageConfig::from_toml(
            r#"
            [[sections]]
            id = "intro"
            height = 900.0
            "#,
        )
        .unwrap();

        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.observer.section_threshold, 0.2);
        assert_eq!(config.header.scrolled_after, 10.0);
        assert_eq!(config.reveal.duration_ms, 1000);
        assert!(config.sections[0].blocks.is_empty());
        assert!(config.theme.store.is_none());
    }

    #[test]
    fn test_full_toml() {
        let config = PageConfig::from_toml(
            r#"
            [viewport]
            width = 800.0
            height = 600.0

            [scroll]
            duration_ms = 300
            easing = "ease-out"

            [reveal]
            stagger_ms = 50

            [theme]
            store = "prefs.toml"

            [[sections]]
            id = "top"
            label = "Top"
            height = 600.0
            blocks = [{ id = "top-card", height = 200.0 }]
            "#,
        )
        .unwrap();

        assert_eq!(config.viewport.height, 600.0);
        assert_eq!(config.scroll.easing, Easing::EaseOut);
        assert_eq!(config.reveal.stagger_ms, 50);
        assert_eq!(config.reveal.offset_y, 40.0);
        assert_eq!(config.theme.store, Some(PathBuf::from("prefs.toml")));
        assert_eq!(config.sections[0].blocks[0].id, "top-card");
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = PageConfig::from_toml(
            r#"
            [[sections]]
            id = "a"
            height = 100.0
            blocks = [{ id = "a", height = 50.0 }]
            "#,
        )
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_empty_page_and_bad_threshold() {
        let err = PageConfig::from_toml("sections = []").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = PageConfig::from_toml(
            r#"
            [observer]
            section_threshold = 1.5

            [[sections]]
            id = "a"
            height = 100.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        for bad in [
            "[layout]\nblock_gap = -48.0",
            "[layout]\nsection_padding = nan",
            "[reveal]\noffset_y = inf",
            "[header]\nscrolled_after = -1.0",
            "[scroll]\neasing = { cubic-bezier = [1.5, 0.0, 0.2, 1.0] }",
        ] {
            let input = format!("{bad}\n\n[[sections]]\nid = \"a\"\nheight = 100.0\n");
            let err = PageConfig::from_toml(&input).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted: {bad}");
        }
    }

    #[test]
    fn test_zero_scroll_duration_is_allowed() {
        let config = PageConfig::from_toml(
            r#"
            [scroll]
            duration_ms = 0

            [[sections]]
            id = "a"
            height = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.duration_ms, 0);
    }

    #[test]
    fn test_parse_error() {
        let err = PageConfig::from_toml("sections = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
