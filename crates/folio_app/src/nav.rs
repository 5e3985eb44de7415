//! Navigation surface
//!
//! Header links, their highlight state, and the mobile menu. The surface only
//! renders what the section tracker reports; following a link asks the page to
//! scroll, and the highlight catches up once the observer reports the new
//! position.

use crate::config::PageConfig;
use folio_core::RegionId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub section: RegionId,
}

/// Render state of one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLinkState {
    pub label: String,
    pub section: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NavigationSurface {
    links: Vec<NavLink>,
    menu_open: bool,
}

impl NavigationSurface {
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            menu_open: false,
        }
    }

    /// One link per labelled section, in page order
    pub fn from_config(config: &PageConfig) -> Self {
        Self::new(
            config
                .sections
                .iter()
                .filter_map(|section| {
                    section.label.as_ref().map(|label| NavLink {
                        label: label.clone(),
                        section: RegionId::new(&section.id),
                    })
                })
                .collect(),
        )
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Links with their highlight for the given active section
    pub fn render(&self, active: Option<&RegionId>) -> Vec<NavLinkState> {
        self.links
            .iter()
            .map(|link| NavLinkState {
                label: link.label.clone(),
                section: link.section.to_string(),
                active: active == Some(&link.section),
            })
            .collect()
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Record a link click; the mobile menu always closes
    pub fn follow(&mut self) {
        self.menu_open = false;
    }

    /// Aria label of the theme toggle for the current dark flag
    pub fn theme_toggle_label(is_dark: bool) -> &'static str {
        if is_dark {
            "Switch to light mode"
        } else {
            "Switch to dark mode"
        }
    }
}
