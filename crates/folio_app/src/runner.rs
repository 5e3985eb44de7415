//! Scenario runner that replays steps against a page.
//!
//! Frames advance on a fixed logical clock, so runs are deterministic.

use crate::assert::{
    evaluate_assert_active, evaluate_assert_hidden, evaluate_assert_revealed,
    evaluate_assert_theme, evaluate_flag, AssertionResult,
};
use crate::page::Page;
use crate::report::ScenarioReport;
use crate::scenario::{Scenario, ScenarioStep};
use anyhow::{bail, Result};

/// Frame timing of a run
#[derive(Debug, Clone, Copy)]
pub struct RunConfig {
    /// Logical milliseconds between frames.
    pub tick_ms: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { tick_ms: 16 }
    }
}

/// Final outcome of a scenario run.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Passed { report: ScenarioReport },
    Failed { report: ScenarioReport },
}

impl RunOutcome {
    pub fn report(&self) -> &ScenarioReport {
        match self {
            RunOutcome::Passed { report } => report,
            RunOutcome::Failed { report } => report,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }
}

/// Execute scenario JSON against a page.
pub fn run_scenario(input: &str, page: &mut Page) -> Result<RunOutcome> {
    let scenario = Scenario::from_json(input)?;
    run_loaded_scenario(&scenario, page, RunConfig::default())
}

/// Execute a pre-loaded scenario against a page.
///
/// Stops at the first failing assertion.
pub fn run_loaded_scenario(
    scenario: &Scenario,
    page: &mut Page,
    config: RunConfig,
) -> Result<RunOutcome> {
    if config.tick_ms == 0 {
        bail!("tick_ms must be > 0");
    }

    let mut clock = FrameClock::default();

    for (step_index, step) in scenario.steps.iter().enumerate() {
        let result = match step {
            ScenarioStep::ScrollTo { y } => {
                page.scroll_to(*y);
                AssertionResult::Passed
            }
            ScenarioStep::ScrollBy { dy } => {
                page.scroll_by(*dy);
                AssertionResult::Passed
            }
            ScenarioStep::Navigate { section } => {
                if !page.scroll_to_section(section) {
                    tracing::info!("scenario: step {}: no section '{}'", step_index, section);
                }
                AssertionResult::Passed
            }
            ScenarioStep::ScrollToTop => {
                page.scroll_to_top();
                AssertionResult::Passed
            }
            ScenarioStep::Resize { width, height } => {
                page.resize(*width, *height);
                AssertionResult::Passed
            }
            ScenarioStep::Tick { frames } => {
                for _ in 0..*frames {
                    clock.advance(page, config.tick_ms);
                }
                AssertionResult::Passed
            }
            ScenarioStep::Wait { ms } => {
                let mut remaining_ms = *ms;
                while remaining_ms > 0 {
                    let step_ms = remaining_ms.min(config.tick_ms);
                    remaining_ms -= step_ms;
                    clock.advance(page, step_ms);
                }
                AssertionResult::Passed
            }
            ScenarioStep::ToggleTheme => {
                page.toggle_theme();
                AssertionResult::Passed
            }
            ScenarioStep::ToggleMenu => {
                page.toggle_menu();
                AssertionResult::Passed
            }
            ScenarioStep::AssertActive { section } => {
                evaluate_assert_active(section.as_deref(), &page.snapshot())
            }
            ScenarioStep::AssertRevealed { id } => evaluate_assert_revealed(id, &page.snapshot()),
            ScenarioStep::AssertHidden { id } => evaluate_assert_hidden(id, &page.snapshot()),
            ScenarioStep::AssertTheme { theme } => evaluate_assert_theme(*theme, &page.snapshot()),
            ScenarioStep::AssertHeaderScrolled { scrolled } => evaluate_flag(
                "header_mismatch",
                "header_scrolled",
                *scrolled,
                page.is_header_scrolled(),
            ),
            ScenarioStep::AssertMenuOpen { open } => {
                evaluate_flag("menu_mismatch", "menu_open", *open, page.is_menu_open())
            }
        };

        if let AssertionResult::Failed { code, message } = result {
            let assertion = step.assertion_name().unwrap_or("step");
            tracing::debug!("scenario: step {} failed: {}", step_index, message);
            let report = ScenarioReport::failed(
                assertion,
                step_index,
                code,
                message,
                clock.frames,
                clock.elapsed_ms,
                page.snapshot(),
            );
            return Ok(RunOutcome::Failed { report });
        }
    }

    Ok(RunOutcome::Passed {
        report: ScenarioReport::passed(clock.frames, clock.elapsed_ms, page.snapshot()),
    })
}

#[derive(Debug, Default)]
struct FrameClock {
    frames: u64,
    elapsed_ms: u64,
}

impl FrameClock {
    fn advance(&mut self, page: &mut Page, dt_ms: u64) {
        self.frames = self.frames.saturating_add(1);
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        page.frame(dt_ms as f32);
    }
}
