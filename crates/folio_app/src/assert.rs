//! Assertion helpers for headless page runs.

use crate::page::PageSnapshot;
use folio_theme::ThemePreference;

/// Assertion result with structured failure details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertionResult {
    Passed,
    Failed { code: String, message: String },
}

impl AssertionResult {
    fn failed(code: &str, message: String) -> Self {
        AssertionResult::Failed {
            code: code.to_string(),
            message,
        }
    }
}

pub fn evaluate_assert_active(expected: Option<&str>, snapshot: &PageSnapshot) -> AssertionResult {
    let actual = snapshot.active_section.as_deref();
    if actual == expected {
        return AssertionResult::Passed;
    }
    AssertionResult::failed(
        "active_mismatch",
        format!(
            "expected active section {}, got {}",
            describe(expected),
            describe(actual)
        ),
    )
}

pub fn evaluate_assert_revealed(id: &str, snapshot: &PageSnapshot) -> AssertionResult {
    if snapshot.revealed.iter().any(|block| block == id) {
        AssertionResult::Passed
    } else if snapshot.hidden.iter().any(|block| block == id) {
        AssertionResult::failed("still_hidden", format!("{id}: block is still hidden"))
    } else {
        missing_block(id)
    }
}

pub fn evaluate_assert_hidden(id: &str, snapshot: &PageSnapshot) -> AssertionResult {
    if snapshot.hidden.iter().any(|block| block == id) {
        AssertionResult::Passed
    } else if snapshot.revealed.iter().any(|block| block == id) {
        AssertionResult::failed("already_revealed", format!("{id}: block was revealed"))
    } else {
        missing_block(id)
    }
}

pub fn evaluate_assert_theme(expected: ThemePreference, snapshot: &PageSnapshot) -> AssertionResult {
    if snapshot.theme == expected {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(
            "theme_mismatch",
            format!("expected theme '{expected}', got '{}'", snapshot.theme),
        )
    }
}

pub fn evaluate_flag(code: &str, name: &str, expected: bool, actual: bool) -> AssertionResult {
    if expected == actual {
        AssertionResult::Passed
    } else {
        AssertionResult::failed(code, format!("expected {name} to be {expected}, got {actual}"))
    }
}

fn missing_block(id: &str) -> AssertionResult {
    AssertionResult::failed("missing_block", format!("{id}: block not found"))
}

fn describe(section: Option<&str>) -> String {
    match section {
        Some(id) => format!("'{id}'"),
        None => "none".to_string(),
    }
}
