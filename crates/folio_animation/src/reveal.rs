//! Reveal transitions
//!
//! Maps a block's `revealed` flag to presentation. Hidden blocks are dimmed and
//! pushed down; once revealed they fade and slide into place after a stagger
//! delay derived from their position within the section.

use crate::easing::Easing;
use crate::tween::Tween;
use serde::{Deserialize, Serialize};

/// Visual state of a content block
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    pub translate_y: f32,
}

impl RevealStyle {
    pub const SHOWN: RevealStyle = RevealStyle {
        opacity: 1.0,
        translate_y: 0.0,
    };
}

/// Timing and offset of the reveal transition
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealTransition {
    pub duration_ms: u32,
    /// Downward offset of hidden content, in px
    pub offset_y: f32,
    /// Delay of the first block in a section
    pub base_delay_ms: u32,
    /// Additional delay per following block
    pub stagger_ms: u32,
    pub easing: Easing,
}

impl Default for RevealTransition {
    fn default() -> Self {
        Self {
            duration_ms: 1000,
            offset_y: 40.0,
            base_delay_ms: 100,
            stagger_ms: 100,
            easing: Easing::STANDARD,
        }
    }
}

impl RevealTransition {
    pub fn hidden(&self) -> RevealStyle {
        RevealStyle {
            opacity: 0.0,
            translate_y: self.offset_y,
        }
    }

    /// Delay for the block at `index` within its section
    pub fn delay_for(&self, index: usize) -> u32 {
        let steps = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_delay_ms
            .saturating_add(self.stagger_ms.saturating_mul(steps))
    }

    /// Progress tween (0 → 1) for the block at `index`
    pub fn tween_for(&self, index: usize) -> Tween {
        Tween::new(0.0, 1.0, self.duration_ms)
            .delay(self.delay_for(index))
            .easing(self.easing)
    }

    /// Style at eased progress `t` (0 = hidden, 1 = shown)
    pub fn style_at(&self, t: f32) -> RevealStyle {
        let t = t.clamp(0.0, 1.0);
        RevealStyle {
            opacity: t,
            translate_y: self.offset_y * (1.0 - t),
        }
    }
}
