//! Folio Animation
//!
//! Time-based animation for page presentation.
//!
//! # Features
//!
//! - **Easing**: CSS timing curves (`ease`, `ease-out`, `cubic-bezier(...)`)
//! - **Tweens**: delayed, eased interpolation between two values
//! - **Scheduler**: ticks every active tween from the host's frame loop
//! - **Reveal transitions**: hidden → final style for revealed content blocks

pub mod easing;
pub mod reveal;
pub mod scheduler;
pub mod tween;

pub use easing::Easing;
pub use reveal::{RevealStyle, RevealTransition};
pub use scheduler::{TweenId, TweenScheduler};
pub use tween::Tween;
