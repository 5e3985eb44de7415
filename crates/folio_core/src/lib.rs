//! Folio Core
//!
//! Viewport section tracking and reveal coordination for single-page sites:
//!
//! - **Visibility Observer**: shared intersection observation, one group per threshold
//! - **Reveal Controller**: one-shot hidden → revealed flags for content blocks
//! - **Section Tracker**: the single active section that drives navigation highlighting
//!
//! Data flows one way: the host reports scroll/resize, the observer produces
//! intersection batches, and the controllers consume them.
//!
//! # Example
//!
//! ```rust
//! use folio_core::{NodeHandle, Rect, SectionTracker, VisibilityObserver};
//! use rustc_hash::FxHashMap;
//!
//! let mut layout = FxHashMap::default();
//! layout.insert(NodeHandle(1), Rect::new(0.0, 0.0, 1280.0, 720.0));
//! layout.insert(NodeHandle(2), Rect::new(0.0, 720.0, 1280.0, 1400.0));
//!
//! let mut observer = VisibilityObserver::new();
//! let mut tracker = SectionTracker::new();
//! for (id, node) in [("hero", NodeHandle(1)), ("about", NodeHandle(2))] {
//!     observer.register(id, node, 0.2);
//!     tracker.register(id);
//! }
//!
//! for batch in observer.observe(Rect::new(0.0, 0.0, 1280.0, 720.0), &layout) {
//!     tracker.on_batch(&batch);
//! }
//! assert!(tracker.active().is("hero"));
//! ```

pub mod events;
pub mod geometry;
pub mod observer;
pub mod region;
pub mod reveal;
pub mod tracker;

pub use events::{IntersectionBatch, IntersectionEvent};
pub use geometry::{Point, Rect, Size};
pub use observer::{SubscriptionHandle, VisibilityObserver};
pub use region::{LayoutSource, NodeHandle, RegionId, RegionKind};
pub use reveal::{RevealController, RevealState, REVEAL_THRESHOLD};
pub use tracker::{ActiveSection, SectionObservation, SectionTracker};
