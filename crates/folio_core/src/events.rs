//! Intersection events
//!
//! Events are produced by the [`VisibilityObserver`](crate::VisibilityObserver)
//! in batches, one batch per threshold group per observation pass.

use crate::region::RegionId;
use smallvec::SmallVec;

/// Visibility transition of a single region
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEvent {
    pub region_id: RegionId,
    pub is_intersecting: bool,
    /// Visible fraction of the region's area, `0.0..=1.0`
    pub ratio: f32,
    /// Observation pass that produced the event; increases monotonically
    pub ordinal: u64,
}

impl IntersectionEvent {
    pub fn new(region_id: impl Into<RegionId>, is_intersecting: bool, ratio: f32) -> Self {
        Self {
            region_id: region_id.into(),
            is_intersecting,
            ratio,
            ordinal: 0,
        }
    }

    pub fn with_ordinal(mut self, ordinal: u64) -> Self {
        self.ordinal = ordinal;
        self
    }
}

/// Events from one observation pass for one threshold group, in document order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntersectionBatch {
    pub threshold: f32,
    pub ordinal: u64,
    pub events: SmallVec<[IntersectionEvent; 8]>,
}

impl IntersectionBatch {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IntersectionEvent> {
        self.events.iter()
    }

    /// Drop events whose region fails `keep`
    pub fn retain(&mut self, mut keep: impl FnMut(&RegionId) -> bool) {
        self.events.retain(|event| keep(&event.region_id));
    }
}
