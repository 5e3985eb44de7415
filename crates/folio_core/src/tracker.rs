//! Section tracker
//!
//! Maintains the single active section used for navigation highlighting.
//!
//! Resolution: among the sections currently intersecting, the one registered
//! first (top-to-bottom document order) is active. When nothing intersects the
//! previous active section is kept, so the highlight never flashes empty during
//! fast scrolls. Before any section has intersected there is no active section.

use crate::events::{IntersectionBatch, IntersectionEvent};
use crate::region::RegionId;
use rustc_hash::FxHashMap;

/// Latest observation of a registered section
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectionObservation {
    pub is_intersecting: bool,
    pub ratio: f32,
}

/// Active section state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActiveSection {
    #[default]
    None,
    Section(RegionId),
}

impl ActiveSection {
    pub fn id(&self) -> Option<&RegionId> {
        match self {
            ActiveSection::None => None,
            ActiveSection::Section(id) => Some(id),
        }
    }

    pub fn is(&self, id: &str) -> bool {
        self.id().is_some_and(|active| active.as_str() == id)
    }
}

/// Tracks section visibility and resolves the active section
#[derive(Debug, Default)]
pub struct SectionTracker {
    /// Registration order, which is document order
    order: Vec<RegionId>,
    observations: FxHashMap<RegionId, SectionObservation>,
    active: ActiveSection,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a section after the ones already registered.
    ///
    /// Re-registering an id keeps its original position and resets its
    /// observation. A section registered again after `unregister` is new and
    /// goes to the end of the order.
    pub fn register(&mut self, id: impl Into<RegionId>) {
        let id = id.into();
        if !self.observations.contains_key(&id) {
            self.order.push(id.clone());
        }
        self.observations.insert(id, SectionObservation::default());
    }

    /// Remove a section. If it was active, the earliest intersecting section
    /// takes over, or nothing is active.
    pub fn unregister(&mut self, id: &str) -> bool {
        if self.observations.remove(id).is_none() {
            return false;
        }
        self.order.retain(|section| section.as_str() != id);

        if self.active.is(id) {
            self.active = match self.earliest_intersecting() {
                Some(next) => ActiveSection::Section(next),
                None => ActiveSection::None,
            };
            tracing::debug!("tracker: active section removed, now {:?}", self.active);
        }
        true
    }

    /// Apply one event and re-resolve. Returns true if the active section changed.
    pub fn on_intersection(&mut self, event: &IntersectionEvent) -> bool {
        if !self.record(event) {
            return false;
        }
        self.resolve()
    }

    /// Apply a whole batch, then resolve once. The outcome does not depend on
    /// the order of events inside the batch.
    pub fn on_batch(&mut self, batch: &IntersectionBatch) -> bool {
        let mut recorded = false;
        for event in batch.iter() {
            recorded |= self.record(event);
        }
        recorded && self.resolve()
    }

    pub fn active_section(&self) -> Option<&RegionId> {
        self.active.id()
    }

    pub fn active(&self) -> &ActiveSection {
        &self.active
    }

    pub fn observation(&self, id: &str) -> Option<SectionObservation> {
        self.observations.get(id).copied()
    }

    /// Registered section ids in document order
    pub fn sections(&self) -> &[RegionId] {
        &self.order
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.observations.contains_key(id)
    }

    fn record(&mut self, event: &IntersectionEvent) -> bool {
        let Some(observation) = self.observations.get_mut(event.region_id.as_str()) else {
            tracing::trace!("tracker: ignoring unregistered section '{}'", event.region_id);
            return false;
        };
        observation.is_intersecting = event.is_intersecting;
        observation.ratio = event.ratio;
        true
    }

    fn earliest_intersecting(&self) -> Option<RegionId> {
        self.order
            .iter()
            .find(|id| {
                self.observations
                    .get(*id)
                    .is_some_and(|observation| observation.is_intersecting)
            })
            .cloned()
    }

    fn resolve(&mut self) -> bool {
        let Some(next) = self.earliest_intersecting() else {
            // Hold the previous section
            return false;
        };

        if self.active.is(next.as_str()) {
            return false;
        }

        tracing::debug!("tracker: active section {:?} -> '{}'", self.active.id(), next);
        self.active = ActiveSection::Section(next);
        true
    }
}
