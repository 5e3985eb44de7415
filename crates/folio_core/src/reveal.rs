//! Reveal controller
//!
//! Tracks a one-shot `revealed` flag per content block. A block flips to
//! revealed the first time it is reported intersecting and stays revealed for
//! the rest of its lifetime; exit events never hide it again.

use crate::events::{IntersectionBatch, IntersectionEvent};
use crate::region::RegionId;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Visible fraction at which a block is revealed
pub const REVEAL_THRESHOLD: f32 = 0.1;

/// Per-block reveal state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealState {
    pub revealed: bool,
    /// Observation pass that revealed the block
    pub revealed_at: Option<u64>,
}

/// Owns the reveal state table for all mounted blocks
#[derive(Debug, Default)]
pub struct RevealController {
    blocks: FxHashMap<RegionId, RevealState>,
}

impl RevealController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state for a mounted block.
    ///
    /// Returns true if the block still needs observing. Mounting an id that is
    /// already revealed keeps it revealed.
    pub fn mount(&mut self, id: impl Into<RegionId>) -> bool {
        let state = self.blocks.entry(id.into()).or_default();
        !state.revealed
    }

    /// Drop state for an unmounted block
    pub fn unmount(&mut self, id: &str) -> bool {
        self.blocks.remove(id).is_some()
    }

    /// Apply one event. Returns true when this event revealed the block, in which
    /// case the caller should stop observing it.
    pub fn on_intersection(&mut self, event: &IntersectionEvent) -> bool {
        if !event.is_intersecting {
            return false;
        }

        let Some(state) = self.blocks.get_mut(event.region_id.as_str()) else {
            tracing::trace!("reveal: ignoring unmounted block '{}'", event.region_id);
            return false;
        };

        if state.revealed {
            return false;
        }

        state.revealed = true;
        state.revealed_at = Some(event.ordinal);
        tracing::debug!("reveal: '{}' revealed", event.region_id);
        true
    }

    /// Apply a batch, returning the blocks revealed by it in batch order
    pub fn on_batch(&mut self, batch: &IntersectionBatch) -> SmallVec<[RegionId; 4]> {
        batch
            .iter()
            .filter(|event| self.on_intersection(event))
            .map(|event| event.region_id.clone())
            .collect()
    }

    /// Unknown blocks read as not revealed
    pub fn is_revealed(&self, id: &str) -> bool {
        self.blocks.get(id).is_some_and(|state| state.revealed)
    }

    pub fn state(&self, id: &str) -> Option<RevealState> {
        self.blocks.get(id).copied()
    }

    pub fn is_mounted(&self, id: &str) -> bool {
        self.blocks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
