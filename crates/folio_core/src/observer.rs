//! Visibility observer
//!
//! One shared observation group per distinct threshold. Regions subscribe to the
//! group matching their threshold; each observation pass walks every group,
//! computes the visible ratio of each member against the viewport, and reports
//! members whose intersecting state changed since the previous pass.
//!
//! The observer never schedules itself. The host calls [`VisibilityObserver::observe`]
//! after scroll or resize, the way a layout engine delivers intersection callbacks.
//!
//! ```
//! use folio_core::{NodeHandle, Rect, VisibilityObserver};
//! use rustc_hash::FxHashMap;
//!
//! let mut layout = FxHashMap::default();
//! layout.insert(NodeHandle(1), Rect::new(0.0, 0.0, 1000.0, 600.0));
//!
//! let mut observer = VisibilityObserver::new();
//! observer.register("hero", NodeHandle(1), 0.1);
//!
//! let batches = observer.observe(Rect::new(0.0, 0.0, 1000.0, 800.0), &layout);
//! assert_eq!(batches.len(), 1);
//! assert!(batches[0].events[0].is_intersecting);
//! ```

use crate::events::{IntersectionBatch, IntersectionEvent};
use crate::geometry::Rect;
use crate::region::{LayoutSource, NodeHandle, RegionId};
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle returned by [`VisibilityObserver::register`]
    pub struct SubscriptionHandle;
}

/// Thresholds are grouped at 1/10000 resolution
type ThresholdKey = u16;

const THRESHOLD_SCALE: f32 = 10_000.0;

fn threshold_key(threshold: f32) -> ThresholdKey {
    (threshold.clamp(0.0, 1.0) * THRESHOLD_SCALE).round() as ThresholdKey
}

struct Subscription {
    region_id: RegionId,
    node: NodeHandle,
    group: ThresholdKey,
    /// Registration sequence, breaks ties between regions with the same top edge
    seq: u64,
    /// `None` until the first pass has reported this region
    last_intersecting: Option<bool>,
}

/// Shared observation instance for one threshold value
struct ObservationGroup {
    threshold: f32,
    members: Vec<SubscriptionHandle>,
}

/// Shared viewport-intersection observer
pub struct VisibilityObserver {
    subscriptions: SlotMap<SubscriptionHandle, Subscription>,
    groups: FxHashMap<ThresholdKey, ObservationGroup>,
    by_region: FxHashMap<RegionId, SubscriptionHandle>,
    next_seq: u64,
    pass: u64,
}

impl VisibilityObserver {
    pub fn new() -> Self {
        Self {
            subscriptions: SlotMap::with_key(),
            groups: FxHashMap::default(),
            by_region: FxHashMap::default(),
            next_seq: 0,
            pass: 0,
        }
    }

    /// Start observing a region.
    ///
    /// Registering an id that is already observed replaces the previous
    /// subscription. The next pass always reports the new region once, whatever
    /// its state.
    pub fn register(
        &mut self,
        region_id: impl Into<RegionId>,
        node: NodeHandle,
        threshold: f32,
    ) -> SubscriptionHandle {
        let region_id = region_id.into();

        if let Some(previous) = self.by_region.get(&region_id).copied() {
            tracing::debug!("observer: replacing subscription for '{}'", region_id);
            self.unregister(previous);
        }

        let key = threshold_key(threshold);
        let seq = self.next_seq;
        self.next_seq += 1;

        let handle = self.subscriptions.insert(Subscription {
            region_id: region_id.clone(),
            node,
            group: key,
            seq,
            last_intersecting: None,
        });

        self.groups
            .entry(key)
            .or_insert_with(|| {
                tracing::trace!("observer: new group for threshold {:.4}", threshold);
                ObservationGroup {
                    threshold: f32::from(key) / THRESHOLD_SCALE,
                    members: Vec::new(),
                }
            })
            .members
            .push(handle);

        self.by_region.insert(region_id, handle);
        handle
    }

    /// Stop observing. Returns false if the handle was already gone.
    pub fn unregister(&mut self, handle: SubscriptionHandle) -> bool {
        let Some(subscription) = self.subscriptions.remove(handle) else {
            return false;
        };

        if let Some(group) = self.groups.get_mut(&subscription.group) {
            group.members.retain(|member| *member != handle);
            if group.members.is_empty() {
                self.groups.remove(&subscription.group);
            }
        }

        if self.by_region.get(&subscription.region_id) == Some(&handle) {
            self.by_region.remove(&subscription.region_id);
        }

        true
    }

    /// Stop observing a region by id
    pub fn unregister_region(&mut self, region_id: &str) -> bool {
        match self.by_region.get(region_id).copied() {
            Some(handle) => self.unregister(handle),
            None => false,
        }
    }

    /// Whether a region id currently has a live subscription
    pub fn is_observing(&self, region_id: &str) -> bool {
        self.by_region.contains_key(region_id)
    }

    /// Number of live subscriptions
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Number of shared observation groups (one per distinct threshold)
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Run one observation pass against `viewport`.
    ///
    /// Returns one batch per group that has changes, ordered by ascending
    /// threshold. Regions whose node can no longer be resolved are skipped.
    pub fn observe<L>(&mut self, viewport: Rect, layout: &L) -> SmallVec<[IntersectionBatch; 2]>
    where
        L: LayoutSource + ?Sized,
    {
        self.pass += 1;
        let ordinal = self.pass;

        let mut keys: SmallVec<[ThresholdKey; 4]> = self.groups.keys().copied().collect();
        keys.sort_unstable();

        let mut batches = SmallVec::new();

        for key in keys {
            let Some(group) = self.groups.get(&key) else {
                continue;
            };

            let mut changed: SmallVec<[(f32, u64, IntersectionEvent); 8]> = SmallVec::new();

            for handle in &group.members {
                let Some(subscription) = self.subscriptions.get_mut(*handle) else {
                    continue;
                };

                let Some(bounds) = layout.bounds(subscription.node) else {
                    tracing::trace!(
                        "observer: node for '{}' is gone, skipping",
                        subscription.region_id
                    );
                    continue;
                };

                let ratio = bounds.visible_ratio(&viewport);
                let is_intersecting = ratio > 0.0 && ratio >= group.threshold;

                if subscription.last_intersecting == Some(is_intersecting) {
                    continue;
                }
                subscription.last_intersecting = Some(is_intersecting);

                changed.push((
                    bounds.top(),
                    subscription.seq,
                    IntersectionEvent {
                        region_id: subscription.region_id.clone(),
                        is_intersecting,
                        ratio,
                        ordinal,
                    },
                ));
            }

            if changed.is_empty() {
                continue;
            }

            // Document order: top edge first, registration order on ties
            changed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

            tracing::trace!(
                "observer: pass {} threshold {:.2} -> {} event(s)",
                ordinal,
                group.threshold,
                changed.len()
            );

            batches.push(IntersectionBatch {
                threshold: group.threshold,
                ordinal,
                events: changed.into_iter().map(|(_, _, event)| event).collect(),
            });
        }

        batches
    }
}

impl Default for VisibilityObserver {
    fn default() -> Self {
        Self::new()
    }
}
