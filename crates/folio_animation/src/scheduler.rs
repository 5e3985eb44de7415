//! Tween scheduler
//!
//! Holds all active tweens and advances them each frame.

use crate::tween::Tween;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct TweenId;
}

/// Ticks all active tweens from the host's frame loop
pub struct TweenScheduler {
    tweens: SlotMap<TweenId, Tween>,
}

impl TweenScheduler {
    pub fn new() -> Self {
        Self {
            tweens: SlotMap::with_key(),
        }
    }

    pub fn add(&mut self, tween: Tween) -> TweenId {
        self.tweens.insert(tween)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id)
    }

    pub fn remove(&mut self, id: TweenId) -> Option<Tween> {
        self.tweens.remove(id)
    }

    /// Current value of a tween, `None` once it has been removed
    pub fn value(&self, id: TweenId) -> Option<f32> {
        self.tweens.get(id).map(Tween::value)
    }

    /// Advance all tweens by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        for (_, tween) in self.tweens.iter_mut() {
            tween.tick(dt_ms);
        }
    }

    /// Check if any tweens are still running
    pub fn has_active(&self) -> bool {
        self.tweens.iter().any(|(_, tween)| !tween.is_finished())
    }

    /// Remove finished tweens, returning how many were dropped
    pub fn prune_finished(&mut self) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|_, tween| !tween.is_finished());
        let pruned = before - self.tweens.len();
        if pruned > 0 {
            tracing::trace!("scheduler: pruned {} finished tween(s)", pruned);
        }
        pruned
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl Default for TweenScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;

    #[test]
    fn test_tick_advances_all() {
        let mut scheduler = TweenScheduler::new();
        let a = scheduler.add(Tween::new(0.0, 10.0, 100).easing(Easing::Linear));
        let b = scheduler.add(Tween::new(0.0, 10.0, 200).easing(Easing::Linear));

        scheduler.tick(100.0);
        assert_eq!(scheduler.value(a), Some(10.0));
        assert!((scheduler.value(b).unwrap_or_default() - 5.0).abs() < 1e-3);
        assert!(scheduler.has_active());

        scheduler.tick(100.0);
        assert!(!scheduler.has_active());
    }

    #[test]
    fn test_prune_finished() {
        let mut scheduler = TweenScheduler::new();
        let done = scheduler.add(Tween::new(0.0, 1.0, 10));
        let running = scheduler.add(Tween::new(0.0, 1.0, 1000));

        scheduler.tick(20.0);
        assert_eq!(scheduler.prune_finished(), 1);
        assert_eq!(scheduler.value(done), None);
        assert!(scheduler.get(running).is_some());
    }
}
