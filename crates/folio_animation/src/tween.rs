//! Tweens
//!
//! A tween interpolates between two values over a fixed duration, optionally
//! after a start delay. Time advances only through [`Tween::tick`].

use crate::easing::Easing;

#[derive(Clone, Debug)]
pub struct Tween {
    from: f32,
    to: f32,
    duration_ms: u32,
    delay_ms: u32,
    easing: Easing,
    elapsed_ms: f32,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_ms: u32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            delay_ms: 0,
            easing: Easing::default(),
            elapsed_ms: 0.0,
        }
    }

    /// Set delay before the tween starts moving
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    /// Advance by `dt_ms` milliseconds
    pub fn tick(&mut self, dt_ms: f32) {
        if self.is_finished() {
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + dt_ms.max(0.0)).min(self.total_ms());
    }

    /// Linear progress through the moving phase, `0.0..=1.0`.
    ///
    /// A finished tween is always at 1, so zero-duration tweens jump straight
    /// to their target once the delay has passed.
    pub fn progress(&self) -> f32 {
        if self.is_finished() {
            return 1.0;
        }
        let moving = self.elapsed_ms - self.delay_ms as f32;
        if moving <= 0.0 {
            return 0.0;
        }
        (moving / self.duration_ms as f32).min(1.0)
    }

    /// Current eased value
    pub fn value(&self) -> f32 {
        let eased = self.easing.apply(self.progress());
        self.from + (self.to - self.from) * eased
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.total_ms()
    }

    fn total_ms(&self) -> f32 {
        self.delay_ms as f32 + self.duration_ms as f32
    }
}
