//! Eased scalar motions
//!
//! A `Tween` moves one value from `from` to `to` over a fixed duration.
//! A `Chain` runs tweens back to back, carrying leftover time from one
//! stage into the next. Both are advanced by the simulation delta, so a
//! paused session freezes them with everything else.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    QuadraticOut,
}

impl Easing {
    /// Map normalized time `t` in [0, 1] to eased progress
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticOut => t * (2.0 - t),
        }
    }
}

/// A single timed motion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    /// Current value; exactly `to` once finished
    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt`, returning time left over past the end
    pub fn advance(&mut self, dt: f32) -> f32 {
        let before = self.elapsed;
        self.elapsed = (self.elapsed + dt).min(self.duration);
        (dt - (self.elapsed - before)).max(0.0)
    }
}

/// Tweens played one after another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    stages: VecDeque<Tween>,
    last: f32,
}

impl Chain {
    pub fn new(first: Tween) -> Self {
        let last = first.from;
        let mut stages = VecDeque::with_capacity(2);
        stages.push_back(first);
        Self { stages, last }
    }

    /// Append a stage that starts when the previous one completes
    pub fn then(mut self, next: Tween) -> Self {
        self.stages.push_back(next);
        self
    }

    /// Advance the running stage and return the current value
    pub fn advance(&mut self, mut dt: f32) -> f32 {
        while let Some(stage) = self.stages.front_mut() {
            dt = stage.advance(dt);
            self.last = stage.value();
            if !stage.is_finished() {
                break;
            }
            self.stages.pop_front();
            if dt <= 0.0 {
                break;
            }
        }
        self.last
    }

    pub fn is_finished(&self) -> bool {
        self.stages.is_empty()
    }
}
