//! Eased property tweens on the virtual clock

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Easing curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Slow start and end (half cosine)
    Swing,
}

impl Easing {
    /// Map linear progress `t` in [0, 1] onto the curve
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Swing => 0.5 - (t * std::f32::consts::PI).cos() / 2.0,
        }
    }
}

/// Linear progress of a `duration_ms` span started at `start_ms`, in [0, 1]
#[inline]
pub fn progress(start_ms: u64, duration_ms: u64, now_ms: u64) -> f32 {
    if duration_ms == 0 || now_ms >= start_ms + duration_ms {
        return 1.0;
    }
    now_ms.saturating_sub(start_ms) as f32 / duration_ms as f32
}

/// Position tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, start_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing,
        }
    }

    pub fn end_ms(&self) -> u64 {
        self.start_ms + self.duration_ms
    }

    /// Position at `now_ms`
    pub fn sample(&self, now_ms: u64) -> Vec2 {
        let t = self
            .easing
            .apply(progress(self.start_ms, self.duration_ms, now_ms));
        self.from.lerp(self.to, t)
    }
}
