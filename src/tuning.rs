//! Data-driven game balance
//!
//! Every gameplay number the simulation reads lives here so a page can
//! override any of them from its settings block.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Inclusive-exclusive millisecond range `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsRange {
    pub min: u64,
    pub max: u64,
}

impl MsRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Duck sprite size at scale 1.0 (pixels)
    pub duck_width: f32,
    pub duck_height: f32,
    /// Random duck scale range `[min, max)`
    pub scale_min: f32,
    pub scale_max: f32,

    /// Life total at game start
    pub lives: u32,
    /// Hit score numerator (score = floor(numerator / height))
    pub score_numerator: f32,

    /// Duration of each wander leg
    pub wander_ms: MsRange,
    /// Duration of the fly-away leg
    pub fly_away_ms: MsRange,
    /// Duration of the dead-duck fall
    pub fall_ms: u64,
    /// Escape delay base: level N draws from `[base/N, 2*base/N]`
    pub escape_base_ms: u64,

    /// Hitting a flying-away duck kills it (otherwise it still escapes)
    pub bonus_hit_kills: bool,
    /// Any key press kills every duck not already dead
    pub debug_kill_all: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            duck_width: DUCK_WIDTH,
            duck_height: DUCK_HEIGHT,
            scale_min: 1.0,
            scale_max: 2.0,

            lives: START_LIFE,
            score_numerator: SCORE_NUMERATOR,

            wander_ms: MsRange::new(500, 2000),
            fly_away_ms: MsRange::new(1000, 4000),
            fall_ms: FALL_MS,
            escape_base_ms: 30_000,

            bonus_hit_kills: true,
            debug_kill_all: true,
        }
    }
}

impl Tuning {
    /// Clamp values that would stall or freeze the game.
    ///
    /// Animation legs last at least 1 ms so a completion never reschedules
    /// at its own due time, and a game starts with at least one life.
    pub fn sanitized(mut self) -> Self {
        fn leg(name: &str, range: MsRange) -> MsRange {
            let min = range.min.max(1);
            let fixed = MsRange::new(min, range.max.max(min));
            if fixed != range {
                log::warn!("{} {:?} clamped to {:?}", name, range, fixed);
            }
            fixed
        }

        self.wander_ms = leg("wander_ms", self.wander_ms);
        self.fly_away_ms = leg("fly_away_ms", self.fly_away_ms);
        if self.fall_ms == 0 {
            log::warn!("fall_ms 0 clamped to 1");
            self.fall_ms = 1;
        }
        if self.lives == 0 {
            log::warn!("lives 0 clamped to 1");
            self.lives = 1;
        }
        self
    }

    /// Escape delay range for a level (ms). Level 0 is treated as level 1.
    pub fn escape_range(&self, level: u32) -> (f64, f64) {
        let base = self.escape_base_ms as f64 / level.max(1) as f64;
        (base, base * 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_range_shrinks_with_level() {
        let tuning = Tuning::default();
        assert_eq!(tuning.escape_range(1), (30_000.0, 60_000.0));
        assert_eq!(tuning.escape_range(3), (10_000.0, 20_000.0));
        assert_eq!(tuning.escape_range(0), tuning.escape_range(1));
    }

    #[test]
    fn test_sanitized_clamps_stalling_values() {
        let tuning = Tuning {
            wander_ms: MsRange::new(0, 1),
            fly_away_ms: MsRange::new(0, 0),
            fall_ms: 0,
            lives: 0,
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(tuning.wander_ms, MsRange::new(1, 1));
        assert_eq!(tuning.fly_away_ms, MsRange::new(1, 1));
        assert_eq!(tuning.fall_ms, 1);
        assert_eq!(tuning.lives, 1);
    }

    #[test]
    fn test_sanitized_keeps_valid_tuning() {
        assert_eq!(Tuning::default().sanitized(), Tuning::default());
        let inverted = Tuning {
            wander_ms: MsRange::new(800, 300),
            ..Tuning::default()
        }
        .sanitized();
        assert_eq!(inverted.wander_ms, MsRange::new(800, 800));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning: Tuning =
            serde_json::from_str(r#"{ "lives": 5, "wander_ms": { "min": 100, "max": 200 } }"#)
                .unwrap();
        assert_eq!(tuning.lives, 5);
        assert_eq!(tuning.wander_ms, MsRange::new(100, 200));
        assert_eq!(tuning.fall_ms, FALL_MS);
        assert!(tuning.bonus_hit_kills);
    }
}
