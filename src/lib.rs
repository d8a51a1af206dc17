//! Duck Hunt - a browser arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (duck lifecycle, levels, scoring, timers)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences and startup configuration
//! - `dom`: DOM renderer and HUD (wasm only)
//! - `audio`: Procedural sound effects (wasm only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Base duck sprite width in pixels (scale 1.0)
    pub const DUCK_WIDTH: f32 = 130.0;
    /// Base duck sprite height in pixels (scale 1.0)
    pub const DUCK_HEIGHT: f32 = 104.0;

    /// Points numerator: a hit scores `floor(SCORE_NUMERATOR / height)`
    pub const SCORE_NUMERATOR: f32 = 13000.0;

    /// Starting life total
    pub const START_LIFE: u32 = 3;

    /// Dead duck fall duration (ms)
    pub const FALL_MS: u64 = 1000;

    /// Dialog rise duration (ms)
    pub const DIALOG_RISE_MS: u64 = 500;
    /// Dialog fade-out duration (ms), after which it is removed
    pub const DIALOG_FADE_MS: u64 = 700;
    /// Blood splatter fade-out duration (ms)
    pub const SPLATTER_FADE_MS: u64 = 500;
    /// Full-screen banner fade-out duration (ms)
    pub const BANNER_FADE_MS: u64 = 600;

    /// Longest frame the browser loop will feed into a tick (ms)
    pub const MAX_FRAME_MS: u64 = 250;
}

/// Random integer in `[min, max)`. Returns `min` when the range is empty.
#[inline]
pub fn rand_int<R: Rng + ?Sized>(rng: &mut R, min: i64, max: i64) -> i64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
