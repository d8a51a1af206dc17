//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (advanced by `tick`)
//! - Seeded RNG only
//! - Timers fire in (due time, schedule order)
//! - No rendering or platform dependencies

pub mod duck;
pub mod effects;
pub mod level;
pub mod scoring;
pub mod state;
pub mod tick;
pub mod timer;
pub mod tween;

pub use duck::{Duck, DuckId, DuckState, Facing, Motion};
pub use effects::{Banner, Dialog, DialogKind, Effects, Splatter, TAUNTS};
pub use level::{advance_if_cleared, game_over, start_level};
pub use scoring::score_for_height;
pub use state::{Bounds, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, hit_test, tick};
pub use timer::{Scheduler, TimerEvent, TimerHandle};
pub use tween::{Easing, Tween};
