//! Game state and core simulation types
//!
//! Everything the game mutates lives in one owned `GameState`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::duck::{Duck, DuckId};
use super::effects::Effects;
use super::timer::Scheduler;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Before the first level starts
    Ready,
    /// Active gameplay
    Playing,
    /// Run ended (terminal)
    GameOver,
}

/// Notifications for the frontend (audio, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Accepted playfield click
    Shot,
    /// A duck was scored
    Hit { duck: DuckId, points: u32, bonus: bool },
    /// Click on an already dead duck
    ComboHit,
    /// A duck started flying away
    FlyAway,
    /// A duck escaped the screen
    LifeLost { remaining: u32 },
    LevelStarted(u32),
    GameOver { score: u64, level: u32 },
}

/// Playfield dimensions. The minimum corner is always (0, 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub bounds: Bounds,
    /// Virtual clock (ms), only advanced by `tick`
    pub time_ms: u64,
    pub phase: GamePhase,

    pub level: u32,
    pub score: u64,
    pub shots: u32,
    pub hits: u32,
    pub life: u32,
    /// Ducks spawned so far (also the last duck id handed out)
    pub duck_counter: u32,

    /// Ducks on screen, in spawn (paint) order
    pub ducks: Vec<Duck>,
    /// Cosmetic dialogs, splatters and banners
    pub effects: Effects,
    /// Escape timeouts and animation completions
    pub scheduler: Scheduler,
    /// Pending notifications, drained by the frontend
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state. No level is running until `start_level`.
    pub fn new(seed: u64, tuning: Tuning, bounds: Bounds) -> Self {
        let tuning = tuning.sanitized();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            life: tuning.lives,
            tuning,
            bounds,
            time_ms: 0,
            phase: GamePhase::Ready,
            level: 0,
            score: 0,
            shots: 0,
            hits: 0,
            duck_counter: 0,
            ducks: Vec::new(),
            effects: Effects::default(),
            scheduler: Scheduler::new(),
            events: Vec::new(),
        }
    }

    /// Allocate the next duck id
    pub fn next_duck_id(&mut self) -> DuckId {
        self.duck_counter += 1;
        DuckId(self.duck_counter)
    }

    pub fn duck(&self, id: DuckId) -> Option<&Duck> {
        self.ducks.iter().find(|d| d.id == id)
    }

    pub fn duck_mut(&mut self, id: DuckId) -> Option<&mut Duck> {
        self.ducks.iter_mut().find(|d| d.id == id)
    }

    /// Ducks still alive or flying away
    pub fn active_ducks(&self) -> usize {
        self.ducks.iter().filter(|d| d.is_active()).count()
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
